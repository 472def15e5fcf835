//! URL handling module for sitegrab
//!
//! This module provides relative-URL resolution, domain extraction,
//! domain-scope filtering, and seed URL validation.

mod resolve;
mod scope;

pub use resolve::resolve_url;
pub use scope::{extract_domain, in_scope, validate_seed};
