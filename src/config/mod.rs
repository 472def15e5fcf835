//! Configuration module for sitegrab
//!
//! Configuration comes from built-in defaults, optionally overridden by a
//! TOML file, optionally overridden again by CLI flags (applied in `main`).
//!
//! # Example
//!
//! ```no_run
//! use sitegrab::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitegrab.toml")).unwrap();
//! println!("Page budget: {}", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser and validation entry points
pub use parser::load_config;
pub use validation::validate;
