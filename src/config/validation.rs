use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    // crawl_delay_ms may be 0; politeness is the operator's call.

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "user-agent name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    if config.version.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.root_dir.is_empty() {
        return Err(ConfigError::Validation(
            "output root-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_max_pages_rejected() {
        let mut config = Config::default();
        config.crawler.max_pages = 0;
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.crawler.request_timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_delay_allowed() {
        let mut config = Config::default();
        config.crawler.crawl_delay_ms = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_user_agent_name_rejected() {
        let mut config = Config::default();
        config.user_agent.name = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_user_agent_name_with_spaces_rejected() {
        let mut config = Config::default();
        config.user_agent.name = "my crawler".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_hyphenated_user_agent_name_allowed() {
        let mut config = Config::default();
        config.user_agent.name = "site-grab".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_output_dir_rejected() {
        let mut config = Config::default();
        config.output.root_dir = String::new();
        assert!(validate(&config).is_err());
    }
}
