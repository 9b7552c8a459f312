use crate::config::types::{Config, CrawlerConfig, HttpConfig, StorageConfig};
use crate::ConfigError;
use std::path::{Component, Path};

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrency == Some(0) {
        return Err(ConfigError::Validation(
            "max_concurrency must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.root.is_empty() {
        return Err(ConfigError::Validation(
            "storage root cannot be empty".to_string(),
        ));
    }

    validate_directory_name(&config.directory)
}

/// Checks that a downloads directory is a single plain path component
///
/// Pages must land beneath the storage root, so absolute paths, `..` and
/// nested paths are refused.
pub fn validate_directory_name(name: &str) -> Result<(), ConfigError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "directory must be a single relative name, got '{}'",
            name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_directory_name() {
        assert!(validate_directory_name("downloads").is_ok());
        assert!(validate_directory_name("tests").is_ok());

        assert!(validate_directory_name("").is_err());
        assert!(validate_directory_name("..").is_err());
        assert!(validate_directory_name("/etc").is_err());
        assert!(validate_directory_name("a/b").is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.http.timeout_secs = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_blank_user_agent_rejected() {
        let mut config = Config::default();
        config.http.user_agent = "   ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = Config::default();
        config.crawler.max_concurrency = Some(0);
        assert!(validate(&config).is_err());

        config.crawler.max_concurrency = Some(1);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_root_rejected() {
        let mut config = Config::default();
        config.storage.root = String::new();
        assert!(validate(&config).is_err());
    }
}
