use crate::config::types::{Config, CrawlerConfig, FetcherConfig, OutputConfig};
use crate::ConfigError;

/// Largest accepted parallel batch size
const MAX_BATCH_SIZE: usize = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
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

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.batch_size < 1 || config.batch_size > MAX_BATCH_SIZE {
        return Err(ConfigError::Validation(format!(
            "batch_size must be between 1 and {}, got {}",
            MAX_BATCH_SIZE, config.batch_size
        )));
    }

    validate_session_name("sequential_session", &config.sequential_session)?;
    validate_session_name("parallel_session_prefix", &config.parallel_session_prefix)?;

    Ok(())
}

/// Session identifiers are free-form tags but must be non-empty and printable
fn validate_session_name(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
    }

    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "{} must not contain whitespace, got '{}'",
            field, value
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.docs_dir.is_empty() {
        return Err(ConfigError::Validation(
            "docs_dir cannot be empty".to_string(),
        ));
    }

    if config.logs_dir.is_empty() {
        return Err(ConfigError::Validation(
            "logs_dir cannot be empty".to_string(),
        ));
    }

    if config.default_filename.is_empty()
        || config.default_filename.contains('/')
        || config.default_filename.contains('\\')
    {
        return Err(ConfigError::Validation(format!(
            "default_filename must be a bare file name, got '{}'",
            config.default_filename
        )));
    }

    Ok(())
}
