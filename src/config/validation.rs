use crate::config::types::{Config, FetcherConfig, OutputConfig, OutputFormat, SearchConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search(&config.search)?;
    validate_fetcher(&config.fetcher)?;
    validate_output(&config.output)?;
    Ok(())
}

fn validate_search(search: &SearchConfig) -> Result<(), ConfigError> {
    if search.location.trim().is_empty() {
        return Err(ConfigError::Validation(
            "search.location must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_fetcher(fetcher: &FetcherConfig) -> Result<(), ConfigError> {
    if fetcher.requests_per_second == 0 {
        return Err(ConfigError::Validation(
            "fetcher.requests-per-second must be at least 1".to_string(),
        ));
    }
    if fetcher.max_inflight == 0 {
        return Err(ConfigError::Validation(
            "fetcher.max-inflight must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_output(output: &OutputConfig) -> Result<(), ConfigError> {
    match output.format {
        OutputFormat::Jsonl => {
            if output.directory.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "output.directory must not be empty for the jsonl format".to_string(),
                ));
            }
        }
        OutputFormat::Sqlite => {
            if output.database_path.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "output.database-path must not be empty for the sqlite format".to_string(),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::BrowserConfig;

    fn valid_config() -> Config {
        Config {
            search: SearchConfig {
                location: "Munich".to_string(),
                keywords: String::new(),
                posted_within: 86400,
            },
            fetcher: FetcherConfig::default(),
            browser: BrowserConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Jsonl,
                directory: "data".to_string(),
                database_path: "jobs.db".to_string(),
            },
        }
    }

    #[test]
    fn accepts_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn rejects_empty_location() {
        let mut config = valid_config();
        config.search.location = "   ".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn rejects_zero_requests_per_second() {
        let mut config = valid_config();
        config.fetcher.requests_per_second = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn rejects_missing_jsonl_directory() {
        let mut config = valid_config();
        config.output.directory = String::new();
        assert!(validate(&config).is_err());
    }
}
