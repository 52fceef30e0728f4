use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads, parses and validates a configuration file
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::OutputFormat;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[search]
location = "Munich"
keywords = "Python"
posted-within = 86400

[fetcher]
requests-per-second = 2
max-retries = 3

[output]
format = "jsonl"
directory = "./data"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.search.location, "Munich");
        assert_eq!(config.search.keywords, "Python");
        assert_eq!(config.search.posted_within, 86400);
        assert_eq!(config.fetcher.requests_per_second, 2);
        assert_eq!(config.fetcher.max_retries, 3);
        assert_eq!(config.output.format, OutputFormat::Jsonl);
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config_content = r#"
[search]
location = "Garmisch"

[output]
format = "sqlite"
database-path = "./jobs.db"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.search.keywords, "");
        assert_eq!(config.search.posted_within, -1);
        assert_eq!(config.fetcher.requests_per_second, 1);
        assert_eq!(config.fetcher.max_retries, 5);
        assert!(config.fetcher.enrich);
        assert!(config.browser.headless);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[search]
location = ""

[output]
format = "jsonl"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
