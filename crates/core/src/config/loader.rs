use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable holding the OMDb API key.
pub const API_KEY_ENV: &str = "OMDB_API_KEY";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(Figment::new().merge(Toml::file(path)))
}

/// Load configuration from defaults and the environment only
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    extract(Figment::new())
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    extract_with_api_key(figment, std::env::var(API_KEY_ENV).ok())
}

/// The key is merged verbatim: an all-digit key must stay a string.
fn extract_with_api_key(
    figment: Figment,
    api_key: Option<String>,
) -> Result<Config, ConfigError> {
    let mut figment = figment.merge(Env::prefixed("CINEMATCH_").split("__"));
    if let Some(key) = api_key {
        figment = figment.merge(Serialized::default("omdb.api_key", key));
    }

    figment
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[resolver]
fuzzy_threshold = 70
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.resolver.fuzzy_threshold, 70);
    }

    #[test]
    fn test_load_config_from_str_rejects_bad_types() {
        let toml = r#"
[resolver]
fuzzy_threshold = "high"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_numeric_api_key_stays_a_string() {
        let config = extract_with_api_key(Figment::new(), Some("01234567".to_string())).unwrap();
        assert_eq!(config.omdb.api_key(), Some("01234567"));
    }

    #[test]
    fn test_api_key_overrides_file_value() {
        let figment = Figment::new().merge(Toml::string("[omdb]\napi_key = \"from-file\"\n"));
        let config = extract_with_api_key(figment, Some("12345678".to_string())).unwrap();
        assert_eq!(config.omdb.api_key(), Some("12345678"));
    }

    #[test]
    #[serial]
    fn test_numeric_api_key_from_environment() {
        std::env::set_var(API_KEY_ENV, "12345678");
        let result = load_config_from_env();
        std::env::remove_var(API_KEY_ENV);

        let config = result.unwrap();
        assert_eq!(config.omdb.api_key(), Some("12345678"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let err = load_config(Path::new("/nonexistent/cinematch.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    #[serial]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[cache]
path = "/tmp/omdb_cache.json"

[database]
path = "/tmp/movies.db"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.cache.path.to_str(), Some("/tmp/omdb_cache.json"));
        assert_eq!(config.database.path.to_str(), Some("/tmp/movies.db"));
        assert_eq!(config.resolver.fuzzy_threshold, 85);
    }
}
