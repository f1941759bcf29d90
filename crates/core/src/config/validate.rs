use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Fuzzy threshold is within 0-100
/// - At least one attempt per OMDb call
/// - OMDb base URL is set
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.resolver.fuzzy_threshold > 100 {
        return Err(ConfigError::ValidationError(format!(
            "resolver.fuzzy_threshold must be between 0 and 100, got {}",
            config.resolver.fuzzy_threshold
        )));
    }

    if config.omdb.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "omdb.max_attempts must be at least 1".to_string(),
        ));
    }

    if config.omdb.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "omdb.base_url cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OmdbConfig, ResolverConfig};

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_threshold_out_of_range_fails() {
        let config = Config {
            resolver: ResolverConfig {
                fuzzy_threshold: 101,
            },
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_threshold_bounds_are_inclusive() {
        for threshold in [0, 100] {
            let config = Config {
                resolver: ResolverConfig {
                    fuzzy_threshold: threshold,
                },
                ..Default::default()
            };
            assert!(validate_config(&config).is_ok());
        }
    }

    #[test]
    fn test_validate_zero_attempts_fails() {
        let config = Config {
            omdb: OmdbConfig {
                max_attempts: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_base_url_fails() {
        let config = Config {
            omdb: OmdbConfig {
                base_url: " ".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
