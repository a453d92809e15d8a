use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::MatchPolicy;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_geohash_precision")]
    pub geohash_precision: usize,
    #[serde(default = "default_search_prefix_len")]
    pub search_prefix_len: usize,
    #[serde(default = "default_tie_epsilon_km")]
    pub tie_epsilon_km: f64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: i64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            geohash_precision: default_geohash_precision(),
            search_prefix_len: default_search_prefix_len(),
            tie_epsilon_km: default_tie_epsilon_km(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl MatchingSettings {
    pub fn policy(&self) -> MatchPolicy {
        MatchPolicy {
            precision: self.geohash_precision,
            search_prefix_len: self.search_prefix_len,
            tie_epsilon_km: self.tie_epsilon_km,
        }
    }

    /// Request timeout as a duration; rejects values chrono cannot represent
    pub fn request_timeout(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::try_seconds(self.request_timeout_secs).ok_or_else(|| {
            ConfigError::Message(format!(
                "matching.request_timeout_secs out of range: {}",
                self.request_timeout_secs
            ))
        })
    }
}

fn default_geohash_precision() -> usize { 6 }
fn default_search_prefix_len() -> usize { 3 }
fn default_tie_epsilon_km() -> f64 { 0.001 }
fn default_request_timeout_secs() -> i64 { 300 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with RIDE_MATCH)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // e.g., RIDE_MATCH__MATCHING__SEARCH_PREFIX_LEN -> matching.search_prefix_len
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("RIDE_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matching() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.policy(), MatchPolicy::default());
        assert_eq!(matching.request_timeout().unwrap(), chrono::Duration::seconds(300));
    }

    #[test]
    fn test_out_of_range_timeout_is_config_error() {
        let matching = MatchingSettings {
            request_timeout_secs: i64::MAX,
            ..MatchingSettings::default()
        };

        assert!(matches!(matching.request_timeout(), Err(ConfigError::Message(_))));
    }

    #[test]
    fn test_load_shipped_config() {
        let settings = Settings::load_from("config/default.toml").unwrap();

        assert_eq!(settings.server.workers, Some(4));
        assert_eq!(settings.matching.policy(), MatchPolicy::default());
        assert_eq!(settings.matching.request_timeout_secs, 300);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "pretty");
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                "[matching]\nsearch_prefix_len = 4\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.matching.search_prefix_len, 4);
        assert_eq!(settings.matching.geohash_precision, 6);
        assert_eq!(settings.server.port, 8080);
    }
}
