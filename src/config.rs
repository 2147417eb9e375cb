use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub firebase: FirebaseSettings,
    pub collection: CollectionSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseSettings {
    /// Firestore REST endpoint, e.g. https://firestore.googleapis.com/v1
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub contacts: String,
    pub properties: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub ttl_secs: Option<u64>,
    pub max_entries: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Trailing activity window for the contact prefilter. Historical
    /// deployments used anywhere from one to three years.
    #[serde(default = "default_recency_window_days")]
    pub recency_window_days: i64,
    /// Lifecycle stage that bypasses the activity window.
    #[serde(default = "default_terminal_stage")]
    pub terminal_stage: String,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            recency_window_days: default_recency_window_days(),
            terminal_stage: default_terminal_stage(),
        }
    }
}

fn default_recency_window_days() -> i64 {
    365
}

fn default_terminal_stage() -> String {
    "Etapa4".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with ATAIR_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with ATAIR_)
            // e.g., ATAIR_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("ATAIR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("ATAIR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Fold the plain Firebase environment variables (the names the deployment
/// scripts export) over whatever the config files provided.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let api_key = env::var("FIREBASE_API_KEY")
        .or_else(|_| env::var("ATAIR_FIREBASE__API_KEY"))
        .ok();
    let project_id = env::var("FIREBASE_PROJECT_ID")
        .or_else(|_| env::var("ATAIR_FIREBASE__PROJECT_ID"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(api_key) = api_key {
        builder = builder.set_override("firebase.api_key", api_key)?;
    }
    if let Some(project_id) = project_id {
        builder = builder.set_override("firebase.project_id", project_id)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matching_settings() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.recency_window_days, 365);
        assert_eq!(matching.terminal_stage, "Etapa4");
    }

    #[test]
    fn test_default_logging() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "json");
    }
}
