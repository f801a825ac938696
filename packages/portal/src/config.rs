use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub use common::config::{GradingConfig, JudgeConfig};

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Connection string. Default: "postgres://localhost/portal".
    #[serde(default = "default_database_url")]
    pub url: String,
}

fn default_database_url() -> String {
    "postgres://localhost/portal".into()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub judge: JudgeConfig,
    #[serde(default)]
    pub grading: GradingConfig,
}

impl AppConfig {
    /// Load from `$PORTAL_CONFIG` (default `config/config`), then
    /// `PORTAL__*` environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("PORTAL_CONFIG").unwrap_or_else(|_| "config/config".to_string());
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("judge.base_url", "http://localhost:2358")?
            .set_default("judge.request_timeout_secs", 10_i64)?
            .set_default("grading.poll_interval_ms", 1000_i64)?
            .set_default("grading.poll_timeout_secs", 10_i64)?
            .set_default("grading.max_concurrency", 4_i64)?
            .add_source(File::with_name(config_path).required(false))
            // e.g. PORTAL__JUDGE__API_KEY
            .add_source(Environment::with_prefix("PORTAL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
