//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Group membership limits.
    #[serde(default)]
    pub groups: GroupConfig,
}

/// Group membership limits.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupConfig {
    /// Maximum number of members a single group may hold.
    #[serde(default = "default_max_members")]
    pub max_members: usize,
    /// Maximum number of pending join requests per group.
    #[serde(default = "default_max_pending_requests")]
    pub max_pending_requests: usize,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            max_members: default_max_members(),
            max_pending_requests: default_max_pending_requests(),
        }
    }
}

const fn default_max_members() -> usize {
    1000
}

const fn default_max_pending_requests() -> usize {
    100
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `TEAMCHAT_ENV`)
    /// 4. Environment variables with `TEAMCHAT__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let env = std::env::var("TEAMCHAT_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TEAMCHAT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("TEAMCHAT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
