//! Runtime configuration
//!
//! Layered with figment: built-in defaults, then an optional TOML file, then
//! `PRESENCE_EMBED_*` environment variables.

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "PRESENCE_EMBED_";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// User-Agent sent to the presence proxy and image hosts
    pub user_agent: String,
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: format!("presence-embed/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Build the provider stack, optionally including a TOML file.
    ///
    /// A file named explicitly must exist.
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file_exact(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]))
    }

    /// Load configuration
    pub fn load(file: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(file).extract()
    }
}
