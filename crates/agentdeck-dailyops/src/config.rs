//! Layered configuration: CLI flags over config file over built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Coordinator agent wired to the transport, schedule, wellness, safety and
/// social sub-agents on the platform side.
pub const DAILY_OPS_COORDINATOR_ID: &str = "6985879714456d4b2db732d8";

/// Platform user the console authenticates as.
pub const DEFAULT_USER_ID: &str = "student@agentdeck.in";

/// Where the user starts the day.
pub const HOME_LOCATION: &str = "Andheri";

/// Where lectures happen.
pub const CAMPUS_LOCATION: &str = "Churchgate";

/// First lecture slot, phrased the way the coordinator expects it.
pub const FIRST_LECTURE_TIME: &str = "9 AM";

/// One layer of configuration. Every key may be omitted.
///
/// The same shape carries both CLI flags and the parsed config file, so
/// [`AppConfig::resolve`] only has to merge two of these.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    pub endpoint: Option<String>,
    pub user_id: Option<String>,
    pub api_key: Option<String>,
    pub coordinator: Option<String>,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoint: String,
    pub user_id: String,
    pub api_key: Option<String>,
    pub coordinator: String,
}

impl AppConfig {
    /// Merges the flag layer over the file layer over the built-in defaults.
    pub fn resolve(flags: ConfigLayer, file: ConfigLayer) -> Self {
        Self {
            endpoint: flags
                .endpoint
                .or(file.endpoint)
                .unwrap_or_else(|| agentdeck_bridge::DEFAULT_BASE_URL.to_string()),
            user_id: flags
                .user_id
                .or(file.user_id)
                .unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
            api_key: flags.api_key.or(file.api_key),
            coordinator: flags
                .coordinator
                .or(file.coordinator)
                .unwrap_or_else(|| DAILY_OPS_COORDINATOR_ID.to_string()),
        }
    }
}

/// Loads the config file layer.
///
/// An explicit `--config` path must exist; the default location is optional
/// and silently skipped when absent.
pub fn load(path: Option<&Path>) -> anyhow::Result<ConfigLayer> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(ConfigLayer::default()),
        },
    };
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
}

/// `~/.config/agentdeck/dailyops.toml` on Linux, the platform equivalent
/// elsewhere.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("agentdeck").join("dailyops.toml"))
}
