//! Layered configuration: CLI flags over config file over built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Resume screening agent: scores a pasted resume against a role.
pub const SCREENING_AGENT_ID: &str = "698587d2e09a4c1fa4b20911";

/// Posting agent: optimizes a job posting, then broadcasts it.
pub const POSTING_AGENT_ID: &str = "698587f3c55b4e21a8d41c42";

/// Outreach agent: drafts candidate engagement messages.
pub const OUTREACH_AGENT_ID: &str = "69858811ab7d4f30b2c95e73";

/// Platform user the console authenticates as.
pub const DEFAULT_USER_ID: &str = "recruiter@agentdeck.in";

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
    pub screening: Option<String>,
    pub posting: Option<String>,
    pub outreach: Option<String>,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoint: String,
    pub user_id: String,
    pub api_key: Option<String>,
    pub screening: String,
    pub posting: String,
    pub outreach: String,
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
            screening: flags
                .screening
                .or(file.screening)
                .unwrap_or_else(|| SCREENING_AGENT_ID.to_string()),
            posting: flags
                .posting
                .or(file.posting)
                .unwrap_or_else(|| POSTING_AGENT_ID.to_string()),
            outreach: flags
                .outreach
                .or(file.outreach)
                .unwrap_or_else(|| OUTREACH_AGENT_ID.to_string()),
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

/// `~/.config/agentdeck/recruit.toml` on Linux, the platform equivalent
/// elsewhere.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("agentdeck").join("recruit.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resolve_falls_back_per_agent() {
        let file = ConfigLayer {
            posting: Some("custom-posting-agent".into()),
            ..Default::default()
        };
        let cfg = AppConfig::resolve(ConfigLayer::default(), file);
        assert_eq!(cfg.screening, SCREENING_AGENT_ID);
        assert_eq!(cfg.posting, "custom-posting-agent");
        assert_eq!(cfg.outreach, OUTREACH_AGENT_ID);
        assert_eq!(cfg.user_id, DEFAULT_USER_ID);
    }

    #[test]
    fn test_resolve_flag_beats_file() {
        let flags = ConfigLayer {
            screening: Some("flag-screening".into()),
            ..Default::default()
        };
        let file = ConfigLayer {
            screening: Some("file-screening".into()),
            endpoint: Some("http://file.local".into()),
            ..Default::default()
        };
        let cfg = AppConfig::resolve(flags, file);
        assert_eq!(cfg.screening, "flag-screening");
        assert_eq!(cfg.endpoint, "http://file.local");
    }

    #[test]
    fn test_load_parses_agent_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "outreach = \"my-outreach\"").unwrap();
        writeln!(file, "user_id = \"hr@example.com\"").unwrap();

        let layer = load(Some(file.path())).unwrap();
        assert_eq!(layer.outreach.as_deref(), Some("my-outreach"));
        assert_eq!(layer.user_id.as_deref(), Some("hr@example.com"));
        assert!(layer.screening.is_none());
    }

    #[test]
    fn test_load_explicit_missing_path_is_an_error() {
        assert!(load(Some(Path::new("/nonexistent/agentdeck/recruit.toml"))).is_err());
    }
}
