use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::{DEFAULT_MAX_BYTES, DEFAULT_MAX_SESSIONS};
use crate::options::RequestOptions;

fn default_poll_budget_ms() -> u64 {
    1000
}

/// Global configuration loaded from `~/.config/mfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MfetchConfig {
    /// Maximum number of transfers in flight at once.
    pub max_sessions: usize,
    /// Byte cap per transfer; a transfer is finalized once it has received this much.
    pub max_bytes: u64,
    /// Upper bound in milliseconds for each readiness wait during a poll pass.
    #[serde(default = "default_poll_budget_ms")]
    pub poll_budget_ms: u64,
    /// Finalize a transfer that received nothing for this many seconds (None = never).
    #[serde(default)]
    pub stall_timeout_secs: Option<u64>,
    /// Default request options; if missing, the built-in baseline is used.
    #[serde(default)]
    pub options: Option<RequestOptions>,
}

impl Default for MfetchConfig {
    fn default() -> Self {
        Self {
            max_sessions: DEFAULT_MAX_SESSIONS,
            max_bytes: DEFAULT_MAX_BYTES,
            poll_budget_ms: default_poll_budget_ms(),
            stall_timeout_secs: None,
            options: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<MfetchConfig> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: MfetchConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = MfetchConfig::default();
        assert_eq!(cfg.max_sessions, 10);
        assert_eq!(cfg.max_bytes, 10_485_760);
        assert_eq!(cfg.poll_budget_ms, 1000);
        assert!(cfg.stall_timeout_secs.is_none());
        assert!(cfg.options.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = MfetchConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: MfetchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.max_sessions, cfg.max_sessions);
        assert_eq!(parsed.max_bytes, cfg.max_bytes);
        assert_eq!(parsed.poll_budget_ms, cfg.poll_budget_ms);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            max_sessions = 2
            max_bytes = 10240
        "#;
        let cfg: MfetchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.max_sessions, 2);
        assert_eq!(cfg.max_bytes, 10240);
        assert_eq!(cfg.poll_budget_ms, 1000);
        assert!(cfg.options.is_none());
    }

    #[test]
    fn config_toml_options_section() {
        let toml = r#"
            max_sessions = 4
            max_bytes = 65536
            stall_timeout_secs = 30

            [options]
            user_agent = "mfetch-test"
            headers = ["Accept: text/html"]
            timeout_secs = 5
        "#;
        let cfg: MfetchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.stall_timeout_secs, Some(30));
        let opts = cfg.options.as_ref().unwrap();
        assert_eq!(opts.user_agent.as_deref(), Some("mfetch-test"));
        assert_eq!(opts.headers, Some(vec!["Accept: text/html".to_string()]));
        assert_eq!(opts.timeout_secs, Some(5));
        assert!(opts.follow_location.is_none());
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_sessions = 3\nmax_bytes = 1024\n").unwrap();
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.max_sessions, 3);
        assert_eq!(cfg.max_bytes, 1024);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_sessions = \"many\"\n").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parse"));
    }
}
