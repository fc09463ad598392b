//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::errors::{DashError, Result};

/// Endpoint the reference provider listens on.
pub const DEFAULT_PROVIDER_URL: &str = "http://localhost:4242/files";

/// Refresh intervals below this would hammer the provider and the terminal.
pub const MIN_REFRESH_INTERVAL_MS: u64 = 100;

/// Command-line overrides, applied after the file and the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub url: Option<String>,
    pub refresh_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub activity_log: Option<PathBuf>,
}

/// Full dashboard configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub refresh: RefreshConfig,
    pub logging: LoggingConfig,
    pub paths: PathsConfig,
}

/// Where and how to reach the file provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProviderConfig {
    pub url: String,
    /// Upper bound on one provider round-trip. Must stay below the refresh
    /// interval so a hung provider cannot starve the quit key.
    pub timeout_ms: u64,
}

/// Timer cadence and series shapes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RefreshConfig {
    pub interval_ms: u64,
    pub waveform_len: usize,
    /// Offset domain for the bar chart window.
    pub bar_window: usize,
}

/// Activity log settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// JSONL activity log. `None` disables logging.
    pub activity_log: Option<PathBuf>,
}

/// Filesystem paths used by flubdash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_PROVIDER_URL.to_string(),
            timeout_ms: 750,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1_000,
            waveform_len: 220,
            bar_window: 10,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(|| PathBuf::from("/tmp"), PathBuf::from);
        Self {
            config_file: home_dir.join(".config").join("flubdash").join("config.toml"),
        }
    }
}

impl ProviderConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl RefreshConfig {
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env and CLI
    /// overrides. Validation runs once, after every layer.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>, overrides: &CliOverrides) -> Result<Self> {
        Self::load_layered(path, env_var, overrides)
    }

    /// File and environment layers only, with an injectable environment lookup.
    pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        Self::load_layered(path, lookup, &CliOverrides::default())
    }

    /// Defaults, then file, then environment, then flags.
    ///
    /// Any layer that sets the refresh interval without also setting the
    /// provider timeout pulls an inherited timeout down to three quarters of
    /// the new interval.
    pub fn load_layered<F>(path: Option<&Path>, lookup: F, overrides: &CliOverrides) -> Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| DashError::Io {
                path: path_buf.clone(),
                source,
            })?;
            Self::from_toml_layer(&raw)?
        } else if is_explicit_path {
            return Err(DashError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(lookup)?;
        cfg.apply_cli_overrides(overrides);
        cfg.normalize();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config file body on top of the defaults.
    fn from_toml_layer(raw: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(raw)?;
        let provider = table.get("provider");
        let sets_timeout = provider.and_then(|p| p.get("timeout_ms")).is_some();
        let mut cfg: Self = toml::Value::Table(table).try_into()?;
        if !sets_timeout {
            cfg.fit_timeout_to_interval();
        }
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for logging.
    ///
    /// FNV-1a over the canonical JSON form, stable across processes.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("FLUBDASH_PROVIDER_URL") {
            self.provider.url = raw;
        }
        let timeout = lookup("FLUBDASH_PROVIDER_TIMEOUT_MS")
            .map(|raw| parse_env("FLUBDASH_PROVIDER_TIMEOUT_MS", &raw))
            .transpose()?;
        if let Some(raw) = lookup("FLUBDASH_REFRESH_INTERVAL_MS") {
            self.refresh.interval_ms = parse_env("FLUBDASH_REFRESH_INTERVAL_MS", &raw)?;
            if timeout.is_none() {
                self.fit_timeout_to_interval();
            }
        }
        if let Some(ms) = timeout {
            self.provider.timeout_ms = ms;
        }
        if let Some(raw) = lookup("FLUBDASH_WAVEFORM_LEN") {
            self.refresh.waveform_len = parse_env("FLUBDASH_WAVEFORM_LEN", &raw)?;
        }
        if let Some(raw) = lookup("FLUBDASH_ACTIVITY_LOG") {
            self.logging.activity_log = Some(PathBuf::from(raw));
        }
        Ok(())
    }

    /// Apply flags on top of the file and environment layers. The caller
    /// validates afterwards.
    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(url) = &overrides.url {
            self.provider.url.clone_from(url);
        }
        if let Some(ms) = overrides.refresh_ms {
            self.refresh.interval_ms = ms;
            if overrides.timeout_ms.is_none() {
                self.fit_timeout_to_interval();
            }
        }
        if let Some(ms) = overrides.timeout_ms {
            self.provider.timeout_ms = ms;
        }
        if let Some(path) = &overrides.activity_log {
            self.logging.activity_log = Some(path.clone());
        }
    }

    /// Pull an inherited timeout below a shorter interval.
    fn fit_timeout_to_interval(&mut self) {
        if self.provider.timeout_ms >= self.refresh.interval_ms {
            self.provider.timeout_ms = self.refresh.interval_ms / 4 * 3;
        }
    }

    fn normalize(&mut self) {
        let trimmed = self.provider.url.trim();
        if trimmed.len() != self.provider.url.len() {
            self.provider.url = trimmed.to_string();
        }
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        let url = &self.provider.url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DashError::InvalidConfig {
                details: format!("provider.url must be an http(s) URL, got {url:?}"),
            });
        }

        if self.refresh.interval_ms < MIN_REFRESH_INTERVAL_MS {
            return Err(DashError::InvalidConfig {
                details: format!(
                    "refresh.interval_ms must be >= {MIN_REFRESH_INTERVAL_MS}, got {}",
                    self.refresh.interval_ms
                ),
            });
        }

        if self.provider.timeout_ms == 0 {
            return Err(DashError::InvalidConfig {
                details: "provider.timeout_ms must be > 0".to_string(),
            });
        }

        if self.provider.timeout_ms >= self.refresh.interval_ms {
            return Err(DashError::InvalidConfig {
                details: format!(
                    "provider.timeout_ms ({}) must be < refresh.interval_ms ({})",
                    self.provider.timeout_ms, self.refresh.interval_ms
                ),
            });
        }

        if self.refresh.waveform_len == 0 {
            return Err(DashError::InvalidConfig {
                details: "refresh.waveform_len must be >= 1".to_string(),
            });
        }

        if self.refresh.bar_window == 0 {
            return Err(DashError::InvalidConfig {
                details: "refresh.bar_window must be >= 1".to_string(),
            });
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|error| DashError::ConfigParse {
        context: "env",
        details: format!("{name}={raw:?}: {error}"),
    })
}

#[cfg(test)]
mod tests {
    use super::{CliOverrides, Config, DashError};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    /// Explicit empty config file, so the host's own config never leaks in.
    fn empty_config() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();
        (dir, path)
    }

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.provider.url, "http://localhost:4242/files");
        assert_eq!(cfg.refresh.waveform_len, 220);
        assert_eq!(cfg.refresh.bar_window, 10);
    }

    #[test]
    fn stable_hash_changes_when_config_changes() {
        let cfg = Config::default();
        let hash_before = cfg.stable_hash().expect("hash should compute");

        let mut modified = Config::default();
        modified.refresh.waveform_len += 1;
        let hash_after = modified.stable_hash().expect("hash should compute");

        assert_ne!(hash_before, hash_after);
        assert_eq!(hash_before, Config::default().stable_hash().unwrap());
    }

    #[test]
    fn non_http_url_rejected() {
        let mut cfg = Config::default();
        cfg.provider.url = "ftp://localhost/files".to_string();
        let err = cfg.validate().expect_err("expected url validation error");
        assert!(err.to_string().contains("provider.url"));
    }

    #[test]
    fn timeout_must_stay_below_interval() {
        let mut cfg = Config::default();
        cfg.provider.timeout_ms = cfg.refresh.interval_ms;
        let err = cfg.validate().expect_err("expected timeout validation error");
        assert!(err.to_string().contains("timeout_ms"));
    }

    #[test]
    fn refresh_floor_enforced() {
        let mut cfg = Config::default();
        cfg.refresh.interval_ms = 10;
        cfg.provider.timeout_ms = 5;
        let err = cfg.validate().expect_err("expected interval validation error");
        assert!(err.to_string().contains("interval_ms"));
    }

    #[test]
    fn zero_sized_series_rejected() {
        let mut cfg = Config::default();
        cfg.refresh.waveform_len = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.refresh.bar_window = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_explicit_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = Config::load_with_env(Some(&path), no_env).expect_err("expected missing");
        assert!(matches!(err, DashError::MissingConfig { .. }));
    }

    #[test]
    fn toml_file_is_loaded_with_partial_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[provider]\nurl = \"http://127.0.0.1:9000/files\"\n\n[refresh]\nwaveform_len = 64\n",
        )
        .unwrap();

        let cfg = Config::load_with_env(Some(&path), no_env).expect("load");
        assert_eq!(cfg.provider.url, "http://127.0.0.1:9000/files");
        assert_eq!(cfg.provider.timeout_ms, 750);
        assert_eq!(cfg.refresh.waveform_len, 64);
        assert_eq!(cfg.refresh.interval_ms, 1_000);
        assert_eq!(cfg.paths.config_file, path);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[provider\nurl = ").unwrap();
        let err = Config::load_with_env(Some(&path), no_env).expect_err("expected parse error");
        assert_eq!(err.code(), "FLB-1003");
    }

    #[test]
    fn env_overrides_apply_after_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[refresh]\ninterval_ms = 2000\n").unwrap();

        let env = vars(&[
            ("FLUBDASH_PROVIDER_URL", "  http://10.0.0.2:4242/files "),
            ("FLUBDASH_PROVIDER_TIMEOUT_MS", "300"),
            ("FLUBDASH_ACTIVITY_LOG", "/tmp/flubdash.jsonl"),
        ]);
        let cfg = Config::load_with_env(Some(&path), |name| env.get(name).cloned())
            .expect("load with env");

        assert_eq!(cfg.provider.url, "http://10.0.0.2:4242/files");
        assert_eq!(cfg.provider.timeout_ms, 300);
        assert_eq!(cfg.refresh.interval_ms, 2_000);
        assert_eq!(
            cfg.logging.activity_log,
            Some(PathBuf::from("/tmp/flubdash.jsonl"))
        );
    }

    #[test]
    fn env_override_parse_failure_names_variable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let env = vars(&[("FLUBDASH_WAVEFORM_LEN", "lots")]);
        let err = Config::load_with_env(Some(&path), |name| env.get(name).cloned())
            .expect_err("expected env parse error");
        assert!(err.to_string().contains("FLUBDASH_WAVEFORM_LEN"));
    }

    #[test]
    fn toml_round_trip_preserves_config() {
        let mut cfg = Config::default();
        cfg.logging.activity_log = Some(PathBuf::from("/var/tmp/a.jsonl"));
        let rendered = cfg.to_toml().expect("serialize");
        let parsed: Config = toml::from_str(&rendered).expect("parse back");
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn cli_overrides_win_over_file_values() {
        let mut cfg = Config::default();
        cfg.apply_cli_overrides(&CliOverrides {
            url: Some(" http://127.0.0.1:1/files".to_string()),
            refresh_ms: Some(2_000),
            timeout_ms: Some(1_500),
            activity_log: Some(PathBuf::from("/tmp/x.jsonl")),
        });
        cfg.normalize();
        cfg.validate().expect("valid overrides");
        assert_eq!(cfg.provider.url, "http://127.0.0.1:1/files");
        assert_eq!(cfg.refresh.interval_ms, 2_000);
        assert_eq!(cfg.provider.timeout_ms, 1_500);
        assert_eq!(cfg.logging.activity_log, Some(PathBuf::from("/tmp/x.jsonl")));
    }

    #[test]
    fn short_refresh_flag_pulls_inherited_timeout_down() {
        let overrides = CliOverrides {
            refresh_ms: Some(200),
            ..CliOverrides::default()
        };
        let (_dir, path) = empty_config();
        let cfg = Config::load_layered(Some(&path), no_env, &overrides).expect("valid overrides");
        assert_eq!(cfg.refresh.interval_ms, 200);
        assert_eq!(cfg.provider.timeout_ms, 150);
    }

    #[test]
    fn short_refresh_env_pulls_inherited_timeout_down() {
        let env = vars(&[("FLUBDASH_REFRESH_INTERVAL_MS", "500")]);
        let (_dir, path) = empty_config();
        let cfg = Config::load_with_env(Some(&path), |name| env.get(name).cloned())
            .expect("env interval alone is valid");
        assert_eq!(cfg.refresh.interval_ms, 500);
        assert_eq!(cfg.provider.timeout_ms, 375);
    }

    #[test]
    fn short_refresh_in_file_pulls_default_timeout_down() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[refresh]\ninterval_ms = 500\n").unwrap();

        let cfg = Config::load_with_env(Some(&path), no_env).expect("file interval alone is valid");
        assert_eq!(cfg.refresh.interval_ms, 500);
        assert_eq!(cfg.provider.timeout_ms, 375);
    }

    #[test]
    fn file_timeout_is_kept_and_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[provider]\ntimeout_ms = 900\n\n[refresh]\ninterval_ms = 500\n",
        )
        .unwrap();

        let err = Config::load_with_env(Some(&path), no_env).expect_err("pinned timeout too long");
        assert_eq!(err.code(), "FLB-1001");
    }

    #[test]
    fn env_timeout_pins_timeout_against_env_interval() {
        let env = vars(&[
            ("FLUBDASH_REFRESH_INTERVAL_MS", "500"),
            ("FLUBDASH_PROVIDER_TIMEOUT_MS", "400"),
        ]);
        let (_dir, path) = empty_config();
        let cfg = Config::load_with_env(Some(&path), |name| env.get(name).cloned()).expect("valid");
        assert_eq!(cfg.provider.timeout_ms, 400);
    }

    #[test]
    fn flag_rescues_file_interval_before_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[provider]\ntimeout_ms = 900\n\n[refresh]\ninterval_ms = 500\n",
        )
        .unwrap();

        let overrides = CliOverrides {
            timeout_ms: Some(200),
            ..CliOverrides::default()
        };
        let cfg = Config::load_layered(Some(&path), no_env, &overrides).expect("flag fixes timeout");
        assert_eq!(cfg.provider.timeout_ms, 200);
        assert_eq!(cfg.refresh.interval_ms, 500);
    }

    #[test]
    fn explicit_timeout_is_still_validated() {
        let overrides = CliOverrides {
            refresh_ms: Some(200),
            timeout_ms: Some(500),
            ..CliOverrides::default()
        };
        let (_dir, path) = empty_config();
        let err = Config::load_layered(Some(&path), no_env, &overrides)
            .expect_err("timeout above interval");
        assert_eq!(err.code(), "FLB-1001");
    }
}
