//! Pulse configuration: TOML file with environment overrides.
//!
//! Everything the engine needs arrives through this explicit struct; there
//! is no ambient global state. Env vars win over file values so serverless
//! deployments can configure storage without shipping a file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    pub engine: EngineConfig,
    pub storage: StorageConfig,
    pub remote: Option<RemoteConfig>,
}

impl PulseConfig {
    /// Load config from a TOML file, falling back to defaults for missing
    /// fields. Env var overrides are applied after loading.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: PulseConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if the file is missing or invalid, return
    /// defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("PULSE_MEM_DIR") {
            self.storage.dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("PULSE_ROLLING_WINDOW") {
            if let Ok(n) = v.parse() {
                self.engine.rolling_window = n;
            }
        }
        if let Ok(v) = std::env::var("PULSE_SLOPE_WINDOW") {
            if let Ok(n) = v.parse() {
                self.engine.slope_window = n;
            }
        }
        // Remote store env overrides
        if let Ok(url) = std::env::var("PULSE_REMOTE_URL") {
            if let Ok(key) = std::env::var("PULSE_REMOTE_KEY") {
                let timeout_secs = self
                    .remote
                    .as_ref()
                    .map(|r| r.timeout_secs)
                    .unwrap_or_else(default_remote_timeout);
                self.remote = Some(RemoteConfig {
                    base_url: url,
                    api_key: key,
                    timeout_secs,
                });
            }
        }
    }
}

/// Tunables for the scoring and analytics engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// History entries considered for trend statistics.
    pub rolling_window: usize,
    /// Trailing sub-window used for the linear trend slope.
    pub slope_window: usize,
    /// Inclusive bounds for the randomized chat-buffer threshold.
    pub buffer_min: u32,
    pub buffer_max: u32,
}

impl EngineConfig {
    pub fn threshold_range(&self) -> RangeInclusive<u32> {
        self.buffer_min..=self.buffer_max
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rolling_window: 10,
            slope_window: 7,
            buffer_min: 15,
            buffer_max: 20,
        }
    }
}

/// Where per-user JSON documents live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
        }
    }
}

/// Optional remote row store. Writes are best-effort; when reachable it is
/// the preferred read source.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
    /// Bounded per-request timeout so a slow remote degrades to local
    /// persistence instead of stalling the caller.
    #[serde(default = "default_remote_timeout")]
    pub timeout_secs: u64,
}

fn default_remote_timeout() -> u64 {
    6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PulseConfig::default();
        assert_eq!(config.engine.rolling_window, 10);
        assert_eq!(config.engine.slope_window, 7);
        assert_eq!(config.engine.threshold_range(), 15..=20);
        assert_eq!(config.storage.dir, PathBuf::from("data"));
        assert!(config.remote.is_none());
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml = r#"
            [engine]
            rolling_window = 20

            [storage]
            dir = "/tmp/pulse"
        "#;
        let config: PulseConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.engine.rolling_window, 20);
        // Unspecified fields keep their defaults.
        assert_eq!(config.engine.slope_window, 7);
        assert_eq!(config.storage.dir, PathBuf::from("/tmp/pulse"));
    }

    #[test]
    fn test_parse_remote_section() {
        let toml = r#"
            [remote]
            base_url = "https://example.supabase.co"
            api_key = "service-role-key"
        "#;
        let config: PulseConfig = toml::from_str(toml).unwrap();
        let remote = config.remote.unwrap();
        assert_eq!(remote.base_url, "https://example.supabase.co");
        assert_eq!(remote.timeout_secs, 6);
    }
}
