use crate::policy::Backoff;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Backoff parameters for wait-and-retry (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Base delay in seconds; the n-th retry waits `base * 2^n` (e.g. 0.1 = 200ms, 400ms, 800ms).
    pub base_delay_secs: f64,
    /// Optional upper bound on any single delay, in seconds. No cap when absent.
    #[serde(default)]
    pub max_delay_secs: Option<f64>,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_delay_secs: 0.1,
            max_delay_secs: None,
        }
    }
}

impl BackoffConfig {
    /// Build the exponential backoff function described by this section.
    pub fn to_backoff(&self) -> Result<Backoff> {
        let base = Duration::try_from_secs_f64(self.base_delay_secs)
            .with_context(|| format!("invalid base_delay_secs: {}", self.base_delay_secs))?;
        let backoff = Backoff::exponential(base);
        match self.max_delay_secs {
            Some(max) => {
                let max = Duration::try_from_secs_f64(max)
                    .with_context(|| format!("invalid max_delay_secs: {}", max))?;
                Ok(backoff.capped(max))
            }
            None => Ok(backoff),
        }
    }
}

/// Global configuration loaded from `~/.config/bulwark/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulwarkConfig {
    /// Retries after the first attempt for retry and wait-and-retry (3 = up to 4 calls).
    pub max_retries: u32,
    /// Optional backoff section; if missing, built-in defaults are used.
    #[serde(default)]
    pub backoff: Option<BackoffConfig>,
    /// Value substituted by the fallback policies.
    pub fallback_message: String,
}

impl Default for BulwarkConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: None,
            fallback_message: "Try again later (message from fallback policy)".to_string(),
        }
    }
}

impl BulwarkConfig {
    /// Effective backoff section (defaults when absent).
    pub fn backoff_config(&self) -> BackoffConfig {
        self.backoff.clone().unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        let backoff = self.backoff_config();
        if !backoff.base_delay_secs.is_finite() || backoff.base_delay_secs < 0.0 {
            bail!(
                "backoff.base_delay_secs must be a non-negative number, got {}",
                backoff.base_delay_secs
            );
        }
        if let Some(max) = backoff.max_delay_secs {
            if !max.is_finite() || max < 0.0 {
                bail!("backoff.max_delay_secs must be a non-negative number, got {}", max);
            }
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bulwark")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BulwarkConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = BulwarkConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load and validate configuration from an explicit path.
pub fn load_from_path(path: &Path) -> Result<BulwarkConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: BulwarkConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
