use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use taskrank_core::time::parse_timezone;
use taskrank_core::{Strategy, Weights};
use taskrank_ingest::validate::WEIGHT_SUM_RANGE;

use crate::state::{ensure_taskrank_home, taskrank_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    /// Used when neither the request nor `--strategy` names one.
    pub default_strategy: Strategy,
    /// IANA zone that decides what "today" is.
    pub timezone: String,
    /// Applied when the request carries no weights of its own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<Weights>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub suggest_limit: usize,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            default_strategy: Strategy::SmartBalance,
            timezone: "UTC".to_string(),
            weights: None,
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self { suggest_limit: 3 }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        parse_timezone(&self.engine.timezone)?;
        if let Some(w) = &self.engine.weights {
            if !WEIGHT_SUM_RANGE.contains(&w.sum()) {
                bail!("engine.weights must sum to approximately 1.0 (current sum: {})", w.sum());
            }
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(taskrank_home()?.join("config.toml"))
}

/// Load from `path` (or the default location). A missing file means defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        tracing::debug!(path = %p.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    cfg.validate().with_context(|| format!("invalid config {}", p.display()))?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = ensure_taskrank_home()?.join("config.toml");
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
