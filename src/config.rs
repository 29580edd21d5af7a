//! Application configuration
//!
//! Precedence (lowest to highest): built-in defaults, optional TOML file,
//! environment variables.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::arbitrage::MatcherConfig;

pub const CONFIG_PATH_ENV: &str = "VENUE_ARB_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "venue_arb.toml";

/// How a run is written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub matcher: MatcherConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load from an explicit TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Resolve the full configuration
    ///
    /// `path` wins over `VENUE_ARB_CONFIG`, which wins over the default file
    /// name. A missing default file is not an error; a missing explicit one is.
    /// Expects `.env` to be loaded already.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(Into::into));

        let mut config = match explicit {
            Some(p) => Self::load(&p)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH)?,
            None => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `VENUE_ARB_*` overrides from the given lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("VENUE_ARB_MAX_ROUNDS") {
            let raw = raw.trim();
            self.matcher.max_rounds = if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(
                    raw.parse()
                        .with_context(|| format!("Invalid VENUE_ARB_MAX_ROUNDS '{}'", raw))?,
                )
            };
        }

        if let Some(raw) = lookup("VENUE_ARB_MIN_PROFIT_PER_UNIT") {
            self.matcher.min_profit_per_unit = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid VENUE_ARB_MIN_PROFIT_PER_UNIT '{}'", raw))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let min = self.matcher.min_profit_per_unit;
        if !min.is_finite() || min < 0.0 {
            bail!("min_profit_per_unit must be finite and >= 0, got {}", min);
        }
        Ok(())
    }
}
