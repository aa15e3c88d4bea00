//! Environment configuration.

use std::path::PathBuf;

use bowlout_scheduler::domain::commands::RosterSource;

use crate::error::AppError;

/// Roster size used when no roster file is configured.
pub const DEFAULT_ROSTER_SIZE: u32 = 100;

/// Runtime configuration, read once at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `BOWLOUT_ROSTER`: `name,number` file to load.
    pub roster_path: Option<PathBuf>,
    /// `BOWLOUT_DEFAULT_SIZE`: size of the generated roster.
    pub default_size: u32,
    /// `BOWLOUT_SEED`: fixed RNG seed.
    pub seed: Option<u64>,
    /// `BOWLOUT_AUTOPLAY`: advance without waiting for input.
    pub autoplay: bool,
    /// `BOWLOUT_PACE_SCALE`: multiplier on every elimination delay.
    pub pace_scale: f64,
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` naming the first invalid variable.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` naming the first invalid variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let default_size = match var("BOWLOUT_DEFAULT_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "BOWLOUT_DEFAULT_SIZE must be a positive integer, got {raw:?}"
                    ))
                })?,
            None => DEFAULT_ROSTER_SIZE,
        };

        let seed = var("BOWLOUT_SEED")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| AppError::Config(format!("BOWLOUT_SEED must be a u64: {e}")))
            })
            .transpose()?;

        let autoplay = match var("BOWLOUT_AUTOPLAY").as_deref().map(str::trim) {
            None => false,
            Some(raw) => parse_flag(raw).ok_or_else(|| {
                AppError::Config(format!("BOWLOUT_AUTOPLAY must be true or false, got {raw:?}"))
            })?,
        };

        let pace_scale = match var("BOWLOUT_PACE_SCALE") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|scale| scale.is_finite() && *scale >= 0.0)
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "BOWLOUT_PACE_SCALE must be a non-negative number, got {raw:?}"
                    ))
                })?,
            None => 1.0,
        };

        Ok(Self {
            roster_path: var("BOWLOUT_ROSTER").map(PathBuf::from),
            default_size,
            seed,
            autoplay,
            pace_scale,
        })
    }

    /// Loads the configured roster source.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the roster file cannot be read.
    pub async fn roster_source(&self) -> Result<RosterSource, AppError> {
        match &self.roster_path {
            Some(path) => Ok(RosterSource::Text(tokio::fs::read_to_string(path).await?)),
            None => Ok(RosterSource::Numbered(self.default_size)),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
