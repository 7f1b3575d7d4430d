//! TOML session configuration loader with validation.
//!
//! The session config selects the vehicle profile and the cycle cadence of
//! the runner. Control policy numbers are deliberately absent; they are
//! fixed in `adas_common::params` and not runtime-tunable.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use adas_common::profile::{VehicleModel, VehicleProfile};

/// Default control tick period [µs] (100 Hz).
pub const DEFAULT_CYCLE_TIME_US: u32 = 10_000;

/// Accepted cycle period bounds [µs].
pub const CYCLE_TIME_MIN_US: u32 = 1_000;
pub const CYCLE_TIME_MAX_US: u32 = 100_000;

// ─── Error Type ─────────────────────────────────────────────────────

/// Configuration loading/validation error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("config I/O error: {0}")]
    Io(String),
    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Parameter validation error.
    #[error("config validation: {0}")]
    Validation(String),
}

// ─── Session Config ─────────────────────────────────────────────────

/// Vehicle profile section.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ProfileSection {
    /// Vehicle model tag (`volt`, `acadia`, `other`).
    pub model: VehicleModel,
    /// A gas pedal interceptor is fitted.
    #[serde(default)]
    pub pedal_interceptor: bool,
}

/// Validated session configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SessionConfig {
    /// Control tick period [µs].
    #[serde(default = "default_cycle_time_us")]
    pub cycle_time_us: u32,
    pub profile: ProfileSection,
}

fn default_cycle_time_us() -> u32 {
    DEFAULT_CYCLE_TIME_US
}

impl SessionConfig {
    /// Bounds-check the parsed configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(CYCLE_TIME_MIN_US..=CYCLE_TIME_MAX_US).contains(&self.cycle_time_us) {
            return Err(format!(
                "cycle_time_us {} outside [{CYCLE_TIME_MIN_US}, {CYCLE_TIME_MAX_US}]",
                self.cycle_time_us
            ));
        }
        Ok(())
    }

    /// The vehicle profile selected by this configuration.
    pub fn vehicle_profile(&self) -> VehicleProfile {
        VehicleProfile::new(self.profile.model, self.profile.pedal_interceptor)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cycle_time_us: DEFAULT_CYCLE_TIME_US,
            profile: ProfileSection {
                model: VehicleModel::Other,
                pedal_interceptor: false,
            },
        }
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Parse and validate a session configuration from a TOML string.
pub fn load_config_from_str(toml_str: &str) -> Result<SessionConfig, ConfigError> {
    let config: SessionConfig =
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate().map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate the session configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SessionConfig, ConfigError> {
    let toml_str = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("failed to read {}: {e}", path.display())))?;
    load_config_from_str(&toml_str)
}

// ─── Tests ──────────────────────────────────────────────────────────
