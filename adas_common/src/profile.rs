//! Per-vehicle-variant capabilities.
//!
//! A `VehicleProfile` is selected once at session start and carries the two
//! things that vary across supported vehicles: whether a gas pedal
//! interceptor is fitted, and the steering feedforward curve. No dynamic
//! dispatch: variant behavior is a match on the model tag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Vehicle Model ──────────────────────────────────────────────────

/// Supported vehicle model tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleModel {
    Volt,
    Acadia,
    /// Any other supported platform; uses the default feedforward curve.
    Other,
}

impl VehicleModel {
    /// Steering feedforward: expected torque fraction for a desired angle
    /// at a given speed. The Volt and Acadia curves were fitted empirically
    /// (sigmoid on scaled angle, affine in speed); the default is linear in
    /// the desired angle.
    pub fn steer_feedforward(&self, desired_angle: f64, v_ego: f64) -> f64 {
        match self {
            Self::Volt => {
                let angle = desired_angle * 0.02904609;
                let sigmoid = angle / (1.0 + angle.abs());
                0.10006696 * sigmoid * (v_ego + 3.12485927)
            }
            Self::Acadia => {
                let angle = desired_angle * 0.09760208;
                let sigmoid = angle / (1.0 + angle.abs());
                0.04689655 * sigmoid * (v_ego + 10.028217)
            }
            Self::Other => desired_angle,
        }
    }
}

impl fmt::Display for VehicleModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Volt => "volt",
            Self::Acadia => "acadia",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Error parsing a vehicle model name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown vehicle model: {0:?}")]
pub struct ParseModelError(pub String);

impl FromStr for VehicleModel {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "volt" => Ok(Self::Volt),
            "acadia" => Ok(Self::Acadia),
            "other" => Ok(Self::Other),
            _ => Err(ParseModelError(s.to_string())),
        }
    }
}

// ─── Vehicle Profile ────────────────────────────────────────────────

/// Capability profile fixed for the lifetime of one vehicle session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub model: VehicleModel,
    /// A gas pedal interceptor is fitted; enables the longitudinal
    /// pedal command path and button-driven engagement.
    pub pedal_interceptor: bool,
}

impl VehicleProfile {
    pub const fn new(model: VehicleModel, pedal_interceptor: bool) -> Self {
        Self {
            model,
            pedal_interceptor,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volt_feedforward_is_odd_in_angle() {
        let m = VehicleModel::Volt;
        let pos = m.steer_feedforward(100.0, 20.0);
        let neg = m.steer_feedforward(-100.0, 20.0);
        assert!((pos + neg).abs() < 1e-12);
        assert!(pos > 0.0);
    }

    #[test]
    fn acadia_feedforward_grows_with_speed() {
        let m = VehicleModel::Acadia;
        let slow = m.steer_feedforward(50.0, 5.0);
        let fast = m.steer_feedforward(50.0, 30.0);
        assert!(fast > slow);
    }

    #[test]
    fn feedforward_sigmoid_saturates() {
        // The sigmoid term is bounded, so doubling an already-large angle
        // must less-than-double the output.
        let m = VehicleModel::Volt;
        let large = m.steer_feedforward(500.0, 20.0);
        let larger = m.steer_feedforward(1000.0, 20.0);
        assert!(larger < 2.0 * large);
    }

    #[test]
    fn default_feedforward_is_linear() {
        let m = VehicleModel::Other;
        assert_eq!(m.steer_feedforward(0.5, 99.0), 0.5);
        assert_eq!(m.steer_feedforward(-1.5, 0.0), -1.5);
    }

    #[test]
    fn model_from_str_round_trip() {
        for m in [VehicleModel::Volt, VehicleModel::Acadia, VehicleModel::Other] {
            assert_eq!(m.to_string().parse::<VehicleModel>(), Ok(m));
        }
        assert!("corvette".parse::<VehicleModel>().is_err());
    }

    #[test]
    fn model_from_str_is_case_insensitive() {
        assert_eq!("VOLT".parse::<VehicleModel>(), Ok(VehicleModel::Volt));
    }
}
