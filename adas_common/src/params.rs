//! Fixed numeric control policy.
//!
//! These values are hardware-facing policy, tuned against the steering and
//! pedal hardware fault detectors. They are deliberately not exposed in the
//! runtime configuration: a session gets exactly one set.

use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

/// Maximum commanded steering torque magnitude [unit torque counts].
pub const STEER_MAX: i32 = 300;
/// Steering command transmit divisor [ticks].
pub const STEER_STEP: u64 = 2;
/// Maximum per-step torque delta toward higher magnitude.
pub const STEER_DELTA_UP: i32 = 7;
/// Maximum per-step torque delta toward zero.
pub const STEER_DELTA_DOWN: i32 = 17;
/// Lane-keep cuts out below this speed [m/s].
pub const MIN_STEER_SPEED: f64 = 3.0;

/// Driver torque dead zone before the allowance window shifts.
pub const STEER_DRIVER_ALLOWANCE: i32 = 50;
/// Weight of the driver torque allowance window.
pub const STEER_DRIVER_MULTIPLIER: i32 = 4;
/// Scale from measured driver torque to torque counts.
pub const STEER_DRIVER_FACTOR: i32 = 100;

/// Camera icon refresh divisor [ticks]; also the downstream keepalive.
pub const CAMERA_KEEPALIVE_STEP: u64 = 100;
/// Pedal interceptor transmit divisor [ticks].
pub const PEDAL_STEP: u64 = 4;
/// Pedal output is forced to zero at or below this speed [m/s] (1 km/h).
pub const MIN_PEDAL_SPEED: f64 = 1.0 / 3.6;

/// Auto-engage guard minimum speed [m/s].
pub const AUTO_ENGAGE_MIN_SPEED: f64 = 2.4;
/// Auto-engage guard window [state-update cycles].
pub const AUTO_ENGAGE_CYCLES: u32 = 750;

// The torque limiter assumes ramp-down is at least as permissive as
// ramp-up; the rolling counters are 2-bit.
const_assert!(STEER_DELTA_DOWN >= STEER_DELTA_UP);
const_assert!(STEER_DELTA_UP > 0);
const_assert!(STEER_MAX > 0);
const_assert!(STEER_STEP > 0);
const_assert!(PEDAL_STEP > 0);

/// Control policy bundle threaded into each component.
///
/// Constructed once per session from the constants above; carried as a
/// struct so components never read process-wide mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlParams {
    pub steer_max: i32,
    pub steer_step: u64,
    pub steer_delta_up: i32,
    pub steer_delta_down: i32,
    pub min_steer_speed: f64,
    pub steer_driver_allowance: i32,
    pub steer_driver_multiplier: i32,
    pub steer_driver_factor: i32,
    pub camera_keepalive_step: u64,
    pub pedal_step: u64,
    pub min_pedal_speed: f64,
    pub auto_engage_min_speed: f64,
    pub auto_engage_cycles: u32,
}

impl Default for ControlParams {
    fn default() -> Self {
        Self {
            steer_max: STEER_MAX,
            steer_step: STEER_STEP,
            steer_delta_up: STEER_DELTA_UP,
            steer_delta_down: STEER_DELTA_DOWN,
            min_steer_speed: MIN_STEER_SPEED,
            steer_driver_allowance: STEER_DRIVER_ALLOWANCE,
            steer_driver_multiplier: STEER_DRIVER_MULTIPLIER,
            steer_driver_factor: STEER_DRIVER_FACTOR,
            camera_keepalive_step: CAMERA_KEEPALIVE_STEP,
            pedal_step: PEDAL_STEP,
            min_pedal_speed: MIN_PEDAL_SPEED,
            auto_engage_min_speed: AUTO_ENGAGE_MIN_SPEED,
            auto_engage_cycles: AUTO_ENGAGE_CYCLES,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_match_policy_constants() {
        let p = ControlParams::default();
        assert_eq!(p.steer_max, 300);
        assert_eq!(p.steer_step, 2);
        assert_eq!(p.steer_delta_up, 7);
        assert_eq!(p.steer_delta_down, 17);
        assert_eq!(p.camera_keepalive_step, 100);
        assert_eq!(p.pedal_step, 4);
        assert_eq!(p.auto_engage_cycles, 750);
    }

    #[test]
    fn min_pedal_speed_is_one_kph() {
        let p = ControlParams::default();
        assert!((p.min_pedal_speed - 0.2777).abs() < 1e-3);
    }
}
