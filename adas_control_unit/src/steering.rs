//! Steering command generator.
//!
//! Translates the desired steering fraction into a torque command under two
//! hardware constraints of the steering module:
//!
//! 1. **Counter sync** — the module faults on any gap in received message
//!    counters. Transmission is skipped on the tick where a fresh loopback
//!    confirmation arrives, and the outgoing counter always continues from
//!    the last value known to clear the safety layer, so no index is ever
//!    skipped across a disengage/re-engage transient.
//! 2. **Torque rate limits** — per-step deltas are bounded, with a tighter
//!    bound toward higher magnitude and when crossing zero, and the total
//!    command is confined to an allowance window around the measured driver
//!    torque.

use adas_common::command::OutgoingCommand;
use adas_common::params::ControlParams;
use adas_common::state::VehicleState;

// ─── Rate Limiter ───────────────────────────────────────────────────

/// Bound a new torque target against the previous applied torque and the
/// measured driver torque.
///
/// The driver window shifts with `driver_torque` so the driver can always
/// override toward their own input. Ramping toward higher magnitude is
/// limited to `steer_delta_up` per step; ramping toward zero may move
/// `steer_delta_down`. A sign change must pass through the zero-crossing
/// bound of `steer_delta_up`.
pub fn apply_driver_torque_limits(
    new_steer: i32,
    last_steer: i32,
    driver_torque: f64,
    p: &ControlParams,
) -> i32 {
    let steer_max = f64::from(p.steer_max);
    let allowance = f64::from(p.steer_driver_allowance);
    let factor = f64::from(p.steer_driver_factor);
    let multiplier = f64::from(p.steer_driver_multiplier);

    let driver_max = steer_max + (allowance + driver_torque * factor) * multiplier;
    let driver_min = -steer_max + (-allowance + driver_torque * factor) * multiplier;
    let max_allowed = steer_max.min(driver_max).max(0.0);
    let min_allowed = (-steer_max).max(driver_min).min(0.0);

    let mut apply = f64::from(new_steer).clamp(min_allowed, max_allowed);

    let last = f64::from(last_steer);
    let up = f64::from(p.steer_delta_up);
    let down = f64::from(p.steer_delta_down);
    if last > 0.0 {
        apply = apply.clamp((last - down).max(-up), last + up);
    } else {
        apply = apply.clamp(last - up, (last + down).min(up));
    }

    apply.round() as i32
}

// ─── Steering State ─────────────────────────────────────────────────

/// Per-session steering command state.
#[derive(Debug, Clone, Copy)]
pub struct SteeringState {
    /// Torque applied on the last transmitted command.
    pub apply_steer_last: i32,
    /// Last loopback counter observed from the safety layer (-1 until the
    /// first confirmation is seen).
    loopback_counter_last: i32,
    /// The limiter clamped the most recent torque target.
    pub rate_limited: bool,
}

impl Default for SteeringState {
    fn default() -> Self {
        Self {
            apply_steer_last: 0,
            loopback_counter_last: -1,
            rate_limited: false,
        }
    }
}

impl SteeringState {
    /// Run the steering stage for one tick.
    ///
    /// Returns the command to transmit, or `None` on counter-sync skip
    /// ticks and off-step ticks.
    pub fn update(
        &mut self,
        p: &ControlParams,
        vehicle: &VehicleState,
        enabled: bool,
        frame: u64,
        steer: f64,
    ) -> Option<OutgoingCommand> {
        // A fresh loopback confirmation means the previous command was just
        // accepted; transmitting again this tick risks a duplicate counter.
        if i32::from(vehicle.loopback_counter) != self.loopback_counter_last {
            self.loopback_counter_last = i32::from(vehicle.loopback_counter);
            return None;
        }

        if frame % p.steer_step != 0 {
            return None;
        }

        let lkas_enabled = enabled
            && !(vehicle.steer_warning || vehicle.steer_error)
            && vehicle.speed > p.min_steer_speed;

        let apply_steer = if lkas_enabled {
            let new_steer = (steer * f64::from(p.steer_max)).round() as i32;
            let limited =
                apply_driver_torque_limits(new_steer, self.apply_steer_last, vehicle.steering_torque, p);
            self.rate_limited = limited != new_steer;
            limited
        } else {
            0
        };

        self.apply_steer_last = apply_steer;

        // Continue the counter from the last known-accepted value rather
        // than a free-running local index.
        let counter = (vehicle.loopback_counter + 1) % 4;

        Some(OutgoingCommand::Steering {
            torque: apply_steer,
            counter,
            active: lkas_enabled,
        })
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use adas_common::state::LkaStatus;

    fn params() -> ControlParams {
        ControlParams::default()
    }

    fn moving_state() -> VehicleState {
        VehicleState {
            speed: 15.0,
            lka_status: LkaStatus::Active,
            ..Default::default()
        }
    }

    /// A state whose loopback counter matches what `SteeringState` has
    /// already observed, so the sync gate is open.
    fn synced(mut s: SteeringState) -> SteeringState {
        s.loopback_counter_last = 0;
        s
    }

    #[test]
    fn ramp_up_from_zero_is_delta_up_per_step() {
        let p = params();
        let out = apply_driver_torque_limits(150, 0, 0.0, &p);
        assert_eq!(out, p.steer_delta_up);
    }

    #[test]
    fn ramp_continues_by_delta_up_while_increasing() {
        let p = params();
        let out = apply_driver_torque_limits(150, 100, 0.0, &p);
        assert_eq!(out, 100 + p.steer_delta_up);
    }

    #[test]
    fn ramp_down_is_delta_down_per_step() {
        let p = params();
        let out = apply_driver_torque_limits(0, 100, 0.0, &p);
        assert_eq!(out, 100 - p.steer_delta_down);
    }

    #[test]
    fn zero_crossing_bounded_by_delta_up() {
        let p = params();
        // From +3, a large negative target may only reach -delta_up.
        let out = apply_driver_torque_limits(-200, 3, 0.0, &p);
        assert_eq!(out, -p.steer_delta_up);
        // Mirror case from negative.
        let out = apply_driver_torque_limits(200, -3, 0.0, &p);
        assert_eq!(out, p.steer_delta_up);
    }

    #[test]
    fn clamped_to_steer_max() {
        let p = params();
        let out = apply_driver_torque_limits(1000, 299, 0.0, &p);
        assert_eq!(out, p.steer_max);
    }

    #[test]
    fn driver_counter_torque_shrinks_allowance() {
        let p = params();
        // Strong driver torque against the command pulls max_allowed to 0.
        let out = apply_driver_torque_limits(100, 100, -10.0, &p);
        assert!(out < 100);
    }

    #[test]
    fn rate_limit_never_exceeded_over_sequence() {
        let p = params();
        let mut last = 0;
        let targets = [300, 300, -300, 150, 0, -40, 300, 300, 300];
        for target in targets {
            let next = apply_driver_torque_limits(target, last, 0.0, &p);
            let delta = (next - last).abs();
            assert!(
                delta <= p.steer_delta_down,
                "delta {delta} exceeds limit (last={last}, next={next})"
            );
            last = next;
        }
    }

    #[test]
    fn counter_mismatch_skips_transmission() {
        let p = params();
        let mut s = SteeringState::default();
        let mut vehicle = moving_state();
        vehicle.loopback_counter = 2;

        // loopback 2 != -1: sync tick, no transmit.
        assert_eq!(s.update(&p, &vehicle, true, 0, 0.5), None);
        // Same loopback again: gate open, frame 2 is on-step.
        let cmd = s.update(&p, &vehicle, true, 2, 0.5);
        assert!(cmd.is_some());
    }

    #[test]
    fn off_step_frames_do_not_transmit() {
        let p = params();
        let mut s = synced(SteeringState::default());
        let vehicle = moving_state();
        assert_eq!(s.update(&p, &vehicle, true, 1, 0.5), None);
        assert!(s.update(&p, &vehicle, true, 2, 0.5).is_some());
    }

    #[test]
    fn counter_continues_from_loopback_value() {
        let p = params();
        let mut s = SteeringState::default();
        let mut vehicle = moving_state();
        vehicle.loopback_counter = 3;
        s.loopback_counter_last = 3;

        match s.update(&p, &vehicle, true, 0, 0.1) {
            Some(OutgoingCommand::Steering { counter, .. }) => assert_eq!(counter, 0),
            other => panic!("expected steering command, got {other:?}"),
        }
    }

    #[test]
    fn disabled_commands_zero_torque_inactive() {
        let p = params();
        let mut s = synced(SteeringState::default());
        s.apply_steer_last = 120;
        let vehicle = moving_state();

        match s.update(&p, &vehicle, false, 0, 0.5) {
            Some(OutgoingCommand::Steering { torque, active, .. }) => {
                assert_eq!(torque, 0);
                assert!(!active);
            }
            other => panic!("expected steering command, got {other:?}"),
        }
        assert_eq!(s.apply_steer_last, 0);
    }

    #[test]
    fn steer_fault_forces_inactive() {
        let p = params();
        let mut s = synced(SteeringState::default());
        let mut vehicle = moving_state();
        vehicle.steer_warning = true;

        match s.update(&p, &vehicle, true, 0, 0.5) {
            Some(OutgoingCommand::Steering { torque, active, .. }) => {
                assert_eq!(torque, 0);
                assert!(!active);
            }
            other => panic!("expected steering command, got {other:?}"),
        }
    }

    #[test]
    fn below_min_speed_forces_inactive() {
        let p = params();
        let mut s = synced(SteeringState::default());
        let mut vehicle = moving_state();
        vehicle.speed = p.min_steer_speed;

        match s.update(&p, &vehicle, true, 0, 0.5) {
            Some(OutgoingCommand::Steering { active, .. }) => assert!(!active),
            other => panic!("expected steering command, got {other:?}"),
        }
    }

    #[test]
    fn rate_limited_flag_tracks_clamping() {
        let p = params();
        let mut s = synced(SteeringState::default());
        let vehicle = moving_state();

        // Large request from rest: clamped.
        s.update(&p, &vehicle, true, 0, 0.5);
        assert!(s.rate_limited);

        // Request equal to what the ramp allows: not clamped.
        let reachable = f64::from(s.apply_steer_last + p.steer_delta_up) / f64::from(p.steer_max);
        s.update(&p, &vehicle, true, 2, reachable);
        assert!(!s.rate_limited);
    }
}
