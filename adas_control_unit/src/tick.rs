//! Per-tick orchestrator.
//!
//! Composes the shaping, steering, pedal, and icon stages into an ordered
//! command sequence once per control tick. All mutable session state lives
//! in [`ControllerState`], created once per vehicle session and threaded
//! through every call. No process-wide mutable state.
//!
//! The engagement state machine runs once per state-update cycle *before*
//! the tick that consumes its flags, so a tick never observes stale
//! engagement within the same logical step.

use adas_common::command::{ActuatorCommand, CommandSeq, HudControl};
use adas_common::params::ControlParams;
use adas_common::profile::VehicleProfile;
use adas_common::state::{ButtonEvent, VehicleState};

use crate::engage::{EngageOutput, EngagementState};
use crate::hud::HudIconState;
use crate::pedal::{pedal_command, pedal_fraction};
use crate::shaping::{accel_hysteresis, compute_gas_brake};
use crate::steering::SteeringState;

// ─── Controller State ───────────────────────────────────────────────

/// All mutable state of one control session.
///
/// Created with inert defaults at session start, destroyed at session end.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerState {
    pub steering: SteeringState,
    pub hud: HudIconState,
    pub engage: EngagementState,
    /// Dead-band filtered acceleration [m/s²].
    pub accel_steady: f64,
}

// ─── Actuation Controller ───────────────────────────────────────────

/// The per-session command translation unit.
///
/// Owns the vehicle profile, the fixed control policy, and the session
/// state. One instance per vehicle session.
#[derive(Debug, Clone)]
pub struct ActuationController {
    profile: VehicleProfile,
    params: ControlParams,
    pub state: ControllerState,
}

impl ActuationController {
    /// Create a controller for the given vehicle profile with the standard
    /// control policy.
    pub fn new(profile: VehicleProfile) -> Self {
        Self::with_params(profile, ControlParams::default())
    }

    /// Create a controller with an explicit policy bundle.
    pub fn with_params(profile: VehicleProfile, params: ControlParams) -> Self {
        Self {
            profile,
            params,
            state: ControllerState::default(),
        }
    }

    /// Vehicle profile this session was started with.
    #[inline]
    pub const fn profile(&self) -> &VehicleProfile {
        &self.profile
    }

    /// Control policy in effect for this session.
    #[inline]
    pub const fn params(&self) -> &ControlParams {
        &self.params
    }

    /// Run the engagement state machine for one state-update cycle.
    ///
    /// Must run before the tick that consumes the resulting flags.
    pub fn update_engagement(
        &mut self,
        vehicle: &VehicleState,
        events: &[ButtonEvent],
    ) -> EngageOutput {
        self.state
            .engage
            .update(&self.params, &self.profile, vehicle, events)
    }

    /// Translate one tick's actuator intent into outgoing commands.
    ///
    /// Stage order is fixed: steering, pedal (profile-gated), icon. Every
    /// input is total: out-of-range values are clipped, never rejected.
    pub fn tick(
        &mut self,
        enabled: bool,
        vehicle: &VehicleState,
        frame: u64,
        actuators: &ActuatorCommand,
        hud: &HudControl,
    ) -> CommandSeq {
        // Longitudinal shaping. The dead-band state tracks the effective
        // accel every tick; the pedal path consumes the raw split, so the
        // filtered value only maintains the band.
        let accel = if enabled { actuators.accel } else { 0.0 };
        let (_accel_cmd, accel_steady) = accel_hysteresis(accel, self.state.accel_steady);
        self.state.accel_steady = accel_steady;

        let (gas, brake) = if enabled {
            compute_gas_brake(actuators.accel, vehicle.speed)
        } else {
            (0.0, 0.0)
        };

        let mut seq = CommandSeq::new();

        if let Some(cmd) =
            self.state
                .steering
                .update(&self.params, vehicle, enabled, frame, actuators.steer)
        {
            let _ = seq.push(cmd);
        }

        if self.profile.pedal_interceptor {
            let fraction = pedal_fraction(
                &self.params,
                enabled,
                self.state.engage.adaptive_cruise_enabled,
                vehicle.speed,
                gas,
                brake,
            );
            if let Some(cmd) = pedal_command(&self.params, frame, fraction) {
                let _ = seq.push(cmd);
            }
        }

        if let Some(cmd) = self.state.hud.update(
            &self.params,
            frame,
            vehicle,
            actuators.steer,
            hud.visual_alert,
        ) {
            let _ = seq.push(cmd);
        }

        seq
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use adas_common::command::OutgoingCommand;
    use adas_common::profile::VehicleModel;
    use adas_common::state::LkaStatus;

    fn pedal_controller() -> ActuationController {
        ActuationController::new(VehicleProfile::new(VehicleModel::Volt, true))
    }

    fn moving_state() -> VehicleState {
        VehicleState {
            speed: 5.0,
            lka_status: LkaStatus::Active,
            cruise_available: true,
            ..Default::default()
        }
    }

    /// Open the steering counter-sync gate by letting the controller
    /// observe the current loopback value once.
    fn sync_steering(ctrl: &mut ActuationController, vehicle: &VehicleState) {
        ctrl.tick(
            false,
            vehicle,
            1, // off-step frame, so the steering stage only records the counter
            &ActuatorCommand::default(),
            &HudControl::default(),
        );
    }

    #[test]
    fn stage_order_is_steering_pedal_icon() {
        let mut ctrl = pedal_controller();
        ctrl.state.engage.adaptive_cruise_enabled = true;
        let vehicle = moving_state();
        sync_steering(&mut ctrl, &vehicle);

        let seq = ctrl.tick(
            true,
            &vehicle,
            100, // on-step for steering (2), pedal (4), keepalive (100)
            &ActuatorCommand {
                accel: 1.0,
                steer: 0.2,
            },
            &HudControl::default(),
        );

        assert_eq!(seq.len(), 3);
        assert!(matches!(seq[0], OutgoingCommand::Steering { .. }));
        assert!(matches!(seq[1], OutgoingCommand::Pedal { .. }));
        assert!(matches!(seq[2], OutgoingCommand::LkaIcon { .. }));
    }

    #[test]
    fn no_pedal_command_without_interceptor() {
        let mut ctrl =
            ActuationController::new(VehicleProfile::new(VehicleModel::Acadia, false));
        ctrl.state.engage.adaptive_cruise_enabled = true;
        let vehicle = moving_state();
        sync_steering(&mut ctrl, &vehicle);

        let seq = ctrl.tick(
            true,
            &vehicle,
            100,
            &ActuatorCommand {
                accel: 1.0,
                steer: 0.2,
            },
            &HudControl::default(),
        );
        assert!(seq
            .iter()
            .all(|cmd| !matches!(cmd, OutgoingCommand::Pedal { .. })));
    }

    #[test]
    fn accel_steady_tracks_within_dead_band() {
        let mut ctrl = pedal_controller();
        let vehicle = moving_state();
        let hud = HudControl::default();

        let accels = [0.0, 0.5, 0.51, 0.49, 2.0, -1.0];
        for (i, accel) in accels.into_iter().enumerate() {
            ctrl.tick(
                true,
                &vehicle,
                i as u64,
                &ActuatorCommand { accel, steer: 0.0 },
                &hud,
            );
            assert!(
                (ctrl.state.accel_steady - accel).abs() <= 0.02 + 1e-12,
                "steady {} strayed from accel {accel}",
                ctrl.state.accel_steady
            );
        }
    }

    #[test]
    fn disengaged_tick_decays_accel_steady_toward_zero() {
        let mut ctrl = pedal_controller();
        let vehicle = moving_state();
        ctrl.state.accel_steady = 1.5;

        ctrl.tick(
            false,
            &vehicle,
            0,
            &ActuatorCommand {
                accel: 3.0,
                steer: 0.0,
            },
            &HudControl::default(),
        );
        // Effective accel is zero when disengaged.
        assert!((ctrl.state.accel_steady - 0.02).abs() < 1e-12);
    }

    #[test]
    fn pedal_zero_without_adaptive_cruise() {
        let mut ctrl = pedal_controller();
        let vehicle = moving_state();
        sync_steering(&mut ctrl, &vehicle);

        let seq = ctrl.tick(
            true,
            &vehicle,
            4,
            &ActuatorCommand {
                accel: 2.0,
                steer: 0.0,
            },
            &HudControl::default(),
        );
        match seq
            .iter()
            .find(|cmd| matches!(cmd, OutgoingCommand::Pedal { .. }))
        {
            Some(OutgoingCommand::Pedal { fraction, .. }) => assert_eq!(*fraction, 0.0),
            other => panic!("expected pedal command, got {other:?}"),
        }
    }

    #[test]
    fn end_to_end_reference_values() {
        // Engaged at 5 m/s with accel 2.0 and steer 0.5: gas = 2/4.8,
        // steering target 150 reached by delta_up steps from zero.
        let mut ctrl = pedal_controller();
        ctrl.state.engage.adaptive_cruise_enabled = true;
        let vehicle = moving_state();
        sync_steering(&mut ctrl, &vehicle);

        let actuators = ActuatorCommand {
            accel: 2.0,
            steer: 0.5,
        };
        let seq = ctrl.tick(true, &vehicle, 4, &actuators, &HudControl::default());

        let mut saw_steering = false;
        let mut saw_pedal = false;
        for cmd in &seq {
            match cmd {
                OutgoingCommand::Steering { torque, active, .. } => {
                    saw_steering = true;
                    assert!(*active);
                    // First step from zero is bounded by delta_up.
                    assert_eq!(*torque, 7);
                }
                OutgoingCommand::Pedal { fraction, .. } => {
                    saw_pedal = true;
                    // gas = 2/4.8 = 0.41666.., gain at 5 m/s = 0.7.
                    let expected = 0.7 * (2.0 / 4.8);
                    assert!((fraction - expected).abs() < 1e-9);
                }
                OutgoingCommand::LkaIcon { .. } => {}
            }
        }
        assert!(saw_steering);
        assert!(saw_pedal);
    }

    #[test]
    fn steering_target_reached_by_ramp() {
        let mut ctrl = pedal_controller();
        let vehicle = moving_state();
        sync_steering(&mut ctrl, &vehicle);

        let actuators = ActuatorCommand {
            accel: 0.0,
            steer: 0.5,
        };
        // Steering transmits on even frames; ramping 0 → 150 at 7/step
        // takes 22 transmissions.
        let mut frame = 2u64;
        for _ in 0..30 {
            ctrl.tick(true, &vehicle, frame, &actuators, &HudControl::default());
            frame += 2;
        }
        assert_eq!(ctrl.state.steering.apply_steer_last, 150);
        assert!(!ctrl.state.steering.rate_limited);
    }
}
