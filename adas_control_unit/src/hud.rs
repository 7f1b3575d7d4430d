//! Cluster lane-keep icon latch.
//!
//! The icon message is retransmitted on a fixed period (without it the
//! cluster drops the icon after a few seconds, and the periodic send
//! doubles as the camera keepalive) and additionally whenever the
//! (active, critical) pair changes, so state edges appear immediately.

use adas_common::command::{OutgoingCommand, VisualAlert};
use adas_common::params::ControlParams;
use adas_common::state::{LkaStatus, VehicleState};

/// Steering fraction above which the critical (orange) icon is shown.
const CRITICAL_STEER_FRACTION: f64 = 0.9;

/// Per-session icon latch state.
#[derive(Debug, Clone, Copy, Default)]
pub struct HudIconState {
    /// (active, critical) pair on the last transmitted icon command.
    status_last: (bool, bool),
}

impl HudIconState {
    /// Run the icon stage for one tick.
    ///
    /// Returns a command on keepalive ticks and on status edges; the latch
    /// only advances when a command is actually emitted.
    pub fn update(
        &mut self,
        p: &ControlParams,
        frame: u64,
        vehicle: &VehicleState,
        steer: f64,
        alert: VisualAlert,
    ) -> Option<OutgoingCommand> {
        let active = vehicle.lka_status == LkaStatus::Active;
        let critical = active && steer.abs() > CRITICAL_STEER_FRACTION;
        let status = (active, critical);

        if frame % p.camera_keepalive_step != 0 && status == self.status_last {
            return None;
        }

        let steer_alert = matches!(alert, VisualAlert::SteerRequired | VisualAlert::Ldw);
        self.status_last = status;

        Some(OutgoingCommand::LkaIcon {
            active,
            critical,
            steer_alert,
        })
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
