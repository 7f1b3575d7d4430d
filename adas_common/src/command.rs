//! Actuator intents, HUD inputs, and abstract outgoing bus commands.
//!
//! `OutgoingCommand` values are transient: produced once per tick by the
//! control core and handed to the protocol encoder, which owns byte layout,
//! addressing, and checksums.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// ─── Actuator Intent ────────────────────────────────────────────────

/// Desired actuator output for one tick, produced by the upstream planner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ActuatorCommand {
    /// Desired longitudinal acceleration [m/s²].
    pub accel: f64,
    /// Desired steering effort fraction in [-1, 1].
    pub steer: f64,
}

// ─── HUD Input ──────────────────────────────────────────────────────

/// Driver-facing alert requested by the upstream planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VisualAlert {
    None = 0,
    /// Forward collision warning.
    Fcw = 1,
    /// Driver steering input required.
    SteerRequired = 2,
    BrakePressed = 3,
    WrongGear = 4,
    SeatbeltUnbuckled = 5,
    SpeedTooHigh = 6,
    /// Lane departure warning.
    Ldw = 7,
}

impl Default for VisualAlert {
    fn default() -> Self {
        Self::None
    }
}

/// Upstream HUD display request consumed by the tick pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HudControl {
    /// Cruise set speed to display [m/s].
    pub set_speed: f64,
    pub lanes_visible: bool,
    pub lead_visible: bool,
    pub visual_alert: VisualAlert,
}

impl HudControl {
    /// Set speed as shown on the cluster: implausibly high values blank
    /// the display instead of showing a bogus number.
    #[inline]
    pub fn displayed_set_speed(&self) -> f64 {
        if self.set_speed > 70.0 { 0.0 } else { self.set_speed }
    }
}

// ─── Outgoing Commands ──────────────────────────────────────────────

/// Upper bound on commands emitted in a single tick
/// (steering + pedal + icon).
pub const MAX_TICK_COMMANDS: usize = 3;

/// Abstract outgoing bus command. Each variant maps 1:1 to one frame
/// serialized by the protocol encoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutgoingCommand {
    /// Lane-keep steering torque command.
    Steering {
        /// Applied torque, bounded by the steering rate limiter.
        torque: i32,
        /// Rolling message counter (0-3), continued from the last value
        /// known to clear the safety layer.
        counter: u8,
        /// Lane-keep actively commanding torque.
        active: bool,
    },
    /// Gas pedal interceptor command.
    Pedal {
        /// Pedal position fraction in [0, 1].
        fraction: f64,
        /// Free-running rolling counter (0-3).
        counter: u8,
    },
    /// Cluster lane-keep icon / camera keepalive.
    LkaIcon {
        /// Show the active (green) icon.
        active: bool,
        /// Show the critical (orange) icon near the torque limit.
        critical: bool,
        /// A steering-related visual alert is being displayed.
        steer_alert: bool,
    },
}

/// Fixed-capacity command sequence for one tick. No heap allocation in
/// the cycle path.
pub type CommandSeq = heapless::Vec<OutgoingCommand, MAX_TICK_COMMANDS>;

// ─── Engagement Events ──────────────────────────────────────────────

bitflags! {
    /// Events raised by the engagement state machine during one
    /// state-update cycle, consumed by the alert/UI layer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EngageEvent: u8 {
        /// Engagement was requested via a cruise button edge.
        const BUTTON_ENABLE = 0x01;
        /// Disengagement was requested via the cancel button.
        const BUTTON_CANCEL = 0x02;
    }
}

impl Default for EngageEvent {
    fn default() -> Self {
        Self::empty()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displayed_set_speed_clamps_implausible_values() {
        let hud = HudControl {
            set_speed: 71.0,
            ..Default::default()
        };
        assert_eq!(hud.displayed_set_speed(), 0.0);

        let hud = HudControl {
            set_speed: 27.5,
            ..Default::default()
        };
        assert_eq!(hud.displayed_set_speed(), 27.5);
    }

    #[test]
    fn command_seq_holds_one_of_each() {
        let mut seq = CommandSeq::new();
        assert!(seq
            .push(OutgoingCommand::Steering {
                torque: 10,
                counter: 1,
                active: true,
            })
            .is_ok());
        assert!(seq
            .push(OutgoingCommand::Pedal {
                fraction: 0.3,
                counter: 2,
            })
            .is_ok());
        assert!(seq
            .push(OutgoingCommand::LkaIcon {
                active: true,
                critical: false,
                steer_alert: false,
            })
            .is_ok());
        assert_eq!(seq.len(), MAX_TICK_COMMANDS);
    }

    #[test]
    fn engage_event_flags_combine() {
        let mut ev = EngageEvent::empty();
        ev |= EngageEvent::BUTTON_ENABLE;
        assert!(ev.contains(EngageEvent::BUTTON_ENABLE));
        assert!(!ev.contains(EngageEvent::BUTTON_CANCEL));
    }
}
