//! Decoded vehicle state and button events.
//!
//! `VehicleState` is produced once per cycle by the bus decoder and treated
//! as read-only input by the control core. All enums use `#[repr(u8)]` so a
//! raw bus value maps directly onto a variant via `from_u8`.

use serde::{Deserialize, Serialize};

// ─── Cruise Buttons ─────────────────────────────────────────────────

/// Cruise stalk button reported on the powertrain bus.
///
/// Raw values follow the bus signal encoding; slot 4 is reserved and never
/// produced by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CruiseButtons {
    /// Signal not yet observed since ignition.
    Init = 0,
    /// No button pressed.
    Unpress = 1,
    /// Resume / accelerate rocker.
    ResAccel = 2,
    /// Set / decelerate rocker.
    DecelSet = 3,
    /// Reserved slot in the bus encoding.
    None = 4,
    /// Main cruise toggle.
    Main = 5,
    /// Cancel button.
    Cancel = 6,
}

impl CruiseButtons {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Init),
            1 => Some(Self::Unpress),
            2 => Some(Self::ResAccel),
            3 => Some(Self::DecelSet),
            4 => Some(Self::None),
            5 => Some(Self::Main),
            6 => Some(Self::Cancel),
            _ => None,
        }
    }
}

impl Default for CruiseButtons {
    fn default() -> Self {
        Self::Init
    }
}

// ─── Gear Shifter ───────────────────────────────────────────────────

/// Transmission shifter position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GearShifter {
    Unknown = 0,
    Park = 1,
    Drive = 2,
    Neutral = 3,
    Reverse = 4,
    Sport = 5,
    Low = 6,
}

impl GearShifter {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::Park),
            2 => Some(Self::Drive),
            3 => Some(Self::Neutral),
            4 => Some(Self::Reverse),
            5 => Some(Self::Sport),
            6 => Some(Self::Low),
            _ => None,
        }
    }
}

impl Default for GearShifter {
    fn default() -> Self {
        Self::Unknown
    }
}

// ─── Lane-Keep Assist Status ────────────────────────────────────────

/// Lane-keep torque application status echoed by the steering module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LkaStatus {
    /// No lane-keep torque applied.
    Inactive = 0,
    /// Lane-keep torque actively applied.
    Active = 1,
    /// Steering module reports a lane-keep fault.
    Fault = 2,
}

impl LkaStatus {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Inactive),
            1 => Some(Self::Active),
            2 => Some(Self::Fault),
            _ => None,
        }
    }
}

impl Default for LkaStatus {
    fn default() -> Self {
        Self::Inactive
    }
}

// ─── Button Events ──────────────────────────────────────────────────

/// Debounced logical button identity, decoupled from the raw stalk signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ButtonType {
    Unknown = 0,
    /// Resume / accelerate.
    AccelCruise = 1,
    /// Set / decelerate.
    DecelCruise = 2,
    /// Cancel.
    Cancel = 3,
    /// Main cruise toggle (alternate function button).
    AltButton = 4,
}

/// One edge of a cruise button: a press or a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonEvent {
    pub button: ButtonType,
    /// `true` on press, `false` on release.
    pub pressed: bool,
}

/// Derive the button edge event for one state-update cycle.
///
/// An event exists only when the stalk signal changed this cycle and the
/// previous value was already valid. A transition *to* `Unpress` is the
/// release of the previously held button; any other transition is a press
/// of the new one.
pub fn derive_button_event(
    cruise_buttons: CruiseButtons,
    prev_cruise_buttons: CruiseButtons,
) -> Option<ButtonEvent> {
    if cruise_buttons == prev_cruise_buttons || prev_cruise_buttons == CruiseButtons::Init {
        return None;
    }

    let (pressed, raw) = if cruise_buttons != CruiseButtons::Unpress {
        (true, cruise_buttons)
    } else {
        (false, prev_cruise_buttons)
    };

    let button = match raw {
        CruiseButtons::ResAccel => ButtonType::AccelCruise,
        CruiseButtons::DecelSet => ButtonType::DecelCruise,
        CruiseButtons::Cancel => ButtonType::Cancel,
        CruiseButtons::Main => ButtonType::AltButton,
        _ => ButtonType::Unknown,
    };

    Some(ButtonEvent { button, pressed })
}

// ─── Vehicle State ──────────────────────────────────────────────────

/// Decoded per-cycle vehicle state snapshot.
///
/// Owned and mutated exclusively by the bus decoder; the control core only
/// reads it. Engagement flags are *not* part of this record; they are
/// core-owned session state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Ego speed [m/s], non-negative.
    pub speed: f64,
    /// Measured driver torque on the steering column.
    pub steering_torque: f64,
    /// Steering module warning flag (temporary condition).
    pub steer_warning: bool,
    /// Steering module error flag (latched fault).
    pub steer_error: bool,
    /// Cruise stalk signal this cycle.
    pub cruise_buttons: CruiseButtons,
    /// Cruise stalk signal the previous cycle.
    pub prev_cruise_buttons: CruiseButtons,
    /// Main cruise switch state.
    pub main_on: bool,
    /// Driver seatbelt unlatched.
    pub seatbelt_unlatched: bool,
    /// Electronic stability program disabled.
    pub esp_disabled: bool,
    /// Factory cruise reports itself available.
    pub cruise_available: bool,
    /// Transmission shifter position.
    pub gear_shifter: GearShifter,
    /// Brake pedal pressed.
    pub brake_pressed: bool,
    /// Steering command counter echoed back by the safety layer (0-3).
    pub loopback_counter: u8,
    /// Lane-keep torque status echoed by the steering module.
    pub lka_status: LkaStatus,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            speed: 0.0,
            steering_torque: 0.0,
            steer_warning: false,
            steer_error: false,
            cruise_buttons: CruiseButtons::Init,
            prev_cruise_buttons: CruiseButtons::Init,
            main_on: false,
            seatbelt_unlatched: false,
            esp_disabled: false,
            cruise_available: false,
            gear_shifter: GearShifter::Unknown,
            brake_pressed: false,
            loopback_counter: 0,
            lka_status: LkaStatus::Inactive,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
