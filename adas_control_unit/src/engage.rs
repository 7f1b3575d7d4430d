//! Engagement state machine.
//!
//! Tracks the (adaptive-cruise, lane-keep) enablement pair from debounced
//! cruise button edges and vehicle state, once per state-update cycle.
//! Button rules are evaluated in event order and the first rule that fires
//! ends processing for the cycle, so simultaneous conflicting edges resolve
//! deterministically.
//!
//! An auto-engage guard runs alongside the button rules: while the car sits
//! in a fully engageable condition with lane-keep on and adaptive cruise
//! off, a cycle counter runs; when it exceeds its window the guard disarms
//! itself. The guard never raises an engage event; it only disarms.

use adas_common::command::EngageEvent;
use adas_common::params::ControlParams;
use adas_common::profile::VehicleProfile;
use adas_common::state::{ButtonEvent, ButtonType, GearShifter, VehicleState};

/// Engagement flags and emitted events for one state-update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngageOutput {
    pub adaptive_cruise_enabled: bool,
    pub lane_keep_enabled: bool,
    pub events: EngageEvent,
}

/// Per-session engagement state.
#[derive(Debug, Clone, Copy)]
pub struct EngagementState {
    /// Longitudinal (adaptive cruise) enablement.
    pub adaptive_cruise_enabled: bool,
    /// Lateral (lane-keep) enablement.
    pub lane_keep_enabled: bool,
    auto_engage_armed: bool,
    auto_engage_counter: u32,
}

impl Default for EngagementState {
    fn default() -> Self {
        Self {
            adaptive_cruise_enabled: false,
            lane_keep_enabled: false,
            auto_engage_armed: true,
            auto_engage_counter: 0,
        }
    }
}

impl EngagementState {
    /// Run one state-update cycle.
    ///
    /// `events` is the ordered list of button edges decoded this cycle.
    /// The returned flags feed the next tick's translation pipeline.
    pub fn update(
        &mut self,
        p: &ControlParams,
        profile: &VehicleProfile,
        vehicle: &VehicleState,
        events: &[ButtonEvent],
    ) -> EngageOutput {
        let mut emitted = EngageEvent::empty();

        if profile.pedal_interceptor {
            if !vehicle.main_on {
                self.process_buttons_main_off(events, &mut emitted);
            } else {
                self.process_buttons_main_on(events);
            }
        } else {
            // Without a pedal interceptor the flags are derived purely
            // from the main switch.
            self.adaptive_cruise_enabled = false;
            self.lane_keep_enabled = vehicle.main_on;
        }

        self.update_auto_engage_guard(p, vehicle);

        EngageOutput {
            adaptive_cruise_enabled: self.adaptive_cruise_enabled,
            lane_keep_enabled: self.lane_keep_enabled,
            events: emitted,
        }
    }

    /// Button rules with the main cruise switch off. First match wins.
    fn process_buttons_main_off(&mut self, events: &[ButtonEvent], emitted: &mut EngageEvent) {
        for ev in events {
            match (ev.button, ev.pressed) {
                // Release of either set rocker engages both axes.
                (ButtonType::DecelCruise, false) | (ButtonType::AccelCruise, false)
                    if !self.adaptive_cruise_enabled =>
                {
                    self.adaptive_cruise_enabled = true;
                    self.lane_keep_enabled = true;
                    *emitted |= EngageEvent::BUTTON_ENABLE;
                    break;
                }
                (ButtonType::Cancel, true) if self.adaptive_cruise_enabled => {
                    self.adaptive_cruise_enabled = false;
                    self.lane_keep_enabled = false;
                    *emitted |= EngageEvent::BUTTON_CANCEL;
                    break;
                }
                // The main toggle drops longitudinal but keeps lateral.
                (ButtonType::AltButton, true) => {
                    self.adaptive_cruise_enabled = false;
                    self.lane_keep_enabled = true;
                    break;
                }
                _ => {}
            }
        }
    }

    /// Button rules with the main cruise switch on.
    fn process_buttons_main_on(&mut self, events: &[ButtonEvent]) {
        for ev in events {
            if !self.adaptive_cruise_enabled
                && ev.button == ButtonType::AltButton
                && ev.pressed
            {
                self.adaptive_cruise_enabled = false;
                self.lane_keep_enabled = false;
                break;
            }
        }
    }

    /// Time-gated auto-engage guard.
    ///
    /// The counter runs only while every gating condition holds with the
    /// guard armed; any break zeroes it and re-arms. Crossing the window
    /// disarms the guard without enabling anything.
    fn update_auto_engage_guard(&mut self, p: &ControlParams, vehicle: &VehicleState) {
        let cruise_enabled = vehicle.main_on || self.adaptive_cruise_enabled;
        let gating = vehicle.main_on
            && self.lane_keep_enabled
            && !self.adaptive_cruise_enabled
            && cruise_enabled
            && vehicle.gear_shifter == GearShifter::Drive
            && vehicle.speed > p.auto_engage_min_speed
            && !vehicle.brake_pressed
            && vehicle.cruise_available
            && !vehicle.seatbelt_unlatched
            && !vehicle.esp_disabled;

        if gating {
            if self.auto_engage_armed {
                self.auto_engage_counter += 1;
                if self.auto_engage_counter > p.auto_engage_cycles {
                    self.auto_engage_armed = false;
                    self.auto_engage_counter = 0;
                }
            }
        } else {
            self.auto_engage_counter = 0;
            self.auto_engage_armed = true;
        }
    }

    /// Guard armed state (observable for diagnostics).
    #[inline]
    pub const fn auto_engage_armed(&self) -> bool {
        self.auto_engage_armed
    }

    /// Current guard counter value (observable for diagnostics).
    #[inline]
    pub const fn auto_engage_counter(&self) -> u32 {
        self.auto_engage_counter
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
