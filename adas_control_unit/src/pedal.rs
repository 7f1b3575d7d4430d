//! Gas pedal interceptor command generator.
//!
//! Active only on vehicles with a pedal interceptor fitted. The desired
//! gas/brake split is folded into a single pedal position fraction with a
//! speed-dependent gain, and transmitted at a quarter of the tick rate on a
//! free-running 2-bit counter (a different bus consumer than steering, with
//! no counter-sync coupling).

use adas_common::command::OutgoingCommand;
use adas_common::params::ControlParams;

use crate::shaping::interp;

/// Speed breakpoints for the pedal gain [m/s].
pub const GAS_MULT_BP: [f64; 2] = [0.0, 10.0];
/// Pedal gain at the breakpoints: soft at low speed, unity above.
pub const GAS_MULT_V: [f64; 2] = [0.4, 1.0];

/// Compute the pedal position fraction for this tick.
///
/// Forced to zero unless the controls are engaged, adaptive cruise is
/// enabled, and the car is moving faster than the near-zero cutoff.
#[inline]
pub fn pedal_fraction(
    p: &ControlParams,
    enabled: bool,
    adaptive_cruise: bool,
    speed: f64,
    gas: f64,
    brake: f64,
) -> f64 {
    if !enabled || !adaptive_cruise || speed <= p.min_pedal_speed {
        return 0.0;
    }
    let gas_mult = interp(speed, &GAS_MULT_BP, &GAS_MULT_V);
    (gas_mult * (gas - brake)).clamp(0.0, 1.0)
}

/// Emit the pedal command on transmit ticks.
///
/// Transmits every `pedal_step` ticks; the counter is free-running over the
/// transmit index.
#[inline]
pub fn pedal_command(p: &ControlParams, frame: u64, fraction: f64) -> Option<OutgoingCommand> {
    if frame % p.pedal_step != 0 {
        return None;
    }
    let counter = ((frame / p.pedal_step) % 4) as u8;
    Some(OutgoingCommand::Pedal { fraction, counter })
}

// ─── Tests ──────────────────────────────────────────────────────────
