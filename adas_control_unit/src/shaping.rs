//! Pure longitudinal shaping math.
//!
//! Stateless helpers used by the tick pipeline: gas/brake split with creep
//! compensation, the accel dead-band filter, and clamped piecewise-linear
//! interpolation.

/// Speed below which the creep brake bias ramps in [m/s].
pub const CREEP_SPEED: f64 = 2.3;
/// Creep brake bias at standstill [brake fraction].
pub const CREEP_BRAKE_MAX: f64 = 0.15;
/// Acceleration that maps to full gas/brake travel [m/s²].
pub const ACCEL_SCALE: f64 = 4.8;
/// Accel oscillations inside this band do not move the command [m/s²].
pub const ACCEL_HYST_GAP: f64 = 0.02;

/// Split a desired acceleration into (gas, brake) pedal fractions.
///
/// Below [`CREEP_SPEED`] a brake bias is blended in to counter automatic
/// transmission idle creep, so a zero-accel command still holds the car.
/// Both outputs are clipped to [0, 1]; exactly one of them is nonzero
/// except when both round to zero.
#[inline]
pub fn compute_gas_brake(accel: f64, speed: f64) -> (f64, f64) {
    let creep_brake = if speed < CREEP_SPEED {
        (CREEP_SPEED - speed) / CREEP_SPEED * CREEP_BRAKE_MAX
    } else {
        0.0
    };
    let gb = accel / ACCEL_SCALE - creep_brake;
    (gb.clamp(0.0, 1.0), (-gb).clamp(0.0, 1.0))
}

/// Dead-band filter for small accel oscillations.
///
/// The steady value chases `accel` from outside a ±[`ACCEL_HYST_GAP`] band
/// and holds inside it. The commanded accel returned is the steady value in
/// every branch, including when the band did not move.
#[inline]
pub fn accel_hysteresis(accel: f64, accel_steady: f64) -> (f64, f64) {
    let mut steady = accel_steady;
    if accel > steady + ACCEL_HYST_GAP {
        steady = accel - ACCEL_HYST_GAP;
    } else if accel < steady - ACCEL_HYST_GAP {
        steady = accel + ACCEL_HYST_GAP;
    }
    (steady, steady)
}

/// Clamped piecewise-linear interpolation of `x` over breakpoints `xp`
/// with values `fp`.
///
/// `xp` must be sorted ascending and the slices equal-length; outside the
/// breakpoint range the boundary value is returned.
#[inline]
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    debug_assert_eq!(xp.len(), fp.len());
    let n = xp.len();
    if n == 0 {
        return 0.0;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }
    for i in 0..n - 1 {
        if x < xp[i + 1] {
            let t = (x - xp[i]) / (xp[i + 1] - xp[i]);
            return fp[i] + t * (fp[i + 1] - fp[i]);
        }
    }
    fp[n - 1]
}

// ─── Tests ──────────────────────────────────────────────────────────
