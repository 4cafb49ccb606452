//! Blood-oxygen estimation from differential red/IR absorption.

use crate::config::{IR_RANGE, RED_RANGE};

/// Estimates SpO2 in percent from one clipped red/IR sample pair.
///
/// Applies the empirical linear mapping `110 - 25 * R` to the ratio of the
/// range-normalized intensities. A zero IR value yields 0 instead of
/// dividing; the configured IR minimum makes that unreachable through the
/// pipeline, but the guard stands on its own. The result is recomputed every
/// cycle and deliberately not clamped to a physiological range.
pub fn estimate(red_clipped: u16, ir_clipped: u16) -> f32 {
    if ir_clipped == 0 {
        return 0.0;
    }
    let red = f32::from(red_clipped) / f32::from(RED_RANGE.max);
    let ir = f32::from(ir_clipped) / f32::from(IR_RANGE.max);
    110.0 - 25.0 * (red / ir)
}
