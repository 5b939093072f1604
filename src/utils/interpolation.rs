//! Interpolation Utilities
//!
//! Linear interpolation between bracketing points, shared by the breakpoint
//! table and the response rounding.

/// Map `x` from `[x_lo, x_hi]` onto `[y_lo, y_hi]`.
///
/// Not clamped: values outside `[x_lo, x_hi]` continue along the same line.
/// A degenerate interval (`x_hi == x_lo`) returns `y_lo`.
#[inline]
pub fn lerp(x: f64, x_lo: f64, x_hi: f64, y_lo: f64, y_hi: f64) -> f64 {
    let width = x_hi - x_lo;
    if width > 0.0 {
        y_lo + (x - x_lo) * (y_hi - y_lo) / width
    } else {
        y_lo
    }
}

/// Round half away from zero to `decimals` places
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
