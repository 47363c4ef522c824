//! Progress and easing primitives shared by every choreography track.
//!
//! A *progress* value is a real number in `[0, 1]` describing how far a
//! scroll-driven animation has advanced.  Easings remap a progress value to
//! change its perceived rate; they are only ever used for interpolation and
//! are never stored.

/// Clamp to `[0, 1]`.  Non-finite input (NaN, ±∞ from a bad ratio) maps to 0
/// so a degenerate sample can never leak into a style write.
pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, 1.0)
}

/// Linear progress `numerator / denominator`, clamped.
///
/// A zero, negative or non-finite denominator means the track has no
/// scrollable distance; that case is pinned to 0 rather than divided.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if !denominator.is_finite() || denominator <= 0.0 {
        return 0.0;
    }
    clamp01(numerator / denominator)
}

/// Power ease-out: `1 - (1 - t)^power`.
pub fn ease_out(t: f64, power: f64) -> f64 {
    1.0 - (1.0 - clamp01(t)).powf(power)
}

/// Cubic ease-in-out.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = clamp01(t);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
