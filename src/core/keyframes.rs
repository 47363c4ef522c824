//! Time-based entrance animation.
//!
//! When the grid switches to play mode, cards stop being scrubbed and get a
//! named animation instead.  The host samples it every frame; the
//! choreography only ever assigns or clears it.

use std::fmt;
use std::time::Duration;

use super::progress::{clamp01, lerp};

/// Keyframe name of the card entrance.
pub const CARD_SLIDE_IN: &str = "cardSlideIn";

/// Card entrance start values: `opacity 0`, `translateY(12px)`.
const SLIDE_IN_FROM: KeyframeValues = KeyframeValues {
    opacity: 0.0,
    translate_y: 12.0,
};
const SLIDE_IN_TO: KeyframeValues = KeyframeValues {
    opacity: 1.0,
    translate_y: 0.0,
};

// ───────────────────────────────────────── timing ────────────

/// CSS `cubic-bezier(x1, y1, x2, y2)` timing function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    /// `cubic-bezier(0.22, 1, 0.36, 1)`: fast start, long soft landing.
    pub const SOFT_LANDING: CubicBezier = CubicBezier::new(0.22, 1.0, 0.36, 1.0);

    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn coefficients(p1: f64, p2: f64) -> (f64, f64, f64) {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        (a, b, c)
    }

    fn curve(p1: f64, p2: f64, t: f64) -> f64 {
        let (a, b, c) = Self::coefficients(p1, p2);
        ((a * t + b) * t + c) * t
    }

    fn curve_slope(p1: f64, p2: f64, t: f64) -> f64 {
        let (a, b, c) = Self::coefficients(p1, p2);
        (3.0 * a * t + 2.0 * b) * t + c
    }

    /// Find the curve parameter whose x equals `x`.  Newton first, bisection
    /// when the slope is too flat to trust.
    fn solve_t(&self, x: f64) -> f64 {
        const EPS: f64 = 1e-7;

        let mut t = x;
        for _ in 0..8 {
            let err = Self::curve(self.x1, self.x2, t) - x;
            if err.abs() < EPS {
                return t;
            }
            let slope = Self::curve_slope(self.x1, self.x2, t);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= err / slope;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        while lo < hi {
            let cur = Self::curve(self.x1, self.x2, t);
            if (cur - x).abs() < EPS {
                break;
            }
            if x > cur {
                lo = t;
            } else {
                hi = t;
            }
            t = (hi - lo) / 2.0 + lo;
            if hi - lo < EPS {
                break;
            }
        }
        t
    }

    /// Map linear time progress `x ∈ [0, 1]` to eased progress.
    pub fn ease(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        Self::curve(self.y1, self.y2, self.solve_t(x))
    }
}

impl fmt::Display for CubicBezier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cubic-bezier({}, {}, {}, {})", self.x1, self.y1, self.x2, self.y2)
    }
}

/// `animation-fill-mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    #[default]
    None,
    /// Hold the first keyframe during the delay and the last one afterwards.
    Both,
}

impl FillMode {
    fn holds(self) -> bool {
        self == FillMode::Both
    }

    pub fn as_css(self) -> &'static str {
        match self {
            FillMode::None => "none",
            FillMode::Both => "both",
        }
    }
}

// ───────────────────────────────────────── animation ─────────

/// Values produced by sampling a keyframe animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyframeValues {
    pub opacity: f64,
    /// Vertical offset in px.
    pub translate_y: f64,
}

/// A named, declarative animation assignment for one element.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSpec {
    pub name: &'static str,
    pub delay: Duration,
    pub duration: Duration,
    pub timing: CubicBezier,
    pub fill: FillMode,
}

impl AnimationSpec {
    /// Staggered card entrance for the card at `index`.
    pub fn card_slide_in(index: usize, stagger: Duration, duration: Duration) -> Self {
        Self {
            name: CARD_SLIDE_IN,
            delay: stagger * index as u32,
            duration,
            timing: CubicBezier::SOFT_LANDING,
            fill: FillMode::Both,
        }
    }

    /// Instant after which the animation no longer changes anything.
    pub fn total(&self) -> Duration {
        self.delay + self.duration
    }

    /// Sample the animation `elapsed` after it was assigned.  `None` means
    /// the animation has no effect at this instant and the element falls back
    /// to its other styles.
    pub fn sample(&self, elapsed: Duration) -> Option<KeyframeValues> {
        if elapsed < self.delay {
            return self.fill.holds().then_some(SLIDE_IN_FROM);
        }
        let active = elapsed - self.delay;
        if active >= self.duration {
            return self.fill.holds().then_some(SLIDE_IN_TO);
        }
        let linear = clamp01(active.as_secs_f64() / self.duration.as_secs_f64());
        let eased = self.timing.ease(linear);
        Some(KeyframeValues {
            opacity: lerp(SLIDE_IN_FROM.opacity, SLIDE_IN_TO.opacity, eased),
            translate_y: lerp(SLIDE_IN_FROM.translate_y, SLIDE_IN_TO.translate_y, eased),
        })
    }
}

impl fmt::Display for AnimationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.2}s {} {:.2}s {}",
            self.name,
            self.duration.as_secs_f64(),
            self.timing,
            self.delay.as_secs_f64(),
            self.fill.as_css()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(index: usize) -> AnimationSpec {
        AnimationSpec::card_slide_in(index, Duration::from_millis(60), Duration::from_millis(900))
    }

    #[test]
    fn bezier_endpoints_and_shape() {
        let b = CubicBezier::SOFT_LANDING;
        assert_eq!(b.ease(0.0), 0.0);
        assert_eq!(b.ease(1.0), 1.0);
        // Front-loaded curve: well past halfway at the time midpoint.
        assert!(b.ease(0.5) > 0.8);
        let mut prev = 0.0;
        for i in 1..=50 {
            let v = b.ease(i as f64 / 50.0);
            assert!(v >= prev - 1e-9);
            prev = v;
        }
    }

    #[test]
    fn linear_bezier_is_identity() {
        let linear = CubicBezier::new(0.0, 0.0, 1.0, 1.0);
        for x in [0.1, 0.25, 0.5, 0.9] {
            assert!((linear.ease(x) - x).abs() < 1e-5);
        }
    }

    #[test]
    fn fill_both_holds_start_and_end() {
        let s = spec(3);
        assert_eq!(s.delay, Duration::from_millis(180));
        assert_eq!(s.sample(Duration::from_millis(100)), Some(SLIDE_IN_FROM));
        assert_eq!(s.sample(Duration::from_secs(5)), Some(SLIDE_IN_TO));
        let mid = s.sample(Duration::from_millis(180 + 450)).unwrap();
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0);
        assert!(mid.translate_y > 0.0 && mid.translate_y < 12.0);
    }

    #[test]
    fn fill_none_has_no_effect_outside_active_phase() {
        let s = AnimationSpec {
            fill: FillMode::None,
            ..spec(2)
        };
        assert_eq!(s.sample(Duration::ZERO), None);
        assert_eq!(s.sample(Duration::from_secs(2)), None);
    }

    #[test]
    fn display_matches_css_shorthand() {
        assert_eq!(
            spec(1).to_string(),
            "cardSlideIn 0.90s cubic-bezier(0.22, 1, 0.36, 1) 0.06s both"
        );
    }
}
