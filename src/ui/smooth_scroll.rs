//! Pixel-level smooth scroll with exponential ease-out.
//!
//! Input moves the *target* offset; each frame the displayed offset closes a
//! fixed fraction of the remaining distance, so a burst of key presses reads
//! as one decelerating glide.  Every frame that changes the offset counts as
//! a scroll event for the choreography.

/// Remaining distance (px) below which the glide snaps to the target.
const SNAP_PX: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct SmoothScroll {
    offset: f64,
    target: f64,
    /// Fraction of the remaining distance covered per tick.  1.0 jumps.
    speed: f64,
}

impl SmoothScroll {
    pub fn new(speed: f64) -> Self {
        Self {
            offset: 0.0,
            target: 0.0,
            speed: speed.clamp(0.05, 1.0),
        }
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.clamp(0.05, 1.0);
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Move both offset and target at once (resize, clamping).
    pub fn jump_to(&mut self, offset: f64) {
        self.offset = offset;
        self.target = offset;
    }

    /// Advance one frame.  Returns `true` when the offset moved.
    pub fn tick(&mut self) -> bool {
        if self.offset == self.target {
            return false;
        }
        self.offset += (self.target - self.offset) * self.speed;
        if (self.target - self.offset).abs() < SNAP_PX {
            self.offset = self.target;
        }
        true
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// True while the glide has not settled.
    pub fn is_animating(&self) -> bool {
        self.offset != self.target
    }
}
