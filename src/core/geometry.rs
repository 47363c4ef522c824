//! Per-tick viewport geometry.
//!
//! A [`ViewportSample`] is the equivalent of reading `getBoundingClientRect()`
//! on every tracked element: positions are relative to the top of the
//! viewport and are recomputed from scratch on every tick.

/// Viewport-relative vertical extent of one element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementRect {
    /// Distance from the viewport top to the element top.  Negative once the
    /// element has scrolled past the top edge.
    pub top: f64,
    pub height: f64,
}

impl ElementRect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Height of the slice of this element that lies inside `[0, viewport_height]`.
    pub fn visible_height(&self, viewport_height: f64) -> f64 {
        let top = self.top.max(0.0);
        let bottom = self.bottom().min(viewport_height);
        (bottom - top).max(0.0)
    }
}

/// Geometry of the tracked elements for one tick.  `None` means the element
/// is absent from the page; the matching track is then skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportSample {
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// The tall scroll wrapper that drives the hero tracks.
    pub wrapper: Option<ElementRect>,
    pub hero: Option<ElementRect>,
    /// Greeting text block.
    pub text: Option<ElementRect>,
    /// Managed card-grid container.
    pub grid: Option<ElementRect>,
    /// Number of reveal lines present.
    pub line_count: usize,
    /// Number of cards inside the grid container.
    pub card_count: usize,
}
