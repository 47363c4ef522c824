//! The render-target seam.
//!
//! The choreography computes values only; every visual side effect goes
//! through [`RenderTarget`].  Passing `None` to a setter clears the inline
//! value so whatever the stylesheet (or a running animation) says wins again.

use std::fmt;

use super::keyframes::AnimationSpec;

// ───────────────────────────────────────── elements ──────────

/// Every element the choreography or the visibility toggler may write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    HeroImage,
    Greeting,
    Line(usize),
    GridContainer,
    /// Card inside the managed grid container.
    GridCard(usize),
    /// Card outside the grid, owned by the visibility toggler.
    LooseCard(usize),
}

// ───────────────────────────────────────── transform ─────────

/// CSS length in one of the two units the choreography writes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    /// Percent of viewport height.
    Vh(f64),
}

impl Length {
    pub fn to_px(self, viewport_height: f64) -> f64 {
        match self {
            Length::Px(px) => px,
            Length::Vh(vh) => vh * viewport_height / 100.0,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(v) => write!(f, "{v:.2}px"),
            Length::Vh(v) => write!(f, "{v:.2}vh"),
        }
    }
}

/// A `scale() translateX() translateY()` transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub translate_x: Length,
    pub translate_y: Length,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale: 1.0,
        translate_x: Length::Px(0.0),
        translate_y: Length::Px(0.0),
    };

    pub fn translate_x(x: Length) -> Self {
        Self {
            translate_x: x,
            ..Self::IDENTITY
        }
    }

    pub fn translate_y(y: Length) -> Self {
        Self {
            translate_y: y,
            ..Self::IDENTITY
        }
    }

    pub fn scale(scale: f64) -> Self {
        Self {
            scale,
            ..Self::IDENTITY
        }
    }

    pub fn with_translate_y(mut self, y: Length) -> Self {
        self.translate_y = y;
        self
    }

    /// Vertical offset in pixels.
    pub fn dy(&self, viewport_height: f64) -> f64 {
        self.translate_y.to_px(viewport_height)
    }

    /// Horizontal offset in pixels.
    pub fn dx(&self, viewport_height: f64) -> f64 {
        self.translate_x.to_px(viewport_height)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.scale != 1.0 {
            parts.push(format!("scale({:.3})", self.scale));
        }
        if self.translate_x != Length::Px(0.0) {
            parts.push(format!("translateX({})", self.translate_x));
        }
        if self.translate_y != Length::Px(0.0) {
            parts.push(format!("translateY({})", self.translate_y));
        }
        if parts.is_empty() {
            return f.write_str("none");
        }
        f.write_str(&parts.join(" "))
    }
}

// ───────────────────────────────────────── trait ─────────────

/// Sink for style writes.
pub trait RenderTarget {
    fn set_transform(&mut self, el: ElementId, transform: Option<Transform>);
    fn set_opacity(&mut self, el: ElementId, opacity: Option<f64>);
    fn set_pointer_events(&mut self, el: ElementId, enabled: bool);
    fn set_animation(&mut self, el: ElementId, animation: Option<AnimationSpec>);
    /// Toggle the `visible` class.
    fn set_visible(&mut self, el: ElementId, visible: bool);
}

// ───────────────────────────────────────── test double ───────


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_renders_as_css() {
        let t = Transform::scale(0.5).with_translate_y(Length::Vh(-4.0));
        assert_eq!(t.to_string(), "scale(0.500) translateY(-4.00vh)");
        assert_eq!(Transform::IDENTITY.to_string(), "none");
        assert_eq!(
            Transform::translate_x(Length::Px(-20.0)).to_string(),
            "translateX(-20.00px)"
        );
    }

    #[test]
    fn vh_converts_against_viewport() {
        assert_eq!(Length::Vh(-8.0).to_px(800.0), -64.0);
        assert_eq!(Length::Px(12.0).to_px(800.0), 12.0);
    }
}
