//! Viewport-membership toggling for cards outside the managed grid.
//!
//! Cards inside the grid container belong to the choreography's scrub/play
//! machinery; they are never touched here so the two mechanisms don't fight
//! over the same element.

use std::collections::HashMap;

use super::geometry::ElementRect;
use super::target::{ElementId, RenderTarget};

/// Fraction of a card that must be on screen for it to count as visible.
pub const DEFAULT_THRESHOLD: f64 = 0.15;

/// One observed card for this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservedCard {
    pub id: ElementId,
    pub rect: ElementRect,
    /// `true` when the card lives inside the managed grid container.
    pub in_managed_grid: bool,
}

/// Tracks the last known visibility of each observed card and writes only
/// changes.
#[derive(Debug, Clone)]
pub struct IntersectionVisibilityToggler {
    threshold: f64,
    /// Without observer support every card is simply shown once.
    supported: bool,
    state: HashMap<ElementId, bool>,
}

impl Default for IntersectionVisibilityToggler {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl IntersectionVisibilityToggler {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            supported: true,
            state: HashMap::new(),
        }
    }

    /// Fallback mode for platforms without intersection observation.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::default()
        }
    }

    /// Fraction of `rect` inside the viewport.
    pub fn intersection_ratio(rect: &ElementRect, viewport_height: f64) -> f64 {
        let visible = rect.visible_height(viewport_height);
        if rect.height <= 0.0 {
            // Zero-height elements are either fully in or fully out.
            let inside = rect.top >= 0.0 && rect.top <= viewport_height;
            return if inside { 1.0 } else { 0.0 };
        }
        (visible / rect.height).clamp(0.0, 1.0)
    }

    /// Evaluate every card and write the ones whose visibility changed.
    /// Returns the number of writes.
    pub fn observe<T: RenderTarget + ?Sized>(
        &mut self,
        cards: &[ObservedCard],
        viewport_height: f64,
        target: &mut T,
    ) -> usize {
        let mut changed = 0;

        if !self.supported {
            for card in cards {
                if !self.state.contains_key(&card.id) {
                    self.state.insert(card.id, true);
                    target.set_visible(card.id, true);
                    changed += 1;
                }
            }
            return changed;
        }

        for card in cards.iter().filter(|c| !c.in_managed_grid) {
            let ratio = Self::intersection_ratio(&card.rect, viewport_height);
            let visible = ratio > 0.0 && ratio >= self.threshold;
            if self.state.get(&card.id) != Some(&visible) {
                self.state.insert(card.id, visible);
                target.set_visible(card.id, visible);
                changed += 1;
            }
        }

        if changed > 0 {
            tracing::trace!(changed, "card visibility updated");
        }
        changed
    }
}
