//! Per-element style state: the page's [`RenderTarget`].
//!
//! Writes land as inline values.  [`PageStyles::resolve`] then runs a tiny
//! cascade per element: a running animation beats inline values, which beat
//! the stylesheet defaults.

use std::collections::HashMap;
use std::time::Instant;

use crate::core::keyframes::AnimationSpec;
use crate::core::target::{ElementId, RenderTarget, Transform};

/// Inline state of one element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementStyle {
    pub opacity: Option<f64>,
    pub transform: Option<Transform>,
    pub pointer_events: Option<bool>,
    pub animation: Option<RunningAnimation>,
    /// The `visible` class.
    pub visible: bool,
}

/// An animation together with the instant it was assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningAnimation {
    pub spec: AnimationSpec,
    pub started: Instant,
}

/// Final computed values for drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    pub opacity: f64,
    pub scale: f64,
    /// Offsets in px.
    pub dx: f64,
    pub dy: f64,
    /// `pointer-events` is not `none`.
    pub interactive: bool,
}

impl Resolved {
    const fn new(opacity: f64, scale: f64, dx: f64, dy: f64) -> Self {
        Self {
            opacity,
            scale,
            dx,
            dy,
            interactive: true,
        }
    }

    const fn inert(self) -> Self {
        Self {
            interactive: false,
            ..self
        }
    }
}

/// Inputs of the cascade that don't live on the element itself.
#[derive(Debug, Clone, Copy)]
pub struct StyleContext {
    pub now: Instant,
    pub viewport_height: f64,
    /// Grid container carries the `play` class.
    pub grid_playing: bool,
}

#[derive(Debug, Clone)]
pub struct PageStyles {
    /// Clock used to stamp newly assigned animations.
    now: Instant,
    elements: HashMap<ElementId, ElementStyle>,
}

impl PageStyles {
    pub fn new(now: Instant) -> Self {
        Self {
            now,
            elements: HashMap::new(),
        }
    }

    /// Advance the stamping clock.  Call before a choreography tick.
    pub fn set_now(&mut self, now: Instant) {
        self.now = now;
    }

    fn entry(&mut self, el: ElementId) -> &mut ElementStyle {
        self.elements.entry(el).or_default()
    }

    /// Any assigned animation still changing at `now`.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.elements.values().any(|style| {
            style
                .animation
                .as_ref()
                .is_some_and(|a| now.saturating_duration_since(a.started) < a.spec.total())
        })
    }

    /// Stylesheet defaults.
    fn base(el: ElementId, style: Option<&ElementStyle>, grid_playing: bool) -> Resolved {
        let visible = style.is_some_and(|s| s.visible);
        match el {
            ElementId::HeroImage => Resolved::new(1.0, 0.75, 0.0, 0.0),
            ElementId::Greeting => Resolved::new(1.0, 1.0, 0.0, 0.0),
            ElementId::Line(_) => Resolved::new(0.0, 1.0, -20.0, 0.0),
            ElementId::GridContainer if grid_playing => Resolved::new(1.0, 1.0, 0.0, 0.0),
            ElementId::GridContainer => Resolved::new(0.0, 1.0, 0.0, 16.0).inert(),
            ElementId::GridCard(_) => Resolved::new(0.0, 1.0, 0.0, 12.0),
            ElementId::LooseCard(_) if visible => Resolved::new(1.0, 1.0, 0.0, 0.0),
            ElementId::LooseCard(_) => Resolved::new(0.0, 1.0, 0.0, 24.0),
        }
    }

    /// Computed values for `el`.
    pub fn resolve(&self, el: ElementId, ctx: &StyleContext) -> Resolved {
        let style = self.elements.get(&el);
        let mut out = Self::base(el, style, ctx.grid_playing);
        let Some(style) = style else {
            return out;
        };

        if let Some(opacity) = style.opacity {
            out.opacity = opacity;
        }
        if let Some(enabled) = style.pointer_events {
            out.interactive = enabled;
        }
        if let Some(t) = style.transform {
            out.scale = t.scale;
            out.dx = t.dx(ctx.viewport_height);
            out.dy = t.dy(ctx.viewport_height);
        }
        if let Some(anim) = &style.animation {
            let elapsed = ctx.now.saturating_duration_since(anim.started);
            if let Some(frame) = anim.spec.sample(elapsed) {
                out.opacity = frame.opacity;
                out.dy = frame.translate_y;
            }
        }
        out.opacity = out.opacity.clamp(0.0, 1.0);
        out
    }
}

impl RenderTarget for PageStyles {
    fn set_transform(&mut self, el: ElementId, transform: Option<Transform>) {
        self.entry(el).transform = transform;
    }

    fn set_opacity(&mut self, el: ElementId, opacity: Option<f64>) {
        self.entry(el).opacity = opacity;
    }

    fn set_pointer_events(&mut self, el: ElementId, enabled: bool) {
        self.entry(el).pointer_events = Some(enabled);
    }

    fn set_animation(&mut self, el: ElementId, animation: Option<AnimationSpec>) {
        let started = self.now;
        self.entry(el).animation = animation.map(|spec| RunningAnimation { spec, started });
    }

    fn set_visible(&mut self, el: ElementId, visible: bool) {
        self.entry(el).visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::target::Length;

    fn ctx(now: Instant) -> StyleContext {
        StyleContext {
            now,
            viewport_height: 800.0,
            grid_playing: false,
        }
    }

    #[test]
    fn defaults_apply_without_writes() {
        let t0 = Instant::now();
        let styles = PageStyles::new(t0);
        let hero = styles.resolve(ElementId::HeroImage, &ctx(t0));
        assert_eq!(hero.scale, 0.75);
        let card = styles.resolve(ElementId::GridCard(2), &ctx(t0));
        assert_eq!((card.opacity, card.dy), (0.0, 12.0));
    }

    #[test]
    fn inline_overrides_defaults_and_converts_vh() {
        let t0 = Instant::now();
        let mut styles = PageStyles::new(t0);
        styles.set_opacity(ElementId::Line(1), Some(0.4));
        styles.set_transform(
            ElementId::HeroImage,
            Some(Transform::scale(0.5).with_translate_y(Length::Vh(-8.0))),
        );
        assert_eq!(styles.resolve(ElementId::Line(1), &ctx(t0)).opacity, 0.4);
        let hero = styles.resolve(ElementId::HeroImage, &ctx(t0));
        assert_eq!((hero.scale, hero.dy), (0.5, -64.0));
    }

    #[test]
    fn animation_beats_inline_and_is_stamped_on_assignment() {
        let t0 = Instant::now();
        let mut styles = PageStyles::new(t0);
        let card = ElementId::GridCard(0);
        styles.set_opacity(card, Some(0.2));

        let t1 = t0 + Duration::from_secs(10);
        styles.set_now(t1);
        let spec = AnimationSpec::card_slide_in(0, Duration::from_millis(60), Duration::from_millis(900));
        styles.set_animation(card, Some(spec));

        // Just assigned: fill-mode holds the first keyframe.
        assert_eq!(styles.resolve(card, &ctx(t1)).opacity, 0.0);
        assert!(styles.is_animating(t1));

        let done = t1 + Duration::from_secs(1);
        let r = styles.resolve(card, &ctx(done));
        assert_eq!((r.opacity, r.dy), (1.0, 0.0));
        assert!(!styles.is_animating(done));
    }

    #[test]
    fn container_is_inert_until_pointer_events_are_enabled() {
        let t0 = Instant::now();
        let mut styles = PageStyles::new(t0);
        assert!(!styles.resolve(ElementId::GridContainer, &ctx(t0)).interactive);
        assert!(styles.resolve(ElementId::LooseCard(0), &ctx(t0)).interactive);

        styles.set_pointer_events(ElementId::GridContainer, true);
        assert!(styles.resolve(ElementId::GridContainer, &ctx(t0)).interactive);
        styles.set_pointer_events(ElementId::GridContainer, false);
        assert!(!styles.resolve(ElementId::GridContainer, &ctx(t0)).interactive);
    }

    #[test]
    fn play_class_shows_cleared_container() {
        let t0 = Instant::now();
        let mut styles = PageStyles::new(t0);
        styles.set_opacity(ElementId::GridContainer, None);
        let playing = StyleContext {
            grid_playing: true,
            ..ctx(t0)
        };
        assert_eq!(styles.resolve(ElementId::GridContainer, &playing).opacity, 1.0);
        assert_eq!(styles.resolve(ElementId::GridContainer, &ctx(t0)).opacity, 0.0);
    }

    #[test]
    fn visible_class_reveals_loose_cards() {
        let t0 = Instant::now();
        let mut styles = PageStyles::new(t0);
        let el = ElementId::LooseCard(0);
        assert_eq!(styles.resolve(el, &ctx(t0)).opacity, 0.0);
        styles.set_visible(el, true);
        assert_eq!(styles.resolve(el, &ctx(t0)).opacity, 1.0);
    }
}
