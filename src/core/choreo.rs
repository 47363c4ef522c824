//! Scroll-to-progress choreography.
//!
//! One [`ScrollChoreographer::tick`] turns a [`ViewportSample`] into style
//! writes on four independent tracks:
//!
//! * **hero**: the image shrinks and lifts as the wrapper scrolls away
//! * **text fade**: the greeting fades out over the last quarter of the hero
//! * **line reveal**: lines slide in left-to-right in a staggered cascade
//! * **grid entrance**: the card grid is scrubbed from scroll until it crosses
//!   the enter threshold, then hands over to a time-based staggered entrance
//!
//! The only state that survives between ticks is the grid's
//! [`ChoreographyMode`].  Everything else is recomputed from the sample, so
//! running a tick twice on the same sample produces identical writes.

use std::time::Duration;

use thiserror::Error;

use super::geometry::ViewportSample;
use super::keyframes::AnimationSpec;
use super::progress::{clamp01, ease_in_out_cubic, ease_out, ratio};
use super::target::{ElementId, Length, RenderTarget, Transform};

// Hero image.
const HERO_MIN_SCALE: f64 = 0.3;
const HERO_SHRINK: f64 = 0.4;
const HERO_EASE_POWER: f64 = 1.3;
const HERO_LIFT_VH: f64 = 8.0;

// Greeting.
const TEXT_LIFT_PX: f64 = 32.0;

// Lines.
const LINE_STAGGER: f64 = 0.15;
const LINE_GAIN: f64 = 3.0;
const LINE_SLIDE_PX: f64 = 20.0;

// Grid container and cards while scrubbing.
const GRID_EASE_POWER: f64 = 2.2;
const GRID_LIFT_PX: f64 = 48.0;
const GRID_POINTER_MIN: f64 = 0.05;
const CARD_SPAN: f64 = 0.9;
const CARD_LIFT_PX: f64 = 20.0;
const CARD_CONTAINER_LIFT_PX: f64 = 8.0;

// Pre-entrance values restored when play mode is left.
const CARD_RESET_PX: f64 = 12.0;
const GRID_RESET_PX: f64 = 16.0;

// ───────────────────────────────────────── errors ────────────

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChoreoError {
    #[error("threshold {name} = {value} is outside [0, 1]")]
    ThresholdOutOfRange { name: &'static str, value: f64 },
    #[error("enter threshold {enter} is below exit threshold {exit}; the hysteresis band would be inverted")]
    InvertedHysteresis { enter: f64, exit: f64 },
    #[error("{name} must be a positive finite number, got {value}")]
    InvalidStretch { name: &'static str, value: f64 },
}

// ───────────────────────────────────────── config ────────────

/// Tunable constants of the choreography.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoreoConfig {
    /// Hero scale at progress 0.  Matches the stylesheet's starting scale.
    pub hero_base_scale: f64,
    /// Hero progress at which the greeting starts fading.
    pub text_fade_start: f64,
    /// Viewport heights of scroll the grid reveal spans.
    pub grid_stretch: f64,
    /// Same, for the finer per-card scrub.
    pub card_stretch: f64,
    /// Per-card offset in card progress while scrubbing.
    pub card_stagger: f64,
    /// Grid progress at or above which play mode starts.
    pub enter_threshold: f64,
    /// Grid progress below which play mode ends.
    pub exit_threshold: f64,
    /// Per-card delay of the play-mode entrance.
    pub entrance_stagger: Duration,
    pub entrance_duration: Duration,
}

impl Default for ChoreoConfig {
    fn default() -> Self {
        Self {
            hero_base_scale: 0.75,
            text_fade_start: 0.75,
            grid_stretch: 1.4,
            card_stretch: 1.05,
            card_stagger: 0.06,
            enter_threshold: 0.14,
            exit_threshold: 0.08,
            entrance_stagger: Duration::from_millis(60),
            entrance_duration: Duration::from_millis(900),
        }
    }
}

impl ChoreoConfig {
    /// Replace the hysteresis band, validating it.
    pub fn with_thresholds(mut self, enter: f64, exit: f64) -> Result<Self, ChoreoError> {
        self.enter_threshold = enter;
        self.exit_threshold = exit;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ChoreoError> {
        for (name, value) in [
            ("enter_threshold", self.enter_threshold),
            ("exit_threshold", self.exit_threshold),
            ("text_fade_start", self.text_fade_start),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ChoreoError::ThresholdOutOfRange { name, value });
            }
        }
        if self.enter_threshold < self.exit_threshold {
            return Err(ChoreoError::InvertedHysteresis {
                enter: self.enter_threshold,
                exit: self.exit_threshold,
            });
        }
        for (name, value) in [
            ("grid_stretch", self.grid_stretch),
            ("card_stretch", self.card_stretch),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChoreoError::InvalidStretch { name, value });
            }
        }
        Ok(())
    }
}

// ───────────────────────────────────────── mode ──────────────

/// Grid-track mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChoreographyMode {
    /// Styles follow the scroll position directly; fully reversible.
    #[default]
    Scrubbing,
    /// A time-based staggered entrance owns the cards.
    Playing,
}

impl ChoreographyMode {
    pub fn label(self) -> &'static str {
        match self {
            ChoreographyMode::Scrubbing => "scrub",
            ChoreographyMode::Playing => "play",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTransition {
    /// Scrubbing → Playing.
    Entered,
    /// Playing → Scrubbing.
    Exited,
}

/// What one tick computed.  Purely informational; the writes already went
/// to the target.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    /// `true` when the wrapper was absent and nothing ran.
    pub skipped: bool,
    pub hero_progress: f64,
    pub hero_eased: f64,
    pub text_fade: f64,
    /// `None` when the grid container is absent.
    pub grid_progress: Option<f64>,
    pub mode: ChoreographyMode,
    pub transition: Option<ModeTransition>,
}

// ───────────────────────────────────────── choreographer ─────

/// Owns the choreography config and the grid mode.
#[derive(Debug, Clone, Default)]
pub struct ScrollChoreographer {
    config: ChoreoConfig,
    mode: ChoreographyMode,
}

impl ScrollChoreographer {
    pub fn new(config: ChoreoConfig) -> Self {
        Self {
            config,
            mode: ChoreographyMode::Scrubbing,
        }
    }

    pub fn mode(&self) -> ChoreographyMode {
        self.mode
    }

    pub fn config(&self) -> &ChoreoConfig {
        &self.config
    }

    /// Swap the config.  The current mode is kept; the next tick applies the
    /// new thresholds.
    pub fn set_config(&mut self, config: ChoreoConfig) -> Result<(), ChoreoError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Run all tracks for one sample.
    pub fn tick<T: RenderTarget + ?Sized>(
        &mut self,
        sample: &ViewportSample,
        target: &mut T,
    ) -> TickReport {
        let mut report = TickReport {
            mode: self.mode,
            ..TickReport::default()
        };

        let Some(wrapper) = sample.wrapper else {
            report.skipped = true;
            return report;
        };

        let vh = sample.viewport_height;
        let progress = ratio(-wrapper.top, wrapper.height - vh);
        let eased = ease_out(progress, HERO_EASE_POWER);
        report.hero_progress = progress;
        report.hero_eased = eased;

        if sample.hero.is_some() {
            self.hero_track(eased, target);
        }
        if sample.text.is_some() {
            report.text_fade = self.text_track(progress, target);
        }
        self.line_track(progress, sample.line_count, target);

        if let Some(grid) = sample.grid {
            let grid_progress = ratio(vh - grid.top, vh * self.config.grid_stretch);
            let card_progress = ratio(vh - grid.top, vh * self.config.card_stretch);
            report.grid_progress = Some(grid_progress);
            report.transition =
                self.grid_track(grid_progress, card_progress, sample.card_count, target);
            report.mode = self.mode;
        }

        report
    }

    fn hero_track<T: RenderTarget + ?Sized>(&self, eased: f64, target: &mut T) {
        let scale = (self.config.hero_base_scale - eased * HERO_SHRINK).max(HERO_MIN_SCALE);
        let transform = Transform::scale(scale).with_translate_y(Length::Vh(eased * -HERO_LIFT_VH));
        target.set_transform(ElementId::HeroImage, Some(transform));
    }

    fn text_track<T: RenderTarget + ?Sized>(&self, progress: f64, target: &mut T) -> f64 {
        let start = self.config.text_fade_start;
        let local = ratio(progress - start, 1.0 - start);
        target.set_opacity(ElementId::Greeting, Some(1.0 - local));
        target.set_transform(
            ElementId::Greeting,
            Some(Transform::translate_y(Length::Px(local * -TEXT_LIFT_PX))),
        );
        local
    }

    fn line_track<T: RenderTarget + ?Sized>(&self, progress: f64, count: usize, target: &mut T) {
        for i in 0..count {
            let reveal = line_reveal(progress, i);
            let el = ElementId::Line(i);
            target.set_opacity(el, Some(reveal));
            target.set_transform(
                el,
                Some(Transform::translate_x(Length::Px((1.0 - reveal) * -LINE_SLIDE_PX))),
            );
        }
    }

    /// Scrub (when not playing), then evaluate the mode guards.
    fn grid_track<T: RenderTarget + ?Sized>(
        &mut self,
        grid_progress: f64,
        card_progress: f64,
        card_count: usize,
        target: &mut T,
    ) -> Option<ModeTransition> {
        if self.mode == ChoreographyMode::Scrubbing {
            self.scrub_grid(grid_progress, card_progress, card_count, target);
        }

        match self.mode {
            ChoreographyMode::Scrubbing if grid_progress >= self.config.enter_threshold => {
                self.enter_play(card_count, target);
                tracing::debug!(grid_progress, "grid entrance: scrub → play");
                Some(ModeTransition::Entered)
            }
            ChoreographyMode::Playing if grid_progress < self.config.exit_threshold => {
                self.exit_play(card_count, target);
                tracing::debug!(grid_progress, "grid entrance: play → scrub");
                Some(ModeTransition::Exited)
            }
            _ => None,
        }
    }

    fn scrub_grid<T: RenderTarget + ?Sized>(
        &self,
        grid_progress: f64,
        card_progress: f64,
        card_count: usize,
        target: &mut T,
    ) {
        let eased_grid = ease_out(grid_progress, GRID_EASE_POWER);
        target.set_opacity(ElementId::GridContainer, Some(eased_grid));
        target.set_transform(
            ElementId::GridContainer,
            Some(Transform::translate_y(Length::Px((1.0 - eased_grid) * GRID_LIFT_PX))),
        );
        target.set_pointer_events(ElementId::GridContainer, eased_grid > GRID_POINTER_MIN);

        for i in 0..card_count {
            let stagger = i as f64 * self.config.card_stagger;
            let local = clamp01((card_progress - stagger) / CARD_SPAN);
            let eased_local = ease_in_out_cubic(local);
            let el = ElementId::GridCard(i);
            target.set_opacity(el, Some(eased_local * eased_grid));
            let dy = (1.0 - eased_local) * CARD_LIFT_PX + (1.0 - eased_grid) * CARD_CONTAINER_LIFT_PX;
            target.set_transform(el, Some(Transform::translate_y(Length::Px(dy))));
        }
    }

    fn enter_play<T: RenderTarget + ?Sized>(&mut self, card_count: usize, target: &mut T) {
        self.mode = ChoreographyMode::Playing;
        target.set_opacity(ElementId::GridContainer, None);
        target.set_transform(ElementId::GridContainer, None);
        target.set_pointer_events(ElementId::GridContainer, true);
        for i in 0..card_count {
            let el = ElementId::GridCard(i);
            target.set_opacity(el, None);
            target.set_transform(el, None);
            target.set_animation(
                el,
                Some(AnimationSpec::card_slide_in(
                    i,
                    self.config.entrance_stagger,
                    self.config.entrance_duration,
                )),
            );
        }
    }

    fn exit_play<T: RenderTarget + ?Sized>(&mut self, card_count: usize, target: &mut T) {
        self.mode = ChoreographyMode::Scrubbing;
        for i in 0..card_count {
            let el = ElementId::GridCard(i);
            target.set_animation(el, None);
            target.set_opacity(el, Some(0.0));
            target.set_transform(el, Some(Transform::translate_y(Length::Px(CARD_RESET_PX))));
            target.set_visible(el, false);
        }
        target.set_opacity(ElementId::GridContainer, Some(0.0));
        target.set_transform(
            ElementId::GridContainer,
            Some(Transform::translate_y(Length::Px(GRID_RESET_PX))),
        );
    }
}

/// Reveal amount of line `index` at hero progress `progress`.
pub fn line_reveal(progress: f64, index: usize) -> f64 {
    clamp01((progress - index as f64 * LINE_STAGGER) * LINE_GAIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::ElementRect;
    use crate::core::target::recording::RecordingTarget;

    const VH: f64 = 800.0;
    const WRAPPER_H: f64 = 2000.0;

    /// Sample for a page whose wrapper starts at document top 0 and whose grid
    /// starts at `grid_doc_top`, scrolled by `scroll` px.
    fn sample_at(scroll: f64, grid_doc_top: Option<f64>) -> ViewportSample {
        ViewportSample {
            viewport_width: 1280.0,
            viewport_height: VH,
            wrapper: Some(ElementRect::new(-scroll, WRAPPER_H)),
            hero: Some(ElementRect::new(0.0, 400.0)),
            text: Some(ElementRect::new(420.0, 120.0)),
            grid: grid_doc_top.map(|top| ElementRect::new(top - scroll, 500.0)),
            line_count: 5,
            card_count: 6,
        }
    }

    /// Sample whose grid top is placed so that grid progress equals `p`.
    fn sample_with_grid_progress(p: f64) -> ViewportSample {
        let grid_top = VH - p * VH * ChoreoConfig::default().grid_stretch;
        ViewportSample {
            grid: Some(ElementRect::new(grid_top, 500.0)),
            ..sample_at(1200.0, None)
        }
    }

    fn hysteretic() -> ChoreoConfig {
        ChoreoConfig::default()
    }

    #[test]
    fn hero_scenario_halfway() {
        let mut choreo = ScrollChoreographer::default();
        let mut target = RecordingTarget::default();
        let report = choreo.tick(&sample_at(600.0, None), &mut target);

        assert!((report.hero_progress - 0.5).abs() < 1e-12);
        assert!((report.hero_eased - 0.593_874).abs() < 1e-5);

        let t = target.transform_of(ElementId::HeroImage).unwrap();
        assert!((t.scale - (0.75 - report.hero_eased * 0.4)).abs() < 1e-12);
        assert_eq!(t.translate_y, Length::Vh(report.hero_eased * -8.0));
    }

    #[test]
    fn hero_scale_never_drops_below_floor() {
        let cfg = ChoreoConfig {
            hero_base_scale: 0.5,
            ..ChoreoConfig::default()
        };
        let mut choreo = ScrollChoreographer::new(cfg);
        let mut target = RecordingTarget::default();
        choreo.tick(&sample_at(5000.0, None), &mut target);
        assert_eq!(target.transform_of(ElementId::HeroImage).unwrap().scale, 0.3);
    }

    #[test]
    fn line_reveal_scenario() {
        let expected = [0.9, 0.45, 0.0, 0.0, 0.0];
        for (i, want) in expected.iter().enumerate() {
            assert!((line_reveal(0.3, i) - want).abs() < 1e-9, "line {i}");
        }

        // Same through a full tick: progress 0.3 ⇔ scroll 360 of 1200.
        let mut choreo = ScrollChoreographer::default();
        let mut target = RecordingTarget::default();
        choreo.tick(&sample_at(360.0, None), &mut target);
        for (i, want) in expected.iter().enumerate() {
            let got = target.opacity_of(ElementId::Line(i)).unwrap();
            assert!((got - want).abs() < 1e-9, "line {i}: {got}");
        }
        assert_eq!(
            target.transform_of(ElementId::Line(4)).unwrap().translate_x,
            Length::Px(-20.0)
        );
    }

    #[test]
    fn text_fades_only_in_last_quarter() {
        let mut choreo = ScrollChoreographer::default();
        let mut target = RecordingTarget::default();

        choreo.tick(&sample_at(600.0, None), &mut target);
        assert_eq!(target.opacity_of(ElementId::Greeting), Some(1.0));

        // progress 0.875 → halfway through the fade.
        let report = choreo.tick(&sample_at(1050.0, None), &mut target);
        assert!((report.text_fade - 0.5).abs() < 1e-9);
        assert!((target.opacity_of(ElementId::Greeting).unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(
            target.transform_of(ElementId::Greeting).unwrap().translate_y,
            Length::Px(-16.0)
        );
    }

    #[test]
    fn every_progress_stays_in_unit_range() {
        let mut choreo = ScrollChoreographer::default();
        let mut target = RecordingTarget::default();
        for scroll in (-2000..6000).step_by(37) {
            let report = choreo.tick(&sample_at(scroll as f64, Some(2100.0)), &mut target);
            for v in [report.hero_progress, report.hero_eased, report.text_fade] {
                assert!((0.0..=1.0).contains(&v), "scroll {scroll}: {v}");
            }
            let g = report.grid_progress.unwrap();
            assert!((0.0..=1.0).contains(&g), "scroll {scroll}: grid {g}");
            for (el, o) in &target.opacity {
                if let Some(o) = o {
                    assert!((0.0..=1.0).contains(o), "{el:?} opacity {o}");
                }
            }
        }
    }

    #[test]
    fn hero_and_grid_progress_are_monotonic() {
        let mut choreo = ScrollChoreographer::default();
        let mut target = RecordingTarget::default();
        let (mut hero, mut grid) = (0.0, 0.0);
        for scroll in (0..=1200).step_by(10) {
            let r = choreo.tick(&sample_at(scroll as f64, Some(2100.0)), &mut target);
            let g = r.grid_progress.unwrap();
            assert!(r.hero_progress >= hero && g >= grid);
            hero = r.hero_progress;
            grid = g;
        }
        assert_eq!(hero, 1.0);
    }

    #[test]
    fn zero_scroll_distance_pins_progress_to_zero() {
        let mut choreo = ScrollChoreographer::default();
        let mut target = RecordingTarget::default();
        let sample = ViewportSample {
            wrapper: Some(ElementRect::new(-100.0, VH)),
            ..sample_at(0.0, None)
        };
        let report = choreo.tick(&sample, &mut target);
        assert_eq!(report.hero_progress, 0.0);
        let t = target.transform_of(ElementId::HeroImage).unwrap();
        assert!(t.scale.is_finite());
        assert_eq!(t.scale, 0.75);

        let zero_vh = ViewportSample {
            viewport_height: 0.0,
            ..sample_with_grid_progress(0.5)
        };
        let report = choreo.tick(&zero_vh, &mut target);
        assert_eq!(report.grid_progress, Some(0.0));
        assert!(target.opacity.values().flatten().all(|o| o.is_finite()));
    }

    #[test]
    fn missing_wrapper_is_a_noop() {
        let mut choreo = ScrollChoreographer::default();
        let mut target = RecordingTarget::default();
        let sample = ViewportSample {
            wrapper: None,
            ..sample_at(600.0, Some(900.0))
        };
        let report = choreo.tick(&sample, &mut target);
        assert!(report.skipped);
        assert!(target.writes.is_empty());
    }

    #[test]
    fn missing_grid_still_runs_other_tracks() {
        let mut choreo = ScrollChoreographer::default();
        let mut target = RecordingTarget::default();
        let report = choreo.tick(&sample_at(360.0, None), &mut target);

        assert_eq!(report.grid_progress, None);
        assert!(target.touched(ElementId::HeroImage));
        assert!(target.touched(ElementId::Greeting));
        assert!(target.touched(ElementId::Line(0)));
        assert!(!target.touched(ElementId::GridContainer));
        assert!(!target.touched(ElementId::GridCard(0)));
    }

    #[test]
    fn missing_hero_and_text_skip_only_their_tracks() {
        let mut choreo = ScrollChoreographer::default();
        let mut target = RecordingTarget::default();
        let sample = ViewportSample {
            hero: None,
            text: None,
            ..sample_at(360.0, Some(1000.0))
        };
        choreo.tick(&sample, &mut target);
        assert!(!target.touched(ElementId::HeroImage));
        assert!(!target.touched(ElementId::Greeting));
        assert!(target.touched(ElementId::Line(1)));
        assert!(target.touched(ElementId::GridContainer));
    }

    #[test]
    fn scrubbing_writes_container_and_cards() {
        let mut choreo = ScrollChoreographer::default();
        let mut target = RecordingTarget::default();
        let report = choreo.tick(&sample_with_grid_progress(0.1), &mut target);
        assert_eq!(report.mode, ChoreographyMode::Scrubbing);

        let eased = ease_out(0.1, 2.2);
        let opacity = target.opacity_of(ElementId::GridContainer).unwrap();
        assert!((opacity - eased).abs() < 1e-9);
        assert_eq!(target.pointer_events[&ElementId::GridContainer], eased > 0.05);
        // Card 5 lags card 0 by the stagger.
        let first = target.opacity_of(ElementId::GridCard(0)).unwrap();
        let last = target.opacity_of(ElementId::GridCard(5)).unwrap();
        assert!(first >= last);
    }

    #[test]
    fn card_scrub_follows_stretch_stagger_and_span() {
        // A high band keeps the grid scrubbing deep into its entrance.
        let config = ChoreoConfig::default().with_thresholds(0.95, 0.9).unwrap();
        let mut choreo = ScrollChoreographer::new(config);
        let mut target = RecordingTarget::default();
        let sample = ViewportSample {
            grid: Some(ElementRect::new(200.0, 500.0)),
            ..sample_at(1200.0, None)
        };
        let report = choreo.tick(&sample, &mut target);
        assert_eq!(report.mode, ChoreographyMode::Scrubbing);
        assert!((report.grid_progress.unwrap() - 0.535_714_285_714).abs() < 1e-9);

        // card progress 600 / 840; card 0 local 0.7937, card 5 local 0.4603.
        let cases = [
            (0, 0.786_456_771_688, 2.182_076_501_448),
            (5, 0.318_013_325_177, 13.676_155_614_575),
        ];
        for (i, opacity, dy) in cases {
            let el = ElementId::GridCard(i);
            let got = target.opacity_of(el).unwrap();
            assert!((got - opacity).abs() < 1e-9, "card {i} opacity {got}");
            let got = target.transform_of(el).unwrap().dy(VH);
            assert!((got - dy).abs() < 1e-9, "card {i} translateY {got}");
        }
    }

    #[test]
    fn crossing_enter_threshold_starts_play() {
        let mut choreo = ScrollChoreographer::default();
        let mut target = RecordingTarget::default();
        let report = choreo.tick(&sample_with_grid_progress(0.2), &mut target);

        assert_eq!(report.transition, Some(ModeTransition::Entered));
        assert_eq!(choreo.mode(), ChoreographyMode::Playing);
        assert_eq!(target.opacity_of(ElementId::GridContainer), None);
        assert_eq!(target.transform_of(ElementId::GridContainer), None);
        assert!(target.pointer_events[&ElementId::GridContainer]);
        for i in 0..6 {
            let anim = target.animation_of(ElementId::GridCard(i)).unwrap();
            assert_eq!(anim.name, "cardSlideIn");
            assert_eq!(anim.delay, Duration::from_millis(60) * i as u32);
            assert_eq!(anim.duration, Duration::from_millis(900));
            assert_eq!(target.opacity_of(ElementId::GridCard(i)), None);
        }
    }

    #[test]
    fn playing_does_not_scrub() {
        let mut choreo = ScrollChoreographer::default();
        let mut target = RecordingTarget::default();
        choreo.tick(&sample_with_grid_progress(0.5), &mut target);
        target.clear_log();

        choreo.tick(&sample_with_grid_progress(0.7), &mut target);
        assert!(!target.touched(ElementId::GridContainer));
        assert!(!target.touched(ElementId::GridCard(0)));
    }

    #[test]
    fn hysteresis_band_holds_play_mode() {
        let mut choreo = ScrollChoreographer::new(hysteretic());
        let mut target = RecordingTarget::default();
        choreo.tick(&sample_with_grid_progress(0.15), &mut target);
        assert_eq!(choreo.mode(), ChoreographyMode::Playing);

        for p in [0.13, 0.09, 0.12, 0.081, 0.5, 0.1, 0.999] {
            let r = choreo.tick(&sample_with_grid_progress(p), &mut target);
            assert_eq!(r.mode, ChoreographyMode::Playing, "flickered at {p}");
            assert_eq!(r.transition, None);
        }

        let r = choreo.tick(&sample_with_grid_progress(0.05), &mut target);
        assert_eq!(r.transition, Some(ModeTransition::Exited));
        // Back inside the band while scrubbing: no re-entry until 0.14.
        let r = choreo.tick(&sample_with_grid_progress(0.12), &mut target);
        assert_eq!(r.mode, ChoreographyMode::Scrubbing);
    }

    #[test]
    fn default_band_absorbs_jitter_at_enter_threshold() {
        let mut choreo = ScrollChoreographer::default();
        let mut target = RecordingTarget::default();
        let transitions = (0..10)
            .map(|i| if i % 2 == 0 { 0.1401 } else { 0.1399 })
            .filter_map(|p| choreo.tick(&sample_with_grid_progress(p), &mut target).transition)
            .count();
        assert_eq!(transitions, 1);
        assert_eq!(choreo.mode(), ChoreographyMode::Playing);
    }

    #[test]
    fn exit_resets_pre_entrance_styles() {
        let mut choreo = ScrollChoreographer::new(hysteretic());
        let mut target = RecordingTarget::default();
        choreo.tick(&sample_with_grid_progress(0.3), &mut target);
        target.clear_log();

        // Progress 0 sits below exit; the reset is the last thing written.
        choreo.tick(&sample_with_grid_progress(0.0), &mut target);
        assert_eq!(choreo.mode(), ChoreographyMode::Scrubbing);
        for i in 0..6 {
            let el = ElementId::GridCard(i);
            assert_eq!(target.animation_of(el), None);
            assert_eq!(target.opacity_of(el), Some(0.0));
            assert_eq!(
                target.transform_of(el),
                Some(Transform::translate_y(Length::Px(12.0)))
            );
            assert!(!target.visible[&el]);
        }
        assert_eq!(target.opacity_of(ElementId::GridContainer), Some(0.0));
        assert_eq!(
            target.transform_of(ElementId::GridContainer),
            Some(Transform::translate_y(Length::Px(16.0)))
        );
    }

    #[test]
    fn replay_reproduces_stagger() {
        let mut choreo = ScrollChoreographer::new(hysteretic());
        let mut target = RecordingTarget::default();

        choreo.tick(&sample_with_grid_progress(0.4), &mut target);
        let first: Vec<_> = (0..6)
            .map(|i| target.animation_of(ElementId::GridCard(i)))
            .collect();

        choreo.tick(&sample_with_grid_progress(0.02), &mut target);
        choreo.tick(&sample_with_grid_progress(0.4), &mut target);
        let second: Vec<_> = (0..6)
            .map(|i| target.animation_of(ElementId::GridCard(i)))
            .collect();

        assert_eq!(first, second);
        assert!(first.iter().all(Option::is_some));
    }

    #[test]
    fn tick_is_idempotent() {
        let mut choreo = ScrollChoreographer::default();
        let sample = sample_at(480.0, Some(1500.0));

        let mut a = RecordingTarget::default();
        choreo.tick(&sample, &mut a);
        let mut b = RecordingTarget::default();
        choreo.tick(&sample, &mut b);
        assert_eq!(a.writes, b.writes);
    }

    #[test]
    fn config_rejects_inverted_band() {
        let err = ChoreoConfig::default().with_thresholds(0.1, 0.2).unwrap_err();
        assert_eq!(err, ChoreoError::InvertedHysteresis { enter: 0.1, exit: 0.2 });
        assert!(ChoreoConfig::default().with_thresholds(1.2, 0.1).is_err());

        let mut choreo = ScrollChoreographer::default();
        let bad = ChoreoConfig {
            grid_stretch: 0.0,
            ..ChoreoConfig::default()
        };
        assert!(matches!(
            choreo.set_config(bad),
            Err(ChoreoError::InvalidStretch { name: "grid_stretch", .. })
        ));
        assert_eq!(choreo.config().grid_stretch, 1.4);
    }
}
