//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::path::PathBuf;
use std::time::Instant;

use crate::config::{AppConfig, ConfigOverrides};
use crate::core::choreo::{ChoreographyMode, ModeTransition, ScrollChoreographer, TickReport};
use crate::core::frame::FrameScheduler;
use crate::core::visibility::{IntersectionVisibilityToggler, DEFAULT_THRESHOLD};
use crate::page::data::{self, DashboardCard};
use crate::page::layout::{PageLayout, PageOptions};
use crate::page::styles::{PageStyles, StyleContext};
use crate::ui::smooth_scroll::SmoothScroll;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Page,
    SettingsMenu,
}

/// Start-up choices that come from the command line rather than the config.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub page: PageOptions,
    /// CSS pixels represented by one terminal row.
    pub px_per_row: f64,
    /// When `false`, loose cards use the show-everything fallback.
    pub observer: bool,
    pub seed: Option<u64>,
    pub overrides: ConfigOverrides,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            page: PageOptions::default(),
            px_per_row: 16.0,
            observer: true,
            seed: None,
            overrides: ConfigOverrides::default(),
        }
    }
}

/// Top-level application state.
pub struct AppState {
    /// Effective config: the stored one plus command-line overrides.
    pub config: AppConfig,
    /// What the config file holds; the only copy that is ever saved.
    stored_config: AppConfig,
    /// Where settings changes are persisted.  `None` keeps them in memory.
    pub config_file: Option<PathBuf>,
    pub layout: PageLayout,
    /// Inline style / animation state written by the choreography.
    pub styles: PageStyles,
    pub choreo: ScrollChoreographer,
    pub toggler: IntersectionVisibilityToggler,
    pub scheduler: FrameScheduler,
    pub smooth: SmoothScroll,
    pub grid_cards: Vec<DashboardCard>,
    pub loose_cards: Vec<DashboardCard>,
    pub px_per_row: f64,
    /// Result of the most recent choreography tick.
    pub last_report: TickReport,
    /// Number of choreography ticks that actually ran.
    pub ticks: u64,
    /// Monotonic frame counter (drives the play spinner).
    pub frame: u64,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    /// Currently highlighted item in the settings menu.
    pub settings_selected: usize,
}

impl AppState {
    /// Build the page for a `cols` × `rows` viewport (status bar excluded).
    pub fn new(stored: AppConfig, launch: LaunchOptions, cols: u16, rows: u16, now: Instant) -> Self {
        let config = launch.overrides.apply(&stored);
        let px_per_row = if launch.px_per_row.is_finite() && launch.px_per_row > 0.0 {
            launch.px_per_row
        } else {
            LaunchOptions::default().px_per_row
        };
        let (vw, vh) = viewport_px(cols, rows, px_per_row);
        let layout = PageLayout::new(launch.page, vw, vh);

        let choreo = match config.choreo_config() {
            Ok(c) => ScrollChoreographer::new(c),
            Err(err) => {
                tracing::warn!(%err, "invalid choreography settings, using defaults");
                ScrollChoreographer::default()
            }
        };
        let toggler = if launch.observer {
            IntersectionVisibilityToggler::new(DEFAULT_THRESHOLD)
        } else {
            IntersectionVisibilityToggler::unsupported()
        };
        let mut scheduler = FrameScheduler::new(config.frame_interval(), config.frame_aligned);
        // The first frame establishes the initial styles.
        scheduler.request();

        let mut rng = data::session_rng(launch.seed);
        let mut grid_cards = data::grid_cards(&mut rng);
        grid_cards.truncate(layout.grid_cards.len());
        let mut loose_cards = data::loose_cards();
        loose_cards.truncate(layout.loose_cards.len());

        Self {
            smooth: SmoothScroll::new(config.smooth_speed),
            config,
            stored_config: stored,
            config_file: None,
            layout,
            styles: PageStyles::new(now),
            choreo,
            toggler,
            scheduler,
            grid_cards,
            loose_cards,
            px_per_row,
            last_report: TickReport::default(),
            ticks: 0,
            frame: 0,
            should_quit: false,
            status_message: None,
            active_view: ActiveView::default(),
            settings_selected: 0,
        }
    }

    /// Displayed scroll offset in px.
    pub fn scroll(&self) -> f64 {
        self.smooth.offset()
    }

    pub fn scroll_by(&mut self, delta_px: f64) {
        let target = self.layout.clamp_scroll(self.smooth.target() + delta_px);
        self.scroll_to(target);
    }

    pub fn scroll_to(&mut self, offset_px: f64) {
        let target = self.layout.clamp_scroll(offset_px);
        self.smooth.set_target(target);
        // First step of the glide happens with the input itself.
        if self.smooth.tick() {
            self.scheduler.request();
        }
    }

    /// One viewport height of scrolling, keeping a small overlap.
    pub fn page_px(&self) -> f64 {
        self.layout.viewport_height * 0.9
    }

    /// Rebuild geometry for a new viewport, keeping the relative position.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let fraction = match self.layout.max_scroll() {
            max if max > 0.0 => self.smooth.target() / max,
            _ => 0.0,
        };
        let (vw, vh) = viewport_px(cols, rows, self.px_per_row);
        if vw == self.layout.viewport_width && vh == self.layout.viewport_height {
            return;
        }
        self.layout = PageLayout::new(self.layout.options.clone(), vw, vh);
        let offset = self.layout.clamp_scroll(fraction * self.layout.max_scroll());
        self.smooth.jump_to(offset);
        self.scheduler.request();
        tracing::debug!(vw, vh, offset, "viewport resized");
    }

    /// Per-frame housekeeping: advance the glide, then flush pending work.
    /// Returns `true` when the page needs repainting.
    pub fn on_frame(&mut self, now: Instant) -> bool {
        self.frame = self.frame.wrapping_add(1);
        let moved = self.smooth.tick();
        if moved {
            self.scheduler.request();
        }
        let ticked = self.flush(now);
        moved || ticked || self.is_playing_entrance(now)
    }

    /// Run the choreography if the scheduler allows it.  Returns `true` when
    /// a tick ran.
    pub fn flush(&mut self, now: Instant) -> bool {
        if !self.scheduler.poll(now) {
            return false;
        }
        self.run_choreography(now);
        true
    }

    fn run_choreography(&mut self, now: Instant) {
        self.styles.set_now(now);
        let scroll = self.scroll();
        let sample = self.layout.sample(scroll);
        let report = self.choreo.tick(&sample, &mut self.styles);
        self.toggler.observe(
            &self.layout.observed_cards(scroll),
            self.layout.viewport_height,
            &mut self.styles,
        );

        match report.transition {
            Some(ModeTransition::Entered) => {
                self.status_message = Some("Cards playing".into());
            }
            Some(ModeTransition::Exited) => {
                self.status_message = Some("Cards rewound".into());
            }
            None => {}
        }

        self.last_report = report;
        self.ticks += 1;
    }

    /// Cascade inputs for rendering at `now`.
    pub fn style_context(&self, now: Instant) -> StyleContext {
        StyleContext {
            now,
            viewport_height: self.layout.viewport_height,
            grid_playing: self.choreo.mode() == ChoreographyMode::Playing,
        }
    }

    /// `true` while any card entrance animation is still running.
    pub fn is_playing_entrance(&self, now: Instant) -> bool {
        self.choreo.mode() == ChoreographyMode::Playing && self.styles.is_animating(now)
    }

    /// When the loop should next call [`Self::on_frame`]; `None` while the
    /// page is at rest.
    pub fn next_wake(&self, now: Instant) -> Option<Instant> {
        let moving = self.smooth.is_animating() || self.is_playing_entrance(now);
        let frame = moving.then(|| now + self.scheduler.interval());
        match (frame, self.scheduler.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn stored_config(&self) -> &AppConfig {
        &self.stored_config
    }

    /// Apply a settings edit to both the running and the stored config, then
    /// push it into the live components and persist the stored copy.
    pub fn update_config(&mut self, edit: impl Fn(&mut AppConfig)) {
        edit(&mut self.config);
        edit(&mut self.stored_config);
        // An override may have let the edit invert the stored band.
        let stored = &mut self.stored_config;
        if stored.exit_threshold > stored.enter_threshold {
            stored.exit_threshold = stored.enter_threshold;
        }
        self.commit_config();
    }

    fn commit_config(&mut self) {
        let checked = self
            .config
            .choreo_config()
            .and_then(|c| self.choreo.set_config(c));
        if let Err(err) = checked {
            self.status_message = Some(format!("Rejected: {err}"));
            return;
        }
        self.scheduler.set_aligned(self.config.frame_aligned);
        self.smooth.set_speed(self.config.smooth_speed);
        self.scheduler.request();

        let Some(path) = &self.config_file else {
            return;
        };
        if let Err(err) = self.stored_config.save_to(path) {
            tracing::warn!(%err, "failed to save config");
            self.status_message = Some(format!("Config not saved: {err}"));
        }
    }

    /// Text for the bottom bar.
    pub fn status_line(&self) -> String {
        if let Some(msg) = &self.status_message {
            return msg.clone();
        }
        let r = &self.last_report;
        let grid = match r.grid_progress {
            Some(p) => format!("{:>3.0}%", p * 100.0),
            None => "  - ".into(),
        };
        let band = self.choreo.config();
        format!(
            " hero {:>3.0}% | fade {:>3.0}% | grid {} {} [{:.0}/{:.0}] | {}",
            r.hero_progress * 100.0,
            r.text_fade * 100.0,
            grid,
            r.mode.label(),
            band.enter_threshold * 100.0,
            band.exit_threshold * 100.0,
            self.config.status_bar_hint(),
        )
    }
}

/// Terminal cells → viewport size in CSS pixels.  A cell is half as wide as
/// it is tall.
fn viewport_px(cols: u16, rows: u16, px_per_row: f64) -> (f64, f64) {
    let rows = rows.max(1) as f64;
    let cols = cols.max(1) as f64;
    (cols * px_per_row / 2.0, rows * px_per_row)
}
