//! A terminal rendition of a scroll-choreographed smart-panel landing page.
//!
//! Scrolling shrinks the hero, fades the greeting, reveals the intro lines
//! and brings in the dashboard grid, which switches to a staggered entrance
//! animation once it is far enough into view.

mod app;
mod config;
mod core;
mod page;
mod ui;

use std::io::{self, stderr};
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::Paragraph, Frame, Terminal};

use crate::app::{
    event::{spawn_input_reader, AppEvent},
    handler,
    state::{ActiveView, AppState, LaunchOptions},
};
use crate::config::ConfigOverrides;
use crate::page::layout::PageOptions;
use crate::ui::{
    indicator::PlayIndicator, layout::AppLayout, page_view::PageView, popup::SettingsPopup,
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Scroll-choreographed smart panel")]
struct Cli {
    /// CSS pixels represented by one terminal row.
    #[arg(long, default_value_t = 16.0)]
    px_per_row: f64,

    /// Run the choreography on every scroll event instead of once per frame.
    #[arg(long)]
    unthrottled: bool,

    /// Behave as if intersection observation were unavailable: every loose
    /// card is shown immediately.
    #[arg(long)]
    no_observer: bool,

    /// Seed for the generated sample data.
    #[arg(long)]
    seed: Option<u64>,

    /// Grid progress at which the card entrance plays (0..=1).
    #[arg(long)]
    enter: Option<f64>,

    /// Grid progress below which the card entrance rewinds (0..=1).
    #[arg(long)]
    exit: Option<f64>,

    /// Leave out the dashboard grid.
    #[arg(long)]
    no_grid: bool,
}

// ───────────────────────────────────────── drawing ───────────

fn draw(frame: &mut Frame, state: &AppState, now: Instant) {
    let layout = AppLayout::from_area(frame.area());

    frame.render_widget(
        PageView {
            layout: &state.layout,
            styles: &state.styles,
            ctx: state.style_context(now),
            scroll: state.scroll(),
            px_per_row: state.px_per_row,
            grid_cards: &state.grid_cards,
            loose_cards: &state.loose_cards,
        },
        layout.page_area,
    );
    frame.render_widget(
        PlayIndicator {
            visible: state.is_playing_entrance(now),
            frame: state.frame,
        },
        layout.page_area,
    );

    let status_text = match state.active_view {
        ActiveView::Page => state.status_line(),
        ActiveView::SettingsMenu => " ↑/↓: select | enter: change | esc: close".to_string(),
    };
    frame.render_widget(
        Paragraph::new(status_text).style(Theme::status_bar_style()),
        layout.status_area,
    );

    if state.active_view == ActiveView::SettingsMenu {
        frame.render_widget(SettingsPopup { state }, frame.area());
    }
}

fn apply_event(state: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::Key(k) => handler::handle_key(state, k),
        AppEvent::Scroll(notches) => handler::handle_wheel(state, notches),
        AppEvent::Resize(cols, rows) => state.resize(cols, rows.saturating_sub(1)),
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only emits when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    let stored_config = config::AppConfig::load();
    let overrides = ConfigOverrides {
        enter_threshold: cli.enter,
        exit_threshold: cli.exit,
        frame_aligned: cli.unthrottled.then_some(false),
    };
    // Reject bad overrides before touching the terminal.
    overrides.apply(&stored_config).choreo_config()?;
    if !(cli.px_per_row.is_finite() && cli.px_per_row > 0.0) {
        bail!("--px-per-row must be a positive number, got {}", cli.px_per_row);
    }

    let launch = LaunchOptions {
        page: PageOptions {
            with_grid: !cli.no_grid,
            ..PageOptions::default()
        },
        px_per_row: cli.px_per_row,
        observer: !cli.no_observer,
        seed: cli.seed,
        overrides,
    };
    let (cols, rows) = crossterm::terminal::size()?;
    let mut state = AppState::new(stored_config, launch, cols, rows.saturating_sub(1), Instant::now());
    state.config_file = Some(config::config_path());
    tracing::info!(
        cols,
        rows,
        aligned = state.scheduler.is_aligned(),
        "starting smart panel"
    );

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    // ── async sources ─────────────────────────────────────────
    let mut events = spawn_input_reader();

    // ── event loop ────────────────────────────────────────────
    let mut dirty = true;
    loop {
        if dirty {
            let now = Instant::now();
            terminal.draw(|frame| draw(frame, &state, now))?;
            dirty = false;
        }

        // Sleep until the next frame only while something is in motion.
        let wake = state.next_wake(Instant::now());
        let frame_due = async {
            match wake {
                Some(at) => tokio::time::sleep_until(at.into()).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            Some(event) = events.recv() => {
                apply_event(&mut state, event);
                // Drain whatever else is queued so a burst of wheel notches
                // costs one choreography tick.
                while let Ok(event) = events.try_recv() {
                    apply_event(&mut state, event);
                }
                state.flush(Instant::now());
                dirty = true;
            }

            _ = frame_due => {
                dirty |= state.on_frame(Instant::now());
            }
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    tracing::debug!(
        ticks = state.ticks,
        coalesced = state.scheduler.coalesced(),
        "session finished"
    );
    Ok(())
}
