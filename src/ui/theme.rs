//! Colour palette and text styles used across the UI.
//!
//! Colours are plain RGB triples so they can be blended toward the page
//! background to emulate CSS opacity on a terminal.

use ratatui::style::{Color, Modifier, Style};

pub type Rgb = (u8, u8, u8);

/// Central theme; change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    pub const BACKGROUND: Rgb = (0x0f, 0x17, 0x2a);
    pub const TEXT: Rgb = (0xe6, 0xed, 0xf5);
    pub const MUTED: Rgb = (0x93, 0xa4, 0xb8);
    pub const ACCENT_GREEN: Rgb = (0x16, 0xa0, 0x85);
    pub const ACCENT_ORANGE: Rgb = (0xff, 0x8a, 0x3d);
    pub const ACCENT_BLUE: Rgb = (0x2b, 0x6c, 0xb0);
    pub const SOLAR: Rgb = (0xff, 0xc1, 0x07);

    /// Series colours, cycled per data point or per share.
    pub const SERIES: [Rgb; 4] = [
        Self::ACCENT_GREEN,
        Self::ACCENT_ORANGE,
        Self::ACCENT_BLUE,
        (0x6b, 0x72, 0x80),
    ];

    /// Blend `rgb` toward the background: `opacity` 0 is invisible, 1 is the
    /// colour itself.
    pub fn fade(rgb: Rgb, opacity: f64) -> Color {
        let a = opacity.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (bg as f64 + (fg as f64 - bg as f64) * a).round() as u8;
        let (bg_r, bg_g, bg_b) = Self::BACKGROUND;
        Color::Rgb(mix(rgb.0, bg_r), mix(rgb.1, bg_g), mix(rgb.2, bg_b))
    }

    /// Heat colour for a 0–100 pad reading.
    pub fn heat(value: u8, opacity: f64) -> Color {
        let t = value.min(100) as f64 / 100.0;
        let (lo, hi) = (Self::ACCENT_BLUE, Self::ACCENT_ORANGE);
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Self::fade((lerp(lo.0, hi.0), lerp(lo.1, hi.1), lerp(lo.2, hi.2)), opacity)
    }

    // ── page ───────────────────────────────────────────────────
    pub fn page_style() -> Style {
        let (r, g, b) = Self::BACKGROUND;
        Style::default().bg(Color::Rgb(r, g, b))
    }

    pub fn text(opacity: f64) -> Style {
        Style::default().fg(Self::fade(Self::TEXT, opacity))
    }

    pub fn heading(opacity: f64) -> Style {
        Self::text(opacity).add_modifier(Modifier::BOLD)
    }

    pub fn card_border(opacity: f64) -> Style {
        Style::default().fg(Self::fade(Self::MUTED, opacity))
    }

    pub fn card_title(opacity: f64) -> Style {
        Style::default()
            .fg(Self::fade(Self::ACCENT_GREEN, opacity))
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn playing_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }
}
