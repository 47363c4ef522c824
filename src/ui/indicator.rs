//! Play-mode indicator: a small spinner + label rendered in the top-right
//! corner of the page viewport while the card entrance is running.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use crate::ui::theme::Theme;

/// Braille-dot spinner frames.  Cycles through these on each frame.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Shown while the staggered entrance is still animating.
pub struct PlayIndicator {
    pub visible: bool,
    /// Monotonic frame counter (drives the spinner).
    pub frame: u64,
}

impl Widget for PlayIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.visible || area.width < 16 || area.height == 0 {
            return;
        }

        let glyph = SPINNER_FRAMES[(self.frame as usize) % SPINNER_FRAMES.len()];
        let label = format!(" {glyph} playing ");
        let label_width = label.chars().count() as u16;
        let x = area.x + area.width.saturating_sub(label_width + 1);

        let line = Line::from(Span::styled(label, Theme::playing_style()));
        buf.set_line(x, area.y, &line, label_width);
    }
}
