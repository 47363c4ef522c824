//! Input handling: maps key and wheel events to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::Action;

use super::settings::{SettingsItem, SETTINGS_ITEMS};
use super::state::{ActiveView, AppState};

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Page => handle_page_key(state, key),
        ActiveView::SettingsMenu => handle_settings_key(state, key),
    }
}

/// Mouse-wheel notches; positive scrolls down.  Ignored under the popup.
pub fn handle_wheel(state: &mut AppState, notches: i32) {
    if state.active_view != ActiveView::Page {
        return;
    }
    state.scroll_by(notches as f64 * state.config.scroll_step_px);
}

// ── Page view (configurable bindings) ───────────────────────────

fn handle_page_key(state: &mut AppState, key: KeyEvent) {
    let Some(action) = state.config.match_key(key) else {
        return;
    };
    // Any deliberate input dismisses a stale status message.
    state.status_message = None;

    let step = state.config.scroll_step_px;
    match action {
        Action::ScrollUp => state.scroll_by(-step),
        Action::ScrollDown => state.scroll_by(step),
        Action::PageUp => state.scroll_by(-state.page_px()),
        Action::PageDown => state.scroll_by(state.page_px()),
        Action::Top => state.scroll_to(0.0),
        Action::Bottom => state.scroll_to(state.layout.max_scroll()),
        Action::OpenSettings => {
            state.active_view = ActiveView::SettingsMenu;
            state.settings_selected = 0;
        }
        Action::Quit => state.should_quit = true,
    }
}

// ── Settings popup (hardcoded navigation) ───────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            state.active_view = ActiveView::Page;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.settings_selected = state.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.settings_selected + 1 < SETTINGS_ITEMS.len() {
                state.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            if let Some(item) = SETTINGS_ITEMS.get(state.settings_selected) {
                match item {
                    SettingsItem::Toggle { get, set, .. } => {
                        let current = get(state);
                        set(state, !current);
                    }
                    SettingsItem::Cycle { cycle, .. } => {
                        cycle(state);
                    }
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::LaunchOptions;
    use crate::config::AppConfig;
    use crossterm::event::KeyEventKind;
    use std::time::Instant;

    fn state() -> AppState {
        let mut config = AppConfig::default();
        config.smooth_speed = 1.0;
        AppState::new(config, LaunchOptions::default(), 80, 30, Instant::now())
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    #[test]
    fn arrow_keys_scroll_by_step() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Down));
        handle_key(&mut s, press(KeyCode::Char('j')));
        assert_eq!(s.scroll(), 2.0 * s.config.scroll_step_px);
        handle_key(&mut s, press(KeyCode::Up));
        assert_eq!(s.scroll(), s.config.scroll_step_px);
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Up));
        assert_eq!(s.scroll(), 0.0);
        handle_key(&mut s, press(KeyCode::End));
        assert_eq!(s.scroll(), s.layout.max_scroll());
        handle_key(&mut s, press(KeyCode::PageDown));
        assert_eq!(s.scroll(), s.layout.max_scroll());
        handle_key(&mut s, press(KeyCode::Home));
        assert_eq!(s.scroll(), 0.0);
    }

    #[test]
    fn wheel_scrolls_only_on_page() {
        let mut s = state();
        handle_wheel(&mut s, 2);
        assert_eq!(s.scroll(), 2.0 * s.config.scroll_step_px);

        handle_key(&mut s, press(KeyCode::Char('?')));
        assert_eq!(s.active_view, ActiveView::SettingsMenu);
        handle_wheel(&mut s, 5);
        assert_eq!(s.scroll(), 2.0 * s.config.scroll_step_px);
    }

    #[test]
    fn settings_navigation_is_bounded() {
        let mut s = state();
        s.active_view = ActiveView::SettingsMenu;
        handle_key(&mut s, press(KeyCode::Up));
        assert_eq!(s.settings_selected, 0);
        for _ in 0..SETTINGS_ITEMS.len() + 3 {
            handle_key(&mut s, press(KeyCode::Down));
        }
        assert_eq!(s.settings_selected, SETTINGS_ITEMS.len() - 1);
        handle_key(&mut s, press(KeyCode::Esc));
        assert_eq!(s.active_view, ActiveView::Page);
    }

    #[test]
    fn ctrl_c_quits_from_any_view() {
        let mut s = state();
        s.active_view = ActiveView::SettingsMenu;
        handle_key(&mut s, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(s.should_quit);
    }

    #[test]
    fn quit_binding() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('q')));
        assert!(s.should_quit);
    }
}
