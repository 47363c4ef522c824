//! Settings menu model (data only).
//!
//! Keeping these definitions outside the input handler lets both the handler
//! and UI renderers consume the same source of truth without cross-importing.

use super::state::AppState;

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Boolean toggle; reads/writes via accessors on `AppState`.
    Toggle {
        label: &'static str,
        get: fn(&AppState) -> bool,
        set: fn(&mut AppState, bool),
    },
    /// Cycles through a finite set of values.
    Cycle {
        label: &'static str,
        value: fn(&AppState) -> String,
        cycle: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Toggle { label, .. } | Self::Cycle { label, .. } => label,
        }
    }
}

const ENTER_THRESHOLDS: &[f64] = &[0.08, 0.1, 0.14, 0.2, 0.3, 0.5];
const EXIT_THRESHOLDS: &[f64] = &[0.02, 0.05, 0.08, 0.1, 0.14, 0.2];
const GRID_STRETCHES: &[f64] = &[1.0, 1.2, 1.4, 1.8, 2.4];
const SCROLL_STEPS: &[f64] = &[20.0, 40.0, 60.0, 120.0, 240.0];
const SMOOTH_SPEEDS: &[f64] = &[1.0, 0.2, 0.35, 0.5];

/// Entry after `current` in `values`, wrapping.  Unknown values restart at
/// the first entry.
fn next_in(values: &[f64], current: f64) -> f64 {
    let next = values
        .iter()
        .position(|v| (v - current).abs() < 1e-9)
        .map_or(0, |i| (i + 1) % values.len());
    values[next]
}

fn percent(v: f64) -> String {
    format!("{:.0}%", v * 100.0)
}

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Toggle {
        label: "Frame-aligned Ticks",
        get: |s| s.config.frame_aligned,
        set: |s, v| {
            s.status_message = Some(if v { "Ticks: once per frame" } else { "Ticks: every scroll event" }.into());
            s.update_config(|c| c.frame_aligned = v);
        },
    },
    SettingsItem::Cycle {
        label: "Play Threshold",
        value: |s| percent(s.config.enter_threshold),
        cycle: |s| {
            let enter = next_in(ENTER_THRESHOLDS, s.config.enter_threshold);
            s.status_message = Some(format!("Play at {}", percent(enter)));
            s.update_config(|c| {
                c.enter_threshold = enter;
                // Keep the hysteresis band valid.
                c.exit_threshold = c.exit_threshold.min(enter);
            });
        },
    },
    SettingsItem::Cycle {
        label: "Rewind Threshold",
        value: |s| percent(s.config.exit_threshold),
        cycle: |s| {
            let enter = s.config.enter_threshold;
            let mut next = next_in(EXIT_THRESHOLDS, s.config.exit_threshold);
            // Skip values above the play threshold.
            for _ in 0..EXIT_THRESHOLDS.len() {
                if next <= enter {
                    break;
                }
                next = next_in(EXIT_THRESHOLDS, next);
            }
            let exit = next.min(enter);
            s.status_message = Some(format!("Rewind below {}", percent(exit)));
            s.update_config(|c| c.exit_threshold = exit);
        },
    },
    SettingsItem::Cycle {
        label: "Grid Stretch",
        value: |s| format!("{:.1}×", s.config.grid_stretch),
        cycle: |s| {
            let stretch = next_in(GRID_STRETCHES, s.config.grid_stretch);
            s.status_message = Some(format!("Grid stretch: {stretch:.1}×"));
            s.update_config(|c| c.grid_stretch = stretch);
        },
    },
    SettingsItem::Cycle {
        label: "Scroll Step",
        value: |s| format!("{:.0}px", s.config.scroll_step_px),
        cycle: |s| {
            let step = next_in(SCROLL_STEPS, s.config.scroll_step_px);
            s.status_message = Some(format!("Scroll step: {step:.0}px"));
            s.update_config(|c| c.scroll_step_px = step);
        },
    },
    SettingsItem::Cycle {
        label: "Smooth Scroll",
        value: |s| {
            if s.config.smooth_speed >= 1.0 {
                "off".into()
            } else {
                format!("{:.2}", s.config.smooth_speed)
            }
        },
        cycle: |s| {
            let speed = next_in(SMOOTH_SPEEDS, s.config.smooth_speed);
            s.update_config(|c| c.smooth_speed = speed);
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::LaunchOptions;
    use crate::config::{AppConfig, ConfigOverrides};
    use std::time::Instant;

    fn overridden_state() -> AppState {
        let launch = LaunchOptions {
            overrides: ConfigOverrides {
                enter_threshold: Some(0.5),
                exit_threshold: Some(0.14),
                frame_aligned: Some(false),
            },
            ..LaunchOptions::default()
        };
        AppState::new(AppConfig::default(), launch, 80, 30, Instant::now())
    }

    fn activate(state: &mut AppState, label: &str) {
        let item = SETTINGS_ITEMS.iter().find(|i| i.label() == label).unwrap();
        match item {
            SettingsItem::Toggle { get, set, .. } => {
                let current = get(state);
                set(state, !current);
            }
            SettingsItem::Cycle { cycle, .. } => cycle(state),
        }
    }

    #[test]
    fn command_line_overrides_are_not_saved() {
        let dir = std::env::temp_dir().join(format!("smart-panel-settings-{}", std::process::id()));
        let path = dir.join("config.toml");
        let mut s = overridden_state();
        s.config_file = Some(path.clone());

        activate(&mut s, "Scroll Step");

        let saved = AppConfig::load_from(&path);
        let _ = std::fs::remove_dir_all(&dir);
        assert_eq!(
            saved,
            AppConfig {
                scroll_step_px: 120.0,
                ..AppConfig::default()
            }
        );
        // The running session keeps its overrides.
        assert_eq!(s.config.enter_threshold, 0.5);
        assert!(!s.config.frame_aligned);
        assert_eq!(s.config.scroll_step_px, 120.0);
    }

    #[test]
    fn edits_to_overridden_fields_reach_both_copies() {
        let mut s = overridden_state();
        activate(&mut s, "Frame-aligned Ticks");
        assert!(s.config.frame_aligned);
        assert!(s.stored_config().frame_aligned);
        assert!(s.scheduler.is_aligned());
    }

    #[test]
    fn stored_band_stays_valid_under_overrides() {
        let mut s = overridden_state();
        // 0.14 → 0.2: fine against the overridden 0.5, not against 0.14 on disk.
        activate(&mut s, "Rewind Threshold");
        assert_eq!(s.config.exit_threshold, 0.2);
        assert_eq!(s.choreo.config().exit_threshold, 0.2);
        let stored = s.stored_config();
        assert_eq!(stored.exit_threshold, stored.enter_threshold);
        assert!(stored.choreo_config().is_ok());
    }

    #[test]
    fn next_in_wraps() {
        assert_eq!(next_in(GRID_STRETCHES, 1.4), 1.8);
        assert_eq!(next_in(GRID_STRETCHES, 2.4), 1.0);
    }

    #[test]
    fn next_in_unknown_restarts() {
        assert_eq!(next_in(SCROLL_STEPS, 33.0), 20.0);
    }

    #[test]
    fn labels_are_unique() {
        let mut labels: Vec<_> = SETTINGS_ITEMS.iter().map(SettingsItem::label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), SETTINGS_ITEMS.len());
    }

    #[test]
    fn threshold_lists_share_the_default() {
        let default = crate::core::choreo::ChoreoConfig::default();
        assert!(ENTER_THRESHOLDS.contains(&default.enter_threshold));
        assert!(EXIT_THRESHOLDS.contains(&default.exit_threshold));
    }
}
