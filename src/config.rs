//! User configuration: key bindings, choreography tuning and persistence.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/smart-panel/config.toml` (default
//! `~/.config/smart-panel/config.toml`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::choreo::{ChoreoConfig, ChoreoError};

// ───────────────────────────────────────── actions ───────────

/// Configurable actions on the dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    OpenSettings,
    Quit,
}

impl Action {
    pub const ALL: &[Action] = &[
        Action::ScrollUp,
        Action::ScrollDown,
        Action::PageUp,
        Action::PageDown,
        Action::Top,
        Action::Bottom,
        Action::OpenSettings,
        Action::Quit,
    ];

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::Top => "top",
            Action::Bottom => "bottom",
            Action::OpenSettings => "open_settings",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// Named keys: (code, display label, config-file name).
const NAMED_KEYS: &[(KeyCode, &str, &str)] = &[
    (KeyCode::Char(' '), "Space", "Space"),
    (KeyCode::Up, "↑", "Up"),
    (KeyCode::Down, "↓", "Down"),
    (KeyCode::Left, "←", "Left"),
    (KeyCode::Right, "→", "Right"),
    (KeyCode::Enter, "Enter", "Enter"),
    (KeyCode::Esc, "Esc", "Esc"),
    (KeyCode::Tab, "Tab", "Tab"),
    (KeyCode::Home, "Home", "Home"),
    (KeyCode::End, "End", "End"),
    (KeyCode::PageUp, "PgUp", "PageUp"),
    (KeyCode::PageDown, "PgDn", "PageDown"),
];

/// A key code plus CTRL/ALT/SHIFT modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    const MOD_MASK: KeyModifiers = KeyModifiers::CONTROL
        .union(KeyModifiers::ALT)
        .union(KeyModifiers::SHIFT);

    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Platform modifiers (SUPER, META…) are ignored.
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code
            && (self.modifiers & Self::MOD_MASK) == (event.modifiers & Self::MOD_MASK)
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        for (flag, name) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(flag) {
                s.push_str(name);
            }
        }
        s
    }

    fn key_name(&self, display: bool) -> String {
        if let Some((_, label, name)) = NAMED_KEYS.iter().find(|(code, _, _)| *code == self.code) {
            return if display { label } else { name }.to_string();
        }
        match self.code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        }
    }

    /// Status-bar form, e.g. `"↓"`, `"Ctrl+d"`.
    pub fn display(&self) -> String {
        format!("{}{}", self.modifier_prefix(), self.key_name(true))
    }

    /// Config-file form, e.g. `"Down"`, `"Ctrl+d"`.
    fn to_config_string(&self) -> String {
        format!("{}{}", self.modifier_prefix(), self.key_name(false))
    }

    /// Parse `"Ctrl+d"`, `"PageDown"`, `"j"`, `"F5"`.
    fn parse(s: &str) -> Option<Self> {
        let mut parts: Vec<&str> = s.split('+').collect();
        let key = parts.pop()?;

        let mut modifiers = KeyModifiers::NONE;
        for part in parts {
            modifiers |= match part.to_lowercase().as_str() {
                "ctrl" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return None,
            };
        }

        let lower = key.to_lowercase();
        let code = if let Some((code, _, _)) = NAMED_KEYS
            .iter()
            .find(|(_, _, name)| name.to_lowercase() == lower)
        {
            *code
        } else {
            match lower.as_str() {
                "pgup" => KeyCode::PageUp,
                "pgdn" => KeyCode::PageDown,
                "escape" => KeyCode::Esc,
                "return" => KeyCode::Enter,
                f if f.starts_with('f') && f.len() > 1 => KeyCode::F(f[1..].parse().ok()?),
                _ if key.chars().count() == 1 => KeyCode::Char(key.chars().next()?),
                _ => return None,
            }
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Grid progress at which the staggered entrance starts.
    pub enter_threshold: f64,
    /// Grid progress below which the entrance is rewound.
    pub exit_threshold: f64,
    pub grid_stretch: f64,
    pub card_stretch: f64,
    pub hero_base_scale: f64,
    /// Run the choreography at most once per frame.
    pub frame_aligned: bool,
    pub frame_ms: u64,
    /// Pixels moved per scroll step (arrow key / wheel notch).
    pub scroll_step_px: f64,
    /// Smooth-scroll damping per frame; 1.0 jumps instantly.
    pub smooth_speed: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let choreo = ChoreoConfig::default();
        Self {
            bindings: Self::default_bindings(),
            enter_threshold: choreo.enter_threshold,
            exit_threshold: choreo.exit_threshold,
            grid_stretch: choreo.grid_stretch,
            card_stretch: choreo.card_stretch,
            hero_base_scale: choreo.hero_base_scale,
            frame_aligned: true,
            frame_ms: 16,
            scroll_step_px: 60.0,
            smooth_speed: 0.35,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;
        let mut m = HashMap::new();

        m.insert(ScrollUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(ScrollDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Action::PageUp, vec![KeyBind::new(KeyCode::PageUp, n), KeyBind::new(Char('u'), ctrl)]);
        m.insert(Action::PageDown, vec![
            KeyBind::new(KeyCode::PageDown, n),
            KeyBind::new(Char(' '), n),
            KeyBind::new(Char('d'), ctrl),
        ]);
        m.insert(Top, vec![KeyBind::new(Home, n), KeyBind::new(Char('g'), n)]);
        m.insert(Bottom, vec![KeyBind::new(End, n), KeyBind::new(Char('G'), KeyModifiers::SHIFT)]);
        m.insert(OpenSettings, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Action bound to `event`; the binding with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(&action, binds)| binds.iter().map(move |b| (action, b)))
            .filter(|(_, b)| b.matches(event))
            .max_by_key(|(_, b)| b.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: scroll | {}: page | {}: settings | {}: quit",
            self.short_binding(Action::ScrollUp),
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::PageDown),
            self.short_binding(Action::OpenSettings),
            self.short_binding(Action::Quit),
        )
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    /// Choreography constants derived from this config.
    pub fn choreo_config(&self) -> Result<ChoreoConfig, ChoreoError> {
        let config = ChoreoConfig {
            grid_stretch: self.grid_stretch,
            card_stretch: self.card_stretch,
            hero_base_scale: self.hero_base_scale,
            ..ChoreoConfig::default()
        };
        config.with_thresholds(self.enter_threshold, self.exit_threshold)
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load from disk, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "unreadable config, using defaults");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialise())?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            let number = || {
                let parsed = value.parse::<f64>().ok().filter(|v| v.is_finite());
                if parsed.is_none() {
                    tracing::warn!(key, value, "ignoring non-numeric config value");
                }
                parsed
            };

            match key {
                "enter_threshold" => config.enter_threshold = number().unwrap_or(config.enter_threshold),
                "exit_threshold" => config.exit_threshold = number().unwrap_or(config.exit_threshold),
                "grid_stretch" => config.grid_stretch = number().unwrap_or(config.grid_stretch),
                "card_stretch" => config.card_stretch = number().unwrap_or(config.card_stretch),
                "hero_base_scale" => {
                    config.hero_base_scale = number().unwrap_or(config.hero_base_scale)
                }
                "scroll_step_px" => {
                    config.scroll_step_px = number().unwrap_or(config.scroll_step_px).clamp(4.0, 800.0)
                }
                "smooth_speed" => {
                    config.smooth_speed = number().unwrap_or(config.smooth_speed).clamp(0.05, 1.0)
                }
                "frame_aligned" => config.frame_aligned = value == "true",
                "frame_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.frame_ms = v.clamp(4, 250);
                    }
                }
                _ => {
                    let Some(action) = Action::from_config_key(key) else {
                        continue;
                    };
                    let parsed: Vec<KeyBind> = value
                        .split(',')
                        .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                        .collect();
                    if !parsed.is_empty() {
                        config.bindings.insert(action, parsed);
                    }
                }
            }
        }

        if let Err(err) = config.choreo_config() {
            tracing::warn!(%err, "invalid choreography settings, restoring defaults");
            let defaults = Self::default();
            config.enter_threshold = defaults.enter_threshold;
            config.exit_threshold = defaults.exit_threshold;
            config.grid_stretch = defaults.grid_stretch;
            config.card_stretch = defaults.card_stretch;
            config.hero_base_scale = defaults.hero_base_scale;
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# smart-panel configuration".to_string(),
            String::new(),
            "# Choreography".to_string(),
            format!("enter_threshold = {}", self.enter_threshold),
            format!("exit_threshold = {}", self.exit_threshold),
            format!("grid_stretch = {}", self.grid_stretch),
            format!("card_stretch = {}", self.card_stretch),
            format!("hero_base_scale = {}", self.hero_base_scale),
            String::new(),
            "# Scrolling".to_string(),
            format!("frame_aligned = {}", self.frame_aligned),
            format!("frame_ms = {}", self.frame_ms),
            format!("scroll_step_px = {}", self.scroll_step_px),
            format!("smooth_speed = {}", self.smooth_speed),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// One-off values from the command line.  They shape the running session
/// but are never written back to the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigOverrides {
    pub enter_threshold: Option<f64>,
    pub exit_threshold: Option<f64>,
    pub frame_aligned: Option<bool>,
}

impl ConfigOverrides {
    /// `base` with every present override applied.
    pub fn apply(&self, base: &AppConfig) -> AppConfig {
        let mut config = base.clone();
        if let Some(enter) = self.enter_threshold {
            config.enter_threshold = enter;
        }
        if let Some(exit) = self.exit_threshold {
            config.exit_threshold = exit;
        }
        if let Some(aligned) = self.frame_aligned {
            config.frame_aligned = aligned;
        }
        config
    }
}

/// `$XDG_CONFIG_HOME/smart-panel/config.toml`.
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("smart-panel").join("config.toml")
}
