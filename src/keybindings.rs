//! Keybinding registry: maps actions to key events with config overrides.
//!
//! Bindings are looked up per card context first (the kind of the active
//! card), then globally, so Space can mean play/pause on a video and start
//! on a game.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

use crate::media::MediaKind;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    Next,
    Prev,
    First,
    Last,
    ScrollDown,
    ScrollUp,
    TogglePlay,
    StartGame,
    OpenInBrowser,
    CycleTheme,
    ShowHelp,
    Back,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::Next => "Next card",
            Self::Prev => "Previous card",
            Self::First => "Jump to first card",
            Self::Last => "Jump to last loaded card",
            Self::ScrollDown => "Free scroll down",
            Self::ScrollUp => "Free scroll up",
            Self::TogglePlay => "Play / pause video",
            Self::StartGame => "Start game",
            Self::OpenInBrowser => "Open media in browser",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
            Self::Back => "Dismiss",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Video,
    Game,
}

impl Context {
    /// Context for the kind of card currently in focus.
    pub fn for_card(kind: Option<MediaKind>) -> Self {
        match kind {
            Some(MediaKind::Video) => Self::Video,
            Some(MediaKind::Game) => Self::Game,
            Some(MediaKind::Text) | Some(MediaKind::Image) | None => Self::Global,
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats: single chars ("q", "?"), named keys ("Enter", "Esc",
/// "Space", "PageDown", "Home", ...), "Ctrl+x", and "F1" through "F12".
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        let c = chars.next()?;
        return chars.next().is_none().then(|| KeySpec::ctrl(c));
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s
        .strip_prefix(|c: char| c == 'F' || c == 'f')
        .and_then(|rest| rest.parse::<u8>().ok())
    {
        return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then(|| KeySpec::plain(KeyCode::Char(c)))
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
pub struct KeybindingRegistry {
    /// Primary lookup: (Context, KeySpec) -> Action
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Context::{Game, Global, Video};

        self.bind(Global, KeySpec::plain(KeyCode::Char('q')), Action::Quit);

        // Discrete steps behave like wheel ticks
        for code in [KeyCode::Char('j'), KeyCode::Down, KeyCode::PageDown] {
            self.bind(Global, KeySpec::plain(code), Action::Next);
        }
        for code in [KeyCode::Char('k'), KeyCode::Up, KeyCode::PageUp] {
            self.bind(Global, KeySpec::plain(code), Action::Prev);
        }
        self.bind(Global, KeySpec::plain(KeyCode::Char('g')), Action::First);
        self.bind(Global, KeySpec::plain(KeyCode::Home), Action::First);
        self.bind(Global, KeySpec::plain(KeyCode::Char('G')), Action::Last);
        self.bind(Global, KeySpec::plain(KeyCode::End), Action::Last);

        // Free scrolling, snapped when idle
        self.bind(Global, KeySpec::ctrl('e'), Action::ScrollDown);
        self.bind(Global, KeySpec::ctrl('y'), Action::ScrollUp);

        self.bind(
            Global,
            KeySpec::plain(KeyCode::Char('o')),
            Action::OpenInBrowser,
        );
        self.bind(Global, KeySpec::plain(KeyCode::Char('T')), Action::CycleTheme);
        self.bind(Global, KeySpec::plain(KeyCode::Char('?')), Action::ShowHelp);
        self.bind(Global, KeySpec::plain(KeyCode::Esc), Action::Back);

        self.bind(Video, KeySpec::plain(KeyCode::Char(' ')), Action::TogglePlay);
        self.bind(Video, KeySpec::plain(KeyCode::Char('p')), Action::TogglePlay);

        self.bind(Game, KeySpec::plain(KeyCode::Char(' ')), Action::StartGame);
        self.bind(Game, KeySpec::plain(KeyCode::Enter), Action::StartGame);
    }

    /// Apply user overrides from the config `[keybindings]` table.
    ///
    /// Keys in the map are action names (e.g., "quit", "next").
    /// Values are key strings (e.g., "q", "Ctrl+d", "F5").
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };
            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (ctx, _, a) in &self.bindings {
                if *a == action && !contexts.contains(ctx) {
                    contexts.push(*ctx);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a key, trying `context` first and then Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);
        self.lookup
            .get(&(context, key))
            .or_else(|| self.lookup.get(&(Context::Global, key)))
            .copied()
    }

    /// Display string of the first key bound to `action` in `context`,
    /// falling back to Global.
    pub fn key_for(&self, action: Action, context: Context) -> Option<String> {
        let find = |ctx: Context| {
            self.bindings
                .iter()
                .find(|(c, _, a)| *c == ctx && *a == action)
        };
        find(context)
            .or_else(|| find(Context::Global))
            .map(|(_, key, _)| format_key(key))
    }

    /// All bindings as (context, key display, action, description).
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "next" | "nav_down" | "down" => Some(Action::Next),
        "prev" | "previous" | "nav_up" | "up" => Some(Action::Prev),
        "first" | "top" => Some(Action::First),
        "last" | "bottom" => Some(Action::Last),
        "scroll_down" | "scrolldown" => Some(Action::ScrollDown),
        "scroll_up" | "scrollup" => Some(Action::ScrollUp),
        "toggle_play" | "toggleplay" | "play" => Some(Action::TogglePlay),
        "start_game" | "startgame" | "start" => Some(Action::StartGame),
        "open_in_browser" | "openinbrowser" | "open" => Some(Action::OpenInBrowser),
        "cycle_theme" | "cycletheme" | "theme" => Some(Action::CycleTheme),
        "show_help" | "showhelp" | "help" => Some(Action::ShowHelp),
        "back" => Some(Action::Back),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
