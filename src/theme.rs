//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }

    /// Resolve a text card's background token to a fill color.
    ///
    /// Unknown tokens fall back to a neutral gray so a card always renders.
    pub fn card_background(self, token: &str) -> Color {
        let (dark, light) = match token {
            "purple" => ((88, 28, 135), (233, 213, 255)),
            "blue" => ((30, 64, 175), (191, 219, 254)),
            "orange" => ((194, 65, 12), (254, 215, 170)),
            "green" => ((21, 128, 61), (187, 247, 208)),
            "indigo" => ((55, 48, 163), (199, 210, 254)),
            _ => ((64, 64, 64), (229, 229, 229)),
        };
        let (r, g, b) = match self {
            Self::Dark => dark,
            Self::Light => light,
        };
        Color::Rgb(r, g, b)
    }

    /// Resolve a text card's text token to a foreground color.
    pub fn card_foreground(self, token: &str) -> Color {
        match (self, token) {
            (_, "black") => Color::Black,
            (Self::Dark, _) => Color::White,
            // Light backgrounds need dark text regardless of the token
            (Self::Light, _) => Color::Black,
        }
    }
}

// ============================================================================
// Color Palette — semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Cards --
    pub card_border: Style,
    pub card_border_active: Style,
    pub card_title: Style,
    pub card_body: Style,
    pub card_meta: Style,
    pub card_dimmed: Style,
    pub card_placeholder: Style,

    // -- Media --
    pub video_progress: Style,
    pub video_paused: Style,
    pub game_bubble: Style,
    pub game_score: Style,
    pub engagement: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub help_heading: Style,
    pub help_body: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            card_border: Style::default().fg(Color::DarkGray),
            card_border_active: Style::default().fg(Color::Cyan),
            card_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            card_body: Style::default().fg(Color::White),
            card_meta: Style::default().fg(Color::Gray),
            card_dimmed: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
            card_placeholder: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            video_progress: Style::default().fg(Color::Red).bg(Color::Black),
            video_paused: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            game_bubble: Style::default().fg(Color::LightMagenta),
            game_score: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            engagement: Style::default().fg(Color::LightRed),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            help_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            help_body: Style::default(),
        }
    }

    fn light() -> Self {
        Self {
            card_border: Style::default().fg(Color::Gray),
            card_border_active: Style::default().fg(Color::Blue),
            card_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_body: Style::default().fg(Color::Black),
            card_meta: Style::default().fg(Color::DarkGray),
            card_dimmed: Style::default().fg(Color::Gray),
            card_placeholder: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),

            video_progress: Style::default().fg(Color::Red).bg(Color::White),
            video_paused: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            game_bubble: Style::default().fg(Color::Magenta),
            game_score: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            engagement: Style::default().fg(Color::Red),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            help_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            help_body: Style::default().fg(Color::Black),
        }
    }
}

// ============================================================================
// Style Map — string-keyed lookup
// ============================================================================

/// String-keyed style lookup built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 15] = [
    "card_border",
    "card_border_active",
    "card_title",
    "card_body",
    "card_meta",
    "card_dimmed",
    "card_placeholder",
    "video_progress",
    "video_paused",
    "game_bubble",
    "game_score",
    "engagement",
    "status_bar",
    "help_heading",
    "help_body",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 15] = [
            p.card_border,
            p.card_border_active,
            p.card_title,
            p.card_body,
            p.card_meta,
            p.card_dimmed,
            p.card_placeholder,
            p.video_progress,
            p.video_paused,
            p.game_bubble,
            p.game_score,
            p.engagement,
            p.status_bar,
            p.help_heading,
            p.help_body,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_active_border_is_cyan() {
        let palette = ThemeVariant::Dark.palette();
        assert_eq!(palette.card_border_active, Style::default().fg(Color::Cyan));
    }

    #[test]
    fn light_palette_differs_from_dark() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.card_body, light.card_body);
        assert_ne!(dark.status_bar, light.status_bar);
    }

    #[test]
    fn variant_from_str_name() {
        assert_eq!(
            ThemeVariant::from_str_name("dark"),
            Some(ThemeVariant::Dark)
        );
        assert_eq!(
            ThemeVariant::from_str_name("LIGHT"),
            Some(ThemeVariant::Light)
        );
        assert_eq!(ThemeVariant::from_str_name("neon"), None);
    }

    #[test]
    fn variant_cycles() {
        assert_eq!(ThemeVariant::Dark.next(), ThemeVariant::Light);
        assert_eq!(ThemeVariant::Light.next(), ThemeVariant::Dark);
    }

    #[test]
    fn card_backgrounds_resolve() {
        let purple = ThemeVariant::Dark.card_background("purple");
        let blue = ThemeVariant::Dark.card_background("blue");
        assert_ne!(purple, blue);
        assert_eq!(
            ThemeVariant::Dark.card_background("unknown"),
            Color::Rgb(64, 64, 64)
        );
        assert_ne!(
            ThemeVariant::Dark.card_background("green"),
            ThemeVariant::Light.card_background("green")
        );
    }

    #[test]
    fn card_foreground_tokens() {
        assert_eq!(ThemeVariant::Dark.card_foreground("white"), Color::White);
        assert_eq!(ThemeVariant::Light.card_foreground("white"), Color::Black);
        assert_eq!(ThemeVariant::Dark.card_foreground("black"), Color::Black);
    }

    #[test]
    fn style_map_resolves_known_roles() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);
        assert_eq!(sm.resolve("card_title"), palette.card_title);
        assert_eq!(sm.resolve("status_bar"), palette.status_bar);
        assert_eq!(sm.resolve("nonexistent_role"), Style::default());
    }

    #[test]
    fn style_map_has_all_roles() {
        let sm = StyleMap::from_palette(&ThemeVariant::Light.palette());
        assert_eq!(sm.map.len(), ROLE_NAMES.len());
        for name in ROLE_NAMES {
            assert!(sm.map.contains_key(name), "Role '{}' missing", name);
        }
    }
}
