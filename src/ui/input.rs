//! Input handling for the TUI.
//!
//! Keys go through the keybinding registry in the context of the active
//! card. Mouse drags are touch gestures, the wheel steps one card, and a
//! click on a running game pops bubbles.

use crate::app::App;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::nav::Direction;
use crate::util::validate_url;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::Action;

/// Main key dispatch function.
pub(super) fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    // Help overlay captures all keys when visible
    if app.show_help {
        return handle_help_input(app, code);
    }

    let context = KbContext::for_card(app.feed.active_item().map(|item| item.kind()));
    let Some(action) = app.keybindings.action_for_key(code, modifiers, context) else {
        return Action::Continue;
    };
    tracing::trace!(?action, ?context, "Key action");

    match action {
        KbAction::Quit => return Action::Quit,
        KbAction::Next => {
            app.nav.navigate(Direction::Forward);
        }
        KbAction::Prev => {
            app.nav.navigate(Direction::Backward);
        }
        KbAction::First => {
            app.nav.scroll_to_index(0);
        }
        KbAction::Last => {
            app.nav.scroll_to_index(app.feed.len().saturating_sub(1));
        }
        KbAction::ScrollDown => app.nav.scroll_by(app.row_height_px),
        KbAction::ScrollUp => app.nav.scroll_by(-app.row_height_px),
        KbAction::TogglePlay => match app.toggle_play() {
            Some(true) => app.set_status("Playing"),
            Some(false) => app.set_status("Paused"),
            None => {}
        },
        KbAction::StartGame => {
            if app.start_game() {
                app.set_status("Game started: click the bubbles!");
            }
        }
        KbAction::OpenInBrowser => open_active_link(app),
        KbAction::CycleTheme => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        KbAction::Back => {
            app.status_message = None;
        }
    }
    Action::Continue
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Open the active card's media URL in the system browser.
fn open_active_link(app: &mut App) {
    let Some(link) = app.feed.active_item().and_then(|item| item.link()) else {
        app.set_status("Nothing to open on this card");
        return;
    };
    // Validate before handing anything to the OS opener
    match validate_url(link) {
        Err(e) => app.set_status(format!("Refusing to open link: {}", e)),
        Ok(url) => match open::that(url.as_str()) {
            Ok(()) => app.set_status("Opening in browser..."),
            Err(e) => app.set_status(format!("Failed to open browser: {}", e)),
        },
    }
}

/// Mouse dispatch: drags are touches, the wheel steps, clicks play games.
pub(super) fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.show_help {
        return;
    }
    let area = app.card_area;
    let in_cards = mouse.row >= area.y && mouse.row < area.bottom();
    let y_px = f64::from(mouse.row.saturating_sub(area.y)) * app.row_height_px;

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            app.nav.wheel(1.0);
        }
        MouseEventKind::ScrollUp => {
            app.nav.wheel(-1.0);
        }
        MouseEventKind::Down(MouseButton::Left) if in_cards => {
            app.click(mouse.column, mouse.row);
            app.nav.touch_start(y_px);
        }
        MouseEventKind::Drag(MouseButton::Left) => app.nav.touch_drag(y_px),
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(direction) = app.nav.touch_end() {
                tracing::debug!(?direction, "Swipe");
            }
        }
        _ => return,
    }
    app.needs_redraw = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::nav::NavState;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn test_app() -> App {
        let mut app = App::new(&Config::default()).unwrap();
        app.resize(80, 25);
        app
    }

    fn settle(app: &mut App) {
        for _ in 0..30 {
            app.tick(Duration::from_millis(40));
        }
    }

    fn mouse(kind: MouseEventKind, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: 10,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_j_advances_one_card() {
        let mut app = test_app();
        handle_key(&mut app, KeyCode::Char('j'), KeyModifiers::NONE);
        settle(&mut app);
        assert_eq!(app.feed.active_index(), Some(1));
        handle_key(&mut app, KeyCode::Char('k'), KeyModifiers::NONE);
        settle(&mut app);
        assert_eq!(app.feed.active_index(), Some(0));
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert!(matches!(
            handle_key(&mut app, KeyCode::Char('q'), KeyModifiers::NONE),
            Action::Quit
        ));
    }

    #[test]
    fn test_help_captures_keys() {
        let mut app = test_app();
        handle_key(&mut app, KeyCode::Char('?'), KeyModifiers::NONE);
        assert!(app.show_help);

        handle_key(&mut app, KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(app.help_scroll_offset, 1);
        assert_eq!(app.nav.state(), NavState::Idle);

        assert!(matches!(
            handle_key(&mut app, KeyCode::Char('q'), KeyModifiers::NONE),
            Action::Continue
        ));
        assert!(!app.show_help);
    }

    #[test]
    fn test_drag_swipes_past_threshold() {
        let mut app = test_app();
        // Three rows is 48px at 16px per row: not a swipe
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 10));
        handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 7));
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 7));
        settle(&mut app);
        assert_eq!(app.nav.state(), NavState::Idle);
        assert_eq!(app.feed.active_index(), Some(0));

        // Four rows is 64px
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 10));
        handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 6));
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 6));
        settle(&mut app);
        assert_eq!(app.feed.active_index(), Some(1));
    }

    #[test]
    fn test_held_drag_scrolls_the_feed() {
        let mut app = test_app();
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 12));
        handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 10));
        let offset = |app: &App| app.nav.viewport().map(|v| v.offset());
        assert_eq!(offset(&app), Some(32.0));

        handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 11));
        assert_eq!(offset(&app), Some(16.0));
        assert!(app.needs_redraw);

        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 11));
        settle(&mut app);
        assert_eq!(offset(&app), Some(0.0));
        assert_eq!(app.feed.active_index(), Some(0));
    }

    #[test]
    fn test_wheel_steps() {
        let mut app = test_app();
        handle_mouse(&mut app, mouse(MouseEventKind::ScrollDown, 3));
        settle(&mut app);
        assert_eq!(app.feed.active_index(), Some(1));
        handle_mouse(&mut app, mouse(MouseEventKind::ScrollUp, 3));
        settle(&mut app);
        assert_eq!(app.feed.active_index(), Some(0));
    }

    #[test]
    fn test_free_scroll_snaps() {
        let mut app = test_app();
        for _ in 0..14 {
            handle_key(&mut app, KeyCode::Char('e'), KeyModifiers::CONTROL);
        }
        settle(&mut app);
        // 14 of 24 rows is past halfway
        assert_eq!(app.feed.active_index(), Some(1));
    }

    #[test]
    fn test_space_on_text_card_does_nothing() {
        let mut app = test_app();
        handle_key(&mut app, KeyCode::Char(' '), KeyModifiers::NONE);
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_open_without_link_reports() {
        let mut app = test_app();
        handle_key(&mut app, KeyCode::Char('o'), KeyModifiers::NONE);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Nothing to open on this card");
    }

    #[test]
    fn test_cycle_theme_sets_status() {
        let mut app = test_app();
        handle_key(&mut app, KeyCode::Char('T'), KeyModifiers::NONE);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Theme: Light");
    }
}
