use crate::app::App;
use crate::keybindings::{Action, Context};
use crate::media::{MediaItem, MediaKind};
use crate::util::{display_width, truncate_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const TRAILING_HINTS: [(Action, &str); 2] = [(Action::ShowHelp, "help"), (Action::Quit, "quit")];

/// Render the status bar: a message or key hints on the left, the active
/// card's engagement and position on the right.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }
    let style = app.style("status_bar");

    let right = match (app.feed.active_index(), app.feed.active_item()) {
        (Some(index), Some(item)) => {
            let engagement = app
                .feed
                .engagement(item.id())
                .map(|e| format!("♥ {}  ↗ {}  ", e.likes, e.shares))
                .unwrap_or_default();
            format!("{}{}/{} ", engagement, index + 1, app.feed.len())
        }
        _ => "No cards ".to_string(),
    };

    let left = match &app.status_message {
        Some((msg, _)) => msg.to_string(),
        None => key_hints(app),
    };

    let right_width = display_width(&right);
    let left_budget = usize::from(area.width).saturating_sub(right_width + 1);
    let left = format!(" {}", truncate_to_width(&left, left_budget.saturating_sub(1)));

    f.render_widget(Paragraph::new(Line::from(Span::raw(left))).style(style), area);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            right,
            style.patch(app.style("engagement")),
        )))
        .alignment(Alignment::Right),
        area,
    );
}

/// Hints for the active card, using whatever keys are currently bound.
/// Actions with no key are left out.
fn key_hints(app: &App) -> String {
    let kind = app.feed.active_item().map(MediaItem::kind);
    let ctx = Context::for_card(kind);
    let key = |action: Action| app.keybindings.key_for(action, ctx);

    let mut hints = Vec::new();
    if let (Some(next), Some(prev)) = (key(Action::Next), key(Action::Prev)) {
        hints.push(format!("[{}/{}]next/prev", next, prev));
    }

    let card_hints: &[(Action, &str)] = match kind {
        Some(MediaKind::Video) => &[(Action::TogglePlay, "play/pause"), (Action::OpenInBrowser, "open")],
        Some(MediaKind::Game) => &[(Action::StartGame, "start")],
        Some(MediaKind::Image) => &[(Action::OpenInBrowser, "open"), (Action::CycleTheme, "theme")],
        Some(MediaKind::Text) | None => &[(Action::CycleTheme, "theme")],
    };
    for (action, label) in card_hints.iter().chain(TRAILING_HINTS.iter()) {
        if let Some(k) = key(*action) {
            hints.push(format!("[{}]{}", k, label));
        }
        if *action == Action::StartGame {
            hints.push("[click]pop".to_string());
        }
    }
    hints.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_default_hints_for_text_card() {
        let app = App::new(&Config::default()).unwrap();
        assert_eq!(key_hints(&app), "[j/k]next/prev [T]theme [?]help [q]quit");
    }

    #[test]
    fn test_hints_follow_overrides() {
        let config = Config {
            keybindings: HashMap::from([
                ("next".to_string(), "n".to_string()),
                ("quit".to_string(), "Ctrl+c".to_string()),
            ]),
            ..Config::default()
        };
        let app = App::new(&config).unwrap();
        assert_eq!(key_hints(&app), "[n/k]next/prev [T]theme [?]help [Ctrl+c]quit");
    }

    #[test]
    fn test_video_card_hints_use_card_context() {
        let config = Config {
            keybindings: HashMap::from([("play".to_string(), "x".to_string())]),
            ..Config::default()
        };
        let mut app = App::new(&config).unwrap();
        app.resize(80, 25);
        let events = app.nav.settle_index(2);
        app.apply_nav(events);
        assert_eq!(
            key_hints(&app),
            "[j/k]next/prev [x]play/pause [o]open [?]help [q]quit"
        );
    }
}
