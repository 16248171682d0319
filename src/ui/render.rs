//! Render functions for the TUI.
//!
//! Cards are drawn at full size into a scratch buffer and the rows that fall
//! inside the card area are copied to the frame, so a card scrolling past
//! the edge is cut off rather than squeezed.

use crate::app::{App, CardSlot, STATUS_HEIGHT};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};

use super::cards::{render_card, CardProps};
use super::{help, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 24;
pub(super) const MIN_HEIGHT: u16 = 8;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(STATUS_HEIGHT)])
        .split(area);

    for slot in app.visible_slots() {
        render_slot(f.buffer_mut(), chunks[0], app, slot);
    }
    status::render(f, app, chunks[1]);

    if app.show_help {
        help::render(f, app);
    }
}

/// Draw one card, clipped to the card area.
fn render_slot(buf: &mut Buffer, cards_area: Rect, app: &App, slot: CardSlot) {
    let Some(visible) = slot.clip(cards_area) else {
        return;
    };
    let Some(item) = app.feed.items().get(slot.index) else {
        return;
    };

    let card_rect = Rect::new(0, 0, cards_area.width, slot.height);
    let mut scratch = Buffer::empty(card_rect);
    let props = CardProps {
        item,
        is_active: app.feed.is_active(slot.index),
        state: app.card_state(item.id()),
        high_score: app.feed.high_score(item.id()),
    };
    render_card(&mut scratch, card_rect, &props, &app.theme, app.theme_variant);

    let card_top = i32::from(cards_area.y) + slot.top;
    for y in visible.top()..visible.bottom() {
        let Ok(src_y) = u16::try_from(i32::from(y) - card_top) else {
            continue;
        };
        for x in visible.left()..visible.right() {
            let src_x = x - cards_area.x;
            if let (Some(src), Some(dst)) = (scratch.cell((src_x, src_y)), buf.cell_mut((x, y))) {
                *dst = src.clone();
            }
        }
    }
}
