//! Card renderers, one per media variant.
//!
//! Every renderer draws from the item, whether it is the active card, and
//! the card's ephemeral view state. Active cards get full emphasis; the rest
//! are drawn dimmed.

use crate::card_state::{CardState, GameState, LoadProgress, VideoState};
use crate::media::MediaItem;
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::{truncate_to_width, wrap_to_width};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, LineGauge, Paragraph, Widget},
};
use std::time::Duration;

/// Colors cycled through by bubble hue.
const BUBBLE_COLORS: [Color; 6] = [
    Color::LightRed,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightBlue,
    Color::LightMagenta,
    Color::LightCyan,
];

/// Gradient endpoints for the image stand-ins, picked per URL.
const IMAGE_GRADIENTS: [((u8, u8, u8), (u8, u8, u8)); 5] = [
    ((135, 206, 235), (34, 85, 34)),
    ((200, 200, 210), (60, 60, 70)),
    ((255, 94, 98), (80, 40, 160)),
    ((64, 164, 223), (10, 40, 90)),
    ((10, 10, 40), (70, 60, 130)),
];

/// Everything a card renderer reads.
pub struct CardProps<'a> {
    pub item: &'a MediaItem,
    pub is_active: bool,
    /// `None` until the card has mounted.
    pub state: Option<&'a CardState>,
    /// Best score for game cards.
    pub high_score: u32,
}

/// Render one card filling `area`.
pub fn render_card(
    buf: &mut Buffer,
    area: Rect,
    props: &CardProps<'_>,
    theme: &StyleMap,
    variant: ThemeVariant,
) {
    if area.width < 4 || area.height < 3 {
        return;
    }

    let border_style = if props.is_active {
        theme.resolve("card_border_active")
    } else {
        theme.resolve("card_border")
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if props.is_active {
            BorderType::Thick
        } else {
            BorderType::Plain
        })
        .border_style(border_style)
        .title(format!(
            " {} ",
            truncate_to_width(props.item.title(), usize::from(area.width.saturating_sub(4)))
        ));
    let inner = block.inner(area);
    block.render(area, buf);

    match props.item {
        MediaItem::Text {
            content,
            background_style,
            text_style,
            ..
        } => render_text(
            buf,
            inner,
            content,
            variant.card_background(background_style),
            variant.card_foreground(text_style),
            props.is_active,
        ),
        MediaItem::Image {
            title,
            url,
            alt_text,
            photographer_name,
            ..
        } => {
            let load = match props.state {
                Some(CardState::Image(load)) => Some(*load),
                _ => None,
            };
            render_image(
                buf,
                inner,
                ImageView {
                    title,
                    url,
                    alt_text,
                    photographer: photographer_name.as_deref(),
                    load,
                },
                props.is_active,
                theme,
            );
        }
        MediaItem::Video {
            title,
            duration_seconds,
            ..
        } => {
            let video = match props.state {
                Some(CardState::Video(video)) => Some(video),
                _ => None,
            };
            render_video(buf, inner, title, *duration_seconds, video, props.is_active, theme);
        }
        MediaItem::Game {
            title,
            description,
            ..
        } => {
            let game = match props.state {
                Some(CardState::Game(game)) => Some(game),
                _ => None,
            };
            render_game(
                buf,
                area,
                inner,
                GameView {
                    title,
                    description,
                    high_score: props.high_score,
                    game,
                },
                props.is_active,
                theme,
                variant,
            );
        }
    }

    if !props.is_active {
        buf.set_style(inner, Style::default().add_modifier(Modifier::DIM));
    }
}

// ============================================================================
// Text
// ============================================================================

fn render_text(buf: &mut Buffer, area: Rect, content: &str, bg: Color, fg: Color, active: bool) {
    buf.set_style(area, Style::default().bg(bg));

    let width = usize::from(area.width.saturating_sub(4)).max(1);
    let lines = wrap_to_width(content, width);
    let mut style = Style::default().fg(fg).bg(bg);
    if active {
        style = style.add_modifier(Modifier::BOLD);
    }
    let text: Vec<Line> = lines
        .into_iter()
        .map(|l| Line::from(Span::styled(l, style)))
        .collect();
    render_centered(buf, area, text);
}

// ============================================================================
// Image
// ============================================================================

struct ImageView<'a> {
    title: &'a str,
    url: &'a str,
    alt_text: &'a str,
    photographer: Option<&'a str>,
    load: Option<LoadProgress>,
}

fn render_image(
    buf: &mut Buffer,
    area: Rect,
    view: ImageView<'_>,
    active: bool,
    theme: &StyleMap,
) {
    if !view.load.is_some_and(|l| l.is_loaded()) {
        render_placeholder(buf, area, "Loading image...", theme);
        return;
    }

    let seed = view.url.bytes().fold(0usize, |acc, b| acc.wrapping_add(usize::from(b)));
    let (top, bottom) = IMAGE_GRADIENTS[seed % IMAGE_GRADIENTS.len()];
    // Two pixel rows per cell with upper half blocks
    let pixel_rows = u32::from(area.height) * 2;
    for row in 0..area.height {
        let upper = blend(top, bottom, u32::from(row) * 2, pixel_rows);
        let lower = blend(top, bottom, u32::from(row) * 2 + 1, pixel_rows);
        for col in 0..area.width {
            if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                cell.set_symbol("▀").set_fg(upper).set_bg(lower);
            }
        }
    }

    let mut info = vec![Line::from(Span::styled(
        view.title.to_string(),
        theme.resolve("card_title"),
    ))];
    if let Some(name) = view.photographer {
        info.push(Line::from(Span::styled(
            format!("Photo by {}", name),
            theme.resolve("card_meta"),
        )));
    }
    if active {
        info.push(Line::from(Span::styled(
            view.alt_text.to_string(),
            theme.resolve("card_dimmed"),
        )));
    }
    render_footer(buf, area, info);
}

fn blend(from: (u8, u8, u8), to: (u8, u8, u8), step: u32, steps: u32) -> Color {
    let t = if steps <= 1 {
        0.0
    } else {
        f64::from(step) / f64::from(steps - 1)
    };
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    Color::Rgb(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

// ============================================================================
// Video
// ============================================================================

fn render_video(
    buf: &mut Buffer,
    area: Rect,
    title: &str,
    duration_seconds: Option<u32>,
    video: Option<&VideoState>,
    active: bool,
    theme: &StyleMap,
) {
    let Some(video) = video.filter(|v| v.load.is_loaded()) else {
        render_placeholder(buf, area, "Loading video...", theme);
        return;
    };
    buf.set_style(area, Style::default().bg(Color::Black));

    if active && !video.playing {
        render_centered(
            buf,
            area,
            vec![Line::from(Span::styled("▶  Paused", theme.resolve("video_paused")))],
        );
    }

    let mut info = vec![Line::from(Span::styled(
        title.to_string(),
        theme.resolve("card_title"),
    ))];
    if let Some(seconds) = duration_seconds {
        info.push(Line::from(Span::styled(
            format!("{}s", seconds),
            theme.resolve("card_meta"),
        )));
    }
    info.push(Line::from(""));
    render_footer(buf, area, info);

    // Progress bar on the last row
    let bar = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
    LineGauge::default()
        .filled_style(theme.resolve("video_progress"))
        .unfilled_style(theme.resolve("card_dimmed"))
        .label(format!(
            "{} / {}",
            format_clock(video.position),
            format_clock(video.duration)
        ))
        .ratio(video.progress().clamp(0.0, 1.0))
        .render(bar, buf);
}

fn format_clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

// ============================================================================
// Game
// ============================================================================

struct GameView<'a> {
    title: &'a str,
    description: &'a str,
    high_score: u32,
    game: Option<&'a GameState>,
}

fn render_game(
    buf: &mut Buffer,
    card: Rect,
    area: Rect,
    view: GameView<'_>,
    active: bool,
    theme: &StyleMap,
    variant: ThemeVariant,
) {
    buf.set_style(area, Style::default().bg(variant.card_background("indigo")));

    let started = view.game.is_some_and(|g| g.started);
    if let Some(game) = view.game.filter(|g| g.started) {
        draw_bubbles(buf, card, area, game);
    }

    let score = view.game.map(|g| g.score).unwrap_or(0);
    let header = Rect::new(area.x, area.y, area.width, area.height.min(2));
    Paragraph::new(vec![
        Line::from(Span::styled(view.title.to_string(), theme.resolve("card_title"))),
        Line::from(Span::styled(
            view.description.to_string(),
            theme.resolve("card_meta"),
        )),
    ])
    .render(header, buf);
    Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Score: {}", score),
            theme.resolve("game_score"),
        )),
        Line::from(Span::styled(
            format!("High: {}", view.high_score),
            theme.resolve("card_meta"),
        )),
    ])
    .alignment(Alignment::Right)
    .render(header, buf);

    if started {
        render_footer(
            buf,
            area,
            vec![Line::from(Span::styled(
                "Click the bubbles to pop them!",
                theme.resolve("card_meta"),
            ))],
        );
    } else if active {
        render_centered(
            buf,
            area,
            vec![
                Line::from(Span::styled(
                    "[ Start Game ]",
                    theme.resolve("game_score").add_modifier(Modifier::REVERSED),
                )),
                Line::from(Span::styled(
                    "Space or Enter",
                    theme.resolve("card_dimmed"),
                )),
            ],
        );
    }
}

/// Paint bubbles in card coordinates, the same space clicks are tested in.
fn draw_bubbles(buf: &mut Buffer, card: Rect, area: Rect, game: &GameState) {
    if card.width == 0 || card.height == 0 {
        return;
    }
    let width = f64::from(card.width);
    let height = f64::from(card.height);
    let aspect = width / 2.0 / height;

    for row in area.top()..area.bottom() {
        let y = (f64::from(row - card.y) + 0.5) / height;
        for col in area.left()..area.right() {
            let x = (f64::from(col - card.x) + 0.5) / width;
            let Some(bubble) = game.bubbles.iter().find(|b| b.contains(x, y, aspect)) else {
                continue;
            };
            if let Some(cell) = buf.cell_mut((col, row)) {
                cell.set_symbol("█")
                    .set_fg(BUBBLE_COLORS[bubble.hue % BUBBLE_COLORS.len()]);
            }
        }
    }
}

// ============================================================================
// Shared Pieces
// ============================================================================

fn render_placeholder(buf: &mut Buffer, area: Rect, label: &'static str, theme: &StyleMap) {
    buf.set_style(area, Style::default().bg(Color::Rgb(17, 24, 39)));
    render_centered(
        buf,
        area,
        vec![Line::from(Span::styled(label, theme.resolve("card_placeholder")))],
    );
}

/// Lines centered both ways in `area`.
fn render_centered(buf: &mut Buffer, area: Rect, lines: Vec<Line<'_>>) {
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).min(area.height);
    let top = area.y + (area.height - height) / 2;
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(Rect::new(area.x, top, area.width, height), buf);
}

/// Lines pinned to the bottom of `area`, left-aligned with a margin.
fn render_footer(buf: &mut Buffer, area: Rect, lines: Vec<Line<'_>>) {
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).min(area.height);
    let rect = Rect::new(
        area.x.saturating_add(1),
        area.bottom().saturating_sub(height),
        area.width.saturating_sub(2),
        height,
    );
    Paragraph::new(lines).render(rect, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card_state::{Bubble, VIDEO_LOAD_TIME};
    use crate::feed::item_at;

    fn draw(props: &CardProps<'_>) -> Buffer {
        let area = Rect::new(0, 0, 40, 16);
        let mut buf = Buffer::empty(area);
        let theme = StyleMap::from_palette(&ThemeVariant::Dark.palette());
        render_card(&mut buf, area, props, &theme, ThemeVariant::Dark);
        buf
    }

    fn text_of(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_text_card_shows_content_on_background() {
        let item = item_at(0);
        let buf = draw(&CardProps {
            item: &item,
            is_active: true,
            state: None,
            high_score: 0,
        });
        let text = text_of(&buf);
        assert!(text.contains("Inspiration"));
        assert!(text.contains("great work"));
        assert_eq!(
            buf[(5, 5)].bg,
            ThemeVariant::Dark.card_background("purple")
        );
    }

    #[test]
    fn test_inactive_card_is_dimmed() {
        let item = item_at(0);
        let buf = draw(&CardProps {
            item: &item,
            is_active: false,
            state: None,
            high_score: 0,
        });
        assert!(buf[(5, 5)].modifier.contains(Modifier::DIM));
    }

    #[test]
    fn test_image_placeholder_until_loaded() {
        let item = item_at(1);
        let buf = draw(&CardProps {
            item: &item,
            is_active: true,
            state: None,
            high_score: 0,
        });
        assert!(text_of(&buf).contains("Loading image..."));

        let mut load = LoadProgress::new(Duration::from_millis(1));
        load.advance(Duration::from_millis(1));
        let state = CardState::Image(load);
        let buf = draw(&CardProps {
            item: &item,
            is_active: true,
            state: Some(&state),
            high_score: 0,
        });
        let text = text_of(&buf);
        assert!(!text.contains("Loading image..."));
        assert!(text.contains("Photo by Photographer 1"));
    }

    #[test]
    fn test_video_shows_paused_and_clock() {
        let item = item_at(2);
        let mut video = VideoState::new(Duration::from_secs(30));
        video.load.advance(VIDEO_LOAD_TIME);
        let state = CardState::Video(video);
        let text = text_of(&draw(&CardProps {
            item: &item,
            is_active: true,
            state: Some(&state),
            high_score: 0,
        }));
        assert!(text.contains("Paused"));
        assert!(text.contains("0:00 / 0:30"));
        assert!(text.contains("30s"));
    }

    #[test]
    fn test_game_start_prompt_only_when_active() {
        let item = item_at(3);
        let active = text_of(&draw(&CardProps {
            item: &item,
            is_active: true,
            state: None,
            high_score: 40,
        }));
        assert!(active.contains("Start Game"));
        assert!(active.contains("High: 40"));

        let inactive = text_of(&draw(&CardProps {
            item: &item,
            is_active: false,
            state: None,
            high_score: 40,
        }));
        assert!(!inactive.contains("Start Game"));
    }

    #[test]
    fn test_game_draws_bubbles_once_started() {
        let item = item_at(3);
        let state = CardState::Game(GameState {
            started: true,
            score: 20,
            bubbles: vec![Bubble {
                x: 0.5,
                y: 0.5,
                radius: 0.2,
                speed: 0.1,
                hue: 1,
            }],
        });
        let buf = draw(&CardProps {
            item: &item,
            is_active: true,
            state: Some(&state),
            high_score: 20,
        });
        assert_eq!(buf[(20, 8)].symbol(), "█");
        assert_eq!(buf[(20, 8)].fg, Color::LightGreen);
        assert!(text_of(&buf).contains("Score: 20"));
    }
}
