use crate::card_state::CardState;
use crate::config::Config;
use crate::feed::FeedOrchestrator;
use crate::keybindings::KeybindingRegistry;
use crate::media::MediaItem;
use crate::nav::{FeedNavigationController, NavEvent};
use crate::theme::{StyleMap, ThemeVariant};
use anyhow::Result;
use lru::LruCache;
use ratatui::layout::Rect;
use ratatui::style::Style;
use std::borrow::Cow;
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::time::Instant;

/// Height of the status bar below the cards.
pub const STATUS_HEIGHT: u16 = 1;

/// Mounted cards whose view state is kept. Cards evicted from the cache
/// remount fresh: videos rewind and games reset.
pub const CARD_STATE_CAPACITY: usize = 8;

// ============================================================================
// Card Slots
// ============================================================================

/// Where a card currently sits on screen.
///
/// `top` is relative to the card area and may be negative while a card is
/// scrolling out of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSlot {
    pub index: usize,
    pub top: i32,
    pub height: u16,
}

impl CardSlot {
    /// Rows of this slot that fall inside `area`, if any.
    pub fn clip(&self, area: Rect) -> Option<Rect> {
        let top = i32::from(area.y) + self.top;
        let bottom = top + i32::from(self.height);
        let visible_top = top.max(i32::from(area.y));
        let visible_bottom = bottom.min(i32::from(area.bottom()));
        if visible_bottom <= visible_top {
            return None;
        }
        Some(Rect::new(
            area.x,
            u16::try_from(visible_top).ok()?,
            area.width,
            u16::try_from(visible_bottom - visible_top).ok()?,
        ))
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub feed: FeedOrchestrator,
    pub nav: FeedNavigationController,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    /// View state of recently mounted cards, keyed by item id.
    card_states: LruCache<String, CardState>,

    /// Screen region the cards scroll through.
    pub card_area: Rect,
    /// Pixels per terminal row, for the pixel-based navigation thresholds.
    pub row_height_px: f64,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Set whenever state changes; the loop only draws when this is true.
    pub needs_redraw: bool,

    pub show_help: bool,
    pub help_scroll_offset: usize,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let theme_variant = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
            ThemeVariant::Dark
        });

        let mut keybindings = KeybindingRegistry::new();
        let warnings = keybindings.apply_overrides(&config.keybindings);
        for warning in &warnings {
            tracing::warn!(warning = %warning, "Keybinding override rejected");
        }

        let feed = FeedOrchestrator::new(config.feed_settings());
        let mut nav = FeedNavigationController::new(config.nav_settings());
        nav.set_len(feed.len());

        let capacity = NonZeroUsize::new(CARD_STATE_CAPACITY)
            .ok_or_else(|| anyhow::anyhow!("card state capacity must be non-zero"))?;

        let mut app = Self {
            feed,
            nav,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings,
            card_states: LruCache::new(capacity),
            card_area: Rect::default(),
            row_height_px: config.row_height_px,
            status_message: None,
            needs_redraw: true,
            show_help: false,
            help_scroll_offset: 0,
        };
        if let Some(first) = warnings.into_iter().next() {
            app.set_status(first);
        }
        Ok(app)
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant. Returns its name for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    // ========================================================================
    // Layout
    // ========================================================================

    /// Recompute the card area for a terminal of `width` x `height` cells and
    /// resize the viewport to match. A card area with no rows unmounts it.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.card_area = Rect::new(0, 0, width, height.saturating_sub(STATUS_HEIGHT));
        let extent = self.extent_px();
        if extent > 0.0 {
            self.nav.resize(extent);
        } else {
            self.nav.unmount();
        }
        tracing::debug!(width, height, extent, "Terminal resized");
        self.needs_redraw = true;
    }

    /// Height of one card in pixels.
    pub fn extent_px(&self) -> f64 {
        f64::from(self.card_area.height) * self.row_height_px
    }

    /// Cards overlapping the card area, top to bottom.
    pub fn visible_slots(&self) -> Vec<CardSlot> {
        let rows = self.card_area.height;
        let Some(viewport) = self.nav.viewport() else {
            return Vec::new();
        };
        if rows == 0 || self.feed.is_empty() {
            return Vec::new();
        }

        let offset_rows = (viewport.offset() / self.row_height_px).round() as i64;
        let rows_i = i64::from(rows);
        let first = (offset_rows / rows_i).max(0) as usize;

        let mut slots = Vec::with_capacity(2);
        for index in first..self.feed.len() {
            let top = index as i64 * rows_i - offset_rows;
            if top >= rows_i {
                break;
            }
            if top + rows_i <= 0 {
                continue;
            }
            slots.push(CardSlot {
                index,
                top: top as i32,
                height: rows,
            });
        }
        slots
    }

    // ========================================================================
    // Feed Wiring
    // ========================================================================

    /// Hand controller events to the orchestrator and reconcile the results.
    pub fn apply_nav(&mut self, events: Vec<NavEvent>) {
        if events.is_empty() {
            return;
        }
        let update = self.feed.apply(&events);
        if update.appended > 0 {
            self.nav.set_len(self.feed.len());
        }
        if update.active_changed {
            self.sync_active_cards();
        }
        self.needs_redraw = true;
    }

    /// Tell every mounted card whether it is the active one.
    fn sync_active_cards(&mut self) {
        let active_id = self.feed.active_item().map(MediaItem::id);
        for (id, state) in self.card_states.iter_mut() {
            state.set_active(active_id == Some(id.as_str()));
        }
    }

    /// Advance one frame: viewport motion, settle handling, card playback.
    pub fn tick(&mut self, dt: Duration) {
        let events = self.nav.tick(dt);
        let moving = self.nav.viewport().is_some_and(|v| v.is_moving());
        self.apply_nav(events);

        let mut rng = rand::thread_rng();
        let mut changed = false;
        for slot in self.visible_slots() {
            let Some(item) = self.feed.items().get(slot.index) else {
                continue;
            };
            let active = self.feed.is_active(slot.index);
            let state = self
                .card_states
                .get_or_insert_mut(item.id().to_string(), || mount_card(item, active));
            changed |= state.tick(dt, active, &mut rng);
        }

        if moving || changed {
            self.needs_redraw = true;
        }
    }

    // ========================================================================
    // Card State
    // ========================================================================

    /// View state of a mounted card, without touching its recency.
    pub fn card_state(&self, id: &str) -> Option<&CardState> {
        self.card_states.peek(id)
    }

    pub fn mounted_cards(&self) -> usize {
        self.card_states.len()
    }

    fn active_card_state_mut(&mut self) -> Option<&mut CardState> {
        let item = self.feed.active_item()?;
        Some(
            self.card_states
                .get_or_insert_mut(item.id().to_string(), || mount_card(item, true)),
        )
    }

    /// Play or pause the active video. Returns the new playing state.
    pub fn toggle_play(&mut self) -> Option<bool> {
        match self.active_card_state_mut()? {
            CardState::Video(video) => Some(video.toggle()),
            _ => None,
        }
    }

    /// Start a round on the active game card.
    pub fn start_game(&mut self) -> bool {
        match self.active_card_state_mut() {
            Some(CardState::Game(game)) => {
                game.start(&mut rand::thread_rng());
                self.needs_redraw = true;
                true
            }
            _ => false,
        }
    }

    /// A click inside the card area. Pops bubbles when it lands on the
    /// active, running game. Returns the points gained.
    pub fn click(&mut self, column: u16, row: u16) -> u32 {
        let Some(active) = self.feed.active_index() else {
            return 0;
        };
        let Some(slot) = self.visible_slots().into_iter().find(|s| s.index == active) else {
            return 0;
        };
        let area = self.card_area;
        if area.width == 0 || area.height == 0 {
            return 0;
        }

        let x = (f64::from(column.saturating_sub(area.x)) + 0.5) / f64::from(area.width);
        let card_row = i32::from(row) - i32::from(area.y) - slot.top;
        let y = (f64::from(card_row) + 0.5) / f64::from(slot.height);
        if !(0.0..=1.0).contains(&y) {
            return 0;
        }
        // Terminal cells are roughly twice as tall as they are wide
        let aspect = f64::from(area.width) / 2.0 / f64::from(area.height);

        let Some(CardState::Game(game)) = self.active_card_state_mut() else {
            return 0;
        };
        let gained = game.pop_at(x, y, aspect, &mut rand::thread_rng());
        if gained == 0 {
            return 0;
        }
        let score = game.score;
        if let Some(id) = self.feed.active_item().map(|item| item.id().to_string()) {
            if self.feed.record_high_score(&id, score) {
                self.set_status(format!("New high score: {}", score));
            }
        }
        self.needs_redraw = true;
        gained
    }
}

/// Fresh view state for a card entering the screen.
fn mount_card(item: &MediaItem, active: bool) -> CardState {
    let mut state = CardState::for_item(item);
    state.set_active(active);
    tracing::trace!(id = item.id(), active, "Card mounted");
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card_state::{Bubble, VIDEO_LOAD_TIME};
    use pretty_assertions::assert_eq;
    use tokio::time;

    const FRAME: Duration = Duration::from_millis(40);

    fn test_app() -> App {
        let mut app = App::new(&Config::default()).unwrap();
        app.resize(80, 25);
        app
    }

    fn run_frames(app: &mut App, frames: usize) {
        for _ in 0..frames {
            app.tick(FRAME);
        }
    }

    #[test]
    fn test_new_app_starts_on_first_card() {
        let app = test_app();
        assert_eq!(app.feed.len(), 10);
        assert_eq!(app.nav.len(), 10);
        assert_eq!(app.feed.active_index(), Some(0));
        assert_eq!(app.card_area, Rect::new(0, 0, 80, 24));
        assert_eq!(app.extent_px(), 24.0 * 16.0);
    }

    #[test]
    fn test_visible_slots_at_rest() {
        let app = test_app();
        assert_eq!(
            app.visible_slots(),
            vec![CardSlot {
                index: 0,
                top: 0,
                height: 24
            }]
        );
    }

    #[test]
    fn test_visible_slots_mid_scroll() {
        let mut app = test_app();
        app.nav.scroll_by(12.0 * 16.0);
        app.tick(Duration::ZERO);
        let slots = app.visible_slots();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].top, -12);
        assert_eq!(slots[1].top, 12);
    }

    #[test]
    fn test_slot_clip() {
        let area = Rect::new(0, 0, 80, 24);
        let slot = CardSlot {
            index: 1,
            top: 12,
            height: 24,
        };
        assert_eq!(slot.clip(area), Some(Rect::new(0, 12, 80, 12)));
        let gone = CardSlot {
            index: 2,
            top: 24,
            height: 24,
        };
        assert_eq!(gone.clip(area), None);
    }

    #[test]
    fn test_navigation_pages_in_more_cards() {
        let mut app = test_app();
        for _ in 0..7 {
            assert!(app.nav.navigate(crate::nav::Direction::Forward));
            run_frames(&mut app, 20);
        }
        assert_eq!(app.feed.active_index(), Some(7));
        assert_eq!(app.feed.len(), 15);
        assert_eq!(app.nav.len(), 15);
    }

    #[test]
    fn test_zero_height_unmounts() {
        let mut app = test_app();
        app.resize(80, 1);
        assert!(!app.nav.is_mounted());
        assert!(app.visible_slots().is_empty());
    }

    #[test]
    fn test_video_plays_only_while_active() {
        let mut app = test_app();
        app.nav.settle_index(2);
        let events = vec![NavEvent::ActiveIndexChanged(2)];
        app.apply_nav(events);
        // Mount through the toggle path, then load
        assert_eq!(app.toggle_play(), Some(false));
        assert_eq!(app.toggle_play(), Some(true));

        app.nav.scroll_to_index(3);
        run_frames(&mut app, 20);
        assert_eq!(app.feed.active_index(), Some(3));
        match app.card_state("video-2") {
            Some(CardState::Video(video)) => assert!(!video.playing),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn test_toggle_play_requires_video() {
        let mut app = test_app();
        assert_eq!(app.toggle_play(), None);
        assert!(!app.start_game());
    }

    #[test]
    fn test_video_progress_advances_when_loaded() {
        let mut app = test_app();
        app.nav.scroll_to_index(2);
        run_frames(&mut app, 20);
        let frames = (VIDEO_LOAD_TIME.as_millis() / FRAME.as_millis()) as usize + 5;
        run_frames(&mut app, frames);
        match app.card_state("video-2") {
            Some(CardState::Video(video)) => {
                assert!(video.playing);
                assert!(video.position > Duration::ZERO);
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn test_click_pops_bubble_and_records_high_score() {
        let mut app = test_app();
        app.nav.scroll_to_index(3);
        run_frames(&mut app, 20);
        assert_eq!(app.feed.active_index(), Some(3));
        assert!(app.start_game());

        if let Some(CardState::Game(game)) = app.active_card_state_mut() {
            game.bubbles = vec![Bubble {
                x: 0.5,
                y: 0.5,
                radius: 0.2,
                speed: 0.0,
                hue: 0,
            }];
        }
        assert_eq!(app.click(40, 12), 10);
        assert_eq!(app.feed.high_score("game-3"), 10);
        assert!(app.status_message.is_some());
        // Misses score nothing
        assert_eq!(app.click(0, 0), 0);
    }

    #[test]
    fn test_card_states_are_bounded() {
        let mut app = test_app();
        for i in 1..15 {
            app.nav.scroll_to_index(i);
            run_frames(&mut app, 20);
        }
        assert!(app.mounted_cards() <= CARD_STATE_CAPACITY);
        assert!(app.card_state("text-0").is_none());
    }

    #[test]
    fn test_cycle_theme() {
        let mut app = test_app();
        assert_eq!(app.cycle_theme(), "Light");
        assert_eq!(app.theme_variant, ThemeVariant::Light);
        assert_eq!(app.cycle_theme(), "Dark");
    }

    #[test]
    fn test_bad_override_sets_status() {
        let mut config = Config::default();
        config
            .keybindings
            .insert("fly".to_string(), "f".to_string());
        let app = App::new(&config).unwrap();
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut app = test_app();
        time::pause();
        app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        app.clear_expired_status();
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }
}
