//! Active-card tracking and navigation.
//!
//! The controller owns the viewport and is the single writer of the active
//! index. Touch and wheel input only *request* a target via smooth scroll;
//! the index changes when the viewport reports that motion has settled.
//! That keeps a wheel tick from being counted twice: once as a trigger and
//! again when its animation is observed.

use std::time::Duration;

use super::gesture::{wheel_direction, Direction, TouchTracker, DEFAULT_SWIPE_THRESHOLD_PX};
use super::viewport::{Motion, ScrollBehavior, ScrollTiming, Viewport};

/// Remaining-item count at which more content is requested.
pub const LOOK_AHEAD: usize = 3;

/// Notifications for the owner of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    /// The settled active index changed.
    ActiveIndexChanged(usize),
    /// The settled index is within [`LOOK_AHEAD`] items of the end.
    NeedMore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Idle,
    /// Motion is in flight. `target` is `None` for free scrolling.
    Settling { target: Option<usize> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavSettings {
    pub swipe_threshold_px: f64,
    pub timing: ScrollTiming,
}

impl Default for NavSettings {
    fn default() -> Self {
        Self {
            swipe_threshold_px: DEFAULT_SWIPE_THRESHOLD_PX,
            timing: ScrollTiming::default(),
        }
    }
}

/// Infer the item at rest under scroll offset `offset`.
///
/// `round(offset / extent)`; an offset exactly halfway between two items
/// selects the later one.
pub fn infer_index(offset: f64, extent: f64) -> usize {
    if extent <= 0.0 || !offset.is_finite() {
        return 0;
    }
    (offset / extent).round().max(0.0) as usize
}

pub struct FeedNavigationController {
    settings: NavSettings,
    viewport: Option<Viewport>,
    len: usize,
    active_index: Option<usize>,
    state: NavState,
    touch: TouchTracker,
}

impl FeedNavigationController {
    pub fn new(settings: NavSettings) -> Self {
        Self {
            settings,
            viewport: None,
            len: 0,
            active_index: None,
            state: NavState::Idle,
            touch: TouchTracker::default(),
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.viewport.is_some()
    }

    /// Attach a viewport whose items are `extent` pixels tall.
    ///
    /// The viewport starts on the current active item.
    pub fn mount(&mut self, extent: f64) {
        let mut viewport = Viewport::new(extent, self.settings.timing);
        viewport.set_content_len(self.len);
        if let Some(active) = self.active_index {
            viewport.scroll_to(active as f64 * viewport.extent(), ScrollBehavior::Instant);
            // Mounting on the current item is not a new settle.
            viewport.tick(Duration::ZERO);
        }
        tracing::debug!(extent, len = self.len, "Viewport mounted");
        self.viewport = Some(viewport);
    }

    pub fn unmount(&mut self) {
        self.viewport = None;
        self.touch.cancel();
        self.state = NavState::Idle;
    }

    pub fn resize(&mut self, extent: f64) {
        match self.viewport.as_mut() {
            Some(viewport) => viewport.resize(extent),
            None => self.mount(extent),
        }
    }

    /// Record the current sequence length. The sequence only grows, but a
    /// shorter length still clamps the active index.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if let Some(viewport) = self.viewport.as_mut() {
            viewport.set_content_len(len);
        }
        self.active_index = match self.active_index {
            _ if len == 0 => None,
            None => Some(0),
            Some(i) => Some(i.min(len - 1)),
        };
    }

    /// Report that scrolling came to rest on `new_index`.
    ///
    /// Out-of-range indices are ignored entirely. In range, the index becomes
    /// active (with a change event if it moved) and a pagination request is
    /// emitted when the index is near the end.
    pub fn settle_index(&mut self, new_index: usize) -> Vec<NavEvent> {
        if new_index >= self.len {
            tracing::debug!(new_index, len = self.len, "Ignoring out-of-range settle");
            return Vec::new();
        }

        match self.state {
            NavState::Settling {
                target: Some(target),
            } if target != new_index => {
                tracing::debug!(new_index, target, "Settled away from pending target");
            }
            _ => self.state = NavState::Idle,
        }

        let mut events = Vec::with_capacity(2);
        if self.active_index != Some(new_index) {
            self.active_index = Some(new_index);
            events.push(NavEvent::ActiveIndexChanged(new_index));
        }
        if new_index >= self.len.saturating_sub(LOOK_AHEAD) {
            events.push(NavEvent::NeedMore);
        }
        events
    }

    /// Smooth-scroll to `index`, clamped to the loaded range.
    ///
    /// Returns `false` when nothing was requested: no viewport, no items, or
    /// the clamped target is already the active item at rest.
    pub fn scroll_to_index(&mut self, index: usize) -> bool {
        if self.len == 0 {
            return false;
        }
        let target = index.min(self.len - 1);
        let Some(viewport) = self.viewport.as_mut() else {
            return false;
        };
        if self.active_index == Some(target) && !viewport.is_moving() {
            return false;
        }
        viewport.scroll_to(target as f64 * viewport.extent(), ScrollBehavior::Smooth);
        self.state = NavState::Settling {
            target: Some(target),
        };
        tracing::debug!(target, "Scroll requested");
        true
    }

    /// Step one item from the settled active index. No-op at either end.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        if self.viewport.is_none() {
            return false;
        }
        let Some(active) = self.active_index else {
            return false;
        };
        match direction.step(active, self.len) {
            Some(target) => self.scroll_to_index(target),
            None => false,
        }
    }

    /// One wheel event. Only the sign of the delta matters.
    pub fn wheel(&mut self, delta_y: f64) -> bool {
        match wheel_direction(delta_y) {
            Some(direction) => self.navigate(direction),
            None => false,
        }
    }

    pub fn touch_start(&mut self, y: f64) {
        if self.viewport.is_some() {
            self.touch.start(y);
        }
    }

    pub fn touch_move(&mut self, y: f64) {
        self.touch.move_to(y);
    }

    /// Move an active touch and drag the content with it, like a finger
    /// held on the feed. Releasing either swipes or lets the snap resolve.
    pub fn touch_drag(&mut self, y: f64) {
        let Some(last) = self.touch.last_y() else {
            return;
        };
        self.touch.move_to(y);
        self.scroll_by(last - y);
    }

    /// End the touch. Returns the direction navigated, if any.
    pub fn touch_end(&mut self) -> Option<Direction> {
        let direction = self.touch.finish(self.settings.swipe_threshold_px)?;
        self.navigate(direction).then_some(direction)
    }

    /// Free scroll by `delta` pixels without a target; the viewport snaps
    /// once it has been idle for the settle delay.
    pub fn scroll_by(&mut self, delta: f64) {
        if self.len == 0 {
            return;
        }
        if let Some(viewport) = self.viewport.as_mut() {
            viewport.scroll_by(delta);
            self.state = NavState::Settling { target: None };
        }
    }

    /// Advance the viewport by one frame and reconcile any settle.
    pub fn tick(&mut self, dt: Duration) -> Vec<NavEvent> {
        if self.len == 0 {
            return Vec::new();
        }
        let Some(viewport) = self.viewport.as_mut() else {
            return Vec::new();
        };
        match viewport.tick(dt) {
            Motion::Settled(offset) => {
                let index = infer_index(offset, viewport.extent());
                self.settle_index(index)
            }
            Motion::Moved(_) | Motion::Still => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FRAME: Duration = Duration::from_millis(40);
    const EXTENT: f64 = 800.0;

    fn controller(len: usize) -> FeedNavigationController {
        let mut c = FeedNavigationController::new(NavSettings::default());
        c.set_len(len);
        c.mount(EXTENT);
        c
    }

    fn settle(c: &mut FeedNavigationController) -> Vec<NavEvent> {
        let mut events = Vec::new();
        for _ in 0..50 {
            events.extend(c.tick(FRAME));
            if c.state() == NavState::Idle {
                break;
            }
        }
        events
    }

    #[test]
    fn test_infer_index_rounds_half_up() {
        assert_eq!(infer_index(0.0, EXTENT), 0);
        assert_eq!(infer_index(399.0, EXTENT), 0);
        assert_eq!(infer_index(400.0, EXTENT), 1);
        assert_eq!(infer_index(1200.0, EXTENT), 2);
        assert_eq!(infer_index(-50.0, EXTENT), 0);
        assert_eq!(infer_index(100.0, 0.0), 0);
    }

    #[test]
    fn test_initial_state() {
        let c = controller(10);
        assert_eq!(c.active_index(), Some(0));
        assert_eq!(c.state(), NavState::Idle);
    }

    #[test]
    fn test_empty_sequence_takes_no_action() {
        let mut c = controller(0);
        assert_eq!(c.active_index(), None);
        assert!(!c.navigate(Direction::Forward));
        assert!(!c.wheel(1.0));
        assert!(c.settle_index(0).is_empty());
        c.scroll_by(100.0);
        assert!(c.tick(FRAME).is_empty());
    }

    #[test]
    fn test_unmounted_is_noop() {
        let mut c = FeedNavigationController::new(NavSettings::default());
        c.set_len(10);
        assert!(!c.navigate(Direction::Forward));
        c.touch_start(300.0);
        c.touch_move(100.0);
        assert_eq!(c.touch_end(), None);
        assert!(c.tick(FRAME).is_empty());
    }

    #[test]
    fn test_navigate_then_settle() {
        let mut c = controller(10);
        assert!(c.navigate(Direction::Forward));
        assert_eq!(c.state(), NavState::Settling { target: Some(1) });
        // Active index only moves on settle
        assert_eq!(c.active_index(), Some(0));

        let events = settle(&mut c);
        assert_eq!(events, vec![NavEvent::ActiveIndexChanged(1)]);
        assert_eq!(c.active_index(), Some(1));
        assert_eq!(c.state(), NavState::Idle);
    }

    #[test]
    fn test_boundaries_are_noops() {
        let mut c = controller(3);
        assert!(!c.navigate(Direction::Backward));
        assert_eq!(c.state(), NavState::Idle);

        c.settle_index(2);
        assert!(!c.navigate(Direction::Forward));
        assert_eq!(c.active_index(), Some(2));
    }

    #[test]
    fn test_rapid_triggers_coalesce() {
        let mut c = controller(10);
        assert!(c.wheel(1.0));
        c.tick(FRAME);
        assert!(c.wheel(1.0));
        let events = settle(&mut c);
        assert_eq!(events, vec![NavEvent::ActiveIndexChanged(1)]);
    }

    #[test]
    fn test_new_trigger_supersedes_target() {
        let mut c = controller(10);
        c.settle_index(4);
        assert!(c.navigate(Direction::Forward));
        assert!(c.navigate(Direction::Backward));
        assert_eq!(c.state(), NavState::Settling { target: Some(3) });
        settle(&mut c);
        assert_eq!(c.active_index(), Some(3));
    }

    #[test]
    fn test_out_of_range_settle_ignored() {
        let mut c = controller(5);
        c.settle_index(2);
        assert!(c.settle_index(5).is_empty());
        assert!(c.settle_index(usize::MAX).is_empty());
        assert_eq!(c.active_index(), Some(2));
    }

    #[test]
    fn test_need_more_near_end() {
        let mut c = controller(10);
        assert_eq!(c.settle_index(6), vec![NavEvent::ActiveIndexChanged(6)]);
        assert_eq!(
            c.settle_index(7),
            vec![NavEvent::ActiveIndexChanged(7), NavEvent::NeedMore]
        );
        // Repeated settle on the same item re-requests without a change event
        assert_eq!(c.settle_index(7), vec![NavEvent::NeedMore]);
    }

    #[test]
    fn test_short_sequence_always_needs_more() {
        let mut c = controller(2);
        assert_eq!(c.settle_index(0), vec![NavEvent::NeedMore]);
    }

    #[test]
    fn test_touch_threshold() {
        let mut c = controller(10);
        c.touch_start(500.0);
        c.touch_move(451.0); // 49px
        assert_eq!(c.touch_end(), None);
        assert_eq!(c.state(), NavState::Idle);

        c.touch_start(500.0);
        c.touch_move(449.0); // 51px up
        assert_eq!(c.touch_end(), Some(Direction::Forward));
        settle(&mut c);
        assert_eq!(c.active_index(), Some(1));

        c.touch_start(449.0);
        c.touch_move(500.0); // 51px down
        assert_eq!(c.touch_end(), Some(Direction::Backward));
        settle(&mut c);
        assert_eq!(c.active_index(), Some(0));
    }

    #[test]
    fn test_drag_moves_content_with_pointer() {
        let mut c = controller(10);
        c.touch_drag(300.0); // no touch in progress
        assert_eq!(c.viewport().map(Viewport::offset), Some(0.0));

        c.touch_start(500.0);
        c.touch_drag(480.0);
        c.touch_drag(470.0);
        assert_eq!(c.viewport().map(Viewport::offset), Some(30.0));
        assert_eq!(c.state(), NavState::Settling { target: None });

        // 30px is short of a swipe: the snap pulls the card back
        assert_eq!(c.touch_end(), None);
        assert!(settle(&mut c).is_empty());
        assert_eq!(c.active_index(), Some(0));
        assert_eq!(c.viewport().map(Viewport::offset), Some(0.0));
        assert_eq!(c.state(), NavState::Idle);

        c.touch_start(500.0);
        c.touch_drag(420.0);
        assert_eq!(c.touch_end(), Some(Direction::Forward));
        assert_eq!(settle(&mut c), vec![NavEvent::ActiveIndexChanged(1)]);
        assert_eq!(c.viewport().map(Viewport::offset), Some(EXTENT));
    }

    #[test]
    fn test_free_scroll_snaps_and_settles() {
        let mut c = controller(10);
        c.scroll_by(EXTENT * 1.6);
        assert_eq!(c.state(), NavState::Settling { target: None });
        let events = settle(&mut c);
        assert_eq!(events, vec![NavEvent::ActiveIndexChanged(2)]);
        assert_eq!(c.state(), NavState::Idle);
    }

    #[test]
    fn test_settle_away_from_target_keeps_settling() {
        let mut c = controller(10);
        c.navigate(Direction::Forward);
        let events = c.settle_index(5);
        assert_eq!(events, vec![NavEvent::ActiveIndexChanged(5)]);
        assert_eq!(c.state(), NavState::Settling { target: Some(1) });
    }

    #[test]
    fn test_growing_length_releases_boundary() {
        let mut c = controller(3);
        c.settle_index(2);
        assert!(!c.navigate(Direction::Forward));
        c.set_len(8);
        assert!(c.navigate(Direction::Forward));
        settle(&mut c);
        assert_eq!(c.active_index(), Some(3));
    }

    #[test]
    fn test_resize_keeps_active_item() {
        let mut c = controller(10);
        c.navigate(Direction::Forward);
        settle(&mut c);
        c.resize(400.0);
        let viewport = c.viewport().unwrap();
        assert_eq!(viewport.offset(), 400.0);
        assert_eq!(infer_index(viewport.offset(), viewport.extent()), 1);
    }
}
