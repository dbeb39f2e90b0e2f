//! Follow-the-newest-turn scrolling, independent of any rendering backend.

use crate::events::ConversationEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// A request for the view to move its conversation container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: ScrollTarget,
    pub behavior: ScrollBehavior,
}

impl ScrollRequest {
    pub const SMOOTH_TO_BOTTOM: ScrollRequest = ScrollRequest {
        target: ScrollTarget::Bottom,
        behavior: ScrollBehavior::Smooth,
    };

    /// Every change to the turn list scrolls smoothly to the bottom.
    pub fn for_event(event: &ConversationEvent) -> Option<Self> {
        event.touches_turns().then_some(Self::SMOOTH_TO_BOTTOM)
    }
}

/// Scroll geometry of a conversation container, in pixels or rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub scroll_top: u32,
    pub scroll_height: u32,
    pub client_height: u32,
}

impl Viewport {
    pub fn new(client_height: u32) -> Self {
        Self { scroll_top: 0, scroll_height: 0, client_height }
    }

    pub fn max_scroll_top(&self) -> u32 {
        self.scroll_height.saturating_sub(self.client_height)
    }

    pub fn is_at_bottom(&self) -> bool {
        self.scroll_top >= self.max_scroll_top()
    }

    /// Grows the content without moving the scroll position.
    pub fn grow(&mut self, height: u32) {
        self.scroll_height = self.scroll_height.saturating_add(height);
    }

    pub fn set_content_height(&mut self, height: u32) {
        self.scroll_height = height;
        self.scroll_top = self.scroll_top.min(self.max_scroll_top());
    }

    pub fn apply(&mut self, request: ScrollRequest) {
        match request.target {
            ScrollTarget::Bottom => self.scroll_top = self.max_scroll_top(),
        }
    }
}
