#![forbid(unsafe_code)]

//! Windowed rendering of an unbounded record list.
//!
//! A fixed pool of display slots covers the viewport plus a little slack;
//! scrolling repositions and repopulates the pool instead of creating rows,
//! so rendering cost is bounded by pool size no matter how large the list
//! grows. Repaints are idempotent and may be invoked redundantly.

/// Explicit renderer configuration; nothing here is ambient state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportConfig {
    /// Fixed row height in pixels.
    pub row_height: u64,
    /// Visible viewport height in pixels.
    pub viewport_height: u64,
    /// Extra slots guarding partially-visible rows at scroll boundaries.
    pub pool_slack: usize,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            row_height: 28,
            viewport_height: 400,
            pool_slack: 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewportError {
    ZeroRowHeight,
    ZeroViewportHeight,
}

impl std::fmt::Display for ViewportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroRowHeight => write!(f, "row height must be positive"),
            Self::ZeroViewportHeight => write!(f, "viewport height must be positive"),
        }
    }
}

impl std::error::Error for ViewportError {}

/// One reusable display slot. Hidden slots carry no item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Slot {
    /// Logical index of the item this slot shows, when visible.
    pub item_index: Option<usize>,
    /// Absolute offset of the slot within the scroll range, in pixels.
    pub top_px: u64,
}

impl Slot {
    pub fn is_visible(&self) -> bool {
        self.item_index.is_some()
    }

    fn hidden() -> Self {
        Self::default()
    }
}

#[derive(Debug)]
pub struct Viewport {
    config: ViewportConfig,
    slots: Vec<Slot>,
    item_count: usize,
    scroll_offset: u64,
}

impl Viewport {
    pub fn new(config: ViewportConfig) -> Result<Self, ViewportError> {
        if config.row_height == 0 {
            return Err(ViewportError::ZeroRowHeight);
        }
        if config.viewport_height == 0 {
            return Err(ViewportError::ZeroViewportHeight);
        }

        let visible_rows = config.viewport_height.div_ceil(config.row_height) as usize;
        let mut viewport = Self {
            config,
            slots: vec![Slot::hidden(); visible_rows + config.pool_slack],
            item_count: 0,
            scroll_offset: 0,
        };
        viewport.layout(0);
        Ok(viewport)
    }

    /// Fixed for the life of the viewport; never exceeded by live rows.
    pub fn pool_size(&self) -> usize {
        self.slots.len()
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    /// Total scroll height: the spacer that makes the scroll range match
    /// the logical list size.
    pub fn spacer_height(&self) -> u64 {
        self.item_count as u64 * self.config.row_height
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.spacer_height()
            .saturating_sub(self.config.viewport_height)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Resizes the logical list, clamping the scroll position and
    /// repainting the pool.
    pub fn set_item_count(&mut self, item_count: usize) {
        self.item_count = item_count;
        let clamped = self.scroll_offset.min(self.max_scroll_offset());
        self.layout(clamped);
    }

    /// Scrolls to `offset` (clamped) and repaints. Safe to call
    /// redundantly: each repaint fully supersedes the previous one.
    pub fn scroll_to(&mut self, offset: u64) {
        let clamped = offset.min(self.max_scroll_offset());
        self.layout(clamped);
    }

    /// First logical index intersecting the viewport.
    pub fn first_visible_index(&self) -> usize {
        (self.scroll_offset / self.config.row_height) as usize
    }

    fn layout(&mut self, offset: u64) {
        self.scroll_offset = offset;
        let first = (offset / self.config.row_height) as usize;
        for (slot_ordinal, slot) in self.slots.iter_mut().enumerate() {
            let index = first + slot_ordinal;
            if index < self.item_count {
                slot.item_index = Some(index);
                slot.top_px = index as u64 * self.config.row_height;
            } else {
                *slot = Slot::hidden();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(n: usize) -> Viewport {
        let mut viewport = Viewport::new(ViewportConfig {
            row_height: 28,
            viewport_height: 400,
            pool_slack: 2,
        })
        .unwrap();
        viewport.set_item_count(n);
        viewport
    }

    #[test]
    fn pool_size_is_viewport_rows_plus_slack() {
        // ceil(400 / 28) = 15, plus 2 slack.
        assert_eq!(viewport(100_000).pool_size(), 17);
    }

    #[test]
    fn live_slots_stay_bounded_for_any_scroll_position() {
        let mut viewport = viewport(100_000);
        for offset in [0, 1, 27, 28, 399, 400, 1_000_000, 2_799_600, u64::MAX] {
            viewport.scroll_to(offset);
            assert_eq!(viewport.pool_size(), 17);
            let visible = viewport.slots().iter().filter(|s| s.is_visible()).count();
            assert!(visible <= viewport.pool_size());
        }
    }

    #[test]
    fn top_slot_tracks_scroll_offset() {
        let mut viewport = viewport(100_000);
        for offset in [0u64, 27, 28, 29, 123_456, 1_000_000] {
            viewport.scroll_to(offset);
            let expected = (offset / 28) as usize;
            assert_eq!(viewport.first_visible_index(), expected);
            assert_eq!(viewport.slots()[0].item_index, Some(expected));
            assert_eq!(viewport.slots()[0].top_px, expected as u64 * 28);
        }
    }

    #[test]
    fn scroll_is_clamped_to_spacer_range() {
        let mut viewport = viewport(100_000);
        viewport.scroll_to(u64::MAX);
        assert_eq!(viewport.scroll_offset(), 100_000 * 28 - 400);
    }

    #[test]
    fn slots_past_the_end_are_hidden() {
        let mut viewport = viewport(10);
        viewport.scroll_to(0);
        let visible = viewport.slots().iter().filter(|s| s.is_visible()).count();
        assert_eq!(visible, 10);
        assert!(viewport.slots()[10..].iter().all(|s| !s.is_visible()));
    }

    #[test]
    fn empty_list_hides_every_slot() {
        let viewport = viewport(0);
        assert!(viewport.slots().iter().all(|s| !s.is_visible()));
        assert_eq!(viewport.spacer_height(), 0);
    }

    #[test]
    fn shrinking_the_list_clamps_the_offset() {
        let mut viewport = viewport(100_000);
        viewport.scroll_to(u64::MAX);
        viewport.set_item_count(20);
        assert_eq!(viewport.scroll_offset(), 20 * 28 - 400);
        assert!(viewport.slots()[0].is_visible());
    }

    #[test]
    fn repaint_is_idempotent() {
        let mut viewport = viewport(500);
        viewport.scroll_to(777);
        let first: Vec<Slot> = viewport.slots().to_vec();
        viewport.scroll_to(777);
        assert_eq!(viewport.slots(), first.as_slice());
    }
}
