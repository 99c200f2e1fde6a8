//! Cursor state and the blink state machine
//!
//! The cursor tracks the active edit position, which may sit in either
//! the item pane or the text pane; a shadow mirrors the same address in
//! the opposite pane for display only. Blinking is driven by an
//! external scheduler calling [`Cursor::tick`]; dragging and scrolling
//! suspend it without touching the address.

use crate::codec::ByteClass;
use crate::geometry::Rect;

/// Suggested scheduler period for blink ticks, in milliseconds.
pub const BLINK_INTERVAL_MS: u64 = 1000;

/// Blink state machine.
///
/// `Idle` means the cursor is disabled (no focus) and not drawn;
/// `Hidden` suspends the periodic toggle during drags and scrolls while
/// keeping the address; `Blinking` toggles visibility on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorState {
    Idle,
    #[default]
    Blinking,
    Hidden,
}

/// Cached display data for one caret position, recomputed on any state
/// change and never left stale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorMeta {
    /// Thin caret bar rect.
    pub caret: Rect,
    /// Full cell rect behind the caret.
    pub cell: Rect,
    /// Rendered item string or text-pane character.
    pub glyph: String,
    /// Color class of the byte under the cursor.
    pub class: Option<ByteClass>,
}

/// The active edit position plus its mirrored shadow.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    pub addr: u64,
    /// Active pane: text pane when set, item pane otherwise.
    pub on_text_pane: bool,
    /// Phase of the blink; only meaningful while `Blinking`.
    pub blink_visible: bool,
    pub state: CursorState,
    /// Cached geometry/glyph for the active pane.
    pub meta: CursorMeta,
    /// Cached geometry/glyph for the opposite pane.
    pub shadow: CursorMeta,
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            blink_visible: true,
            ..Default::default()
        }
    }

    /// Resume periodic blinking with the caret shown.
    pub fn start_blinking(&mut self) {
        self.state = CursorState::Blinking;
        self.blink_visible = true;
    }

    /// Suspend blinking (drag or scroll) without losing the address.
    pub fn suspend(&mut self) {
        self.state = CursorState::Hidden;
    }

    /// Disable the cursor entirely (focus lost).
    pub fn disable(&mut self) {
        self.state = CursorState::Idle;
    }

    /// Whether the cursor should be part of the frame at all.
    #[inline]
    pub fn is_drawn(&self) -> bool {
        self.state == CursorState::Blinking
    }

    /// Scheduler tick: toggle the blink phase while blinking.
    ///
    /// Returns true when the visible state changed and the cursor cell
    /// needs repainting. Safe to call in any state.
    pub fn tick(&mut self) -> bool {
        if self.state != CursorState::Blinking {
            return false;
        }
        self.blink_visible = !self.blink_visible;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_toggles_only_while_blinking() {
        let mut cursor = Cursor::new();
        assert!(cursor.blink_visible);

        assert!(cursor.tick());
        assert!(!cursor.blink_visible);
        assert!(cursor.tick());
        assert!(cursor.blink_visible);

        cursor.suspend();
        assert!(!cursor.tick());
        assert!(cursor.blink_visible);

        cursor.disable();
        assert!(!cursor.tick());
    }

    #[test]
    fn test_resume_shows_caret_immediately() {
        let mut cursor = Cursor::new();
        cursor.tick(); // caret now off
        cursor.suspend();
        cursor.start_blinking();
        assert!(cursor.blink_visible);
        assert!(cursor.is_drawn());
    }

    #[test]
    fn test_suspend_keeps_address() {
        let mut cursor = Cursor::new();
        cursor.addr = 0x1234;
        cursor.suspend();
        assert_eq!(cursor.addr, 0x1234);
        assert!(!cursor.is_drawn());
    }
}
