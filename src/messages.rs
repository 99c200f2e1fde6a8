//! Input vocabulary and damage reporting
//!
//! All state changes flow through [`Msg`] values handed to
//! `HexView::update`; every update answers with the [`Damage`] region
//! the host needs to repaint.

use crate::geometry::Rect;

/// Rows scrolled per conventional wheel notch.
pub const WHEEL_NOTCH_ROWS: i32 = 3;

/// Keyboard navigation commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    LineUp,
    LineDown,
    CharLeft,
    CharRight,
    PageUp,
    PageDown,
}

/// Abstract input events delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Msg {
    /// Primary button pressed at viewport pixel coordinates.
    PointerDown { x: f64, y: f64 },
    /// Pointer moved (selection drag while the button is held).
    PointerMove { x: f64, y: f64 },
    /// Primary button released.
    PointerUp,
    /// Wheel delta in rows; positive scrolls forward.
    Wheel { rows: i32 },
    Key(KeyCommand),
    /// Viewport height changed, in pixels. Zero is legal and yields an
    /// empty frame.
    Resize { height: usize },
    /// Periodic blink callback from the host scheduler.
    BlinkTick,
    /// External request to move the cursor to an address.
    Seek(u64),
}

/// Region the host must repaint after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Damage {
    /// Nothing changed.
    #[default]
    None,
    /// Repaint the whole viewport.
    Full,
    /// Repaint a single rect (cursor blink, caret resume).
    Rect(Rect),
}
