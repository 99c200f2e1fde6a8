//! Abstract draw list
//!
//! A frame is a plain value the host rasterizes: colored text runs and
//! rectangles tagged with semantic palette slots. Keeping color policy
//! out of the core means the host's theme decides what a "zero byte" or
//! "selection background" looks like.

use crate::codec::ByteClass;
use crate::geometry::Rect;

/// Semantic color tag carried by draw entries in place of a concrete
/// color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteSlot {
    Address,
    Default,
    ZeroByte,
    Byte7f,
    ByteFf,
    Printable,
    SelectionBackground,
    SelectionText,
    Separator,
    CursorCell,
    ShadowOutline,
}

impl From<ByteClass> for PaletteSlot {
    fn from(class: ByteClass) -> Self {
        match class {
            ByteClass::Zero => PaletteSlot::ZeroByte,
            ByteClass::Cap7f => PaletteSlot::Byte7f,
            ByteClass::CapFf => PaletteSlot::ByteFf,
            ByteClass::Printable => PaletteSlot::Printable,
            ByteClass::Other => PaletteSlot::Default,
        }
    }
}

/// A positioned run of text in a single color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub rect: Rect,
    pub text: String,
    pub color: PaletteSlot,
}

/// A filled rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillRect {
    pub rect: Rect,
    pub color: PaletteSlot,
}

/// A one-pixel vertical separator line spanning the viewport height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeparatorLine {
    pub x: usize,
    pub height: usize,
}

/// The active caret with its cell glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorDraw {
    /// Thin caret bar.
    pub caret: Rect,
    /// Cell behind the caret; the glyph is drawn here.
    pub cell: Rect,
    pub glyph: String,
    pub color: PaletteSlot,
    /// Blink phase: when set the host fills the caret bar.
    pub filled: bool,
}

/// Dashed outline mirroring the cursor in the opposite pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowDraw {
    pub outline: Rect,
    pub glyph: String,
    pub color: PaletteSlot,
}

/// Everything the host needs to paint one frame, in paint order:
/// selection fills first, then text, then separators and the carets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub selection: Vec<FillRect>,
    pub address_runs: Vec<TextRun>,
    pub item_runs: Vec<TextRun>,
    pub text_runs: Vec<TextRun>,
    pub separators: Vec<SeparatorLine>,
    pub cursor: Option<CursorDraw>,
    pub shadow: Option<ShadowDraw>,
}

impl DrawList {
    /// True when there is nothing to paint (zero-height viewport).
    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
            && self.address_runs.is_empty()
            && self.item_runs.is_empty()
            && self.text_runs.is_empty()
            && self.cursor.is_none()
    }
}
