//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles
//! separately.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use hexpane::{ByteSource, FontMetrics, HexView, Msg, ReadError};

/// Metrics of an imaginary 8x16 monospaced font.
pub const METRICS: FontMetrics = FontMetrics {
    line_height: 16,
    char_width: 8,
};

/// Source where every byte equals its address truncated to 8 bits.
pub struct PatternSource;

impl ByteSource for PatternSource {
    fn read(&mut self, addr: u64, len: u32) -> Result<Vec<u8>, ReadError> {
        Ok((0..len as u64).map(|i| (addr + i) as u8).collect())
    }
}

/// Pattern source that fails while the shared flag is set.
pub struct FlakySource {
    fail: Rc<Cell<bool>>,
}

impl ByteSource for FlakySource {
    fn read(&mut self, addr: u64, len: u32) -> Result<Vec<u8>, ReadError> {
        if self.fail.get() {
            return Err(ReadError::Unmapped { addr });
        }
        Ok((0..len as u64).map(|i| (addr + i) as u8).collect())
    }
}

/// Expected pattern byte for an address.
pub fn pattern_byte(addr: u64) -> u8 {
    addr as u8
}

/// A view over the pattern source showing `lines` rows of the default
/// 16-byte layout.
pub fn test_view(lines: usize) -> HexView {
    let mut view = HexView::new(Box::new(PatternSource), METRICS);
    view.update(Msg::Resize {
        height: lines * METRICS.line_height,
    })
    .expect("initial resize");
    view
}

/// A view whose source can be made to fail via the returned flag.
pub fn flaky_view(lines: usize) -> (HexView, Rc<Cell<bool>>) {
    let fail = Rc::new(Cell::new(false));
    let mut view = HexView::new(
        Box::new(FlakySource { fail: fail.clone() }),
        METRICS,
    );
    view.update(Msg::Resize {
        height: lines * METRICS.line_height,
    })
    .expect("initial resize");
    (view, fail)
}

/// Center of the item cell showing `addr`, for synthesizing clicks.
pub fn item_center(view: &HexView, addr: u64) -> (f64, f64) {
    let rect = view
        .layout()
        .address_to_item_rect(addr, view.start_address());
    (
        (rect.x + rect.width / 2) as f64,
        (rect.y + rect.height / 2) as f64,
    )
}

/// Center of the text-pane cell showing `addr`.
pub fn text_center(view: &HexView, addr: u64) -> (f64, f64) {
    let rect = view
        .layout()
        .address_to_text_rect(addr, view.start_address());
    (
        (rect.x + rect.width / 2) as f64,
        (rect.y + rect.height / 2) as f64,
    )
}
