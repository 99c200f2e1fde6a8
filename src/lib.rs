//! hexpane - hex view core for memory and file viewers
//!
//! This crate implements the logic half of a hex-dump widget: the
//! address/geometry engine, the paged byte cache, the item codec, and
//! the cursor/selection state machines. It decides, for any screen
//! coordinate or address, what value is shown, where it sits, and how
//! selection and cursor state evolve under input.
//!
//! The host supplies the other half: a [`cache::ByteSource`] backing
//! the address space, measured [`geometry::FontMetrics`] for a
//! monospaced font, input events as [`messages::Msg`] values, and a
//! rasterizer for the [`draw::DrawList`] frames the view produces.

pub mod cache;
pub mod codec;
pub mod config;
pub mod cursor;
pub mod draw;
pub mod geometry;
pub mod messages;
pub mod selection;
pub mod widget;

// Re-export the types a host touches day to day.
pub use cache::{ByteSource, PageCache, ReadError, PAGE_SIZE};
pub use codec::{ByteClass, TaggedValue};
pub use config::{ConfigError, ItemFormat, LayoutConfig};
pub use cursor::{CursorState, BLINK_INTERVAL_MS};
pub use draw::{DrawList, PaletteSlot};
pub use geometry::{FontMetrics, PaneKind, PaneLayout, Point, Rect};
pub use messages::{Damage, KeyCommand, Msg, WHEEL_NOTCH_ROWS};
pub use selection::Selection;
pub use widget::{HexError, HexView};
