//! The hex view controller
//!
//! `HexView` owns the whole read-modify-render cycle: it holds the
//! layout configuration, scroll state, page cache, cursor, and
//! selection, reacts to [`Msg`] input events, and produces an abstract
//! [`DrawList`] for the host to rasterize.
//!
//! Every handler runs to completion synchronously. Handlers that move
//! the visible window fetch through the page cache before committing;
//! a failed source read rolls the state change back so the previous
//! frame remains reproducible.

use tracing::{debug, warn};

use crate::cache::{ByteSource, PageCache, ReadError};
use crate::codec;
use crate::config::{ConfigError, ItemFormat, LayoutConfig};
use crate::cursor::{Cursor, CursorMeta};
use crate::draw::{CursorDraw, DrawList, FillRect, PaletteSlot, SeparatorLine, ShadowDraw, TextRun};
use crate::geometry::{FontMetrics, PaneKind, PaneLayout, Point, Rect};
use crate::messages::{Damage, KeyCommand, Msg};
use crate::selection::Selection;

/// Error surfaced by configuration setters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Read(#[from] ReadError),
}

/// Scrollable hex grid over an external byte source.
pub struct HexView {
    config: LayoutConfig,
    metrics: FontMetrics,
    viewport_height: usize,
    layout: PaneLayout,
    /// Address of the first visible item.
    start_address: u64,
    cache: PageCache,
    source: Box<dyn ByteSource>,
    cursor: Cursor,
    selection: Selection,
    /// Pane an active selection drag started in, if any.
    drag: Option<PaneKind>,
}

impl HexView {
    /// Create a view over `source` with a default layout and a
    /// zero-height viewport. Send [`Msg::Resize`] to make rows visible.
    pub fn new(source: Box<dyn ByteSource>, metrics: FontMetrics) -> Self {
        let config = LayoutConfig::default();
        let layout = PaneLayout::compute(&config, metrics, 0);
        Self {
            config,
            metrics,
            viewport_height: 0,
            layout,
            start_address: 0,
            cache: PageCache::new(),
            source,
            cursor: Cursor::new(),
            selection: Selection::new(),
            drag: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    #[inline]
    pub fn layout(&self) -> &PaneLayout {
        &self.layout
    }

    #[inline]
    pub fn start_address(&self) -> u64 {
        self.start_address
    }

    #[inline]
    pub fn cursor_address(&self) -> u64 {
        self.cursor.addr
    }

    /// Normalized selection bounds, half-open.
    #[inline]
    pub fn selection(&self) -> Option<(u64, u64)> {
        self.selection.bounds()
    }

    /// One past the last visible address.
    #[inline]
    fn window_end(&self) -> u64 {
        self.start_address
            .saturating_add(self.layout.bytes_per_screen() as u64)
    }

    #[inline]
    fn cursor_in_window(&self) -> bool {
        self.layout.bytes_per_screen() > 0
            && self.cursor.addr >= self.start_address
            && self.cursor.addr < self.window_end()
    }

    // =========================================================================
    // Input dispatch
    // =========================================================================

    /// Apply one input event and report the region to repaint.
    pub fn update(&mut self, msg: Msg) -> Result<Damage, ReadError> {
        match msg {
            Msg::PointerDown { x, y } => self.on_pointer_down(x, y),
            Msg::PointerMove { x, y } => self.on_pointer_move(x, y),
            Msg::PointerUp => Ok(self.on_pointer_up()),
            Msg::Wheel { rows } => self.on_wheel(rows),
            Msg::Key(cmd) => self.on_key(cmd),
            Msg::Resize { height } => self.on_resize(height),
            Msg::BlinkTick => Ok(self.on_blink_tick()),
            Msg::Seek(addr) => self.seek(addr),
        }
    }

    fn on_pointer_down(&mut self, x: f64, y: f64) -> Result<Damage, ReadError> {
        let p = to_point(x, y);
        let Some(pane) = self.layout.pane_at(p) else {
            return Ok(Damage::None);
        };

        self.cursor.on_text_pane = pane == PaneKind::Text;
        self.drag = Some(pane);
        let addr = self.layout.pixel_to_address(p, self.start_address, pane);
        self.set_cursor_addr(addr)?;
        self.selection.begin(self.cursor.addr);
        Ok(Damage::Full)
    }

    fn on_pointer_move(&mut self, x: f64, y: f64) -> Result<Damage, ReadError> {
        let Some(pane) = self.drag else {
            return Ok(Damage::None);
        };

        // The drag stays in the pane it started in; coordinates are
        // clamped onto that pane.
        let addr = self
            .layout
            .pixel_to_address(to_point(x, y), self.start_address, pane);
        self.selection.update(addr);
        self.set_cursor_addr(addr)?;
        self.cursor.suspend();
        Ok(Damage::Full)
    }

    fn on_pointer_up(&mut self) -> Damage {
        if self.drag.take().is_none() {
            return Damage::None;
        }
        if self.cursor_in_window() {
            self.cursor.start_blinking();
            return Damage::Rect(self.cursor.meta.cell);
        }
        Damage::None
    }

    fn on_wheel(&mut self, rows: i32) -> Result<Damage, ReadError> {
        if rows == 0 {
            return Ok(Damage::None);
        }
        let delta = rows.unsigned_abs() as u64 * self.layout.row_byte_len() as u64;
        let new_start = if rows < 0 {
            self.start_address.saturating_sub(delta)
        } else {
            self.start_address.saturating_add(delta)
        };
        if new_start == self.start_address {
            return Ok(Damage::None);
        }

        self.move_window(new_start)?;
        if self.cursor_in_window() {
            // Keep the caret suspended while a selection is showing.
            if self.selection.is_empty() {
                self.cursor.start_blinking();
            }
            self.update_cursor_meta();
        } else {
            self.cursor.suspend();
        }
        Ok(Damage::Full)
    }

    fn on_key(&mut self, cmd: KeyCommand) -> Result<Damage, ReadError> {
        let row = self.layout.row_byte_len() as i64;
        let item = self.config.item_byte_len as i64;
        let page = self.layout.bytes_per_screen() as i64;
        let delta = match cmd {
            KeyCommand::LineUp => -row,
            KeyCommand::LineDown => row,
            KeyCommand::CharLeft => -item,
            KeyCommand::CharRight => item,
            KeyCommand::PageUp => -page,
            KeyCommand::PageDown => page,
        };
        self.move_cursor(delta)?;
        Ok(Damage::Full)
    }

    fn on_resize(&mut self, height: usize) -> Result<Damage, ReadError> {
        if height == self.viewport_height {
            return Ok(Damage::None);
        }
        self.apply_view_change(self.config, self.metrics, height)?;
        Ok(Damage::Full)
    }

    fn on_blink_tick(&mut self) -> Damage {
        if self.cursor.tick() && self.cursor_in_window() {
            Damage::Rect(self.cursor.meta.cell)
        } else {
            Damage::None
        }
    }

    /// External seek request: move the cursor, scrolling if needed.
    pub fn seek(&mut self, addr: u64) -> Result<Damage, ReadError> {
        self.set_cursor_addr(addr)?;
        Ok(Damage::Full)
    }

    /// Host focus gate for the caret.
    pub fn set_cursor_enabled(&mut self, enabled: bool) -> Damage {
        if enabled {
            if self.cursor_in_window() {
                self.cursor.start_blinking();
                self.update_cursor_meta();
                return Damage::Rect(self.cursor.meta.cell);
            }
            Damage::None
        } else {
            self.cursor.disable();
            Damage::Full
        }
    }

    // =========================================================================
    // Configuration setters
    // =========================================================================

    /// Replace the whole layout configuration atomically.
    pub fn set_layout(&mut self, config: LayoutConfig) -> Result<Damage, HexError> {
        if let Err(e) = config.validate() {
            warn!(error = %e, "rejected layout config");
            return Err(e.into());
        }
        self.apply_view_change(config, self.metrics, self.viewport_height)?;
        Ok(Damage::Full)
    }

    /// Set the item size in bytes (1, 2, 4 or 8).
    pub fn set_item_size(&mut self, nbytes: usize) -> Result<Damage, HexError> {
        let mut config = self.config;
        config.item_byte_len = nbytes;
        if !config.pairing_available() {
            config.group_size = 1;
        }
        self.set_layout(config)
    }

    /// Set the item format. Choosing [`ItemFormat::Float`] widens 1- and
    /// 2-byte items to 4 bytes.
    pub fn set_item_format(&mut self, format: ItemFormat) -> Result<Damage, HexError> {
        let mut config = self.config;
        config.format = format;
        if format == ItemFormat::Float && config.item_byte_len < 4 {
            config.item_byte_len = 4;
        }
        if !config.pairing_available() {
            config.group_size = 1;
        }
        self.set_layout(config)
    }

    /// Toggle byte-order reversal for multi-byte items.
    ///
    /// Pane geometry is unchanged; only the rendered values differ.
    pub fn set_big_endian(&mut self, big_endian: bool) -> Damage {
        if self.config.big_endian == big_endian {
            return Damage::None;
        }
        self.config.big_endian = big_endian;
        self.update_cursor_meta();
        Damage::Full
    }

    pub fn set_group_size(&mut self, group_size: usize) -> Result<Damage, HexError> {
        let mut config = self.config;
        config.group_size = group_size;
        self.set_layout(config)
    }

    pub fn set_column_count(&mut self, columns: usize) -> Result<Damage, HexError> {
        let mut config = self.config;
        config.columns = columns;
        self.set_layout(config)
    }

    /// Enter or leave hex-pairs mode: paired grouping halves the column
    /// count so the row byte length is preserved.
    pub fn set_hex_pairs(&mut self, enable: bool) -> Result<Damage, HexError> {
        let paired = self.config.group_size > 1;
        if enable == paired {
            return Ok(Damage::None);
        }
        let mut config = self.config;
        if enable {
            config.columns /= 2;
            config.group_size = 2;
        } else {
            config.columns *= 2;
            config.group_size = 1;
        }
        self.set_layout(config)
    }

    /// Adopt new host font metrics.
    pub fn set_font_metrics(&mut self, metrics: FontMetrics) -> Result<Damage, HexError> {
        self.apply_view_change(self.config, metrics, self.viewport_height)?;
        Ok(Damage::Full)
    }

    // =========================================================================
    // Window and cursor movement
    // =========================================================================

    fn move_cursor(&mut self, delta: i64) -> Result<(), ReadError> {
        let addr = if delta < 0 {
            self.cursor.addr.saturating_sub(delta.unsigned_abs())
        } else {
            self.cursor.addr.saturating_add(delta as u64)
        };
        self.set_cursor_addr(addr)
    }

    /// Move the cursor, scrolling the window when the target is not
    /// visible.
    ///
    /// When the row-aligned target is exactly one row past the window,
    /// the window extends forward by a single row so downward
    /// navigation does not re-center; any other miss jumps the window
    /// to the target's row.
    fn set_cursor_addr(&mut self, addr: u64) -> Result<(), ReadError> {
        let prev_addr = self.cursor.addr;
        self.cursor.addr = addr;
        self.cursor.suspend();

        if !self.cursor_in_window() {
            let rbl = self.layout.row_byte_len() as u64;
            let aligned = addr - addr % rbl;
            let bps = self.layout.bytes_per_screen() as u64;
            let new_start = if bps > 0 && aligned == self.start_address.saturating_add(bps) {
                self.start_address.saturating_add(rbl)
            } else {
                aligned
            };
            if let Err(e) = self.move_window(new_start) {
                self.cursor.addr = prev_addr;
                if self.cursor_in_window() {
                    self.update_cursor_meta();
                    self.cursor.start_blinking();
                }
                return Err(e);
            }
        }

        self.update_cursor_meta();
        self.cursor.start_blinking();
        Ok(())
    }

    /// Commit a new start address, fetching the bytes behind the new
    /// window first. The old start is restored on a failed read.
    fn move_window(&mut self, new_start: u64) -> Result<(), ReadError> {
        let prev = self.start_address;
        self.start_address = new_start;
        if let Err(e) = self.refresh_cache() {
            warn!(error = %e, addr = new_start, "window move failed, keeping previous window");
            self.start_address = prev;
            return Err(e);
        }
        debug!(from = prev, to = new_start, "window moved");
        Ok(())
    }

    fn refresh_cache(&mut self) -> Result<(), ReadError> {
        self.cache.ensure_covers(
            self.source.as_mut(),
            self.start_address,
            self.layout.bytes_per_screen(),
        )
    }

    /// Apply a config/metrics/height change transactionally: the new
    /// pane layout only sticks if the bytes behind the resulting window
    /// can be fetched.
    fn apply_view_change(
        &mut self,
        config: LayoutConfig,
        metrics: FontMetrics,
        height: usize,
    ) -> Result<(), ReadError> {
        let prev = (self.config, self.metrics, self.viewport_height, self.layout);

        self.config = config;
        self.metrics = metrics;
        self.viewport_height = height;
        self.layout = PaneLayout::compute(&config, metrics, height);

        if let Err(e) = self.refresh_cache() {
            warn!(error = %e, "layout change failed, keeping previous layout");
            (self.config, self.metrics, self.viewport_height, self.layout) = prev;
            return Err(e);
        }

        if self.cursor_in_window() {
            self.update_cursor_meta();
        }
        Ok(())
    }

    /// Recompute the cursor's and shadow's cached rects, glyphs, and
    /// color classes. No-op while the cursor is outside the window.
    fn update_cursor_meta(&mut self) {
        if !self.cursor_in_window() {
            return;
        }
        let offset = (self.cursor.addr - self.start_address) as usize;
        let ibl = self.config.item_byte_len;
        let item_off = offset - offset % ibl;

        let bytes = self.cache.run(item_off, ibl);
        let item_glyph = codec::render(codec::decode(&bytes[..ibl], &self.config), &self.config);
        let item_class = codec::byte_class(bytes[0]);
        let byte = self.cache.byte_at(offset);
        let text_glyph = codec::text_glyph(byte).to_string();
        let text_class = codec::byte_class(byte);

        let item_cell = self.layout.item_rect(offset);
        let text_cell = self.layout.text_rect(offset);
        let caret = |cell: Rect| Rect::new(cell.x, cell.y, self.layout.caret_width(), cell.height);

        let (active, shadow) = if self.cursor.on_text_pane {
            (
                CursorMeta {
                    caret: caret(text_cell),
                    cell: text_cell,
                    glyph: text_glyph,
                    class: Some(text_class),
                },
                CursorMeta {
                    caret: item_cell,
                    cell: item_cell,
                    glyph: item_glyph,
                    class: Some(item_class),
                },
            )
        } else {
            (
                CursorMeta {
                    caret: caret(item_cell),
                    cell: item_cell,
                    glyph: item_glyph,
                    class: Some(item_class),
                },
                CursorMeta {
                    caret: text_cell,
                    cell: text_cell,
                    glyph: text_glyph,
                    class: Some(text_class),
                },
            )
        };
        self.cursor.meta = active;
        self.cursor.shadow = shadow;
    }

    // =========================================================================
    // Frame production
    // =========================================================================

    /// Build the draw list for the current state.
    pub fn compute_frame(&self) -> DrawList {
        let mut list = DrawList::default();
        let lines = self.layout.visible_lines();
        if lines == 0 {
            return list;
        }

        let rbl = self.layout.row_byte_len();
        let bps = self.layout.bytes_per_screen();
        let lh = self.layout.metrics().line_height;
        debug_assert!(self.cache.covered_len() >= bps);

        let sel = self.selection.clamped(self.start_address, self.window_end());
        let selected = |offset: usize| sel.is_some_and(|(s, e)| offset >= s && offset < e);

        if let Some((s, e)) = sel {
            let mut panes = vec![PaneKind::Items];
            if self.config.show_text_pane {
                panes.push(PaneKind::Text);
            }
            for pane in panes {
                for rect in self.layout.selection_regions(s, e, pane).iter() {
                    list.selection.push(FillRect {
                        rect,
                        color: PaletteSlot::SelectionBackground,
                    });
                }
            }
        }

        let addr_area = self.layout.addr_area();
        for line in 0..lines {
            let addr = self.start_address.wrapping_add((line * rbl) as u64);
            list.address_runs.push(TextRun {
                rect: Rect::new(addr_area.x, line * lh, addr_area.width, lh),
                text: codec::render_address(addr, &self.config),
                color: PaletteSlot::Address,
            });
        }

        let ibl = self.config.item_byte_len;
        for offset in (0..bps).step_by(ibl) {
            let bytes = self.cache.run(offset, ibl);
            let value = codec::decode(&bytes[..ibl], &self.config);
            let color = if selected(offset) {
                PaletteSlot::SelectionText
            } else {
                codec::byte_class(bytes[0]).into()
            };
            list.item_runs.push(TextRun {
                rect: self.layout.item_rect(offset),
                text: codec::render(value, &self.config),
                color,
            });
        }

        if self.config.show_text_pane {
            for offset in 0..bps {
                let byte = self.cache.byte_at(offset);
                let color = if selected(offset) {
                    PaletteSlot::SelectionText
                } else {
                    codec::byte_class(byte).into()
                };
                list.text_runs.push(TextRun {
                    rect: self.layout.text_rect(offset),
                    text: codec::text_glyph(byte).to_string(),
                    color,
                });
            }
        }

        for x in self.layout.separator_xs() {
            list.separators.push(SeparatorLine {
                x,
                height: lines * lh,
            });
        }

        if self.cursor.is_drawn() && self.cursor_in_window() {
            list.cursor = Some(CursorDraw {
                caret: self.cursor.meta.caret,
                cell: self.cursor.meta.cell,
                glyph: self.cursor.meta.glyph.clone(),
                color: self
                    .cursor
                    .meta
                    .class
                    .map_or(PaletteSlot::Default, Into::into),
                filled: self.cursor.blink_visible,
            });
            // The shadow mirrors into the opposite pane when that pane
            // is visible.
            if self.cursor.on_text_pane || self.config.show_text_pane {
                list.shadow = Some(ShadowDraw {
                    outline: self.cursor.shadow.cell,
                    glyph: self.cursor.shadow.glyph.clone(),
                    color: PaletteSlot::ShadowOutline,
                });
            }
        }

        list
    }
}

fn to_point(x: f64, y: f64) -> Point {
    Point::new(x.max(0.0) as usize, y.max(0.0) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PatternSource;

    impl ByteSource for PatternSource {
        fn read(&mut self, addr: u64, len: u32) -> Result<Vec<u8>, ReadError> {
            Ok((0..len as u64).map(|i| (addr + i) as u8).collect())
        }
    }

    const METRICS: FontMetrics = FontMetrics {
        line_height: 16,
        char_width: 8,
    };

    fn view() -> HexView {
        let mut view = HexView::new(Box::new(PatternSource), METRICS);
        view.update(Msg::Resize { height: 8 * 16 }).unwrap();
        view
    }

    #[test]
    fn test_new_view_is_empty_until_resized() {
        let view = HexView::new(Box::new(PatternSource), METRICS);
        assert!(view.compute_frame().is_empty());
    }

    #[test]
    fn test_resize_populates_frame() {
        let view = view();
        let frame = view.compute_frame();
        assert_eq!(frame.address_runs.len(), 8);
        assert_eq!(frame.item_runs.len(), 8 * 16);
        assert_eq!(frame.text_runs.len(), 8 * 16);
        assert_eq!(frame.separators.len(), 2);
    }

    #[test]
    fn test_resize_to_zero_yields_empty_frame() {
        let mut view = view();
        view.update(Msg::Resize { height: 0 }).unwrap();
        assert!(view.compute_frame().is_empty());
    }

    #[test]
    fn test_item_runs_render_source_bytes() {
        let view = view();
        let frame = view.compute_frame();
        assert_eq!(frame.item_runs[0].text, "00");
        assert_eq!(frame.item_runs[0].color, PaletteSlot::ZeroByte);
        assert_eq!(frame.item_runs[0x41].text, "41");
        assert_eq!(frame.item_runs[0x41].color, PaletteSlot::Printable);
        assert_eq!(frame.text_runs[0x41].text, "A");
    }

    #[test]
    fn test_wheel_scrolls_by_rows() {
        let mut view = view();
        view.update(Msg::Wheel { rows: 3 }).unwrap();
        assert_eq!(view.start_address(), 48);
        view.update(Msg::Wheel { rows: -3 }).unwrap();
        assert_eq!(view.start_address(), 0);
    }

    #[test]
    fn test_wheel_up_saturates_at_zero() {
        let mut view = view();
        assert_eq!(view.update(Msg::Wheel { rows: -1 }).unwrap(), Damage::None);
        assert_eq!(view.start_address(), 0);
    }

    #[test]
    fn test_blink_tick_damages_cursor_cell_only() {
        let mut view = view();
        view.seek(0x10).unwrap();
        let cell = view.compute_frame().cursor.unwrap().cell;
        match view.update(Msg::BlinkTick).unwrap() {
            Damage::Rect(rect) => assert_eq!(rect, cell),
            other => panic!("expected cursor rect damage, got {:?}", other),
        }
        // Phase toggled off.
        assert!(!view.compute_frame().cursor.unwrap().filled);
    }

    #[test]
    fn test_set_big_endian_updates_cursor_glyph() {
        let mut view = view();
        view.set_item_size(2).unwrap();
        view.seek(0).unwrap();
        assert_eq!(view.compute_frame().cursor.unwrap().glyph, "0x0100");
        view.set_big_endian(true);
        assert_eq!(view.compute_frame().cursor.unwrap().glyph, "0x0001");
    }

    #[test]
    fn test_invalid_setter_leaves_config_unchanged() {
        let mut view = view();
        let before = *view.config();
        assert!(view.set_item_size(3).is_err());
        assert!(view.set_column_count(0).is_err());
        assert_eq!(*view.config(), before);
    }

    #[test]
    fn test_float_format_widens_item() {
        let mut view = view();
        view.set_item_format(ItemFormat::Float).unwrap();
        assert_eq!(view.config().item_byte_len, 4);
    }

    #[test]
    fn test_hex_pairs_roundtrip_preserves_row_bytes() {
        let mut view = view();
        view.set_hex_pairs(true).unwrap();
        assert_eq!(view.config().columns, 8);
        assert_eq!(view.config().group_size, 2);
        assert_eq!(view.config().row_byte_len(), 16);
        view.set_hex_pairs(false).unwrap();
        assert_eq!(view.config().columns, 16);
        assert_eq!(view.config().group_size, 1);
    }
}
