//! Centralized grid geometry for rendering and hit-testing
//!
//! Single source of truth for the mapping between byte addresses,
//! (row, column) grid positions, and pixel rectangles. Both the frame
//! builder and the pointer handlers go through the same `PaneLayout`
//! value, so a rect produced for an address always hit-tests back to
//! that address.
//!
//! All functions here are pure and hold no view state; a `PaneLayout`
//! is recomputed from configuration, font metrics, and viewport height
//! whenever any of those change.

use crate::config::LayoutConfig;

/// Characters of spacing between column groups.
pub const COLUMN_SPACING_CHARS: usize = 1;
/// Characters of spacing between panes.
pub const AREA_SPACING_CHARS: usize = 2;

/// Host-measured metrics of the active monospaced font, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontMetrics {
    pub line_height: usize,
    pub char_width: usize,
}

/// A point in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// A pixel rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the right edge.
    #[inline]
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// One past the bottom edge.
    #[inline]
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}

/// Which grid pane a position refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneKind {
    /// Formatted item grid.
    Items,
    /// Parallel printable-character pane.
    Text,
}

/// Selection highlight split into at most three pixel regions per pane:
/// a partial top row, a row-aligned body block, and a partial bottom
/// row. A same-row selection collapses into `top` alone (or `body` when
/// it covers the row exactly).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighlightRegions {
    pub top: Option<Rect>,
    pub body: Option<Rect>,
    pub bottom: Option<Rect>,
}

impl HighlightRegions {
    /// Present regions in paint order.
    pub fn iter(&self) -> impl Iterator<Item = Rect> {
        [self.top, self.body, self.bottom].into_iter().flatten()
    }
}

/// Pane rectangles and derived cell widths for the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneLayout {
    metrics: FontMetrics,
    addr_area: Rect,
    item_area: Rect,
    text_area: Rect,
    visible_lines: usize,
    // Copied out of the config so the mapping functions are
    // self-contained.
    item_byte_len: usize,
    group_size: usize,
    columns: usize,
    item_char_len: usize,
    show_text_pane: bool,
}

impl PaneLayout {
    /// Compute pane positions for a validated config.
    ///
    /// `metrics` must be non-degenerate (the host measured a real font).
    pub fn compute(config: &LayoutConfig, metrics: FontMetrics, viewport_height: usize) -> Self {
        assert!(
            metrics.line_height > 0 && metrics.char_width > 0,
            "font metrics must be positive"
        );

        let cw = metrics.char_width;
        let visible_lines = viewport_height / metrics.line_height;
        let area_height = visible_lines * metrics.line_height;
        let area_spacing = AREA_SPACING_CHARS * cw;

        let item_char_len = config.item_char_len();
        let item_width = item_char_len * cw;
        let group_width = config.group_size * item_width;
        let column_spacing = COLUMN_SPACING_CHARS * cw;
        let item_row_width = config.columns * group_width + (config.columns - 1) * column_spacing;

        let addr_area = Rect::new(0, 0, config.address_char_len() * cw, area_height);
        let item_area = Rect::new(addr_area.right() + area_spacing, 0, item_row_width, area_height);
        let text_width = if config.show_text_pane {
            config.row_byte_len() * cw
        } else {
            0
        };
        let text_area = Rect::new(item_area.right() + area_spacing, 0, text_width, area_height);

        Self {
            metrics,
            addr_area,
            item_area,
            text_area,
            visible_lines,
            item_byte_len: config.item_byte_len,
            group_size: config.group_size,
            columns: config.columns,
            item_char_len,
            show_text_pane: config.show_text_pane,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    #[inline]
    pub fn addr_area(&self) -> Rect {
        self.addr_area
    }

    #[inline]
    pub fn item_area(&self) -> Rect {
        self.item_area
    }

    #[inline]
    pub fn text_area(&self) -> Rect {
        self.text_area
    }

    #[inline]
    pub fn visible_lines(&self) -> usize {
        self.visible_lines
    }

    #[inline]
    pub fn row_byte_len(&self) -> usize {
        self.columns * self.group_size * self.item_byte_len
    }

    #[inline]
    pub fn group_byte_len(&self) -> usize {
        self.group_size * self.item_byte_len
    }

    /// Bytes covered by the visible window.
    #[inline]
    pub fn bytes_per_screen(&self) -> usize {
        self.visible_lines * self.row_byte_len()
    }

    /// Width of one rendered item cell.
    #[inline]
    pub fn item_width(&self) -> usize {
        self.item_char_len * self.metrics.char_width
    }

    /// Width of one column group including its trailing spacing.
    #[inline]
    pub fn column_ex_width(&self) -> usize {
        self.group_size * self.item_width() + COLUMN_SPACING_CHARS * self.metrics.char_width
    }

    /// Width of the blinking caret bar.
    #[inline]
    pub fn caret_width(&self) -> usize {
        (self.metrics.char_width / 3).max(1)
    }

    /// Pane rect for hit-testing and highlight clamping.
    #[inline]
    pub fn pane_area(&self, pane: PaneKind) -> Rect {
        match pane {
            PaneKind::Items => self.item_area,
            PaneKind::Text => self.text_area,
        }
    }

    /// X positions of the vertical separator lines left of the item and
    /// text panes.
    pub fn separator_xs(&self) -> Vec<usize> {
        let mut xs = vec![self.item_area.x - self.metrics.char_width];
        if self.show_text_pane {
            xs.push(self.text_area.x - self.metrics.char_width);
        }
        xs
    }

    /// Which pane contains a point, if any.
    pub fn pane_at(&self, p: Point) -> Option<PaneKind> {
        if self.item_area.contains(p) {
            Some(PaneKind::Items)
        } else if self.show_text_pane && self.text_area.contains(p) {
            Some(PaneKind::Text)
        } else {
            None
        }
    }

    // =========================================================================
    // Address -> pixel
    // =========================================================================

    /// Cell rect of the item containing the window-relative byte
    /// `offset`.
    pub fn item_rect(&self, offset: usize) -> Rect {
        let rbl = self.row_byte_len();
        let y = self.item_area.y + (offset / rbl) * self.metrics.line_height;
        let mut rem = offset % rbl;

        let mut x = self.item_area.x + (rem / self.group_byte_len()) * self.column_ex_width();
        rem %= self.group_byte_len();
        x += (rem / self.item_byte_len) * self.item_width();

        Rect::new(x, y, self.item_width(), self.metrics.line_height)
    }

    /// Character cell rect of the window-relative byte `offset` in the
    /// text pane.
    pub fn text_rect(&self, offset: usize) -> Rect {
        let rbl = self.row_byte_len();
        let y = self.text_area.y + (offset / rbl) * self.metrics.line_height;
        let x = self.text_area.x + (offset % rbl) * self.metrics.char_width;
        Rect::new(x, y, self.metrics.char_width, self.metrics.line_height)
    }

    /// Item cell rect for an absolute address at or after the window
    /// start.
    #[inline]
    pub fn address_to_item_rect(&self, addr: u64, viewport_start: u64) -> Rect {
        debug_assert!(addr >= viewport_start);
        self.item_rect((addr - viewport_start) as usize)
    }

    /// Text cell rect for an absolute address at or after the window
    /// start.
    #[inline]
    pub fn address_to_text_rect(&self, addr: u64, viewport_start: u64) -> Rect {
        debug_assert!(addr >= viewport_start);
        self.text_rect((addr - viewport_start) as usize)
    }

    // =========================================================================
    // Pixel -> address
    // =========================================================================

    /// Resolve a pixel position to the address of the nearest valid
    /// cell in `pane`.
    ///
    /// Out-of-pane coordinates are clamped onto the pane first, and
    /// positions landing in inter-group spacing resolve to the item on
    /// their left, so this is a total function and the exact left
    /// inverse of the rect mappings above.
    pub fn pixel_to_address(&self, p: Point, viewport_start: u64, pane: PaneKind) -> u64 {
        let area = self.pane_area(pane);
        if self.visible_lines == 0 || area.width == 0 {
            return viewport_start;
        }

        let x = p.x.clamp(area.x, area.right() - 1) - area.x;
        let y = p.y.clamp(area.y, area.bottom() - 1) - area.y;

        let row = (y / self.metrics.line_height).min(self.visible_lines - 1);
        let intra_row = match pane {
            PaneKind::Items => {
                let group = (x / self.column_ex_width()).min(self.columns - 1);
                let rem = x % self.column_ex_width();
                let item = (rem / self.item_width()).min(self.group_size - 1);
                group * self.group_byte_len() + item * self.item_byte_len
            }
            PaneKind::Text => (x / self.metrics.char_width).min(self.row_byte_len() - 1),
        };

        viewport_start + (row * self.row_byte_len() + intra_row) as u64
    }

    // =========================================================================
    // Selection highlight geometry
    // =========================================================================

    /// Split a window-relative byte range (half-open, already clamped
    /// to the visible window) into highlight regions for `pane`.
    pub fn selection_regions(
        &self,
        start_off: usize,
        end_off: usize,
        pane: PaneKind,
    ) -> HighlightRegions {
        debug_assert!(start_off < end_off);
        debug_assert!(end_off <= self.bytes_per_screen());

        let rbl = self.row_byte_len();
        let lh = self.metrics.line_height;
        let area = self.pane_area(pane);
        let cell = |offset: usize| match pane {
            PaneKind::Items => self.item_rect(offset),
            PaneKind::Text => self.text_rect(offset),
        };

        let last = end_off - 1;
        let first_row = start_off / rbl;
        let last_row = last / rbl;

        let mut regions = HighlightRegions::default();

        if first_row == last_row {
            if start_off % rbl == 0 && end_off % rbl == 0 {
                regions.body = Some(Rect::new(area.x, area.y + first_row * lh, area.width, lh));
            } else {
                let begin = cell(start_off);
                let end = cell(last);
                regions.top = Some(Rect::new(begin.x, begin.y, end.right() - begin.x, lh));
            }
            return regions;
        }

        let mut body_first = first_row;
        let mut body_last = last_row;
        if start_off % rbl != 0 {
            let begin = cell(start_off);
            regions.top = Some(Rect::new(begin.x, begin.y, area.right() - begin.x, lh));
            body_first += 1;
        }
        if end_off % rbl != 0 {
            let end = cell(last);
            regions.bottom = Some(Rect::new(area.x, end.y, end.right() - area.x, lh));
            body_last -= 1;
        }
        if body_first <= body_last {
            regions.body = Some(Rect::new(
                area.x,
                area.y + body_first * lh,
                area.width,
                (body_last - body_first + 1) * lh,
            ));
        }

        regions
    }
}
