//! Anchored byte-range selection
//!
//! The anchor stays fixed where the drag began while the head follows
//! the pointer; normalized bounds are recomputed from both ends, so the
//! drag direction never matters. The range is half-open: a selection
//! from anchor 3 to head 10 covers `[3, 11)`.

/// An anchored byte range, or nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    range: Option<Anchored>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Anchored {
    anchor: u64,
    head: u64,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a selection: anchor and head both land on `addr`.
    pub fn begin(&mut self, addr: u64) {
        self.range = Some(Anchored {
            anchor: addr,
            head: addr,
        });
    }

    /// Move the head while the anchor stays put. Starts a selection if
    /// none is active.
    pub fn update(&mut self, addr: u64) {
        match &mut self.range {
            Some(r) => r.head = addr,
            None => self.begin(addr),
        }
    }

    pub fn clear(&mut self) {
        self.range = None;
    }

    /// True while no anchor is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.range.is_none()
    }

    /// Normalized inclusive start.
    pub fn start(&self) -> Option<u64> {
        self.range.map(|r| r.anchor.min(r.head))
    }

    /// Normalized exclusive end (one past the last selected byte).
    pub fn end(&self) -> Option<u64> {
        self.range.map(|r| r.anchor.max(r.head) + 1)
    }

    /// Normalized `(start, end)` half-open bounds.
    pub fn bounds(&self) -> Option<(u64, u64)> {
        self.range
            .map(|r| (r.anchor.min(r.head), r.anchor.max(r.head) + 1))
    }

    /// Does the normalized range overlap the half-open window?
    pub fn intersects(&self, window_start: u64, window_end: u64) -> bool {
        match self.bounds() {
            Some((start, end)) => start < window_end && end > window_start,
            None => false,
        }
    }

    /// Intersection with the window as window-relative byte offsets,
    /// half-open. `None` when the selection misses the window entirely.
    pub fn clamped(&self, window_start: u64, window_end: u64) -> Option<(usize, usize)> {
        if !self.intersects(window_start, window_end) {
            return None;
        }
        let (start, end) = self.bounds()?;
        let s = start.max(window_start) - window_start;
        let e = end.min(window_end) - window_start;
        Some((s as usize, e as usize))
    }
}
