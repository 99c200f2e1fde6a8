//! Paged byte cache over an external byte source
//!
//! The cache fetches fixed 4 KiB pages covering the visible window and
//! answers byte lookups relative to the originally requested (unaligned)
//! address. A refetch replaces the retained page set only when every
//! page read succeeds, so a failing source never leaves the view with a
//! half-populated window.

use thiserror::Error;
use tracing::debug;

/// Fixed page granularity for source reads.
pub const PAGE_SIZE: usize = 4096;

/// Failure reported by a [`ByteSource`] read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("address {addr:#x} is not mapped")]
    Unmapped { addr: u64 },
    #[error("short read at {addr:#x}: wanted {want} bytes, got {got}")]
    ShortRead { addr: u64, want: u32, got: usize },
    #[error("read failed: {0}")]
    Io(String),
}

/// Provider of the underlying byte space (process memory, file, ...).
///
/// `read` must return exactly `len` bytes or fail; partial success is
/// not defined and is treated as [`ReadError::ShortRead`] by the cache.
pub trait ByteSource {
    fn read(&mut self, addr: u64, len: u32) -> Result<Vec<u8>, ReadError>;
}

/// Page-aligned cache of the bytes behind the visible window.
#[derive(Debug, Default)]
pub struct PageCache {
    /// Page-aligned address of the first retained page.
    base_addr: u64,
    /// Where the requested range begins inside the first page.
    start_offset: usize,
    /// Length of the last requested (unaligned) range.
    covered_len: usize,
    pages: Vec<Vec<u8>>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address of the first retained page.
    #[inline]
    pub fn base_addr(&self) -> u64 {
        self.base_addr
    }

    /// Bytes addressable through [`byte_at`](Self::byte_at).
    #[inline]
    pub fn covered_len(&self) -> usize {
        self.covered_len
    }

    /// Fetch pages covering `[addr, addr + len)` from `source`.
    ///
    /// The previous page set is kept intact if any page read fails. A
    /// zero-length request retains no pages.
    pub fn ensure_covers(
        &mut self,
        source: &mut dyn ByteSource,
        addr: u64,
        len: usize,
    ) -> Result<(), ReadError> {
        let base = addr & !(PAGE_SIZE as u64 - 1);
        let start_offset = (addr - base) as usize;

        if len == 0 {
            self.base_addr = base;
            self.start_offset = start_offset;
            self.covered_len = 0;
            self.pages.clear();
            return Ok(());
        }

        let total = (start_offset + len + PAGE_SIZE - 1) & !(PAGE_SIZE - 1);
        let page_count = total / PAGE_SIZE;

        let mut pages = Vec::with_capacity(page_count);
        let mut page_addr = base;
        for _ in 0..page_count {
            let page = source.read(page_addr, PAGE_SIZE as u32)?;
            if page.len() != PAGE_SIZE {
                return Err(ReadError::ShortRead {
                    addr: page_addr,
                    want: PAGE_SIZE as u32,
                    got: page.len(),
                });
            }
            pages.push(page);
            page_addr += PAGE_SIZE as u64;
        }

        debug!(addr, len, page_count, "page cache refilled");
        self.base_addr = base;
        self.start_offset = start_offset;
        self.covered_len = len;
        self.pages = pages;
        Ok(())
    }

    /// Byte at `offset` relative to the last requested address.
    ///
    /// Contract: `offset` must be inside the last `ensure_covers` range.
    /// Violations are a bug in the caller, not a runtime condition.
    #[inline]
    pub fn byte_at(&self, offset: usize) -> u8 {
        assert!(
            offset < self.covered_len,
            "byte offset {} outside covered window of {} bytes",
            offset,
            self.covered_len
        );
        let total = offset + self.start_offset;
        self.pages[total / PAGE_SIZE][total % PAGE_SIZE]
    }

    /// Copy a short run (an item's bytes) starting at `offset`.
    ///
    /// The run may straddle a page boundary. Same contract as
    /// [`byte_at`](Self::byte_at); `len` is at most 8.
    pub fn run(&self, offset: usize, len: usize) -> [u8; 8] {
        debug_assert!(len <= 8);
        assert!(
            offset + len <= self.covered_len,
            "byte run {}..{} outside covered window of {} bytes",
            offset,
            offset + len,
            self.covered_len
        );
        let mut buf = [0u8; 8];
        for (i, slot) in buf.iter_mut().take(len).enumerate() {
            let total = offset + self.start_offset + i;
            *slot = self.pages[total / PAGE_SIZE][total % PAGE_SIZE];
        }
        buf
    }
}
