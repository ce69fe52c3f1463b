//! Address spans and the containment rule every scoped operation obeys.

use vmap_sys::page;

/// A byte range `[addr, addr + len)` in the process address space.
///
/// Carries no ownership; it is computed from a slice right before an
/// operation and dropped right after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub addr: usize,
    pub len: usize,
}

impl Span {
    #[must_use]
    pub const fn new(addr: usize, len: usize) -> Self {
        Self { addr, len }
    }

    /// The span a slice occupies.
    #[must_use]
    pub fn of(slice: &[u8]) -> Self {
        Self::new(slice.as_ptr() as usize, slice.len())
    }

    /// One past the last byte, or `None` if that overflows.
    #[must_use]
    pub const fn end(&self) -> Option<usize> {
        self.addr.checked_add(self.len)
    }

    /// True iff `inner` lies entirely within `self`.
    ///
    /// `inner.addr >= self.addr && inner.end <= self.end`. A span whose end
    /// overflows is never contained, and never contains anything.
    #[must_use]
    pub const fn contains(&self, inner: Span) -> bool {
        match (self.end(), inner.end()) {
            (Some(end), Some(inner_end)) => inner.addr >= self.addr && inner_end <= end,
            _ => false,
        }
    }

    /// Pages covered when the span starts on a page boundary.
    #[must_use]
    pub const fn pages(&self, page_size: usize) -> usize {
        page::pages_spanned(self.len, page_size)
    }
}
