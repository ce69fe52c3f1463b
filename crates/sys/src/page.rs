//! Page-size discovery and page arithmetic.

use linux_raw_sys::auxvec::{AT_NULL, AT_PAGESZ};
use spin::Once;

use crate::fs::OwnedFd;

/// Used when the auxiliary vector cannot be read.
pub const FALLBACK_PAGE_SIZE: usize = 4096;

const WORD: usize = core::mem::size_of::<usize>();

static PAGE_SIZE: Once<usize> = Once::new();

/// The kernel's page size for this process, read once from `AT_PAGESZ`.
pub fn page_size() -> usize {
    *PAGE_SIZE.call_once(|| match auxv_page_size() {
        Some(size) => size,
        None => {
            log::warn!("[SYS] AT_PAGESZ unavailable, assuming {FALLBACK_PAGE_SIZE}");
            FALLBACK_PAGE_SIZE
        }
    })
}

/// Walk `/proc/self/auxv` (pairs of native words) looking for `AT_PAGESZ`.
fn auxv_page_size() -> Option<usize> {
    let fd = OwnedFd::open_readonly(c"/proc/self/auxv").ok()?;
    let mut entry = [0u8; 2 * WORD];
    loop {
        fd.read_exact(&mut entry).ok()?;
        let (key, value) = entry.split_at(WORD);
        let key = usize::from_ne_bytes(key.try_into().ok()?);
        let value = usize::from_ne_bytes(value.try_into().ok()?);
        match key {
            k if k == AT_NULL as usize => return None,
            k if k == AT_PAGESZ as usize => {
                return value.is_power_of_two().then_some(value);
            }
            _ => {}
        }
    }
}

/// Number of pages touched by `len` bytes starting on a page boundary.
#[must_use]
pub const fn pages_spanned(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size)
}

/// Convert a byte offset to a page count. `None` if the offset is not a
/// multiple of `page_size` or the count does not fit in a word.
#[must_use]
pub fn offset_in_pages(offset: u64, page_size: usize) -> Option<usize> {
    let page_size = page_size as u64;
    if offset % page_size != 0 {
        return None;
    }
    usize::try_from(offset / page_size).ok()
}
