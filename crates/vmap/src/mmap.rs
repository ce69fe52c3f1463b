//! The mapped region.
//!
//! An [`Mmap`] owns one kernel mapping and exposes it as a byte slice. Every
//! operation comes in two forms: a whole-region one and a `_slice` one taking
//! a sub-slice of the buffer. The whole form is the `_slice` form applied to
//! the full buffer, so both go through the same checks, in this order:
//!
//! 1. the region must still be live (`MapError::Unmapped`),
//! 2. the slice must lie inside the mapping (`MapError::OutOfBounds`),
//! 3. only then is the kernel called.
//!
//! `msync`, `madvise`, `mprotect`, `mincore` and `munmap` want a page-aligned
//! start address. Sub-slices are forwarded as given; a misaligned one comes
//! back as `MapError::Kernel(EINVAL)`.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::ops::{Deref, DerefMut};

use vmap_sys::consts::{MINCORE_RESIDENT, NO_FD};
use vmap_sys::{RawFd, fs, mm, page};

use crate::error::MapError;
use crate::flags::{Advice, LockFlags, MapFlags, Protection, SyncMode, UncheckedAdvice};
use crate::region::Span;

/// A live memory mapping of a file, device or anonymous memory.
///
/// Reads and writes through `Deref`/`DerefMut` hit the mapped pages
/// directly; nothing is copied or buffered. The type is `Send + Sync`: shared
/// references only hand out `&[u8]`, and writing needs `&mut Mmap`. Other
/// processes mapping the same file are outside that guarantee.
///
/// Dropping a still-live region unmaps it.
pub struct Mmap {
    base: usize,
    len: usize,
    live: bool,
}

impl Mmap {
    /// Map the whole of `fd`, sized with a `statx` query.
    ///
    /// # Safety
    /// See [`Mmap::map_at`].
    pub unsafe fn map(fd: RawFd, prot: Protection, flags: MapFlags) -> Result<Self, MapError> {
        // SAFETY: forwarded to the caller.
        unsafe { Self::map_at(0, fd, 0, None, prot, flags) }
    }

    /// Map `len` bytes of `fd` starting at `offset`, or everything from
    /// `offset` to the end of the descriptor when `len` is `None`.
    ///
    /// # Safety
    /// See [`Mmap::map_at`].
    pub unsafe fn map_region(
        fd: RawFd,
        offset: u64,
        len: Option<usize>,
        prot: Protection,
        flags: MapFlags,
    ) -> Result<Self, MapError> {
        // SAFETY: forwarded to the caller.
        unsafe { Self::map_at(0, fd, offset, len, prot, flags) }
    }

    /// Map a window of `fd`, asking the kernel to place it at `addr_hint`.
    ///
    /// With `len == None` the length is the descriptor's current size minus
    /// `offset`; a failed size query returns `MapError::SizeQuery` and maps
    /// nothing. Protection that conflicts with how `fd` was opened is
    /// rejected by the kernel (`MapError::Kernel(EACCES)`), not detected here.
    ///
    /// # Safety
    /// The returned buffer is handed out as ordinary Rust slices, so:
    /// - the backing object must not be truncated while mapped (access past
    ///   its end raises `SIGBUS`), and must not be modified by anyone else
    ///   while a slice of it is borrowed;
    /// - `prot` must allow every access later made through `Deref` (read)
    ///   and `DerefMut` (write);
    /// - with `MapFlags::FIXED`, nothing in `[addr_hint, addr_hint + len)`
    ///   may still be in use, since the kernel silently replaces it.
    pub unsafe fn map_at(
        addr_hint: usize,
        fd: RawFd,
        offset: u64,
        len: Option<usize>,
        prot: Protection,
        flags: MapFlags,
    ) -> Result<Self, MapError> {
        let len = match len {
            Some(len) => len,
            None => {
                let size = fs::file_size(fd).map_err(MapError::SizeQuery)?;
                usize::try_from(size.saturating_sub(offset)).map_err(|_| MapError::TooLarge)?
            }
        };
        let base = mm::mmap(addr_hint, len, prot.bits(), flags.bits(), fd, offset)?;
        log::debug!(
            "[VMAP] mapped fd={fd} off={offset} len={len} at {base:#x} (prot={:#x}, flags={:#x})",
            prot.bits(),
            flags.bits()
        );
        Ok(Self {
            base,
            len,
            live: true,
        })
    }

    /// Map `len` bytes of zero-filled, read/write anonymous memory.
    pub fn map_anonymous(len: usize, flags: MapFlags) -> Result<Self, MapError> {
        // SAFETY: no backing object can change under the mapping, the kernel
        // picks the address, and the buffer is readable and writable.
        unsafe {
            Self::map_at(
                0,
                NO_FD,
                0,
                Some(len),
                Protection::READ | Protection::WRITE,
                (flags | MapFlags::ANONYMOUS) - MapFlags::FIXED - MapFlags::FIXED_NOREPLACE,
            )
        }
    }

    /// Length fixed at creation. Unchanged by unmapping.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// False once the whole region has been unmapped.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.live
    }

    /// Start of the mapping, null once unmapped.
    #[must_use]
    pub const fn as_ptr(&self) -> *const u8 {
        self.base as *const u8
    }

    /// The mapped bytes; empty once unmapped.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        if !self.live {
            return &[];
        }
        // SAFETY: while live, [base, base + len) is a mapping this value owns,
        // and the constructor's contract makes it readable.
        unsafe { core::slice::from_raw_parts(self.base as *const u8, self.len) }
    }

    /// The mapped bytes, writable; empty once unmapped.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        if !self.live {
            return &mut [];
        }
        // SAFETY: as in `as_slice`; `&mut self` makes this the only borrow.
        unsafe { core::slice::from_raw_parts_mut(self.base as *mut u8, self.len) }
    }

    const fn span(&self) -> Span {
        Span::new(self.base, self.len)
    }

    /// Liveness and containment checks shared by every operation.
    fn checked(&self, region: &[u8]) -> Result<Span, MapError> {
        if !self.live {
            return Err(MapError::Unmapped);
        }
        let span = Span::of(region);
        if !self.span().contains(span) {
            return Err(MapError::OutOfBounds);
        }
        Ok(span)
    }

    /// Write changes back to the backing object.
    ///
    /// Without a flush there is no guarantee changes reach the backing object
    /// before the region is unmapped. `SyncMode::SYNC` blocks until they do;
    /// `SyncMode::ASYNC` only schedules the write-back.
    pub fn flush(&self, mode: SyncMode) -> Result<(), MapError> {
        self.flush_slice(self.as_slice(), mode)
    }

    /// [`Mmap::flush`] restricted to `region`, a slice of this mapping.
    pub fn flush_slice(&self, region: &[u8], mode: SyncMode) -> Result<(), MapError> {
        let span = self.checked(region)?;
        mm::msync(span.addr, span.len, mode.bits())?;
        Ok(())
    }

    /// Hint the kernel about the expected access pattern.
    ///
    /// Success means the kernel accepted the advice value, not that it acted
    /// on it.
    pub fn advise(&self, advice: Advice) -> Result<(), MapError> {
        self.advise_slice(self.as_slice(), advice)
    }

    /// [`Mmap::advise`] restricted to `region`, a slice of this mapping.
    pub fn advise_slice(&self, region: &[u8], advice: Advice) -> Result<(), MapError> {
        self.madvise(region, advice.raw())
    }

    /// Forward any advice code, including the ones that discard pages.
    ///
    /// # Safety
    /// `DONT_NEED`, `FREE`, `REMOVE` and unknown codes may replace the
    /// contents of the affected pages (zero fill, fresh file contents, or a
    /// hole in the backing object). No slice of those pages may be borrowed
    /// across this call, and the caller must not rely on their previous
    /// contents afterwards.
    pub unsafe fn advise_unchecked(&self, advice: UncheckedAdvice) -> Result<(), MapError> {
        // SAFETY: forwarded to the caller.
        unsafe { self.advise_slice_unchecked(self.as_slice(), advice) }
    }

    /// [`Mmap::advise_unchecked`] restricted to `region`, a slice of this
    /// mapping.
    ///
    /// # Safety
    /// As for [`Mmap::advise_unchecked`], for the pages `region` covers. The
    /// borrow of `region` ends with this call.
    pub unsafe fn advise_slice_unchecked(
        &self,
        region: &[u8],
        advice: UncheckedAdvice,
    ) -> Result<(), MapError> {
        self.madvise(region, advice.raw())
    }

    fn madvise(&self, region: &[u8], advice: u32) -> Result<(), MapError> {
        let span = self.checked(region)?;
        mm::madvise(span.addr, span.len, advice)?;
        Ok(())
    }

    /// Change the protection of the whole mapping.
    ///
    /// # Safety
    /// Accesses the new protection does not allow fault in hardware. The
    /// caller must not read through `Deref` without `READ`, nor write
    /// through `DerefMut` without `WRITE`, until protection is restored.
    pub unsafe fn protect(&self, prot: Protection) -> Result<(), MapError> {
        // SAFETY: forwarded to the caller.
        unsafe { self.protect_slice(self.as_slice(), prot) }
    }

    /// [`Mmap::protect`] restricted to `region`, a slice of this mapping.
    ///
    /// # Safety
    /// As for [`Mmap::protect`], for the pages `region` covers. The borrow of
    /// `region` ends with this call; it is the caller's later accesses that
    /// must respect the new protection.
    pub unsafe fn protect_slice(&self, region: &[u8], prot: Protection) -> Result<(), MapError> {
        let span = self.checked(region)?;
        mm::mprotect(span.addr, span.len, prot.bits())?;
        Ok(())
    }

    /// Pin the mapping in memory so it is not swapped out.
    ///
    /// Locking a locked range, or unlocking an unlocked one, succeeds; no
    /// lock state is tracked here.
    pub fn lock(&self) -> Result<(), MapError> {
        self.lock_slice(self.as_slice())
    }

    /// [`Mmap::lock`] restricted to `region`, a slice of this mapping.
    pub fn lock_slice(&self, region: &[u8]) -> Result<(), MapError> {
        let span = self.checked(region)?;
        mm::mlock(span.addr, span.len)?;
        Ok(())
    }

    /// [`Mmap::lock`] with `mlock2` flags, e.g. lock on first fault.
    pub fn lock_with(&self, flags: LockFlags) -> Result<(), MapError> {
        self.lock_slice_with(self.as_slice(), flags)
    }

    /// [`Mmap::lock_with`] restricted to `region`, a slice of this mapping.
    pub fn lock_slice_with(&self, region: &[u8], flags: LockFlags) -> Result<(), MapError> {
        let span = self.checked(region)?;
        mm::mlock2(span.addr, span.len, flags.bits())?;
        Ok(())
    }

    /// Let the mapping be swapped out again.
    pub fn unlock(&self) -> Result<(), MapError> {
        self.unlock_slice(self.as_slice())
    }

    /// [`Mmap::unlock`] restricted to `region`, a slice of this mapping.
    pub fn unlock_slice(&self, region: &[u8]) -> Result<(), MapError> {
        let span = self.checked(region)?;
        mm::munlock(span.addr, span.len)?;
        Ok(())
    }

    /// Page residency, one raw byte per page.
    ///
    /// Only the lowest bit of each byte means anything (page resident when
    /// the call was made); the others are reserved, so test with
    /// `byte & 1`, not `byte == 1`.
    pub fn in_core(&self) -> Result<Vec<u8>, MapError> {
        self.in_core_slice(self.as_slice())
    }

    /// [`Mmap::in_core`] restricted to `region`.
    ///
    /// One byte is returned per page `region` spans, so it may end anywhere.
    /// Its start must be page aligned; otherwise the kernel refuses and the
    /// result is `MapError::Kernel(EINVAL)`.
    pub fn in_core_slice(&self, region: &[u8]) -> Result<Vec<u8>, MapError> {
        let span = self.checked(region)?;
        let mut pages = vec![0u8; span.pages(page::page_size())];
        mm::mincore(span.addr, span.len, &mut pages)?;
        Ok(pages)
    }

    /// Page residency reduced to the one meaningful bit.
    pub fn is_resident(&self) -> Result<Vec<bool>, MapError> {
        self.is_resident_slice(self.as_slice())
    }

    /// [`Mmap::is_resident`] restricted to `region`.
    pub fn is_resident_slice(&self, region: &[u8]) -> Result<Vec<bool>, MapError> {
        let pages = self.in_core_slice(region)?;
        Ok(pages
            .into_iter()
            .map(|byte| byte & MINCORE_RESIDENT != 0)
            .collect())
    }

    /// Unmap the whole region.
    ///
    /// Changes not flushed may not have reached the backing object. On
    /// success the region is retired: the buffer becomes empty and every
    /// further operation returns `MapError::Unmapped`. If the kernel refuses,
    /// the region stays live.
    pub fn unmap(&mut self) -> Result<(), MapError> {
        let span = self.checked(self.as_slice())?;
        mm::munmap(span.addr, span.len)?;
        log::debug!("[VMAP] unmapped {:#x}+{}", span.addr, span.len);
        self.live = false;
        self.base = 0;
        Ok(())
    }

    /// Unmap only the pages `region` covers.
    ///
    /// The region is NOT retired: it still reports itself live, still hands
    /// out the full buffer, and its operations still reach the kernel for
    /// the whole original range, including the released pages.
    ///
    /// # Safety
    /// After this call the caller must not access the released bytes through
    /// this value in any way (reads and writes fault, or worse, hit whatever
    /// the kernel maps there next). Before this value is unmapped or dropped,
    /// nothing else may be mapped into the released range, because the final
    /// unmap covers the original range and would tear it down too.
    pub unsafe fn unmap_slice(&self, region: &[u8]) -> Result<(), MapError> {
        let span = self.checked(region)?;
        mm::munmap(span.addr, span.len)?;
        log::debug!(
            "[VMAP] partially unmapped {:#x}+{} of {:#x}+{}; region still marked live",
            span.addr,
            span.len,
            self.base,
            self.len
        );
        Ok(())
    }
}

impl Drop for Mmap {
    fn drop(&mut self) {
        if !self.live {
            return;
        }
        if let Err(err) = mm::munmap(self.base, self.len) {
            log::warn!("[VMAP] failed to unmap {:#x}+{} on drop: {err}", self.base, self.len);
        }
    }
}

impl Deref for Mmap {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl DerefMut for Mmap {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl AsRef<[u8]> for Mmap {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsMut<[u8]> for Mmap {
    fn as_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl fmt::Debug for Mmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mmap")
            .field("base", &format_args!("{:#x}", self.base))
            .field("len", &self.len)
            .field("live", &self.live)
            .finish()
    }
}
