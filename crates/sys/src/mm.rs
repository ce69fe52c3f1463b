//! Memory management calls.
//!
//! Thin forwards to the kernel: arguments go out unchanged and the raw result
//! comes back decoded. Nothing here checks that an address range belongs to
//! a mapping; that is the caller's job. The one exception is the mapping
//! offset, whose encoding depends on the architecture.

use vmap_error::define_map_error;

use crate::arch;
use crate::errno::Errno;
use crate::fs::RawFd;
use crate::page;
use crate::sysno::{
    __NR_madvise, __NR_mincore, __NR_mlock, __NR_mlock2, __NR_mprotect, __NR_msync,
    __NR_munlock, __NR_munmap, NR_MMAP,
};

define_map_error! {
    /// Failures of the mapping call.
    pub enum SysError(0x01) {
        /// The kernel refused the call
        Kernel(Errno) = 0x01 => "Kernel rejected the mapping",
        /// The offset cannot be expressed in the call's page units
        Misaligned = 0x02 => "Offset is not a multiple of the page size",
    }
}

/// Unit of the `mmap2` offset argument. Fixed by the ABI, not the page size.
const MMAP2_UNIT: usize = 4096;

macro_rules! trace_call {
    ($($arg:tt)*) => {
        #[cfg(feature = "verbose-syscalls")]
        log::trace!($($arg)*);
    };
}

/// The offset argument as the mapping call on this target expects it.
fn encode_offset(offset: u64) -> Result<usize, SysError> {
    if arch::MMAP_OFFSET_IN_PAGES {
        page::offset_in_pages(offset, MMAP2_UNIT).ok_or(SysError::Misaligned)
    } else {
        usize::try_from(offset).map_err(|_| SysError::Kernel(Errno::EOVERFLOW))
    }
}

/// Map `len` bytes of `fd` starting at byte `offset` into the address space.
///
/// # Arguments
/// * `addr` - Placement hint (0 lets the kernel choose; exact with `MAP_FIXED`)
/// * `len` - Length of the mapping in bytes
/// * `prot` - `PROT_*` bits
/// * `flags` - `MAP_*` bits
/// * `fd` - Backing descriptor (`NO_FD` for anonymous mappings)
/// * `offset` - Byte offset into the backing object
///
/// # Returns
/// * `Ok(address)` of the new mapping
/// * `Err(SysError::Misaligned)` on i386 when `offset` is not a multiple of
///   4096; no call is made
/// * `Err(SysError::Kernel(_))` with the kernel's error otherwise
pub fn mmap(
    addr: usize,
    len: usize,
    prot: u32,
    flags: u32,
    fd: RawFd,
    offset: u64,
) -> Result<usize, SysError> {
    let encoded = encode_offset(offset)?;
    let ret = arch::syscall6(
        NR_MMAP as usize,
        addr,
        len,
        prot as usize,
        flags as usize,
        fd as usize,
        encoded,
    );
    trace_call!(
        "[SYS] mmap(addr={addr:#x}, len={len}, prot={prot:#x}, flags={flags:#x}, fd={fd}, off={offset}) = {ret:#x}"
    );
    Errno::from_ret(ret).map_err(SysError::Kernel)
}

/// Remove the mapping of `[addr, addr + len)`.
pub fn munmap(addr: usize, len: usize) -> Result<(), Errno> {
    let ret = arch::syscall2(__NR_munmap as usize, addr, len);
    trace_call!("[SYS] munmap(addr={addr:#x}, len={len}) = {ret}");
    Errno::from_ret(ret).map(drop)
}

/// Write dirty pages of `[addr, addr + len)` back to the backing object.
///
/// `mode` is one of `MS_SYNC` (block until written), `MS_ASYNC` (schedule
/// and return), optionally with `MS_INVALIDATE`.
pub fn msync(addr: usize, len: usize, mode: u32) -> Result<(), Errno> {
    let ret = arch::syscall3(__NR_msync as usize, addr, len, mode as usize);
    trace_call!("[SYS] msync(addr={addr:#x}, len={len}, mode={mode:#x}) = {ret}");
    Errno::from_ret(ret).map(drop)
}

/// Hint the expected access pattern of `[addr, addr + len)`.
pub fn madvise(addr: usize, len: usize, advice: u32) -> Result<(), Errno> {
    let ret = arch::syscall3(__NR_madvise as usize, addr, len, advice as usize);
    trace_call!("[SYS] madvise(addr={addr:#x}, len={len}, advice={advice}) = {ret}");
    Errno::from_ret(ret).map(drop)
}

/// Change the protection of `[addr, addr + len)`.
pub fn mprotect(addr: usize, len: usize, prot: u32) -> Result<(), Errno> {
    let ret = arch::syscall3(__NR_mprotect as usize, addr, len, prot as usize);
    trace_call!("[SYS] mprotect(addr={addr:#x}, len={len}, prot={prot:#x}) = {ret}");
    Errno::from_ret(ret).map(drop)
}

/// Pin the pages of `[addr, addr + len)` in memory.
pub fn mlock(addr: usize, len: usize) -> Result<(), Errno> {
    let ret = arch::syscall2(__NR_mlock as usize, addr, len);
    trace_call!("[SYS] mlock(addr={addr:#x}, len={len}) = {ret}");
    Errno::from_ret(ret).map(drop)
}

/// `mlock` with flags (`MLOCK_ONFAULT`).
pub fn mlock2(addr: usize, len: usize, flags: u32) -> Result<(), Errno> {
    let ret = arch::syscall3(__NR_mlock2 as usize, addr, len, flags as usize);
    trace_call!("[SYS] mlock2(addr={addr:#x}, len={len}, flags={flags:#x}) = {ret}");
    Errno::from_ret(ret).map(drop)
}

/// Allow the pages of `[addr, addr + len)` to be swapped out again.
pub fn munlock(addr: usize, len: usize) -> Result<(), Errno> {
    let ret = arch::syscall2(__NR_munlock as usize, addr, len);
    trace_call!("[SYS] munlock(addr={addr:#x}, len={len}) = {ret}");
    Errno::from_ret(ret).map(drop)
}

/// Report page residency of `[addr, addr + len)` into `vec`, one byte per page.
///
/// `addr` must be page aligned (the kernel enforces it). `vec` must hold at
/// least one byte per page spanned; a shorter buffer is rejected with
/// `EINVAL` before the call, since the kernel would write past its end.
pub fn mincore(addr: usize, len: usize, vec: &mut [u8]) -> Result<(), Errno> {
    if vec.len() < page::pages_spanned(len, page::page_size()) {
        return Err(Errno::EINVAL);
    }
    let ret = arch::syscall3(__NR_mincore as usize, addr, len, vec.as_mut_ptr() as usize);
    trace_call!("[SYS] mincore(addr={addr:#x}, len={len}) = {ret}");
    Errno::from_ret(ret).map(drop)
}
