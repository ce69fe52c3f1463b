//! Descriptor-side collaborators: the size query used when a mapping length
//! is left unspecified, and the handful of file calls page-size discovery
//! needs.

use core::ffi::CStr;

use linux_raw_sys::general::{AT_EMPTY_PATH, AT_FDCWD, O_CLOEXEC, O_RDONLY, STATX_SIZE, statx};

use crate::arch;
use crate::errno::Errno;
use crate::sysno::{__NR_close, __NR_openat, __NR_read, __NR_statx};

/// Raw file descriptor as the kernel sees it.
pub type RawFd = i32;

/// Current size in bytes of whatever `fd` refers to.
///
/// Uses `statx` with an empty path, which behaves like `fstat` on every
/// architecture without per-arch `stat` layouts.
pub fn file_size(fd: RawFd) -> Result<u64, Errno> {
    // SAFETY: `statx` is a plain C struct of integers; all-zero is valid.
    let mut stx: statx = unsafe { core::mem::zeroed() };
    let ret = arch::syscall5(
        __NR_statx as usize,
        fd as usize,
        c"".as_ptr() as usize,
        AT_EMPTY_PATH as usize,
        STATX_SIZE as usize,
        &raw mut stx as usize,
    );
    Errno::from_ret(ret)?;
    Ok(stx.stx_size)
}

/// A descriptor closed on drop.
#[derive(Debug)]
pub struct OwnedFd(RawFd);

impl OwnedFd {
    /// Open `path` read-only, close-on-exec.
    pub fn open_readonly(path: &CStr) -> Result<Self, Errno> {
        let ret = arch::syscall4(
            __NR_openat as usize,
            AT_FDCWD as usize,
            path.as_ptr() as usize,
            (O_RDONLY | O_CLOEXEC) as usize,
            0,
        );
        Errno::from_ret(ret).map(|fd| Self(fd as RawFd))
    }

    /// Single `read` into `buf`; returns the byte count, 0 at end of file.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, Errno> {
        let ret = arch::syscall3(
            __NR_read as usize,
            self.0 as usize,
            buf.as_mut_ptr() as usize,
            buf.len(),
        );
        Errno::from_ret(ret)
    }

    /// Fill `buf` completely. Hitting end of file first is reported as `EIO`.
    pub fn read_exact(&self, buf: &mut [u8]) -> Result<(), Errno> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..])? {
                0 => return Err(Errno::EIO),
                n => filled += n,
            }
        }
        Ok(())
    }
}

impl Drop for OwnedFd {
    fn drop(&mut self) {
        // Nothing useful can be done with a close failure here.
        let _ = arch::syscall1(__NR_close as usize, self.0 as usize);
    }
}
