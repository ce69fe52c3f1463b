// Syscall numbers for the host architecture, straight from linux-raw-sys.

pub use linux_raw_sys::general::{
    __NR_close,
    __NR_madvise,
    __NR_mincore,
    __NR_mlock,
    __NR_mlock2,
    __NR_mprotect,
    __NR_msync,
    __NR_munlock,
    __NR_munmap,
    __NR_openat,
    __NR_read,
    __NR_statx,
};

/// The mapping call this architecture's adapter issues.
///
/// i386 keeps the legacy `mmap` slot for the struct-pointer form, so the
/// six-register call is `mmap2`, which counts its offset in pages.
#[cfg(target_arch = "x86")]
pub use linux_raw_sys::general::__NR_mmap2 as NR_MMAP;
#[cfg(not(target_arch = "x86"))]
pub use linux_raw_sys::general::__NR_mmap as NR_MMAP;
