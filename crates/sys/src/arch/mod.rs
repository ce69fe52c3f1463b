//! Architecture-specific syscall primitives
//!
//! Every other module goes through `arch::syscallN()`; inline assembly lives
//! only in the per-target files below. Arguments and results are word sized.

#[cfg(not(target_os = "linux"))]
compile_error!("vmap_sys only speaks the Linux syscall ABI");

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "aarch64")]
pub use aarch64::*;

#[cfg(target_arch = "x86_64")]
mod x86_64;
#[cfg(target_arch = "x86_64")]
pub use x86_64::*;

#[cfg(target_arch = "x86")]
mod x86;
#[cfg(target_arch = "x86")]
pub use x86::*;

#[cfg(not(any(target_arch = "aarch64", target_arch = "x86_64", target_arch = "x86")))]
compile_error!("vmap_sys has no syscall adapter for this architecture");

/// True when the mapping call takes its file offset in pages rather than bytes.
pub const MMAP_OFFSET_IN_PAGES: bool = cfg!(target_arch = "x86");
