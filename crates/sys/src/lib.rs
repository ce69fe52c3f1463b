//! Raw Linux virtual-memory calls for the vmap workspace.
//!
//! Speaks the kernel ABI directly through `arch::syscallN()`, with syscall
//! numbers and constant values taken from linux-raw-sys for the target
//! architecture. No libc.
//!
//! ## Usage
//! ```rust,no_run
//! use vmap_sys::{consts::*, mm};
//!
//! let len = vmap_sys::page::page_size();
//! let addr = mm::mmap(0, len, PROT_READ | PROT_WRITE, MAP_ANONYMOUS | MAP_PRIVATE, NO_FD, 0)?;
//! mm::munmap(addr, len)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![no_std]

pub mod arch;
pub mod consts;
pub mod errno;
pub mod fs;
pub mod mm;
pub mod page;
pub mod sysno;

pub use errno::Errno;
pub use fs::RawFd;
pub use mm::SysError;
