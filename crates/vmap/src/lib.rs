//! Memory-mapped regions for Linux.
//!
//! [`Mmap`] maps a file, device or anonymous memory and hands it back as a
//! byte slice. Each kernel operation on a mapping (`msync`, `madvise`,
//! `mprotect`, `mlock`, `munlock`, `mincore`, `munmap`) is available for the
//! whole region and for any sub-slice of it; sub-slices are checked to lie
//! inside the mapping before the kernel is called.
//!
//! ## Usage
//! ```rust,no_run
//! use vmap::{MapFlags, Mmap, Protection, SyncMode};
//! # let fd = 3;
//!
//! // SAFETY: nothing else truncates or writes the file while it is mapped.
//! let mut map = unsafe { Mmap::map(fd, Protection::READ | Protection::WRITE, MapFlags::SHARED)? };
//! map[9] = b'X';
//! map.flush(SyncMode::SYNC)?;
//! map.unmap()?;
//! # Ok::<(), vmap::MapError>(())
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;
pub mod flags;
pub mod mmap;
pub mod region;

pub use error::MapError;
pub use flags::{Advice, LockFlags, MapFlags, Protection, SyncMode, UncheckedAdvice};
pub use mmap::Mmap;
pub use region::Span;
pub use vmap_sys::page::page_size;
pub use vmap_sys::{Errno, RawFd};
