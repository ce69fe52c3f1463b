// Constant tables for the memory-management calls.
//
// Values come from linux-raw-sys, which generates them per architecture from
// the kernel's uapi headers. They are opaque to this workspace and travel to
// the kernel unchanged.

// mmap / mprotect protection bits
pub use linux_raw_sys::general::{
    PROT_EXEC, PROT_GROWSDOWN, PROT_GROWSUP, PROT_NONE, PROT_READ, PROT_WRITE,
};

// mmap flags
pub use linux_raw_sys::general::{
    MAP_ANONYMOUS, MAP_FIXED, MAP_FIXED_NOREPLACE, MAP_GROWSDOWN, MAP_HUGETLB, MAP_LOCKED,
    MAP_NONBLOCK, MAP_NORESERVE, MAP_POPULATE, MAP_PRIVATE, MAP_SHARED, MAP_SHARED_VALIDATE,
    MAP_STACK,
};

// msync modes
pub use linux_raw_sys::general::{MS_ASYNC, MS_INVALIDATE, MS_SYNC};

// madvise codes
pub use linux_raw_sys::general::{
    MADV_DODUMP, MADV_DOFORK, MADV_DONTDUMP, MADV_DONTFORK, MADV_DONTNEED, MADV_FREE,
    MADV_HUGEPAGE, MADV_MERGEABLE, MADV_NOHUGEPAGE, MADV_NORMAL, MADV_RANDOM, MADV_REMOVE,
    MADV_SEQUENTIAL, MADV_UNMERGEABLE, MADV_WILLNEED,
};

// mlock2 / mlockall flags
pub use linux_raw_sys::general::{MCL_CURRENT, MCL_FUTURE, MCL_ONFAULT, MLOCK_ONFAULT};

/// mincore result bit: page was resident when the call was made.
///
/// The other bits of each result byte are reserved by the kernel.
pub const MINCORE_RESIDENT: u8 = 1;

/// Descriptor value for anonymous mappings.
pub const NO_FD: i32 = -1;
