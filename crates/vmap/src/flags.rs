//! Typed flag vocabulary for the mapping calls.
//!
//! Bit values are the kernel's own (see `vmap_sys::consts`). Unknown bits are
//! kept and forwarded, so the kernel stays the judge of what is valid.

use bitflags::bitflags;
use vmap_sys::consts::*;

bitflags! {
    /// Memory protection (`PROT_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Protection: u32 {
        /// Pages may be read
        const READ = PROT_READ;
        /// Pages may be written
        const WRITE = PROT_WRITE;
        /// Pages may be executed
        const EXEC = PROT_EXEC;
        /// Apply to the start of a grows-down mapping (mprotect only)
        const GROWSDOWN = PROT_GROWSDOWN;
        /// Apply to the end of a grows-up mapping (mprotect only)
        const GROWSUP = PROT_GROWSUP;
    }
}

impl Protection {
    /// No access at all (`PROT_NONE`).
    pub const NONE: Self = Self::empty();
}

bitflags! {
    /// Mapping type and placement (`MAP_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MapFlags: u32 {
        /// Writes are visible to other mappings and reach the backing object
        const SHARED = MAP_SHARED;
        /// Copy-on-write; writes never reach the backing object
        const PRIVATE = MAP_PRIVATE;
        /// `SHARED`, but unknown flags are rejected instead of ignored
        const SHARED_VALIDATE = MAP_SHARED_VALIDATE;
        /// Place exactly at the hint address, replacing what is there
        const FIXED = MAP_FIXED;
        /// Place exactly at the hint address, fail if occupied
        const FIXED_NOREPLACE = MAP_FIXED_NOREPLACE;
        /// Not backed by a descriptor; zero filled
        const ANONYMOUS = MAP_ANONYMOUS;
        /// Do not reserve swap
        const NORESERVE = MAP_NORESERVE;
        /// Prefault the pages
        const POPULATE = MAP_POPULATE;
        /// With `POPULATE`, do not block on I/O
        const NONBLOCK = MAP_NONBLOCK;
        /// Lock the pages like `mlock`
        const LOCKED = MAP_LOCKED;
        /// Stack-like mapping that grows downwards
        const GROWSDOWN = MAP_GROWSDOWN;
        /// Suitable for a thread stack
        const STACK = MAP_STACK;
        /// Use huge pages
        const HUGETLB = MAP_HUGETLB;
    }
}

bitflags! {
    /// Flush mode for `msync` (`MS_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SyncMode: u32 {
        /// Schedule the write-back and return immediately
        const ASYNC = MS_ASYNC;
        /// Invalidate other mappings of the same file
        const INVALIDATE = MS_INVALIDATE;
        /// Block until the write-back completes
        const SYNC = MS_SYNC;
    }
}

bitflags! {
    /// Flags for `mlock2`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LockFlags: u32 {
        /// Lock pages as they are faulted in rather than all at once
        const ONFAULT = MLOCK_ONFAULT;
    }
}

/// Access-pattern hint for `madvise` that leaves the mapped bytes intact.
///
/// Advice that discards or zeroes pages lives in [`UncheckedAdvice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Advice {
    Normal = MADV_NORMAL,
    Random = MADV_RANDOM,
    Sequential = MADV_SEQUENTIAL,
    WillNeed = MADV_WILLNEED,
    /// Child processes do not inherit the range
    DontFork = MADV_DONTFORK,
    DoFork = MADV_DOFORK,
    /// Candidate for same-page merging
    Mergeable = MADV_MERGEABLE,
    Unmergeable = MADV_UNMERGEABLE,
    HugePage = MADV_HUGEPAGE,
    NoHugePage = MADV_NOHUGEPAGE,
    /// Leave the range out of core dumps
    DontDump = MADV_DONTDUMP,
    DoDump = MADV_DODUMP,
}

impl Advice {
    pub const ALL: [Self; 12] = [
        Self::Normal,
        Self::Random,
        Self::Sequential,
        Self::WillNeed,
        Self::DontFork,
        Self::DoFork,
        Self::Mergeable,
        Self::Unmergeable,
        Self::HugePage,
        Self::NoHugePage,
        Self::DontDump,
        Self::DoDump,
    ];

    #[must_use]
    pub const fn raw(self) -> u32 {
        self as u32
    }
}

/// Any `madvise` code, including the ones that change what the mapping reads
/// back as.
///
/// Advice codes are an enumeration, not bits. Any raw value is accepted so
/// the kernel can reject the ones it does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UncheckedAdvice(u32);

impl UncheckedAdvice {
    /// Drop the pages; private and anonymous ones read back zero filled
    pub const DONT_NEED: Self = Self(MADV_DONTNEED);
    /// Pages may be dropped lazily, any time after the call
    pub const FREE: Self = Self(MADV_FREE);
    /// Punch a hole in the backing object
    pub const REMOVE: Self = Self(MADV_REMOVE);

    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<Advice> for UncheckedAdvice {
    fn from(advice: Advice) -> Self {
        Self(advice.raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_match_kernel_values() {
        assert_eq!(Protection::NONE.bits(), PROT_NONE);
        assert_eq!((Protection::READ | Protection::WRITE).bits(), PROT_READ | PROT_WRITE);
        assert_eq!(MapFlags::SHARED.bits(), MAP_SHARED);
        assert_eq!(SyncMode::SYNC.bits(), MS_SYNC);
        assert_eq!(Advice::WillNeed.raw(), MADV_WILLNEED);
    }

    #[test]
    fn test_unknown_bits_are_retained() {
        let prot = Protection::from_bits_retain(0x8000_0000 | PROT_READ);
        assert!(prot.contains(Protection::READ));
        assert_eq!(prot.bits(), 0x8000_0000 | PROT_READ);
        assert_eq!(UncheckedAdvice::from_raw(9999).raw(), 9999);
    }

    #[test]
    fn test_well_known_linux_values() {
        // Stable across every supported architecture.
        assert_eq!(Protection::READ.bits(), 1);
        assert_eq!(Protection::WRITE.bits(), 2);
        assert_eq!(Protection::EXEC.bits(), 4);
        assert_eq!(MapFlags::PRIVATE.bits(), 2);
        assert_eq!(SyncMode::ASYNC.bits(), 1);
        assert_eq!(SyncMode::INVALIDATE.bits(), 2);
        assert_eq!(Advice::Normal.raw(), 0);
        assert_eq!(UncheckedAdvice::DONT_NEED.raw(), 4);
    }

    #[test]
    fn test_safe_advice_never_discards() {
        let discarding = [MADV_DONTNEED, MADV_FREE, MADV_REMOVE];
        for advice in Advice::ALL {
            assert!(!discarding.contains(&advice.raw()), "{advice:?}");
        }
    }

    #[test]
    fn test_safe_advice_widens_to_unchecked() {
        assert_eq!(UncheckedAdvice::from(Advice::Sequential).raw(), MADV_SEQUENTIAL);
    }
}
