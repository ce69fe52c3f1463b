//! Kernel error numbers.
//!
//! Every syscall reports failure as a negated errno in the range
//! `-4095..=-1`. [`Errno::from_ret`] is the single place that decodes it; the
//! rest of the workspace only ever sees `Result<usize, Errno>`.
//!
//! ## Most Commonly Seen Codes
//!
//! | Constant | Value | Typical cause here |
//! |----------|-------|--------------------|
//! | `EACCES` | 13 | Protection does not match how the descriptor was opened |
//! | `EBADF` | 9 | Descriptor is not open |
//! | `EINVAL` | 22 | Unaligned address, zero length, unknown advice |
//! | `ENOMEM` | 12 | Range not mapped, or lock limit exceeded |
//! | `ENODEV` | 19 | Descriptor's filesystem does not support mapping |
//! | `EOVERFLOW` | 75 | Offset does not fit the call's argument width |
//! | `EPERM` | 1 | `mlock` without privilege, sealed mapping |

use core::fmt;

use linux_raw_sys::errno as raw;

/// Largest errno the kernel will ever return.
const MAX_ERRNO: usize = 4095;

/// A kernel error number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Errno(u32);

impl Errno {
    pub const EPERM: Self = Self(raw::EPERM);
    pub const ENOENT: Self = Self(raw::ENOENT);
    pub const EINTR: Self = Self(raw::EINTR);
    pub const EIO: Self = Self(raw::EIO);
    pub const EBADF: Self = Self(raw::EBADF);
    pub const EAGAIN: Self = Self(raw::EAGAIN);
    pub const ENOMEM: Self = Self(raw::ENOMEM);
    pub const EACCES: Self = Self(raw::EACCES);
    pub const EFAULT: Self = Self(raw::EFAULT);
    pub const EBUSY: Self = Self(raw::EBUSY);
    pub const ENODEV: Self = Self(raw::ENODEV);
    pub const EINVAL: Self = Self(raw::EINVAL);
    pub const ENFILE: Self = Self(raw::ENFILE);
    pub const EMFILE: Self = Self(raw::EMFILE);
    pub const ETXTBSY: Self = Self(raw::ETXTBSY);
    pub const EFBIG: Self = Self(raw::EFBIG);
    pub const EOVERFLOW: Self = Self(raw::EOVERFLOW);
    pub const ENOSYS: Self = Self(raw::ENOSYS);

    /// Wrap a raw error number.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw error number.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Decode a raw syscall return: `-4095..=-1` is an error, anything else
    /// is the success value reinterpreted as a word.
    ///
    /// Addresses in the upper half of a 32-bit address space look negative
    /// as `isize`, which is why the check is a range and not `< 0`.
    pub const fn from_ret(ret: isize) -> Result<usize, Self> {
        let word = ret as usize;
        if word > usize::MAX - MAX_ERRNO {
            Err(Self(word.wrapping_neg() as u32))
        } else {
            Ok(word)
        }
    }

    /// Symbolic name and description for the codes this workspace meets.
    #[must_use]
    pub const fn describe(self) -> Option<(&'static str, &'static str)> {
        Some(match self.0 {
            raw::EPERM => ("EPERM", "operation not permitted"),
            raw::ENOENT => ("ENOENT", "no such file or directory"),
            raw::EINTR => ("EINTR", "interrupted system call"),
            raw::EIO => ("EIO", "input/output error"),
            raw::EBADF => ("EBADF", "bad file descriptor"),
            raw::EAGAIN => ("EAGAIN", "resource temporarily unavailable"),
            raw::ENOMEM => ("ENOMEM", "cannot allocate memory"),
            raw::EACCES => ("EACCES", "permission denied"),
            raw::EFAULT => ("EFAULT", "bad address"),
            raw::EBUSY => ("EBUSY", "device or resource busy"),
            raw::ENODEV => ("ENODEV", "no such device"),
            raw::EINVAL => ("EINVAL", "invalid argument"),
            raw::ENFILE => ("ENFILE", "too many open files in system"),
            raw::EMFILE => ("EMFILE", "too many open files"),
            raw::ETXTBSY => ("ETXTBSY", "text file busy"),
            raw::EFBIG => ("EFBIG", "file too large"),
            raw::EOVERFLOW => ("EOVERFLOW", "value too large for defined data type"),
            raw::ENOSYS => ("ENOSYS", "function not implemented"),
            _ => return None,
        })
    }

    /// Symbolic name, if known.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self.describe() {
            Some((name, _)) => Some(name),
            None => None,
        }
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.describe() {
            Some((name, text)) => write!(f, "{name} ({}): {text}", self.0),
            None => write!(f, "errno {}", self.0),
        }
    }
}

impl core::error::Error for Errno {}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::format;

    #[test]
    fn test_success_values_pass_through() {
        assert_eq!(Errno::from_ret(0), Ok(0));
        assert_eq!(Errno::from_ret(0x7f00_0000), Ok(0x7f00_0000));
    }

    #[test]
    fn test_error_window() {
        assert_eq!(Errno::from_ret(-22), Err(Errno::EINVAL));
        assert_eq!(Errno::from_ret(-1), Err(Errno::EPERM));
        assert_eq!(Errno::from_ret(-4095), Err(Errno::from_raw(4095)));
    }

    #[test]
    fn test_high_addresses_are_not_errors() {
        // Just below the errno window: a valid (if unusual) address.
        assert_eq!(Errno::from_ret(-4096), Ok(usize::MAX - 4095));
        assert!(Errno::from_ret(isize::MIN).is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Errno::EINVAL), "EINVAL (22): invalid argument");
        assert_eq!(format!("{}", Errno::EACCES), "EACCES (13): permission denied");
        assert_eq!(format!("{}", Errno::from_raw(9999)), "errno 9999");
    }

    #[test]
    fn test_names() {
        assert_eq!(Errno::ENOMEM.name(), Some("ENOMEM"));
        assert_eq!(Errno::from_raw(200).name(), None);
        assert_eq!(Errno::EACCES.raw(), 13);
    }
}
