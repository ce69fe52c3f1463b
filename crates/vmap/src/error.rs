use vmap_error::define_map_error;
use vmap_sys::{Errno, SysError};

define_map_error! {
    /// Everything a mapping or one of its operations can fail with.
    pub enum MapError(0x02) {
        /// The descriptor size could not be queried for an unspecified length
        SizeQuery(Errno) = 0x01 => "Could not determine descriptor size",
        /// The kernel refused the mapping or the operation
        Kernel(Errno) = 0x02 => "Kernel rejected the request",
        /// The offset is not page aligned on an architecture that maps by page
        Misaligned = 0x03 => "Offset is not a multiple of the page size",
        /// The sub-region is not fully inside the mapping
        OutOfBounds = 0x04 => "Region must be a slice of the mapping",
        /// The mapping was already unmapped as a whole
        Unmapped = 0x05 => "Mapping has already been unmapped",
        /// The descriptor is larger than the address space can map
        TooLarge = 0x06 => "Descriptor size does not fit in the address space",
    }
}

impl MapError {
    /// The kernel error behind this failure, if there is one.
    #[must_use]
    pub const fn errno(&self) -> Option<Errno> {
        match self {
            Self::SizeQuery(errno) | Self::Kernel(errno) => Some(*errno),
            _ => None,
        }
    }
}

impl From<Errno> for MapError {
    fn from(errno: Errno) -> Self {
        Self::Kernel(errno)
    }
}

impl From<SysError> for MapError {
    fn from(err: SysError) -> Self {
        match err {
            SysError::Kernel(errno) => Self::Kernel(errno),
            SysError::Misaligned => Self::Misaligned,
        }
    }
}
