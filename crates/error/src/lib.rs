//! The shared error macro of the vmap workspace.
//!
//! `define_map_error!` is how `vmap_sys` and `vmap` declare their error
//! enums, so every layer reports failures the same way: a numeric code (layer
//! in the high byte, variant in the low byte), a static description, a
//! `Display` form that nests inner causes, and an `Error::source` chain that
//! leads from a `vmap` error down to the kernel's `Errno`.
//!
//! ## Usage
//!
//! ### Simple errors (no inner data)
//! ```ignore
//! define_map_error! {
//!     pub enum SpanError(0x07) {
//!         Empty = 0x01 => "Span has zero length",
//!         Overflow = 0x02 => "Span end overflows the address space",
//!     }
//! }
//! ```
//!
//! ### Nested errors (with inner error type)
//! ```ignore
//! define_map_error! {
//!     pub enum MapError(0x02) {
//!         Kernel(Errno) = 0x02 => "Kernel rejected the request",
//!     }
//! }
//! ```

#![no_std]

/// Macro to define a mapping error type with consistent handling.
///
/// Supports both simple variants and nested variants containing an inner
/// value. Inner values must be `Copy + Eq + core::error::Error + 'static`;
/// a nested variant reports its inner value as `source()`.
#[macro_export]
macro_rules! define_map_error {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident($layer:literal) {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(($inner:ty))? = $code:literal => $desc:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant $(($inner))?,
            )*
        }

        impl $name {
            /// Layer identifier for this error type.
            pub const LAYER: u8 = $layer;

            /// Numeric error code, layer in the high byte.
            pub const fn code(&self) -> u16 {
                match self {
                    $(
                        $crate::define_map_error!(@pattern $variant $(($inner))? _unused) => {
                            (($layer as u16) << 8) | $code
                        }
                    )*
                }
            }

            /// Static description of the variant.
            pub const fn name(&self) -> &'static str {
                match self {
                    $(
                        $crate::define_map_error!(@pattern $variant $(($inner))? _unused) => {
                            $desc
                        }
                    )*
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    $(
                        $crate::define_map_error!(@pattern $variant $(($inner))? inner) => {
                            $crate::define_map_error!(@display_body self f $desc $(($inner))? inner)
                        }
                    )*
                }
            }
        }

        impl core::error::Error for $name {
            fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
                match self {
                    $(
                        $crate::define_map_error!(@pattern $variant $(($inner))? inner) => {
                            $crate::define_map_error!(@source $(($inner))? inner)
                        }
                    )*
                }
            }
        }
    };

    (@pattern $variant:ident ($inner:ty) $bind:ident) => { Self::$variant($bind) };
    (@pattern $variant:ident $bind:ident) => { Self::$variant };

    (@source ($inner:ty) $bind:ident) => {
        Some($bind as &(dyn core::error::Error + 'static))
    };
    (@source $bind:ident) => { None };

    (@display_body $self:ident $f:ident $desc:literal ($inner:ty) $bind:ident) => {
        write!($f, "E{:04X}: {} ({})", $self.code(), $desc, $bind)
    };
    (@display_body $self:ident $f:ident $desc:literal $bind:ident) => {
        write!($f, "E{:04X}: {}", $self.code(), $desc)
    };
}
