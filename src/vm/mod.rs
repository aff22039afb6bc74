//! Overflow-checked arithmetic over virtual-memory addresses and sizes.
//!
//! Every address a parser derives from file data (a segment base plus a section offset, a
//! symbol value minus a slide, the end of a load command) is attacker controlled. The functions
//! in this module are the only sanctioned way to combine such values: none of them ever wraps,
//! and each failure is reported as an [`crate::Error`] instead of a silently truncated value.
//!
//! # Key Components
//!
//! - [`apply_offset`] / [`add`] - Checked addition, failing with [`ErrorCode::Overflow`]
//! - [`subtract`] - Checked subtraction, failing with [`ErrorCode::Underflow`]
//! - [`check_length`] - Validates that `address + length` fits without computing it
//! - [`range::VmRange`] - `(location, length)` spans with containment queries
//!
//! # Examples
//!
//! ```rust
//! use machkit::{vm, ErrorCode};
//!
//! let section = vm::apply_offset(0x1_0000_0000, 0x4000)?;
//! assert_eq!(section, 0x1_0000_4000);
//!
//! let err = vm::add(u64::MAX, 1).unwrap_err();
//! assert_eq!(err.code(), ErrorCode::Overflow);
//! # Ok::<(), machkit::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! All functions are pure and operate on `Copy` values.

pub mod range;

pub use range::VmRange;

use crate::{Error, ErrorCode, Result};

/// A location in a virtual address space.
pub type VmAddress = u64;

/// A byte length within a virtual address space.
pub type VmSize = u64;

/// An unsigned delta applied to a [`VmAddress`].
pub type VmOffset = u64;

/// The highest representable address; the ceiling every addition is checked against.
pub const VM_ADDRESS_MAX: VmAddress = u64::MAX;

/// The highest representable size. Shares its domain with [`VM_ADDRESS_MAX`].
pub const VM_SIZE_MAX: VmSize = u64::MAX;

/// Applies `offset` to `address`.
///
/// # Errors
///
/// Returns [`ErrorCode::Overflow`] if `VM_ADDRESS_MAX - offset < address`.
pub fn apply_offset(address: VmAddress, offset: VmOffset) -> Result<VmAddress> {
    if VM_ADDRESS_MAX - offset < address {
        log::trace!("offset {offset:#x} overflows address {address:#x}");
        return Err(Error::new(ErrorCode::Overflow));
    }

    Ok(address + offset)
}

/// Adds two addresses.
///
/// # Errors
///
/// Returns [`ErrorCode::Overflow`] if the sum exceeds [`VM_ADDRESS_MAX`].
pub fn add(left: VmAddress, right: VmAddress) -> Result<VmAddress> {
    let Some(sum) = left.checked_add(right) else {
        log::trace!("{left:#x} + {right:#x} overflows");
        return Err(Error::new(ErrorCode::Overflow));
    };

    Ok(sum)
}

/// Subtracts `right` from `left`.
///
/// # Errors
///
/// Returns [`ErrorCode::Underflow`] if `right > left`.
pub fn subtract(left: VmAddress, right: VmAddress) -> Result<VmAddress> {
    if right > left {
        log::trace!("{left:#x} - {right:#x} underflows");
        return Err(Error::new(ErrorCode::Underflow));
    }

    Ok(left - right)
}

/// Checks that `address + length` fits within the address space.
///
/// The sum itself is never computed, so this is safe to call on any pair of values.
///
/// # Errors
///
/// Returns [`ErrorCode::Overflow`] if `VM_SIZE_MAX - length < address`.
pub fn check_length(address: VmAddress, length: VmSize) -> Result<()> {
    if VM_SIZE_MAX - length < address {
        log::trace!("length {length:#x} at {address:#x} runs past the address space");
        return Err(Error::new(ErrorCode::Overflow));
    }

    Ok(())
}
