//! Address ranges and bounds-checked containment queries.
//!
//! A [`VmRange`] is a plain `(location, length)` pair describing `[location, location + length)`.
//! Construction never fails and performs no validation: a parser may build a range from header
//! fields before it knows whether they are sane. Each query re-validates its operands and
//! reports [`ErrorCode::Overflow`] for a range whose end does not fit the address space.
//!
//! # Examples
//!
//! ```rust
//! use machkit::{vm::VmRange, ErrorCode};
//!
//! let segment = VmRange::new(0x1000, 0x4000);
//! let section = VmRange::new(0x2000, 0x800);
//!
//! segment.contains_range(section, false)?;
//! segment.contains_address(0, 0x4FFF)?;
//! assert_eq!(
//!     segment.contains_address(0, 0x5000).unwrap_err().code(),
//!     ErrorCode::NotFound
//! );
//! # Ok::<(), machkit::Error>(())
//! ```

use std::fmt;

use crate::{
    vm::{self, VmAddress, VmOffset, VmSize},
    Error, ErrorCode, Result,
};

/// A contiguous span `[location, location + length)` of an address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VmRange {
    location: VmAddress,
    length: VmSize,
}

impl VmRange {
    /// Creates a range. Never fails; see the module documentation.
    #[must_use]
    pub const fn new(location: VmAddress, length: VmSize) -> Self {
        VmRange { location, length }
    }

    /// First address of the range.
    #[must_use]
    pub const fn location(&self) -> VmAddress {
        self.location
    }

    /// Number of bytes covered.
    #[must_use]
    pub const fn length(&self) -> VmSize {
        self.length
    }

    /// Checks that the end of the range fits within the address space.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::Overflow`] if `location + length` exceeds the address space.
    pub fn validate(&self) -> Result<()> {
        vm::check_length(self.location, self.length)
    }

    /// The exclusive end address, `location + length`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::Overflow`] if the range is malformed.
    pub fn end(&self) -> Result<VmAddress> {
        vm::add(self.location, self.length)
    }

    /// Checks whether `address + offset` lies inside this range.
    ///
    /// The offset is applied first, then the range itself is validated, then the adjusted
    /// address is compared against `[location, location + length)`.
    ///
    /// # Errors
    ///
    /// - [`ErrorCode::Overflow`] if `address + offset` or the range end overflows
    /// - [`ErrorCode::NotFound`] if the adjusted address lies outside the range
    pub fn contains_address(&self, offset: VmOffset, address: VmAddress) -> Result<()> {
        let address = vm::apply_offset(address, offset)?;
        self.validate()?;

        if address < self.location || address >= self.location + self.length {
            log::trace!("{address:#x} is outside {}", self);
            return Err(Error::new(ErrorCode::NotFound));
        }

        Ok(())
    }

    /// Checks whether `inner` lies within this range.
    ///
    /// With `partial == false`, `inner` must be fully enclosed. With `partial == true`, the two
    /// ranges only need to intersect; ranges that merely touch at a boundary are accepted.
    ///
    /// # Errors
    ///
    /// - [`ErrorCode::Overflow`] if either range is malformed
    /// - [`ErrorCode::NotFound`] if the containment condition does not hold
    pub fn contains_range(&self, inner: VmRange, partial: bool) -> Result<()> {
        self.validate()?;
        inner.validate()?;

        let outer_end = self.location + self.length;
        let inner_end = inner.location + inner.length;

        let found = if partial {
            !(inner.location < self.location && inner_end < self.location)
                && inner.location <= outer_end
        } else {
            inner.location >= self.location && inner_end <= outer_end
        };

        if !found {
            log::trace!("{inner} is not within {} (partial: {partial})", self);
            return Err(Error::new(ErrorCode::NotFound));
        }

        Ok(())
    }
}

impl fmt::Display for VmRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:#x}, {:#x})",
            self.location,
            self.location.saturating_add(self.length)
        )
    }
}

impl From<(VmAddress, VmSize)> for VmRange {
    fn from((location, length): (VmAddress, VmSize)) -> Self {
        VmRange::new(location, length)
    }
}
