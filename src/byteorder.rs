//! Byte-order strategies for decoding multi-byte fields.
//!
//! A parsed image declares its endianness once (in its magic number); the parser compares it to
//! the host, picks one of two stateless strategies with [`select`] and threads the returned
//! reference through every decode call instead of re-deciding per field.
//!
//! - [`Direct`] - Identity transforms, used when image and host byte order match
//! - [`Swapped`] - Byte reversal, used when they differ
//!
//! Both strategies are available as the process-wide singletons [`DIRECT`] and [`SWAPPED`].
//!
//! # Examples
//!
//! ```rust
//! use machkit::byteorder::{self, Endianness};
//!
//! // A big-endian image, read field by field.
//! let data = [0xFE, 0xED, 0xFA, 0xCE, 0x00, 0x0C];
//! let order = byteorder::select(Endianness::Big);
//!
//! let mut offset = 0;
//! assert_eq!(order.read_u32(&data, &mut offset)?, 0xFEED_FACE);
//! assert_eq!(order.read_u16(&data, &mut offset)?, 0x000C);
//! assert_eq!(offset, 6);
//! # Ok::<(), machkit::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! The strategies hold no state; the singletons can be shared freely across threads.

use std::fmt;

use crate::{
    vm::{self, VmAddress, VmSize},
    Error, ErrorCode, Result,
};

/// The byte order an image declares for its multi-byte fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

impl Endianness {
    /// The byte order of the host.
    #[cfg(target_endian = "little")]
    pub const NATIVE: Endianness = Endianness::Little;
    /// The byte order of the host.
    #[cfg(target_endian = "big")]
    pub const NATIVE: Endianness = Endianness::Big;
}

/// A set of conversions between stored and host byte order.
///
/// The scalar swaps and [`ByteOrder::swap_buffer`] are the strategy; the `read_*` methods are
/// bounds-checked decoders built on top of them that read host-order bytes from an image and
/// convert them.
pub trait ByteOrder: fmt::Debug + Send + Sync {
    /// Converts a 16-bit value.
    fn swap16(&self, value: u16) -> u16;

    /// Converts a 32-bit value.
    fn swap32(&self, value: u32) -> u32;

    /// Converts a 64-bit value.
    fn swap64(&self, value: u64) -> u64;

    /// Converts an arbitrary-length field in place and returns it.
    fn swap_buffer<'a>(&self, buffer: &'a mut [u8]) -> &'a mut [u8];

    /// Reads a 16-bit field at `offset` and advances `offset` past it.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::OutOfRange`] (memory flagged) if fewer than 2 bytes remain, or
    /// [`ErrorCode::Overflow`] if `offset` itself is out of the address space.
    fn read_u16(&self, data: &[u8], offset: &mut usize) -> Result<u16> {
        Ok(self.swap16(u16::from_ne_bytes(read_bytes(data, offset)?)))
    }

    /// Reads a 32-bit field at `offset` and advances `offset` past it.
    ///
    /// # Errors
    ///
    /// See [`ByteOrder::read_u16`].
    fn read_u32(&self, data: &[u8], offset: &mut usize) -> Result<u32> {
        Ok(self.swap32(u32::from_ne_bytes(read_bytes(data, offset)?)))
    }

    /// Reads a 64-bit field at `offset` and advances `offset` past it.
    ///
    /// # Errors
    ///
    /// See [`ByteOrder::read_u16`].
    fn read_u64(&self, data: &[u8], offset: &mut usize) -> Result<u64> {
        Ok(self.swap64(u64::from_ne_bytes(read_bytes(data, offset)?)))
    }
}

/// Copies `N` bytes at `offset` out of `data` and advances `offset`.
fn read_bytes<const N: usize>(data: &[u8], offset: &mut usize) -> Result<[u8; N]> {
    let end = vm::add(*offset as VmAddress, N as VmSize)?;
    if end > data.len() as VmAddress {
        log::trace!(
            "{}-byte read at {:#x} exceeds buffer of {:#x} bytes",
            N,
            *offset,
            data.len()
        );
        return Err(Error::memory(ErrorCode::OutOfRange));
    }

    // end <= data.len(), so it fits in usize
    let end = end as usize;
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(&data[*offset..end]);
    *offset = end;
    Ok(bytes)
}

/// Identity strategy: image and host byte order match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Direct;

impl ByteOrder for Direct {
    fn swap16(&self, value: u16) -> u16 {
        value
    }

    fn swap32(&self, value: u32) -> u32 {
        value
    }

    fn swap64(&self, value: u64) -> u64 {
        value
    }

    fn swap_buffer<'a>(&self, buffer: &'a mut [u8]) -> &'a mut [u8] {
        buffer
    }
}

/// Byte-reversing strategy: image and host byte order differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Swapped;

impl ByteOrder for Swapped {
    fn swap16(&self, value: u16) -> u16 {
        value.swap_bytes()
    }

    fn swap32(&self, value: u32) -> u32 {
        value.swap_bytes()
    }

    fn swap64(&self, value: u64) -> u64 {
        value.swap_bytes()
    }

    fn swap_buffer<'a>(&self, buffer: &'a mut [u8]) -> &'a mut [u8] {
        buffer.reverse();
        buffer
    }
}

/// The identity strategy singleton.
pub static DIRECT: Direct = Direct;

/// The byte-reversing strategy singleton.
pub static SWAPPED: Swapped = Swapped;

/// Picks the strategy for an image stored in `target` byte order on this host.
#[must_use]
pub fn select(target: Endianness) -> &'static dyn ByteOrder {
    if target == Endianness::NATIVE {
        &DIRECT
    } else {
        &SWAPPED
    }
}
