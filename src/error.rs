//! Error codes and the crate-wide error type.
//!
//! Every fallible operation in this crate reports one of a closed set of failure categories
//! described by [`ErrorCode`]. Higher layers that read from mapped or buffered memory can
//! additionally tag a failure with [`ErrorFlags::MEMORY`] to distinguish a bounds failure while
//! touching memory from a purely logical one.
//!
//! The numeric form of a status (code plus flag bits) is what gets logged and compared across
//! layer boundaries, so [`Error`] converts losslessly to and from a raw `u32` and
//! [`describe_error`] renders any raw status, known or not.
//!
//! # Examples
//!
//! ```rust
//! use machkit::{describe_error, Error, ErrorCode};
//!
//! let err = Error::memory(ErrorCode::Overflow);
//! assert!(err.is_memory_error());
//! assert_eq!(describe_error(err.to_raw()), "OVERFLOW");
//! assert_eq!(describe_error(0xFFFF), "");
//! ```

use bitflags::bitflags;
use strum::{EnumCount, EnumIter, FromRepr};
use thiserror::Error;

bitflags! {
    /// Modifier bits that can be combined with an [`ErrorCode`] in its raw representation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ErrorFlags: u32 {
        /// The failure happened while accessing (mapped or buffered) memory.
        ///
        /// Bounds and arithmetic failures raised by a memory-backed reader carry this bit so
        /// callers can tell "the image is truncated" apart from "the image is inconsistent".
        const MEMORY = 0x8000_0000;
    }
}

/// The closed set of failure categories.
///
/// The discriminants are the raw status values; `Success` is zero so that a raw status of
/// `0` always means no failure.
///
/// ## Categories
///
/// - **Client input**: [`ErrorCode::InvalidArgument`], [`ErrorCode::InvalidData`]
/// - **Bounds and arithmetic**: [`ErrorCode::OutOfRange`], [`ErrorCode::Overflow`],
///   [`ErrorCode::Underflow`], [`ErrorCode::NotFound`], [`ErrorCode::BadAccess`]
/// - **Systemic**: [`ErrorCode::InternalError`], [`ErrorCode::ClientError`],
///   [`ErrorCode::InvalidClientResult`], [`ErrorCode::Unavailable`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumCount, FromRepr)]
#[repr(u32)]
pub enum ErrorCode {
    /// No failure.
    Success = 0,
    /// A client-supplied callback reported a failure.
    ClientError = 1,
    /// A client-supplied callback returned a value that does not make sense.
    InvalidClientResult = 2,
    /// An internal invariant was violated.
    InternalError = 3,
    /// An argument was invalid.
    InvalidArgument = 4,
    /// The data being parsed is inconsistent.
    InvalidData = 5,
    /// The requested item does not exist, or an address lies outside a range.
    NotFound = 6,
    /// The requested item exists but cannot be provided.
    Unavailable = 7,
    /// A read or write would fall outside the available data.
    OutOfRange = 8,
    /// An addition would exceed the address space.
    Overflow = 9,
    /// A subtraction would go below zero.
    Underflow = 10,
    /// Memory could not be accessed.
    BadAccess = 11,
}

impl ErrorCode {
    /// Returns the fixed diagnostic string for this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Success => "SUCCESS",
            ErrorCode::ClientError => "CLIENT ERROR",
            ErrorCode::InvalidClientResult => "INVALID CLIENT RESULT",
            ErrorCode::InternalError => "INTERNAL ERROR",
            ErrorCode::InvalidArgument => "BAD INPUT",
            ErrorCode::InvalidData => "INVALID DATA",
            ErrorCode::NotFound => "NOT FOUND",
            ErrorCode::Unavailable => "UNAVAILABLE",
            ErrorCode::OutOfRange => "OUT OF RANGE",
            ErrorCode::Overflow => "OVERFLOW",
            ErrorCode::Underflow => "UNDERFLOW",
            ErrorCode::BadAccess => "BAD ACCESS",
        }
    }

    /// Returns the raw status value of this code, without flags.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// Returns `true` for the bounds and arithmetic failures, the ones a memory-backed reader
    /// would tag with [`ErrorFlags::MEMORY`].
    #[must_use]
    pub const fn is_memory_category(self) -> bool {
        matches!(
            self,
            ErrorCode::OutOfRange
                | ErrorCode::Overflow
                | ErrorCode::Underflow
                | ErrorCode::NotFound
                | ErrorCode::BadAccess
        )
    }
}

/// Renders a raw status value.
///
/// The [`ErrorFlags::MEMORY`] bit is masked off before matching. Values outside the closed
/// set render as an empty string.
#[must_use]
pub fn describe_error(raw: u32) -> &'static str {
    ErrorCode::from_repr(raw & !ErrorFlags::MEMORY.bits()).map_or("", ErrorCode::as_str)
}

/// The error type returned by every fallible operation in this crate.
///
/// An `Error` is a failure code plus modifier flags and nothing else. Callers that need more
/// detail pair the error with their own context (offsets, structure names) when logging.
///
/// # Examples
///
/// ```rust
/// use machkit::{vm, ErrorCode};
///
/// match vm::subtract(0x1000, 0x2000) {
///     Ok(delta) => println!("delta {delta:#x}"),
///     Err(e) if e.code() == ErrorCode::Underflow => eprintln!("bad delta: {e}"),
///     Err(e) => eprintln!("unexpected: {e}"),
/// }
/// ```
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[error("{}", .code.as_str())]
pub struct Error {
    code: ErrorCode,
    flags: ErrorFlags,
}

impl Error {
    /// Creates an error for `code` without any flags.
    #[must_use]
    pub const fn new(code: ErrorCode) -> Self {
        Error {
            code,
            flags: ErrorFlags::empty(),
        }
    }

    /// Creates an error for `code` tagged as a memory access failure.
    #[must_use]
    pub const fn memory(code: ErrorCode) -> Self {
        Error {
            code,
            flags: ErrorFlags::MEMORY,
        }
    }

    /// Returns the same error with the memory flag set.
    #[must_use]
    pub const fn into_memory(self) -> Self {
        Error::memory(self.code)
    }

    /// The failure category.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// The modifier flags.
    #[must_use]
    pub const fn flags(&self) -> ErrorFlags {
        self.flags
    }

    /// Returns `true` if the memory flag is set.
    #[must_use]
    pub const fn is_memory_error(&self) -> bool {
        self.flags.contains(ErrorFlags::MEMORY)
    }

    /// The raw status value: the code combined with the flag bits.
    #[must_use]
    pub const fn to_raw(&self) -> u32 {
        self.code.raw() | self.flags.bits()
    }

    /// Decodes a raw status value.
    ///
    /// Returns `None` for the success status and for codes outside the closed set; unknown
    /// flag bits are dropped.
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        let flags = ErrorFlags::from_bits_truncate(raw);
        match ErrorCode::from_repr(raw & !ErrorFlags::all().bits())? {
            ErrorCode::Success => None,
            code => Some(Error { code, flags }),
        }
    }
}

impl From<ErrorCode> for Error {
    fn from(code: ErrorCode) -> Self {
        Error::new(code)
    }
}

/// Collapses a result into its raw status value, `0` on success.
pub fn status_of<T>(result: &crate::Result<T>) -> u32 {
    match result {
        Ok(_) => ErrorCode::Success.raw(),
        Err(e) => e.to_raw(),
    }
}
