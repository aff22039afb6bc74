// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # machkit
//!
//! The foundation layer of an executable-format parsing toolkit. Format parsers (Mach-O load
//! commands, segments, symbol tables) are built on top of it; this crate only provides the
//! primitives they share:
//!
//! - **Overflow-safe arithmetic** over virtual-memory addresses and sizes ([`vm`])
//! - **Ranges** with bounds-checked containment queries ([`vm::VmRange`])
//! - **Byte-order strategies** selected once per input ([`byteorder`])
//! - **A type runtime** giving parsed entities shared identity, naming, equality and
//!   description through single-inheritance dispatch ([`runtime`])
//! - **A closed error taxonomy** shared by all of the above ([`Error`], [`ErrorCode`])
//!
//! The crate performs no I/O and never allocates on behalf of its callers beyond fixed-size
//! values.
//!
//! ## Quick Start
//!
//! ```rust
//! use machkit::prelude::*;
//!
//! // A segment at 0x1_0000_0000 spanning 0x4000 bytes, read from an untrusted header.
//! let segment = VmRange::new(0x1_0000_0000, 0x4000);
//!
//! // A section offset, also untrusted.
//! let section = vm::apply_offset(segment.location(), 0x3000)?;
//! segment.contains_address(0, section)?;
//!
//! // A section that claims to run past its segment.
//! let bad = VmRange::new(section, 0x2000);
//! assert_eq!(
//!     segment.contains_range(bad, false).unwrap_err().code(),
//!     ErrorCode::NotFound
//! );
//! # Ok::<(), machkit::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`Result<T>`](Result). Nothing in this crate panics on
//! malformed input; whether a failure aborts a parse or merely skips a structure is up to the
//! caller.
//!
//! ```rust
//! use machkit::{describe_error, vm, ErrorCode};
//!
//! match vm::add(u64::MAX, 0x10) {
//!     Ok(end) => println!("end {end:#x}"),
//!     Err(e) => {
//!         assert_eq!(e.code(), ErrorCode::Overflow);
//!         assert_eq!(describe_error(e.to_raw()), "OVERFLOW");
//!     }
//! }
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade and never installs a logger.
//! Rejections in [`vm`] and [`byteorder`] are reported at `trace` level; diagnostics attached to
//! parsed entities go through [`runtime::Context`].
//!
//! ## Development and Testing
//!
//! ```bash
//! cargo test
//! cargo bench
//!
//! # Fuzz the arithmetic and range primitives
//! cargo +nightly fuzz run vm_range --release
//! ```

#[macro_use]
mod macros;

mod error;

/// Convenient re-exports of the most commonly used types and functions.
///
/// # Example
///
/// ```rust
/// use machkit::prelude::*;
///
/// let order = byteorder::select(Endianness::Little);
/// let mut offset = 0;
/// assert_eq!(order.read_u16(&[0x34, 0x12], &mut offset)?, 0x1234);
/// # Ok::<(), machkit::Error>(())
/// ```
pub mod prelude;

/// Byte-order strategies for decoding multi-byte fields.
pub mod byteorder;

/// Diagnostic configuration.
pub mod config;

/// Single-inheritance type runtime for parsed entities.
pub mod runtime;

/// Overflow-checked address arithmetic and ranges.
pub mod vm;

/// `machkit` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

pub use error::{describe_error, status_of, Error, ErrorCode, ErrorFlags};
