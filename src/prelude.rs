//! # machkit Prelude
//!
//! Re-exports the items a format parser touches on nearly every structure it decodes.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The error type for all machkit operations
pub use crate::Error;

/// The result type used throughout machkit
pub use crate::Result;

/// Failure categories and flags
pub use crate::{describe_error, ErrorCode, ErrorFlags};

// ================================================================================================
// Address Arithmetic
// ================================================================================================

/// Checked arithmetic functions, used as `vm::add`, `vm::subtract`, ...
pub use crate::vm;

/// Address space value types and ranges
pub use crate::vm::{VmAddress, VmOffset, VmRange, VmSize};

// ================================================================================================
// Byte Order
// ================================================================================================

/// Strategy selection, used as `byteorder::select`
pub use crate::byteorder;

/// Byte-order strategy trait and declared endianness
pub use crate::byteorder::{ByteOrder, Endianness};

// ================================================================================================
// Type Runtime
// ================================================================================================

/// Descriptors, entities and diagnostic contexts
pub use crate::runtime::{Context, TypeDescriptor, TypedEntity, BASE_TYPE};

/// Diagnostic routing
pub use crate::config::ContextConfig;
