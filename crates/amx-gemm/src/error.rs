//! Error types for matrix construction and multiplication.

use thiserror::Error;

/// Errors that can occur when building matrices or multiplying them.
#[derive(Debug, Error)]
pub enum AmxError {
    /// A matrix was requested with a zero dimension.
    #[error("matrix dimensions must be non-zero, got {rows}x{cols}")]
    EmptyMatrix {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },

    /// Operand shapes are incompatible.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// The aligned allocator refused the request.
    #[error("failed to allocate {bytes} bytes of 64-byte-aligned storage")]
    Allocation {
        /// Size of the failed request in bytes.
        bytes: usize,
    },
}

/// Result type for fallible amx-gemm operations.
pub type Result<T> = std::result::Result<T, AmxError>;
