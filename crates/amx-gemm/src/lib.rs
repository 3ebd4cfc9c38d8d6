//! Dense single-precision matrix multiplication on Apple's undocumented
//! AMX coprocessor.
//!
//! The engine issues AMX instructions directly: a hand-scheduled 16x16xK
//! micro-kernel drives the X, Y and Z register files, a packing layer feeds
//! it A in the column-major layout the hardware wants, and a tile scheduler
//! spreads row tiles across performance cores. Everything degrades cleanly:
//! on machines without AMX (or for matrices smaller than one tile) the same
//! API runs a scalar reference path and produces the same results.
//!
//! # Quick start
//!
//! ```
//! use amx_gemm::Matrix;
//!
//! let a = Matrix::identity(64)?;
//! let b = Matrix::fill(64, 64, 2.0)?;
//! let c = a.matmul(&b)?;
//! assert_eq!(c.get(17, 3), 2.0);
//! # Ok::<(), amx_gemm::AmxError>(())
//! ```
//!
//! # Access levels
//!
//! - **High**: [`Matrix`] with safe construction, algebra and [`matmul`](Matrix::matmul).
//! - **Mid**: `amx::ops` typed instruction wrappers under an `AmxGuard` scope
//!   (Apple Silicon targets only).
//! - **Low**: `amx::raw` opcode issue and [`amx::encode`] operand packing, for
//!   building custom kernels.
//!
//! # Platform support
//!
//! AMX execution requires `aarch64-apple-darwin`; [`detect`] reports what the
//! current machine has. The crate itself compiles and tests everywhere — only
//! the instruction layer and the tile engine are compiled out off-target.

pub mod amx;
pub mod detect;
pub mod error;
pub mod gemm;

mod buf;
mod matrix;

pub use buf::AMX_ALIGN;
pub use detect::{detect, is_available, performance_cores, AmxVersion};
pub use error::{AmxError, Result};
pub use matrix::Matrix;

#[cfg(all(target_arch = "aarch64", target_os = "macos"))]
pub use amx::guard::AmxGuard;
