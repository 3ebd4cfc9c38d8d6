//! The matrix-multiply engine.
//!
//! Layered the way the data flows: [`packing`] feeds column-major A-panels
//! to the micro-kernel, which computes one 16x16 output tile per call; the
//! scheduler walks the tile grid and fans row ranges out across performance
//! cores; [`tiling`] owns the geometry. Shapes the engine cannot take (any
//! dimension under one tile, or hardware without AMX) fall back to the
//! scalar reference path.

pub mod packing;
pub mod tiling;

pub use packing::pack_a_panel;
pub use tiling::{partition_rows, row_tile_count, TILE};

mod scalar;

#[cfg(all(target_arch = "aarch64", target_os = "macos"))]
mod kernel;
#[cfg(all(target_arch = "aarch64", target_os = "macos"))]
mod scheduler;

use crate::error::Result;
use crate::matrix::Matrix;

/// Multiply `a * b` into the pre-allocated `c`, choosing the best path.
///
/// Shapes must already be validated (`a.cols == b.rows`, `c` is
/// `a.rows x b.cols`). `c` is fully overwritten.
pub(crate) fn execute(a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<()> {
    #[cfg(all(target_arch = "aarch64", target_os = "macos"))]
    if crate::detect::is_available() && a.rows() >= tiling::TILE && b.cols() >= tiling::TILE {
        tracing::debug!(
            m = a.rows(),
            k = a.cols(),
            n = b.cols(),
            "matmul via AMX tile engine"
        );
        return scheduler::matmul_tiled(a, b, c);
    }

    tracing::trace!(
        m = a.rows(),
        k = a.cols(),
        n = b.cols(),
        "matmul via scalar path"
    );
    scalar::matmul_scalar(a, b, c);
    Ok(())
}
