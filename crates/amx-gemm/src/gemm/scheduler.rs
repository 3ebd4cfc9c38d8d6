//! Parallel tile scheduler.
//!
//! Partitions the output's row tiles across performance cores and runs one
//! worker per range. Workers never communicate: each owns its packed A-panel
//! and writes a disjoint band of C, so the only synchronisation is the
//! fork-join barrier at dispatch.

use crate::amx::guard::AmxGuard;
use crate::buf::AlignedBuf;
use crate::detect;
use crate::error::Result;
use crate::gemm::kernel::tile_kernel_16x16;
use crate::gemm::packing::pack_a_panel;
use crate::gemm::tiling::{partition_rows, row_tile_count, SINGLE_THREAD_MAX_ROWS, TILE};
use crate::matrix::Matrix;
use std::ops::Range;

/// Raw output pointer handed to workers. Row ranges are disjoint, so
/// concurrent workers never alias each other's writes.
#[derive(Clone, Copy)]
struct OutPtr(*mut f32);

// SAFETY: see above; each worker writes only rows inside its own range.
unsafe impl Send for OutPtr {}
unsafe impl Sync for OutPtr {}

/// Tiled AMX matmul over validated shapes (`M >= 16`, `N >= 16`).
///
/// Zeroes `c` (partial tiles accumulate, full tiles store without reading),
/// then runs inline for small `M` and fork-joins across performance cores
/// otherwise. Fails only on panel allocation, before any worker starts.
pub(crate) fn matmul_tiled(a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<()> {
    let m = a.rows();
    let k = a.cols();
    let n = b.cols();
    debug_assert!(m >= TILE && n >= TILE);

    c.clear();

    let threads = row_tile_count(m).min(detect::performance_cores());
    let c_stride = c.stride();

    if m <= SINGLE_THREAD_MAX_ROWS || threads == 1 {
        let mut panel = AlignedBuf::zeroed(k * TILE)?;
        worker(a, b, OutPtr(c.as_mut_ptr()), c_stride, 0..m, panel.as_mut_slice());
        return Ok(());
    }

    let ranges = partition_rows(m, threads);
    // All panels up front: an allocation failure aborts the whole call
    // before any output row is touched.
    let mut panels = ranges
        .iter()
        .map(|_| AlignedBuf::zeroed(k * TILE))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(m, k, n, workers = ranges.len(), "dispatching tiled matmul");

    let out = OutPtr(c.as_mut_ptr());

    #[cfg(feature = "parallel")]
    rayon::scope(|s| {
        for (range, panel) in ranges.iter().zip(panels.iter_mut()) {
            let range = range.clone();
            s.spawn(move |_| worker(a, b, out, c_stride, range, panel.as_mut_slice()));
        }
    });

    #[cfg(not(feature = "parallel"))]
    for (range, panel) in ranges.iter().zip(panels.iter_mut()) {
        worker(a, b, out, c_stride, range.clone(), panel.as_mut_slice());
    }

    Ok(())
}

/// Process one contiguous row range of C.
///
/// Packs the A-panel once per row tile, then sweeps the column tiles:
/// full 16x16 tiles go through the micro-kernel, ragged edges accumulate
/// from the packed panel in scalar code.
fn worker(
    a: &Matrix,
    b: &Matrix,
    out: OutPtr,
    c_stride: usize,
    rows: Range<usize>,
    panel: &mut [f32],
) {
    let k = a.cols();
    let n = b.cols();
    let b_stride = b.stride();
    let bv = b.as_slice();
    let c = out.0;

    // The enable state is per-core; every worker opens its own scope and
    // closes it when the guard drops at return.
    let amx = AmxGuard::acquire();
    if amx.is_none() {
        tracing::warn!("AMX scope unavailable, worker degrading to scalar tiles");
    }

    let mut i = rows.start;
    while i < rows.end {
        let i_end = (i + TILE).min(rows.end);
        pack_a_panel(a.as_slice(), a.stride(), i..i_end, k, panel);

        let mut j = 0;
        while j < n {
            let j_end = (j + TILE).min(n);

            if amx.is_some() && i_end - i == TILE && j_end - j == TILE {
                // SAFETY: full tile, rows [i, i+16) and cols [j, j+16) are
                // in bounds for B and C; the AMX scope is open.
                unsafe {
                    tile_kernel_16x16(
                        panel.as_ptr(),
                        bv.as_ptr().add(j),
                        c.add(i * c_stride + j),
                        k,
                        b_stride,
                        c_stride,
                    );
                }
            } else {
                let height = i_end - i;
                let width = j_end - j;
                for ii in 0..height {
                    // SAFETY: row i + ii < M and cols [j, j_end) < N.
                    let c_row = unsafe { c.add((i + ii) * c_stride + j) };
                    for kk in 0..k {
                        let aik = panel[kk * TILE + ii];
                        let b_row = &bv[kk * b_stride + j..kk * b_stride + j + width];
                        for (jj, &bkj) in b_row.iter().enumerate() {
                            // SAFETY: jj < width, inside this row of C.
                            unsafe { *c_row.add(jj) += aik * bkj };
                        }
                    }
                }
            }

            j += TILE;
        }
        i += TILE;
    }
}
