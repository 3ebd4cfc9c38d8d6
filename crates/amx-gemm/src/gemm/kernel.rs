//! The 16x16xK AMX micro-kernel.
//!
//! One call computes a full 16x16 output tile for the entire K dimension:
//! 16 rank-1 updates per 8-step block, A columns streamed through Y, B rows
//! through X, and the tile accumulated in Z. The caller owns the enable
//! scope; this module never issues SET or CLR.

use crate::amx::ops::{fma32, ldx, ldy, ldz, stz};
use crate::gemm::tiling::TILE;
use std::arch::asm;

/// In f32 matrix mode the 16 result rows are spaced 4 apart in the Z file;
/// rows 0, 4, 8, ..., 60. Treating them as contiguous is wrong.
const Z_ROW_STRIDE: usize = 4;

/// K-loop unroll factor: one block fills all 8 X and all 8 Y registers.
const UNROLL: usize = 8;

#[repr(align(64))]
struct ZeroRow([f32; TILE]);

/// Source for LDZ-based accumulator zeroing.
static ZERO_ROW: ZeroRow = ZeroRow([0.0; TILE]);

#[inline(always)]
unsafe fn prefetch_read(ptr: *const f32) {
    asm!(
        "prfm pldl1keep, [{ptr}]",
        ptr = in(reg) ptr,
        options(readonly, nostack, preserves_flags)
    );
}

/// Compute a 16x16 tile: `C[0..16, 0..16] = sum_k A[:, k] (x) B[k, :]`.
///
/// - `a_panel`: packed A, K columns of 16 floats, column-major stride 16.
/// - `b`: upper-left of the K x 16 source tile, row-major pitch `b_stride`.
/// - `c`: upper-left of the 16 x 16 output tile, row-major pitch `c_stride`.
///
/// The tile is computed from zero; `c` is stored, never read.
///
/// # Safety
///
/// Requires an open AMX scope on the current thread, `a_panel` valid for
/// `k * 16` floats, `b` valid for 16-float reads at each of the `k` row
/// offsets, and `c` valid for 16-float writes at each of the 16 row offsets.
pub(crate) unsafe fn tile_kernel_16x16(
    a_panel: *const f32,
    b: *const f32,
    c: *mut f32,
    k: usize,
    b_stride: usize,
    c_stride: usize,
) {
    // Z is scratch on entry; load zeros into the 16 accumulator rows.
    for i in 0..TILE {
        ldz(ZERO_ROW.0.as_ptr().cast(), (i * Z_ROW_STRIDE) as u64, false);
    }

    let mut kk = 0;
    while kk + UNROLL <= k {
        let a_ptr = a_panel.add(kk * TILE);
        let b_ptr = b.add(kk * b_stride);

        // Next block's operands; wrapping_add because the final block's
        // hint may point past the buffer, which prfm tolerates.
        prefetch_read(a_ptr.wrapping_add(UNROLL * TILE));
        prefetch_read(b_ptr.wrapping_add(UNROLL * b_stride));

        // Eight A columns into Y0..Y7.
        ldy(a_ptr.cast(), 0, false);
        ldy(a_ptr.add(TILE).cast(), 1, false);
        ldy(a_ptr.add(2 * TILE).cast(), 2, false);
        ldy(a_ptr.add(3 * TILE).cast(), 3, false);
        ldy(a_ptr.add(4 * TILE).cast(), 4, false);
        ldy(a_ptr.add(5 * TILE).cast(), 5, false);
        ldy(a_ptr.add(6 * TILE).cast(), 6, false);
        ldy(a_ptr.add(7 * TILE).cast(), 7, false);

        // Eight B rows into X0..X7, each FMA issued right after the load it
        // depends on. z_row stays 0: matrix mode strides Z by 4 itself.
        ldx(b_ptr.cast(), 0, false);
        ldx(b_ptr.add(b_stride).cast(), 1, false);
        fma32(0, 0, 0, false);

        ldx(b_ptr.add(2 * b_stride).cast(), 2, false);
        fma32(64, 64, 0, false);

        ldx(b_ptr.add(3 * b_stride).cast(), 3, false);
        fma32(128, 128, 0, false);

        ldx(b_ptr.add(4 * b_stride).cast(), 4, false);
        fma32(192, 192, 0, false);

        ldx(b_ptr.add(5 * b_stride).cast(), 5, false);
        fma32(256, 256, 0, false);

        ldx(b_ptr.add(6 * b_stride).cast(), 6, false);
        fma32(320, 320, 0, false);

        ldx(b_ptr.add(7 * b_stride).cast(), 7, false);
        fma32(384, 384, 0, false);
        fma32(448, 448, 0, false);

        kk += UNROLL;
    }

    // K remainder, one triple at a time through X0/Y0.
    while kk < k {
        ldy(a_panel.add(kk * TILE).cast(), 0, false);
        ldx(b.add(kk * b_stride).cast(), 0, false);
        fma32(0, 0, 0, false);
        kk += 1;
    }

    for i in 0..TILE {
        stz(
            c.add(i * c_stride).cast(),
            (i * Z_ROW_STRIDE) as u64,
            false,
        );
    }
}
