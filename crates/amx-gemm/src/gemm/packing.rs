//! A-panel packing.
//!
//! The micro-kernel consumes A as K columns of 16 floats, column-major with
//! stride 16, so that each LDY pulls one ready-made 64-byte column. This
//! module gathers a 16-row slice of row-major A into that layout. A panel is
//! packed once per row tile and reused across every column tile of that row,
//! which amortises the strided gathers.

use super::tiling::TILE;
use std::ops::Range;

/// Pack rows `rows` of `a` into `panel`, column-major with stride 16.
///
/// `a` is row-major with row pitch `a_stride`; `panel` must hold exactly
/// `k * 16` floats. After the call, `panel[kk * 16 + r]` holds
/// `A[rows.start + r, kk]` for `r < rows.len()` and zero for the padding
/// rows of a ragged bottom tile.
///
/// # Panics
///
/// Panics if `rows` is empty or spans more than 16 rows, if `panel` is not
/// `k * 16` floats, or if `a` is too short for the requested gather.
pub fn pack_a_panel(a: &[f32], a_stride: usize, rows: Range<usize>, k: usize, panel: &mut [f32]) {
    let height = rows.len();
    assert!(height >= 1 && height <= TILE, "panel height out of range");
    assert_eq!(panel.len(), k * TILE, "panel must hold k x 16 floats");
    assert!(
        k == 0 || (rows.end - 1) * a_stride + k <= a.len(),
        "source matrix too short for panel gather"
    );

    let base = rows.start * a_stride;

    if height == TILE {
        // Full tile: straight-line strided gather of all 16 rows.
        for kk in 0..k {
            // SAFETY: the entry asserts bound every index; the furthest read
            // is base + 15 * a_stride + k - 1 and the furthest write is
            // (k - 1) * 16 + 15.
            unsafe {
                let src = a.as_ptr().add(base + kk);
                let dst = panel.as_mut_ptr().add(kk * TILE);
                *dst = *src;
                *dst.add(1) = *src.add(a_stride);
                *dst.add(2) = *src.add(2 * a_stride);
                *dst.add(3) = *src.add(3 * a_stride);
                *dst.add(4) = *src.add(4 * a_stride);
                *dst.add(5) = *src.add(5 * a_stride);
                *dst.add(6) = *src.add(6 * a_stride);
                *dst.add(7) = *src.add(7 * a_stride);
                *dst.add(8) = *src.add(8 * a_stride);
                *dst.add(9) = *src.add(9 * a_stride);
                *dst.add(10) = *src.add(10 * a_stride);
                *dst.add(11) = *src.add(11 * a_stride);
                *dst.add(12) = *src.add(12 * a_stride);
                *dst.add(13) = *src.add(13 * a_stride);
                *dst.add(14) = *src.add(14 * a_stride);
                *dst.add(15) = *src.add(15 * a_stride);
            }
        }
    } else {
        // Ragged bottom tile: copy the live rows, zero the pad so the
        // kernel's trailing lanes contribute nothing.
        for kk in 0..k {
            let dst = &mut panel[kk * TILE..(kk + 1) * TILE];
            for (r, slot) in dst[..height].iter_mut().enumerate() {
                *slot = a[base + r * a_stride + kk];
            }
            dst[height..].fill(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 20-row matrix with stride 5, A[i, j] = 100 * i + j.
    fn fixture(rows: usize, stride: usize, cols: usize) -> Vec<f32> {
        let mut a = vec![0.0; rows * stride];
        for i in 0..rows {
            for j in 0..cols {
                a[i * stride + j] = (100 * i + j) as f32;
            }
        }
        a
    }

    #[test]
    fn full_tile_layout() {
        let k = 5;
        let a = fixture(20, 5, k);
        let mut panel = vec![f32::NAN; k * TILE];

        pack_a_panel(&a, 5, 2..18, k, &mut panel);

        for kk in 0..k {
            for r in 0..TILE {
                assert_eq!(
                    panel[kk * TILE + r],
                    (100 * (2 + r) + kk) as f32,
                    "panel[{kk}*16 + {r}]"
                );
            }
        }
    }

    #[test]
    fn ragged_tile_zero_fills() {
        let k = 3;
        let a = fixture(20, 5, k);
        let mut panel = vec![f32::NAN; k * TILE];

        pack_a_panel(&a, 5, 16..20, k, &mut panel);

        for kk in 0..k {
            for r in 0..4 {
                assert_eq!(panel[kk * TILE + r], (100 * (16 + r) + kk) as f32);
            }
            for r in 4..TILE {
                assert_eq!(panel[kk * TILE + r], 0.0, "pad row {r} at step {kk}");
            }
        }
    }

    #[test]
    fn single_row_panel() {
        let a = fixture(1, 16, 2);
        let mut panel = vec![f32::NAN; 2 * TILE];
        pack_a_panel(&a, 16, 0..1, 2, &mut panel);
        assert_eq!(panel[0], 0.0);
        assert_eq!(panel[TILE], 1.0);
        assert!(panel[1..TILE].iter().all(|&x| x == 0.0));
    }

    #[test]
    #[should_panic(expected = "panel height")]
    fn rejects_oversized_range() {
        let a = fixture(20, 5, 5);
        let mut panel = vec![0.0; 5 * TILE];
        pack_a_panel(&a, 5, 0..17, 5, &mut panel);
    }

    #[test]
    #[should_panic(expected = "panel must hold")]
    fn rejects_wrong_panel_size() {
        let a = fixture(20, 5, 5);
        let mut panel = vec![0.0; 4 * TILE];
        pack_a_panel(&a, 5, 0..16, 5, &mut panel);
    }
}
