//! Tile geometry and work partitioning.

use std::ops::Range;

/// Output tile edge: 16 f32 lanes, one 64-byte AMX register row.
pub const TILE: usize = 16;

/// Below this row count, packing and dispatch overhead outweighs the
/// parallel speed-up and one inline worker wins.
pub const SINGLE_THREAD_MAX_ROWS: usize = 64;

/// Number of 16-row tiles covering `rows` rows.
#[inline]
#[must_use]
pub fn row_tile_count(rows: usize) -> usize {
    rows.div_ceil(TILE)
}

/// Partition `0..rows` into at most `workers` contiguous row ranges.
///
/// Each range's length is a multiple of [`TILE`] except possibly the last,
/// which absorbs the remainder. Ranges are non-empty and cover `0..rows`
/// exactly.
#[must_use]
pub fn partition_rows(rows: usize, workers: usize) -> Vec<Range<usize>> {
    let tiles = row_tile_count(rows);
    let workers = workers.clamp(1, tiles.max(1));
    let per_worker = (tiles / workers).max(1) * TILE;

    let mut ranges = Vec::with_capacity(workers);
    for w in 0..workers {
        let start = w * per_worker;
        if start >= rows {
            break;
        }
        let end = if w == workers - 1 {
            rows
        } else {
            ((w + 1) * per_worker).min(rows)
        };
        ranges.push(start..end);
    }
    ranges
}
