//! Typed AMX operations.
//!
//! Thin wrappers that pair an [operand encoding](crate::amx::encode) with
//! the matching [raw issue](crate::amx::raw), so callers work with
//! addresses, register indices and byte offsets instead of packed words.
//!
//! # Safety
//!
//! Everything here inherits the raw layer's requirements: an enabled AMX
//! scope on the current thread and valid addresses for the transfer size
//! (64 bytes, or 128 with the pair flag).

#![allow(clippy::missing_safety_doc)]

use super::{encode, raw};

/// Load into X register `reg` (0–7) from `addr`.
#[inline(always)]
pub unsafe fn ldx(addr: *const u8, reg: u64, pair: bool) {
    raw::ldx(encode::load_store_xy(addr as u64, reg, pair));
}

/// Load into Y register `reg` (0–7) from `addr`.
#[inline(always)]
pub unsafe fn ldy(addr: *const u8, reg: u64, pair: bool) {
    raw::ldy(encode::load_store_xy(addr as u64, reg, pair));
}

/// Load Z row `row` (0–63) from `addr`.
#[inline(always)]
pub unsafe fn ldz(addr: *const u8, row: u64, pair: bool) {
    raw::ldz(encode::load_store_z(addr as u64, row, pair));
}

/// Store X register `reg` (0–7) to `addr`.
#[inline(always)]
pub unsafe fn stx(addr: *mut u8, reg: u64, pair: bool) {
    raw::stx(encode::load_store_xy(addr as u64, reg, pair));
}

/// Store Y register `reg` (0–7) to `addr`.
#[inline(always)]
pub unsafe fn sty(addr: *mut u8, reg: u64, pair: bool) {
    raw::sty(encode::load_store_xy(addr as u64, reg, pair));
}

/// Store Z row `row` (0–63) to `addr`.
#[inline(always)]
pub unsafe fn stz(addr: *mut u8, row: u64, pair: bool) {
    raw::stz(encode::load_store_z(addr as u64, row, pair));
}

/// f32 fused multiply-add.
///
/// Matrix mode (`vector_mode = false`) performs the rank-1 update
/// `Z += outer(X[x_offset..], Y[y_offset..])`, writing 16 result rows
/// spaced 4 apart in the Z file. Vector mode is a pointwise
/// `Z[z_row] += X * Y`.
#[inline(always)]
pub unsafe fn fma32(x_offset: u64, y_offset: u64, z_row: u64, vector_mode: bool) {
    raw::fma32(encode::fma(x_offset, y_offset, z_row, vector_mode));
}

/// f32 fused multiply-subtract.
#[inline(always)]
pub unsafe fn fms32(x_offset: u64, y_offset: u64, z_row: u64, vector_mode: bool) {
    raw::fms32(encode::fma(x_offset, y_offset, z_row, vector_mode));
}

/// f64 fused multiply-add.
#[inline(always)]
pub unsafe fn fma64(x_offset: u64, y_offset: u64, z_row: u64, vector_mode: bool) {
    raw::fma64(encode::fma(x_offset, y_offset, z_row, vector_mode));
}

/// f64 fused multiply-subtract.
#[inline(always)]
pub unsafe fn fms64(x_offset: u64, y_offset: u64, z_row: u64, vector_mode: bool) {
    raw::fms64(encode::fma(x_offset, y_offset, z_row, vector_mode));
}

/// f16 fused multiply-add.
#[inline(always)]
pub unsafe fn fma16(x_offset: u64, y_offset: u64, z_row: u64, vector_mode: bool) {
    raw::fma16(encode::fma(x_offset, y_offset, z_row, vector_mode));
}

/// f16 fused multiply-subtract.
#[inline(always)]
pub unsafe fn fms16(x_offset: u64, y_offset: u64, z_row: u64, vector_mode: bool) {
    raw::fms16(encode::fma(x_offset, y_offset, z_row, vector_mode));
}

/// i16 multiply-accumulate.
#[inline(always)]
pub unsafe fn mac16(x_offset: u64, y_offset: u64, z_row: u64, vector_mode: bool) {
    raw::mac16(encode::fma(x_offset, y_offset, z_row, vector_mode));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amx::guard::AmxGuard;

    #[test]
    fn x_register_round_trip() {
        let Some(_amx) = AmxGuard::acquire() else {
            return;
        };

        let input: [f32; 16] = std::array::from_fn(|i| i as f32);
        let mut output = [0.0f32; 16];

        // SAFETY: scope is open; both arrays are 64 bytes.
        unsafe {
            ldx(input.as_ptr().cast(), 0, false);
            stx(output.as_mut_ptr().cast(), 0, false);
        }

        assert_eq!(input, output);
    }

    #[test]
    fn y_register_round_trip() {
        let Some(_amx) = AmxGuard::acquire() else {
            return;
        };

        let input: [f32; 16] = std::array::from_fn(|i| (i * 3) as f32);
        let mut output = [0.0f32; 16];

        // SAFETY: scope is open; both arrays are 64 bytes.
        unsafe {
            ldy(input.as_ptr().cast(), 5, false);
            sty(output.as_mut_ptr().cast(), 5, false);
        }

        assert_eq!(input, output);
    }
}
