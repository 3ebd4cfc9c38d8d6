//! Scalar reference matmul.
//!
//! The baseline for shapes the AMX engine does not accept (tiny matrices,
//! non-Apple hardware) and the yardstick the engine is tested against.

use crate::matrix::Matrix;

/// `c = a * b` with plain ikj loops over the padded strides.
///
/// Shapes must already be validated. Zeroes `c` (padding included) before
/// accumulating.
pub(crate) fn matmul_scalar(a: &Matrix, b: &Matrix, c: &mut Matrix) {
    let m = a.rows();
    let k = a.cols();
    let n = b.cols();
    let (a_stride, b_stride, c_stride) = (a.stride(), b.stride(), c.stride());

    c.clear();

    let av = a.as_slice();
    let bv = b.as_slice();
    let cv = c.as_mut_slice();

    for i in 0..m {
        for kk in 0..k {
            let aik = av[i * a_stride + kk];
            let b_row = &bv[kk * b_stride..kk * b_stride + n];
            let c_row = &mut cv[i * c_stride..i * c_stride + n];
            for (cj, bj) in c_row.iter_mut().zip(b_row) {
                *cj += aik * bj;
            }
        }
    }
}
