//! The `Matrix` value type.
//!
//! Row-major f32 storage shaped for the AMX engine: the row pitch is the
//! column count rounded up to a full 16-float tile, the buffer is 64-byte
//! aligned, and the padding columns are zero from construction onward so a
//! trailing-lane load by the micro-kernel contributes nothing. Every
//! operation that hands out a new matrix preserves that contract.

use crate::buf::AlignedBuf;
use crate::error::{AmxError, Result};
use crate::gemm::{self, tiling::TILE};
use std::fmt;
use std::ops::{Index, IndexMut};

/// A dense row-major matrix of `f32` values.
///
/// The physical row pitch ([`stride`](Self::stride)) is `cols` rounded up to
/// a multiple of 16; columns `[cols, stride)` are zero padding. A `Matrix`
/// exclusively owns its buffer and [`Clone`] duplicates it wholesale.
///
/// # Example
///
/// ```
/// use amx_gemm::Matrix;
///
/// let a = Matrix::fill(32, 48, 1.0)?;
/// let b = Matrix::fill(48, 32, 2.0)?;
/// let c = a.matmul(&b)?;
/// assert_eq!(c.get(0, 0), 96.0);
/// # Ok::<(), amx_gemm::AmxError>(())
/// ```
#[derive(Clone)]
pub struct Matrix {
    buf: AlignedBuf,
    rows: usize,
    cols: usize,
    stride: usize,
}

impl Matrix {
    /// Allocate a zeroed `rows x cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(AmxError::EmptyMatrix { rows, cols });
        }
        let stride = cols.next_multiple_of(TILE);
        let len = rows
            .checked_mul(stride)
            .ok_or(AmxError::Allocation { bytes: usize::MAX })?;
        let buf = AlignedBuf::zeroed(len)?;
        Ok(Self {
            buf,
            rows,
            cols,
            stride,
        })
    }

    /// Allocate a matrix with every logical element set to `value`.
    pub fn fill(rows: usize, cols: usize, value: f32) -> Result<Self> {
        let mut m = Self::zeros(rows, cols)?;
        let stride = m.stride;
        for row in m.buf.as_mut_slice().chunks_exact_mut(stride) {
            row[..cols].fill(value);
        }
        Ok(m)
    }

    /// Allocate the `n x n` identity matrix.
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::zeros(n, n)?;
        let stride = m.stride;
        let data = m.buf.as_mut_slice();
        for i in 0..n {
            data[i * stride + i] = 1.0;
        }
        Ok(m)
    }

    /// Copy a contiguous row-major slice into a new matrix.
    ///
    /// Fails with [`AmxError::DimensionMismatch`] unless
    /// `data.len() == rows * cols`.
    pub fn from_slice(rows: usize, cols: usize, data: &[f32]) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(AmxError::DimensionMismatch(format!(
                "expected {} elements, got {}",
                rows * cols,
                data.len()
            )));
        }
        let mut m = Self::zeros(rows, cols)?;
        let stride = m.stride;
        for (dst, src) in m
            .buf
            .as_mut_slice()
            .chunks_exact_mut(stride)
            .zip(data.chunks_exact(cols))
        {
            dst[..cols].copy_from_slice(src);
        }
        Ok(m)
    }

    /// Take ownership of a contiguous row-major `Vec` and build a matrix.
    ///
    /// The vector's allocation cannot be adopted in place (the engine needs
    /// 64-byte alignment and a padded stride), so its contents are copied
    /// and the vector dropped.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        Self::from_slice(rows, cols, &data)
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Physical row pitch in elements; `cols` rounded up to a multiple of 16.
    #[inline]
    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Shape as `(rows, cols)`.
    #[inline]
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Raw pointer to the storage. Row `i` begins at offset `i * stride`.
    ///
    /// Reads through this pointer are unchecked; staying inside
    /// `rows * stride` elements is the caller's responsibility.
    #[inline]
    #[must_use]
    pub fn as_ptr(&self) -> *const f32 {
        self.buf.as_ptr()
    }

    /// Mutable raw pointer to the storage.
    ///
    /// Writes to the padding columns `[cols, stride)` break the engine's
    /// zero-padding contract.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut f32 {
        self.buf.as_mut_ptr()
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[f32] {
        self.buf.as_slice()
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        self.buf.as_mut_slice()
    }

    /// Zero the whole buffer, padding included.
    pub(crate) fn clear(&mut self) {
        self.buf.as_mut_slice().fill(0.0);
    }

    /// Logical row `i` as a slice of `cols` elements.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f32] {
        assert!(i < self.rows, "row index out of bounds");
        &self.buf.as_slice()[i * self.stride..i * self.stride + self.cols]
    }

    /// Element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        self.buf.as_slice()[row * self.stride + col]
    }

    /// Set the element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        self.buf.as_mut_slice()[row * self.stride + col] = value;
    }

    /// Copy the logical elements into a contiguous row-major `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.rows * self.cols);
        for i in 0..self.rows {
            out.extend_from_slice(self.row(i));
        }
        out
    }

    /// Matrix multiplication: `self * other`.
    ///
    /// Runs on the AMX tile engine when the hardware has one and both
    /// output dimensions reach a full tile; otherwise on the scalar path.
    /// Fails on inner-dimension mismatch or allocation failure, in which
    /// case no result is published.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(AmxError::DimensionMismatch(format!(
                "cannot multiply {}x{} by {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        let mut c = Matrix::zeros(self.rows, other.cols)?;
        gemm::execute(self, other, &mut c)?;
        Ok(c)
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Result<Matrix> {
        let mut t = Matrix::zeros(self.cols, self.rows)?;
        let t_stride = t.stride;
        let src = self.buf.as_slice();
        let dst = t.buf.as_mut_slice();
        for i in 0..self.rows {
            for j in 0..self.cols {
                dst[j * t_stride + i] = src[i * self.stride + j];
            }
        }
        Ok(t)
    }

    /// Element-wise sum. Fails unless shapes match.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, "add", |x, y| x + y)
    }

    /// Element-wise difference. Fails unless shapes match.
    pub fn sub(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, "sub", |x, y| x - y)
    }

    /// Multiply every element by `factor`.
    pub fn scale(&self, factor: f32) -> Result<Matrix> {
        let mut out = Matrix::zeros(self.rows, self.cols)?;
        let stride = self.stride;
        let src = self.buf.as_slice();
        let dst = out.buf.as_mut_slice();
        for i in 0..self.rows {
            for j in 0..self.cols {
                dst[i * stride + j] = src[i * stride + j] * factor;
            }
        }
        Ok(out)
    }

    /// Negated copy.
    pub fn neg(&self) -> Result<Matrix> {
        self.scale(-1.0)
    }

    fn zip_with(&self, other: &Matrix, op: &str, f: impl Fn(f32, f32) -> f32) -> Result<Matrix> {
        if self.shape() != other.shape() {
            return Err(AmxError::DimensionMismatch(format!(
                "cannot {op} {}x{} and {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        let mut out = Matrix::zeros(self.rows, self.cols)?;
        let (ls, rs, os) = (self.stride, other.stride, out.stride);
        let lhs = self.buf.as_slice();
        let rhs = other.buf.as_slice();
        let dst = out.buf.as_mut_slice();
        for i in 0..self.rows {
            for j in 0..self.cols {
                dst[i * os + j] = f(lhs[i * ls + j], rhs[i * rs + j]);
            }
        }
        Ok(out)
    }
}

impl PartialEq for Matrix {
    /// Shape and logical elements; padding is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && (0..self.rows).all(|i| self.row(i) == other.row(i))
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        &self.buf.as_slice()[row * self.stride + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        &mut self.buf.as_mut_slice()[row * self.stride + col]
    }
}

impl fmt::Debug for Matrix {
    /// Renders at most the leading 10x10 block.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SHOW: usize = 10;
        writeln!(f, "Matrix({}x{}) [", self.rows, self.cols)?;
        for i in 0..self.rows.min(SHOW) {
            write!(f, "    [")?;
            for j in 0..self.cols.min(SHOW) {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.get(i, j))?;
            }
            if self.cols > SHOW {
                write!(f, ", ...")?;
            }
            writeln!(f, "],")?;
        }
        if self.rows > SHOW {
            writeln!(f, "    ... ({} more rows)", self.rows - SHOW)?;
        }
        write!(f, "]")
    }
}
