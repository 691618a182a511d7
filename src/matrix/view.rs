//! Borrowed strided matrix views.
//!
//! Element `(i, j)` of the stored matrix lives at `data[i * row_stride + j * col_stride]`.
//! The small kernel only accepts `row_stride == 1` (column-major), with `col_stride` acting
//! as the leading dimension. A [`MatRef`] may additionally carry a logical transpose flag so
//! that `op(X) = X^T` is expressed without touching storage.

use crate::error::{GemmError, OperandId, Result};

/// Number of elements a `rows × cols` view with the given strides spans.
pub(crate) fn required_len(rows: usize, cols: usize, row_stride: usize, col_stride: usize) -> usize {
    if rows == 0 || cols == 0 {
        0
    } else {
        (rows - 1) * row_stride + (cols - 1) * col_stride + 1
    }
}

fn check_extent(
    operand: OperandId,
    len: usize,
    rows: usize,
    cols: usize,
    row_stride: usize,
    col_stride: usize,
) -> Result<()> {
    if row_stride == 1 && cols > 1 && col_stride < rows.max(1) {
        return Err(GemmError::InvalidLeadingDimension {
            operand,
            ld: col_stride,
            rows,
        });
    }
    let required = required_len(rows, cols, row_stride, col_stride);
    if len < required {
        return Err(GemmError::BufferTooSmall {
            operand,
            required,
            actual: len,
        });
    }
    Ok(())
}

/// Read-only strided view, optionally logically transposed.
#[derive(Debug, Clone, Copy)]
pub struct MatRef<'a, T> {
    data: &'a [T],
    rows: usize,
    cols: usize,
    row_stride: usize,
    col_stride: usize,
    trans: bool,
}

impl<'a, T: Copy> MatRef<'a, T> {
    /// Column-major `rows × cols` view with leading dimension `ld`.
    pub fn col_major(data: &'a [T], rows: usize, cols: usize, ld: usize) -> Self {
        Self::from_strides(data, rows, cols, 1, ld)
    }

    pub fn from_strides(
        data: &'a [T],
        rows: usize,
        cols: usize,
        row_stride: usize,
        col_stride: usize,
    ) -> Self {
        MatRef {
            data,
            rows,
            cols,
            row_stride,
            col_stride,
            trans: false,
        }
    }

    /// Flips the logical transpose flag. Storage is untouched.
    pub fn t(self) -> Self {
        MatRef {
            trans: !self.trans,
            ..self
        }
    }

    /// Stored row count.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Stored column count.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    pub fn col_stride(&self) -> usize {
        self.col_stride
    }

    pub fn is_transposed(&self) -> bool {
        self.trans
    }

    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Row count of `op(X)`.
    pub fn op_rows(&self) -> usize {
        if self.trans { self.cols } else { self.rows }
    }

    /// Column count of `op(X)`.
    pub fn op_cols(&self) -> usize {
        if self.trans { self.rows } else { self.cols }
    }

    /// Element `(i, j)` of the stored matrix.
    pub fn stored_at(&self, i: usize, j: usize) -> T {
        self.data[i * self.row_stride + j * self.col_stride]
    }

    /// Element `(i, j)` of `op(X)`.
    pub fn at(&self, i: usize, j: usize) -> T {
        if self.trans {
            self.stored_at(j, i)
        } else {
            self.stored_at(i, j)
        }
    }

    pub(crate) fn check(&self, operand: OperandId) -> Result<()> {
        check_extent(
            operand,
            self.data.len(),
            self.rows,
            self.cols,
            self.row_stride,
            self.col_stride,
        )
    }
}

/// Mutable strided view. Output operands are never transposed.
#[derive(Debug)]
pub struct MatMut<'a, T> {
    data: &'a mut [T],
    rows: usize,
    cols: usize,
    row_stride: usize,
    col_stride: usize,
}

impl<'a, T: Copy> MatMut<'a, T> {
    pub fn col_major(data: &'a mut [T], rows: usize, cols: usize, ld: usize) -> Self {
        Self::from_strides(data, rows, cols, 1, ld)
    }

    pub fn from_strides(
        data: &'a mut [T],
        rows: usize,
        cols: usize,
        row_stride: usize,
        col_stride: usize,
    ) -> Self {
        MatMut {
            data,
            rows,
            cols,
            row_stride,
            col_stride,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    pub fn col_stride(&self) -> usize {
        self.col_stride
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut *self.data
    }

    pub fn at_mut(&mut self, i: usize, j: usize) -> &mut T {
        &mut self.data[i * self.row_stride + j * self.col_stride]
    }

    pub(crate) fn check(&self, operand: OperandId) -> Result<()> {
        check_extent(
            operand,
            self.data.len(),
            self.rows,
            self.cols,
            self.row_stride,
            self.col_stride,
        )
    }
}
