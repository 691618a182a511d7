//! Matrix-vector multiply, used when the right-hand side has one column.

use crate::matrix::view::{MatMut, MatRef};
use crate::simd::Element;

/// GEMV with the same calling convention as the small GEMM:
/// `y := alpha * op(A) * x + beta * y`.
///
/// `x` is op(B) of the GEMM, a `k × 1` view that may itself be transposed
/// (stored `1 × k`); `y` is the single column of C. `a` keeps its transpose
/// flag. Shapes are checked by the caller before delegating.
pub trait Gemv<T: Element> {
    fn gemv(&mut self, alpha: T, a: MatRef<'_, T>, x: MatRef<'_, T>, beta: T, y: MatMut<'_, T>);
}

/// Unoptimized GEMV over arbitrary strides.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceGemv;

impl<T: Element> Gemv<T> for ReferenceGemv {
    fn gemv(&mut self, alpha: T, a: MatRef<'_, T>, x: MatRef<'_, T>, beta: T, mut y: MatMut<'_, T>) {
        let m = a.op_rows();
        let k = a.op_cols();
        debug_assert_eq!(x.op_rows(), k);
        debug_assert_eq!(y.rows(), m);

        for i in 0..m {
            let mut sum = T::zero();
            for p in 0..k {
                sum = sum + a.at(i, p) * x.at(p, 0);
            }
            sum = sum * alpha;
            let yi = y.at_mut(i, 0);
            *yi = *yi * beta + sum;
        }
    }
}
