//! Scalar tail rows for the small GEMM.

use super::GemmPtrs;
use crate::simd::Element;

/// Plain triple loop for rows `row_start..m`, every column.
///
/// Used for the last rows when A's leading dimension is too small for the
/// masked vector path to read a full register safely.
///
/// # Safety
///
/// Caller must ensure rows `row_start..m` and columns `0..n` of A, op(B) and
/// C exist behind the pointers in `g`.
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn scalar_rows<T: Element>(g: &GemmPtrs<T>, row_start: usize, m: usize, n: usize) {
    for i in row_start..m {
        for j in 0..n {
            let mut sum = T::zero();
            for p in 0..g.k {
                sum = sum + *g.a.add(i + p * g.lda) * g.b_at(p, j);
            }
            sum = sum * g.alpha;
            let c = g.c.add(i + j * g.ldc);
            *c = *c * g.beta + sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_rows_only_touch_requested_rows() {
        // A = [1 2; 3 4; 5 6], B = I, C initialised to 1
        let a = [1.0f64, 3.0, 5.0, 2.0, 4.0, 6.0];
        let b = [1.0f64, 0.0, 0.0, 1.0];
        let mut c = [1.0f64; 6];
        let g = GemmPtrs {
            k: 2,
            alpha: 2.0,
            beta: 3.0,
            a: a.as_ptr(),
            lda: 3,
            b: b.as_ptr(),
            b_inc_row: 1,
            b_inc_col: 2,
            c: c.as_mut_ptr(),
            ldc: 3,
        };
        unsafe { scalar_rows(&g, 1, 3, 2) };
        assert_eq!(c, [1.0, 9.0, 13.0, 1.0, 11.0, 15.0]);
    }
}
