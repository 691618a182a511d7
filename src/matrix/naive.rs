use num_traits::Float;

use crate::matrix::view::{MatMut, MatRef};

/// Reference GEMM: `C := alpha * op(A) * op(B) + beta * C`.
///
/// Straight triple loop over arbitrary strides and transpose flags. This is
/// the definition every optimized path is checked against, so it stays as
/// simple as possible: the K-sum is formed first, scaled by alpha once, then
/// combined with `beta * C`.
///
/// # Panics
///
/// Panics if the logical shapes don't conform or a view is out of bounds.
pub fn gemm_naive<T: Float>(alpha: T, a: MatRef<'_, T>, b: MatRef<'_, T>, beta: T, c: &mut MatMut<'_, T>) {
    let m = c.rows();
    let n = c.cols();
    let k = a.op_cols();
    assert_eq!(a.op_rows(), m, "op(A): expected {} rows", m);
    assert_eq!(b.op_rows(), k, "op(B): expected {} rows", k);
    assert_eq!(b.op_cols(), n, "op(B): expected {} cols", n);

    for i in 0..m {
        for j in 0..n {
            let mut sum = T::zero();
            for p in 0..k {
                sum = sum + a.at(i, p) * b.at(p, j);
            }
            let cij = c.at_mut(i, j);
            *cij = *cij * beta + sum * alpha;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naive_2x3_times_3x2() {
        // A = [1 2 3; 4 5 6], column-major
        let a = [1.0, 4.0, 2.0, 5.0, 3.0, 6.0];
        // B = [7 8; 9 10; 11 12]
        let b = [7.0, 9.0, 11.0, 8.0, 10.0, 12.0];
        let mut c = [0.0; 4];
        gemm_naive(
            1.0,
            MatRef::col_major(&a, 2, 3, 2),
            MatRef::col_major(&b, 3, 2, 3),
            0.0,
            &mut MatMut::col_major(&mut c, 2, 2, 2),
        );
        assert_eq!(c, [58.0, 139.0, 64.0, 154.0]);
    }

    #[test]
    fn test_naive_alpha_beta() {
        let a = [2.0f32];
        let b = [3.0f32];
        let mut c = [10.0f32];
        gemm_naive(
            0.5,
            MatRef::col_major(&a, 1, 1, 1),
            MatRef::col_major(&b, 1, 1, 1),
            2.0,
            &mut MatMut::col_major(&mut c, 1, 1, 1),
        );
        assert_eq!(c[0], 23.0);
    }

    #[test]
    fn test_naive_transposed_b() {
        let a = [1.0, 2.0]; // 2x1
        let bt = [3.0, 4.0]; // stored 2x1, used as 1x2
        let mut c = [0.0; 4];
        gemm_naive(
            1.0,
            MatRef::col_major(&a, 2, 1, 2),
            MatRef::col_major(&bt, 2, 1, 2).t(),
            0.0,
            &mut MatMut::col_major(&mut c, 2, 2, 2),
        );
        assert_eq!(c, [3.0, 6.0, 4.0, 8.0]);
    }
}
