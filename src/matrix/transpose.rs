use crate::matrix::view::MatRef;

/// Materialize `op(A)` into `dst` as a column-major `m × k` matrix with
/// leading dimension `m`, where `(m, k) = (op_rows, op_cols)`.
///
/// Used to turn a logically transposed A into something the tiled kernel can
/// stream down columns of. What was row `i` of the stored matrix becomes
/// column `i` of `dst`.
///
/// # Panics
///
/// Panics if `dst` holds fewer than `m * k` elements.
///
/// # Example
///
/// ```
/// use small_gemm::matrix::transpose::transpose_into;
/// use small_gemm::MatRef;
///
/// // stored 3×2 column-major, used as its 2×3 transpose
/// let src = vec![1.0, 2.0, 3.0,
///                4.0, 5.0, 6.0];
/// let mut dst = vec![0.0; 6];
///
/// transpose_into(MatRef::col_major(&src, 3, 2, 3).t(), &mut dst);
///
/// assert_eq!(dst, vec![1.0, 4.0,   // column 0 of op(A)
///                      2.0, 5.0,
///                      3.0, 6.0]);
/// ```
pub fn transpose_into<T: Copy>(a: MatRef<'_, T>, dst: &mut [T]) {
    let m = a.op_rows();
    let k = a.op_cols();
    assert!(dst.len() >= m * k, "dst: expected at least {}x{}={} elements", m, k, m * k);

    for i in 0..m {
        for p in 0..k {
            dst[i + p * m] = a.at(i, p);
        }
    }
}
