//! Final rows narrower than one vector register.
//!
//! The arithmetic stays full width; only the memory traffic is narrowed. For
//! every K step but the last, A is loaded straight from the matrix: with
//! `lda >= LANES` the extra lanes land in the next column, never past the
//! buffer. The last A column and all of C go through a stack buffer so
//! only `rem` elements are read or written.

use super::{ColGroup, GemmPtrs, NR};
use crate::simd::{Element, SimdVec};

/// Upper bound on `LANES` for any vector type the kernels are built with.
const STAGE: usize = 16;

/// # Safety
///
/// Caller must ensure:
/// - `rem < V::LANES` and `lda >= V::LANES`
/// - rows `row..row + rem` of A, and of C in columns `col..col + C`, exist
/// - columns `col..col + C` of op(B) exist
/// - the CPU supports the instructions behind `V`
#[inline(always)]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn masked_tile<T: Element, V: SimdVec<Elem = T>, const C: usize>(
    g: &GemmPtrs<T>,
    row: usize,
    rem: usize,
    col: usize,
) {
    let mut a_stage = [T::zero(); STAGE];
    let mut c_stage = [T::zero(); STAGE];
    let mut acc = [V::zero(); C];

    for p in 0..g.k {
        let a_col = g.a.add(row + p * g.lda);
        let av = if p + 1 < g.k {
            V::load(a_col)
        } else {
            std::ptr::copy_nonoverlapping(a_col, a_stage.as_mut_ptr(), rem);
            V::load(a_stage.as_ptr())
        };
        for (j, sum) in acc.iter_mut().enumerate() {
            *sum = V::fmadd(V::splat(g.b_at(p, col + j)), av, *sum);
        }
    }

    let alpha = V::splat(g.alpha);
    let beta = V::splat(g.beta);
    for (j, sum) in acc.iter().enumerate() {
        let c_col = g.c.add((col + j) * g.ldc + row);
        std::ptr::copy_nonoverlapping(c_col, c_stage.as_mut_ptr(), rem);
        let out = V::fmadd(V::load(c_stage.as_ptr()), beta, sum.mul(alpha));
        out.store(c_stage.as_mut_ptr());
        std::ptr::copy_nonoverlapping(c_stage.as_ptr(), c_col, rem);
    }
}

/// Computes rows `row..row + rem` of C across all `n` columns.
///
/// # Safety
///
/// Same contract as `masked_tile` for every column in `0..n`.
#[inline(always)]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn masked_rows<T: Element, V: SimdVec<Elem = T>>(
    g: &GemmPtrs<T>,
    row: usize,
    rem: usize,
    n: usize,
) {
    debug_assert!(V::LANES <= STAGE);
    debug_assert!(rem < V::LANES && g.lda >= V::LANES);

    let mut col = 0;
    while col + NR <= n {
        masked_tile::<T, V, 3>(g, row, rem, col);
        col += NR;
    }
    match ColGroup::for_remainder(n - col) {
        Some(ColGroup::Two) => masked_tile::<T, V, 2>(g, row, rem, col),
        Some(ColGroup::One) => masked_tile::<T, V, 1>(g, row, rem, col),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::portable::Lanes;

    #[test]
    fn test_masked_rows_leave_neighbours_untouched() {
        // 3 live rows inside a C with ld 8; rows 3..8 are sentinels
        let (m, k, n, ld) = (3, 4, 5, 8);
        let a: Vec<f32> = (0..ld * k).map(|i| (i % 7) as f32).collect();
        let b: Vec<f32> = (0..k * n).map(|i| (i % 3) as f32 - 1.0).collect();
        let mut c = vec![-9.0f32; ld * n];
        let c0 = c.clone();

        let g = GemmPtrs {
            k,
            alpha: 2.0,
            beta: 0.5,
            a: a.as_ptr(),
            lda: ld,
            b: b.as_ptr(),
            b_inc_row: 1,
            b_inc_col: k,
            c: c.as_mut_ptr(),
            ldc: ld,
        };
        unsafe {
            masked_rows::<f32, Lanes<f32, 8>>(&g, 0, m, n);
        }

        for j in 0..n {
            for i in 0..ld {
                let idx = i + j * ld;
                if i < m {
                    let dot: f32 = (0..k).map(|p| a[i + p * ld] * b[p + j * k]).sum();
                    assert_eq!(c[idx], 0.5 * c0[idx] + 2.0 * dot, "({}, {})", i, j);
                } else {
                    assert_eq!(c[idx], -9.0, "row {} col {} was written", i, j);
                }
            }
        }
    }
}
