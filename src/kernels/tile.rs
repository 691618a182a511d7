//! The register tile shared by every full-width block of the small GEMM.

use super::{ColGroup, GemmPtrs, NR, RowTile};
use crate::simd::SimdVec;

/// Computes one `(R * LANES) × C` block of C:
/// `C[row.., col..] = alpha * (A_band * B[.., col..]) + beta * C[row.., col..]`
///
/// `a` points at element `(row, 0)` of the band being read, which is either
/// A itself (stride `lda`) or the packed copy (stride `R * LANES`).
/// Each K step broadcasts `C` values of B and issues `R * C` FMAs into
/// separate accumulators, so the K reduction stays sequential per element.
///
/// When `pack` is given, every A register loaded is also stored there at
/// `pack + p * R * LANES`, leaving a contiguous copy of the band behind.
///
/// # Safety
///
/// Caller must ensure:
/// - `a.add(p * lda)` is readable for `R * LANES` elements, for p in 0..k
/// - columns `col..col + C` of op(B) and C exist
/// - C rows `row..row + R * LANES` exist in each of those columns
/// - `pack`, if set, is writable for `k * R * LANES` elements and does not overlap A
/// - the CPU supports the instructions behind `V`
#[inline(always)]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn accumulate<V: SimdVec, const R: usize, const C: usize>(
    g: &GemmPtrs<V::Elem>,
    a: *const V::Elem,
    lda: usize,
    pack: Option<*mut V::Elem>,
    row: usize,
    col: usize,
) {
    for j in 0..C {
        let c_col = g.c.add((col + j) * g.ldc + row);
        // one hint per 64-byte line for f32 and f64 alike
        for r in (0..R).step_by(2) {
            V::prefetch(c_col.add(r * V::LANES));
        }
    }

    let mut acc = [[V::zero(); R]; C];

    for p in 0..g.k {
        let mut bv = [V::zero(); C];
        for (j, b) in bv.iter_mut().enumerate() {
            *b = V::splat(g.b_at(p, col + j));
        }

        let a_col = a.add(p * lda);
        for r in 0..R {
            let av = V::load(a_col.add(r * V::LANES));
            if let Some(dst) = pack {
                av.store(dst.add(p * R * V::LANES + r * V::LANES));
            }
            for j in 0..C {
                acc[j][r] = V::fmadd(bv[j], av, acc[j][r]);
            }
        }
    }

    let alpha = V::splat(g.alpha);
    let beta = V::splat(g.beta);
    for (j, acc_col) in acc.iter().enumerate() {
        let c_col = g.c.add((col + j) * g.ldc + row);
        for (r, sum) in acc_col.iter().enumerate() {
            let dst = c_col.add(r * V::LANES);
            let scaled = sum.mul(alpha);
            V::fmadd(V::load(dst), beta, scaled).store(dst);
        }
    }
}

/// Runs [`accumulate`] for the column group `group`.
///
/// # Safety
///
/// Same contract as [`accumulate`] with `C = group.width()`.
#[inline(always)]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn accumulate_group<V: SimdVec, const R: usize>(
    group: ColGroup,
    g: &GemmPtrs<V::Elem>,
    a: *const V::Elem,
    lda: usize,
    row: usize,
    col: usize,
) {
    match group {
        ColGroup::Three => accumulate::<V, R, 3>(g, a, lda, None, row, col),
        ColGroup::Two => accumulate::<V, R, 2>(g, a, lda, None, row, col),
        ColGroup::One => accumulate::<V, R, 1>(g, a, lda, None, row, col),
    }
}

/// Sweeps columns `col_start..n` of one row band: full NR groups, then the
/// 2- or 1-column remainder.
///
/// # Safety
///
/// Same contract as [`accumulate`] for every column in `col_start..n`.
#[inline(always)]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn sweep_columns<V: SimdVec, const R: usize>(
    g: &GemmPtrs<V::Elem>,
    a: *const V::Elem,
    lda: usize,
    row: usize,
    col_start: usize,
    n: usize,
) {
    let mut col = col_start;
    while col + NR <= n {
        accumulate_group::<V, R>(ColGroup::Three, g, a, lda, row, col);
        col += NR;
    }
    if let Some(group) = ColGroup::for_remainder(n - col) {
        accumulate_group::<V, R>(group, g, a, lda, row, col);
    }
}

/// Sweeps every column of a band whose height is given at runtime.
///
/// # Safety
///
/// Same contract as [`sweep_columns`] with `R = tile.vectors()`.
#[inline(always)]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn sweep_row_tile<V: SimdVec>(
    tile: RowTile,
    g: &GemmPtrs<V::Elem>,
    a: *const V::Elem,
    lda: usize,
    row: usize,
    n: usize,
) {
    match tile {
        RowTile::Full => sweep_columns::<V, 4>(g, a, lda, row, 0, n),
        RowTile::ThreeQuarters => sweep_columns::<V, 3>(g, a, lda, row, 0, n),
        RowTile::Half => sweep_columns::<V, 2>(g, a, lda, row, 0, n),
        RowTile::Quarter => sweep_columns::<V, 1>(g, a, lda, row, 0, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::portable::Lanes;

    type V = Lanes<f64, 4>;

    fn ptrs(a: &[f64], lda: usize, b: &[f64], ldb: usize, c: &mut [f64], ldc: usize, k: usize) -> GemmPtrs<f64> {
        GemmPtrs {
            k,
            alpha: 1.0,
            beta: 0.0,
            a: a.as_ptr(),
            lda,
            b: b.as_ptr(),
            b_inc_row: 1,
            b_inc_col: ldb,
            c: c.as_mut_ptr(),
            ldc,
        }
    }

    #[test]
    fn test_accumulate_packs_band_while_computing() {
        let (m, k, n) = (8, 5, 3);
        let a: Vec<f64> = (0..m * k).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..k * n).map(|i| (i % 4) as f64).collect();
        let mut c = vec![0.0; m * n];
        let mut pack = vec![0.0; m * k];

        let g = ptrs(&a, m, &b, k, &mut c, m, k);
        unsafe {
            accumulate::<V, 2, 3>(&g, a.as_ptr(), m, Some(pack.as_mut_ptr()), 0, 0);
        }

        // band of 8 rows already contiguous per K step
        assert_eq!(pack, a);
        for i in 0..m {
            for j in 0..n {
                let expected: f64 = (0..k).map(|p| a[i + p * m] * b[p + j * k]).sum();
                assert_eq!(c[i + j * m], expected, "({}, {})", i, j);
            }
        }
    }

    #[test]
    fn test_sweep_covers_column_remainder() {
        let (m, k, n) = (4, 3, 5);
        let a: Vec<f64> = (0..m * k).map(|i| 1.0 + i as f64).collect();
        let b: Vec<f64> = (0..k * n).map(|i| 2.0 - i as f64).collect();
        // beta = 0 still multiplies C, so start from finite values
        let mut c = vec![1.0; m * n];
        let g = ptrs(&a, m, &b, k, &mut c, m, k);

        unsafe {
            sweep_row_tile::<V>(RowTile::Quarter, &g, a.as_ptr(), m, 0, n);
        }

        for i in 0..m {
            for j in 0..n {
                let expected: f64 = (0..k).map(|p| a[i + p * m] * b[p + j * k]).sum();
                assert_eq!(c[i + j * m], expected, "({}, {})", i, j);
            }
        }
    }
}
