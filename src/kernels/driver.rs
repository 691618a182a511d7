//! Walks an M × N problem with the register tiles.
//!
//! Order of work:
//! 1. full MR bands; with packing, the first NR columns also copy the band of
//!    A into the pack buffer and later column groups read that copy instead
//! 2. one band from each cascade width (3/4, 1/2, 1/4 of MR) that still fits
//! 3. fewer rows than one register: masked path, or scalar when A's leading
//!    dimension is narrower than a register

use super::masked::masked_rows;
use super::scalar::scalar_rows;
use super::tile::{accumulate, sweep_columns, sweep_row_tile};
use super::{GemmPtrs, NR, RowTile};
use crate::config::Backend;
use crate::simd::{Element, SimdVec};

/// # Safety
///
/// Caller must ensure:
/// - A holds `m × k` column-major elements at `lda`, C holds `m × n` at `ldc`
/// - op(B) holds `k × n` elements at its increments
/// - `pack`, if set, is writable for `T::MR * k` elements and overlaps nothing
/// - the CPU supports the instructions behind `V`
#[inline(always)]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn run<T: Element, V: SimdVec<Elem = T>>(
    g: &GemmPtrs<T>,
    m: usize,
    n: usize,
    pack: Option<*mut T>,
) {
    let lanes = V::LANES;
    let mr = RowTile::Full.rows(lanes);
    debug_assert_eq!(mr, T::MR);

    let mut row = 0;
    while row + mr <= m {
        let a = g.a.add(row);
        match pack {
            Some(buf) => {
                accumulate::<V, 4, NR>(g, a, g.lda, Some(buf), row, 0);
                sweep_columns::<V, 4>(g, buf, mr, row, NR, n);
            }
            None => sweep_columns::<V, 4>(g, a, g.lda, row, 0, n),
        }
        row += mr;
    }

    for tile in RowTile::CASCADE {
        if m - row >= tile.rows(lanes) {
            sweep_row_tile::<V>(tile, g, g.a.add(row), g.lda, row, n);
            row += tile.rows(lanes);
        }
    }

    let rem = m - row;
    if rem == 0 {
        return;
    }
    if g.lda >= lanes {
        masked_rows::<T, V>(g, row, rem, n);
    } else {
        scalar_rows(g, row, m, n);
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2,fma")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn run_avx2<T: Element>(g: &GemmPtrs<T>, m: usize, n: usize, pack: Option<*mut T>) {
    run::<T, T::Avx2>(g, m, n, pack)
}

/// Runs the tiled kernel on the best vector implementation `backend` allows.
///
/// # Safety
///
/// Same contract as `run`, minus the CPU requirement: AVX2 is only used
/// after runtime detection.
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn execute<T: Element>(
    g: &GemmPtrs<T>,
    m: usize,
    n: usize,
    pack: Option<*mut T>,
    backend: Backend,
) {
    #[cfg(target_arch = "x86_64")]
    if backend == Backend::Auto && crate::simd::avx2_available() {
        log::trace!("small {} gemm {}x{}x{}: avx2", T::DTYPE, m, n, g.k);
        run_avx2::<T>(g, m, n, pack);
        return;
    }

    log::trace!("small {} gemm {}x{}x{}: portable ({:?})", T::DTYPE, m, n, g.k, backend);
    run::<T, T::Portable>(g, m, n, pack);
}
