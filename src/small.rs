//! Per-datatype small-matrix GEMM: `C := alpha * op(A) * op(B) + beta * C`.
//!
//! [`SmallGemm`] owns the scratch buffers and the GEMV used for `n == 1`.
//! [`SmallGemm::sgemm`] and [`SmallGemm::dgemm`] are the typed kernels; the
//! datatype-routing entry point lives in [`crate::dispatch`].

use crate::config::{Backend, SmallGemmConfig, Thresholds};
use crate::error::{GemmError, OperandId, Result, Unsupported};
use crate::gemv::{Gemv, ReferenceGemv};
use crate::kernels::driver::execute;
use crate::kernels::{GemmPtrs, NR};
use crate::matrix::transpose::transpose_into;
use crate::matrix::view::{MatMut, MatRef};
use crate::scratch::GemmScratch;
use crate::simd::Element;

/// What a kernel does with a logically transposed A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransposedA {
    /// Copy op(A) into the transpose scratch first.
    Materialize,
    Reject,
}

/// Small-matrix GEMM context.
///
/// Scratch memory is allocated here, once, and reused by every call. Calls
/// take `&mut self`, so a context can't be shared between threads without
/// external locking; give each thread its own.
///
/// # Example
///
/// ```
/// use small_gemm::{MatMut, MatRef, SmallGemm};
///
/// // A is 2×3, B is 3×2, both column-major
/// let a = vec![1.0f32, 4.0, 2.0, 5.0, 3.0, 6.0];
/// let b = vec![7.0f32, 9.0, 11.0, 8.0, 10.0, 12.0];
/// let mut c = vec![0.0f32; 4];
///
/// let mut gemm = SmallGemm::default();
/// gemm.sgemm(
///     1.0,
///     MatRef::col_major(&a, 2, 3, 2),
///     MatRef::col_major(&b, 3, 2, 3),
///     0.0,
///     MatMut::col_major(&mut c, 2, 2, 2),
/// )
/// .unwrap();
///
/// assert_eq!(c, vec![58.0, 139.0, 64.0, 154.0]);
/// ```
#[derive(Debug)]
pub struct SmallGemm<G = ReferenceGemv> {
    config: SmallGemmConfig,
    single: GemmScratch<f32>,
    double: GemmScratch<f64>,
    gemv: G,
}

impl SmallGemm<ReferenceGemv> {
    pub fn new(config: SmallGemmConfig) -> Self {
        Self::with_gemv(config, ReferenceGemv)
    }
}

impl Default for SmallGemm<ReferenceGemv> {
    fn default() -> Self {
        Self::new(SmallGemmConfig::default())
    }
}

impl<G> SmallGemm<G> {
    /// Builds a context that delegates single-column problems to `gemv`.
    pub fn with_gemv(config: SmallGemmConfig, gemv: G) -> Self {
        let single = GemmScratch::new(config.single.pack_capacity(), config.transpose_scratch);
        let double = GemmScratch::new(config.double.pack_capacity(), 0);
        SmallGemm {
            config,
            single,
            double,
            gemv,
        }
    }

    pub fn gemv(&self) -> &G {
        &self.gemv
    }
}

impl<G: Gemv<f32> + Gemv<f64>> SmallGemm<G> {
    /// Single-precision kernel.
    ///
    /// A transposed A is materialized into the transpose scratch; if
    /// `m * k` exceeds it the call fails with [`GemmError::ScratchTooSmall`].
    pub fn sgemm(
        &mut self,
        alpha: f32,
        a: MatRef<'_, f32>,
        b: MatRef<'_, f32>,
        beta: f32,
        c: MatMut<'_, f32>,
    ) -> Result<()> {
        Kernel {
            thresholds: self.config.single,
            transposed_a: TransposedA::Materialize,
            pack_a: self.config.pack_a,
            backend: self.config.backend,
            scratch: &mut self.single,
            gemv: &mut self.gemv,
        }
        .run(alpha, a, b, beta, c)
    }

    /// Double-precision kernel. A transposed A is not supported.
    pub fn dgemm(
        &mut self,
        alpha: f64,
        a: MatRef<'_, f64>,
        b: MatRef<'_, f64>,
        beta: f64,
        c: MatMut<'_, f64>,
    ) -> Result<()> {
        Kernel {
            thresholds: self.config.double,
            transposed_a: TransposedA::Reject,
            pack_a: self.config.pack_a,
            backend: self.config.backend,
            scratch: &mut self.double,
            gemv: &mut self.gemv,
        }
        .run(alpha, a, b, beta, c)
    }
}

/// Everything one typed kernel call borrows from the context.
struct Kernel<'s, T, G> {
    thresholds: Thresholds,
    transposed_a: TransposedA,
    pack_a: bool,
    backend: Backend,
    scratch: &'s mut GemmScratch<T>,
    gemv: &'s mut G,
}

fn unit_row_stride(operand: OperandId, stride: usize) -> Result<()> {
    if stride == 1 {
        Ok(())
    } else {
        Err(GemmError::InvalidRowStride { operand, stride })
    }
}

impl<T: Element, G: Gemv<T>> Kernel<'_, T, G> {
    fn run(
        self,
        alpha: T,
        a: MatRef<'_, T>,
        b: MatRef<'_, T>,
        beta: T,
        mut c: MatMut<'_, T>,
    ) -> Result<()> {
        unit_row_stride(OperandId::A, a.row_stride())?;
        unit_row_stride(OperandId::B, b.row_stride())?;
        unit_row_stride(OperandId::C, c.row_stride())?;
        a.check(OperandId::A)?;
        b.check(OperandId::B)?;
        c.check(OperandId::C)?;

        let (m, n, k) = (c.rows(), c.cols(), a.op_cols());
        if a.op_rows() != m || b.op_rows() != k || b.op_cols() != n {
            return Err(GemmError::ShapeMismatch {
                m: a.op_rows(),
                k,
                k2: b.op_rows(),
                n: b.op_cols(),
                cm: m,
                cn: n,
            });
        }

        // K is op(A)'s width, so a transposed A is judged by its stored rows.
        if !self.thresholds.admits(m, n, k) {
            return Err(GemmError::NonconformalDimensions { m, n, k });
        }

        if n == 1 {
            self.gemv.gemv(alpha, a, b, beta, c);
            return Ok(());
        }

        if a.is_transposed() && self.transposed_a == TransposedA::Reject {
            return Err(GemmError::NotApplicable(Unsupported::TransposedA));
        }
        let transpose_len = if a.is_transposed() { m * k } else { 0 };
        let capacity = self.scratch.transpose_capacity();
        let pack_k = (self.pack_a && n > NR).then_some(k);
        let (pack, transpose) = self.scratch.split_for(pack_k, transpose_len);

        let (a_data, lda) = if a.is_transposed() {
            let Some(dst) = transpose else {
                return Err(GemmError::ScratchTooSmall {
                    required: transpose_len,
                    capacity,
                });
            };
            transpose_into(a, dst);
            let dst: &[T] = dst;
            (dst, m)
        } else {
            (a.as_slice(), a.col_stride())
        };

        if m == 0 || n == 0 {
            return Ok(());
        }
        if k == 0 {
            let zero = T::zero();
            for j in 0..n {
                for i in 0..m {
                    let cij = c.at_mut(i, j);
                    *cij = *cij * beta + zero;
                }
            }
            return Ok(());
        }

        let (b_inc_row, b_inc_col) = if b.is_transposed() {
            (b.col_stride(), 1)
        } else {
            (1, b.col_stride())
        };
        let pack = pack.map(|buf| buf.as_mut_ptr());

        let g = GemmPtrs {
            k,
            alpha,
            beta,
            a: a_data.as_ptr(),
            lda,
            b: b.as_slice().as_ptr(),
            b_inc_row,
            b_inc_col,
            c: c.as_mut_slice().as_mut_ptr(),
            ldc: c.col_stride(),
        };

        // SAFETY: all three operands were bounds checked for their m/n/k
        // extents with unit row stride above, the pack buffer holds MR * k
        // elements and is disjoint from A, B and C, and `execute` only picks
        // AVX2 after runtime detection.
        unsafe { execute(&g, m, n, pack, self.backend) };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::naive::gemm_naive;

    fn filled(len: usize, seed: usize) -> Vec<f64> {
        (0..len).map(|i| ((i * 7 + seed) % 11) as f64 - 5.0).collect()
    }

    #[test]
    fn test_dgemm_rejects_transposed_a() {
        let a = filled(12, 1);
        let b = filled(12, 2);
        let mut c = vec![0.0; 9];
        let err = SmallGemm::default()
            .dgemm(
                1.0,
                MatRef::col_major(&a, 4, 3, 4).t(),
                MatRef::col_major(&b, 4, 3, 4),
                0.0,
                MatMut::col_major(&mut c, 3, 3, 3),
            )
            .unwrap_err();
        assert_eq!(err, GemmError::NotApplicable(Unsupported::TransposedA));
        assert!(c.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_shape_mismatch() {
        let a = filled(12, 1);
        let b = filled(12, 2);
        let mut c = vec![0.0; 12];
        let err = SmallGemm::default()
            .dgemm(
                1.0,
                MatRef::col_major(&a, 3, 4, 3),
                MatRef::col_major(&b, 3, 4, 3),
                0.0,
                MatMut::col_major(&mut c, 3, 4, 3),
            )
            .unwrap_err();
        assert!(matches!(err, GemmError::ShapeMismatch { k: 4, k2: 3, .. }));
    }

    #[test]
    fn test_nonconformal_leaves_c_untouched() {
        let (m, n, k) = (130, 130, 64);
        let a = filled(m * k, 1);
        let b = filled(k * n, 2);
        let mut c = vec![1.0; m * n];
        let err = SmallGemm::default()
            .dgemm(
                1.0,
                MatRef::col_major(&a, m, k, m),
                MatRef::col_major(&b, k, n, k),
                1.0,
                MatMut::col_major(&mut c, m, n, m),
            )
            .unwrap_err();
        assert_eq!(err, GemmError::NonconformalDimensions { m, n, k });
        assert!(err.is_fallback());
        assert!(c.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_transposed_a_threshold_uses_op_width() {
        let thresholds = Thresholds {
            matrix: 4,
            m_rect: 10,
            k_rect: 5,
        };
        let mut gemm = SmallGemm::new(SmallGemmConfig::default().with_single(thresholds));
        let (m, n) = (8, 8);
        let run = |gemm: &mut SmallGemm, k: usize| {
            // stored k × m, so the stored column count is m
            let a: Vec<f32> = (0..k * m).map(|i| (i % 5) as f32).collect();
            let b: Vec<f32> = (0..k * n).map(|i| (i % 3) as f32).collect();
            let mut c = vec![0.0f32; m * n];
            gemm.sgemm(
                1.0,
                MatRef::col_major(&a, k, m, k).t(),
                MatRef::col_major(&b, k, n, k),
                0.0,
                MatMut::col_major(&mut c, m, n, m),
            )
        };

        assert_eq!(run(&mut gemm, 4), Ok(()));
        assert_eq!(
            run(&mut gemm, 6),
            Err(GemmError::NonconformalDimensions { m, n, k: 6 })
        );
    }

    #[test]
    fn test_zero_depth_scales_c() {
        let empty: [f64; 0] = [];
        let mut c = vec![2.0; 20];
        SmallGemm::default()
            .dgemm(
                3.0,
                MatRef::col_major(&empty, 5, 0, 5),
                MatRef::col_major(&empty, 0, 4, 1),
                0.25,
                MatMut::col_major(&mut c, 5, 4, 5),
            )
            .unwrap();
        assert!(c.iter().all(|&v| v == 0.5));
    }

    #[test]
    fn test_padded_leading_dimensions() {
        let (m, n, k) = (21, 7, 9);
        let (lda, ldb, ldc) = (m + 3, k + 2, m + 5);
        let a = filled(lda * k, 3);
        let b = filled(ldb * n, 4);
        let mut c = filled(ldc * n, 5);
        let mut c_ref = c.clone();

        SmallGemm::default()
            .dgemm(
                0.5,
                MatRef::col_major(&a, m, k, lda),
                MatRef::col_major(&b, k, n, ldb),
                -2.0,
                MatMut::col_major(&mut c, m, n, ldc),
            )
            .unwrap();
        gemm_naive(
            0.5,
            MatRef::col_major(&a, m, k, lda),
            MatRef::col_major(&b, k, n, ldb),
            -2.0,
            &mut MatMut::col_major(&mut c_ref, m, n, ldc),
        );

        // integer data: every path is exact
        assert_eq!(c, c_ref);
    }
}
