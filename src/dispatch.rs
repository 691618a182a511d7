//! Datatype-routing entry point.
//!
//! Problems arrive as type-erased [`Operand`]s. The checks run in a fixed
//! order and the first failing one decides the status:
//!
//! 1. alpha is zero
//! 2. A is logically transposed
//! 3. any operand has a row stride other than 1
//! 4. C's datatype has no kernel, or another operand disagrees with it
//!
//! Everything that passes lands in [`SmallGemm::sgemm`] or
//! [`SmallGemm::dgemm`].

use crate::error::{GemmError, OperandId, Result, Unsupported};
use crate::gemv::Gemv;
use crate::matrix::object::{DType, Operand, OperandMut, Scalar};
use crate::small::SmallGemm;

fn decline(err: GemmError) -> Result<()> {
    log::debug!("small gemm declined: {err}");
    Err(err)
}

fn same_dtype(expected: DType, got: DType) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(GemmError::NotApplicable(Unsupported::MixedDTypes {
            expected,
            got,
        }))
    }
}

impl<G: Gemv<f32> + Gemv<f64>> SmallGemm<G> {
    /// `C := alpha * op(A) * op(B) + beta * C` on whichever small kernel
    /// matches C's datatype.
    ///
    /// Errors for which [`GemmError::is_fallback`] holds mean "use a general
    /// GEMM instead"; C is untouched in that case.
    ///
    /// # Example
    ///
    /// ```
    /// use small_gemm::{MatMut, MatRef, Scalar, SmallGemm};
    ///
    /// let a = vec![1.0f64; 6];
    /// let b = vec![1.0f64; 6];
    /// let mut c = vec![0.0f64; 4];
    /// let mut gemm = SmallGemm::default();
    ///
    /// gemm.gemm(
    ///     Scalar::F64(1.0),
    ///     MatRef::col_major(&a, 2, 3, 2).into(),
    ///     MatRef::col_major(&b, 3, 2, 3).into(),
    ///     Scalar::F64(0.0),
    ///     MatMut::col_major(&mut c, 2, 2, 2).into(),
    /// )
    /// .unwrap();
    /// assert_eq!(c, vec![3.0; 4]);
    ///
    /// let err = gemm
    ///     .gemm(
    ///         Scalar::F64(0.0),
    ///         MatRef::col_major(&a, 2, 3, 2).into(),
    ///         MatRef::col_major(&b, 3, 2, 3).into(),
    ///         Scalar::F64(1.0),
    ///         MatMut::col_major(&mut c, 2, 2, 2).into(),
    ///     )
    ///     .unwrap_err();
    /// assert!(err.is_fallback());
    /// ```
    pub fn gemm(
        &mut self,
        alpha: Scalar,
        a: Operand<'_>,
        b: Operand<'_>,
        beta: Scalar,
        c: OperandMut<'_>,
    ) -> Result<()> {
        if alpha.is_zero() {
            return decline(GemmError::NotApplicable(Unsupported::ZeroAlpha));
        }
        if a.is_transposed() {
            return decline(GemmError::NotApplicable(Unsupported::TransposedA));
        }
        for (operand, stride) in [
            (OperandId::A, a.row_stride()),
            (OperandId::B, b.row_stride()),
            (OperandId::C, c.row_stride()),
        ] {
            if stride != 1 {
                return decline(GemmError::InvalidRowStride { operand, stride });
            }
        }

        let dtype = c.dtype();
        if !matches!(dtype, DType::F32 | DType::F64) {
            return decline(GemmError::NotApplicable(Unsupported::DType(dtype)));
        }
        let agree = [a.dtype(), b.dtype(), alpha.dtype(), beta.dtype()]
            .into_iter()
            .try_for_each(|got| same_dtype(dtype, got));
        if let Err(err) = agree {
            return decline(err);
        }

        log::trace!("small gemm: {} kernel, {}x{}", dtype, c.rows(), c.cols());
        let res = match (alpha, a, b, beta, c) {
            (
                Scalar::F32(alpha),
                Operand::F32(a),
                Operand::F32(b),
                Scalar::F32(beta),
                OperandMut::F32(c),
            ) => self.sgemm(alpha, a, b, beta, c),
            (
                Scalar::F64(alpha),
                Operand::F64(a),
                Operand::F64(b),
                Scalar::F64(beta),
                OperandMut::F64(c),
            ) => self.dgemm(alpha, a, b, beta, c),
            _ => Err(GemmError::NotApplicable(Unsupported::DType(dtype))),
        };
        if let Err(err) = &res {
            log::debug!("small gemm failed: {err}");
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::view::{MatMut, MatRef};

    #[test]
    fn test_zero_alpha_checked_before_strides() {
        let a = [1.0f32; 4];
        let mut c = [0.0f32; 4];
        let err = SmallGemm::default()
            .gemm(
                Scalar::F32(0.0),
                MatRef::from_strides(&a, 2, 2, 2, 1).into(),
                MatRef::col_major(&a, 2, 2, 2).into(),
                Scalar::F32(1.0),
                MatMut::col_major(&mut c, 2, 2, 2).into(),
            )
            .unwrap_err();
        assert_eq!(err, GemmError::NotApplicable(Unsupported::ZeroAlpha));
    }

    #[test]
    fn test_mixed_dtypes_declined() {
        let a = [1.0f32; 4];
        let b = [1.0f64; 4];
        let mut c = [0.0f32; 4];
        let err = SmallGemm::default()
            .gemm(
                Scalar::F32(1.0),
                MatRef::col_major(&a, 2, 2, 2).into(),
                MatRef::col_major(&b, 2, 2, 2).into(),
                Scalar::F32(1.0),
                MatMut::col_major(&mut c, 2, 2, 2).into(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            GemmError::NotApplicable(Unsupported::MixedDTypes {
                expected: DType::F32,
                got: DType::F64
            })
        );
        assert_eq!(c, [0.0; 4]);
    }
}
