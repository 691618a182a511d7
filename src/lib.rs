//! Small-matrix GEMM for f32 and f64.
//!
//! Computes `C := alpha * op(A) * op(B) + beta * C` for problems small enough
//! that a register-blocked kernel beats a general packed GEMM. No cache
//! blocking and no packing of B: each MR-row band of A is streamed once,
//! optionally copied to a contiguous buffer on the first column pass, and
//! multiplied against three columns of B at a time.
//!
//! ## Usage
//!
//! ```
//! use small_gemm::{MatMut, MatRef, SmallGemm, gemm_naive};
//!
//! let (m, n, k) = (37, 5, 12);
//! let a: Vec<f32> = (0..m * k).map(|i| (i % 7) as f32).collect();
//! let b: Vec<f32> = (0..k * n).map(|i| (i % 5) as f32).collect();
//! let mut c = vec![1.0f32; m * n];
//! let mut expected = c.clone();
//!
//! let mut gemm = SmallGemm::default();
//! gemm.sgemm(
//!     2.0,
//!     MatRef::col_major(&a, m, k, m),
//!     MatRef::col_major(&b, k, n, k),
//!     0.5,
//!     MatMut::col_major(&mut c, m, n, m),
//! )
//! .unwrap();
//!
//! gemm_naive(
//!     2.0,
//!     MatRef::col_major(&a, m, k, m),
//!     MatRef::col_major(&b, k, n, k),
//!     0.5,
//!     &mut MatMut::col_major(&mut expected, m, n, m),
//! );
//! assert_eq!(c, expected);
//! ```
//!
//! Type-erased operands go through [`SmallGemm::gemm`], which also checks the
//! preconditions a caller would otherwise route on:
//!
//! ```
//! use small_gemm::{GemmError, MatMut, MatRef, Scalar, SmallGemm, Unsupported};
//!
//! let a = vec![1.0f64; 4];
//! let mut c = vec![0.0f64; 4];
//!
//! let err = SmallGemm::default()
//!     .gemm(
//!         Scalar::F64(1.0),
//!         MatRef::col_major(&a, 2, 2, 2).t().into(),
//!         MatRef::col_major(&a, 2, 2, 2).into(),
//!         Scalar::F64(0.0),
//!         MatMut::col_major(&mut c, 2, 2, 2).into(),
//!     )
//!     .unwrap_err();
//! assert_eq!(err, GemmError::NotApplicable(Unsupported::TransposedA));
//! ```
//!
//! ## What's inside
//!
//! - MR × 3 register tiles (MR = 32 for f32, 16 for f64) on AVX2 + FMA
//! - a 3/4, 1/2, 1/4 row cascade for leftover rows
//! - a masked tail for fewer rows than one register, then a scalar fallback
//! - portable lane-array vectors with identical rounding

pub mod config;
pub mod dispatch;
pub mod error;
pub mod gemv;
pub mod kernels;
pub mod matrix;
pub mod scratch;
pub mod simd;
pub mod small;

pub use config::{Backend, SmallGemmConfig, Thresholds};
pub use error::{GemmError, OperandId, Result, Unsupported};
pub use gemv::{Gemv, ReferenceGemv};
pub use matrix::naive::gemm_naive;
pub use matrix::object::{DType, Operand, OperandMut, Scalar};
pub use matrix::view::{MatMut, MatRef};
pub use scratch::GemmScratch;
pub use simd::Element;
pub use small::SmallGemm;
