//! Vector-register abstraction the small-GEMM tiles are written against.
//!
//! A tile is described in units of [`SimdVec`] registers, so the same tiling
//! code retypes to any vector width. Two implementations exist:
//! - `avx2`: `__m256` / `__m256d` with FMA (8 × f32, 4 × f64)
//! - `portable`: plain lane arrays of the same widths using `mul_add`
//!
//! Both use a fused multiply-add, so they produce bit-identical results.

#[cfg(target_arch = "x86_64")]
pub mod avx2;
pub mod portable;

use std::fmt::Debug;

use num_traits::Float;

use crate::matrix::object::DType;

/// One SIMD register worth of elements.
///
/// All operations are `unsafe` because implementations may rely on CPU
/// features that the caller is responsible for having checked.
pub trait SimdVec: Copy {
    type Elem: Copy;

    /// Number of elements per register.
    const LANES: usize;

    /// # Safety
    /// The CPU must support the instruction set of the implementation.
    unsafe fn zero() -> Self;

    /// # Safety
    /// The CPU must support the instruction set of the implementation.
    unsafe fn splat(x: Self::Elem) -> Self;

    /// Unaligned load of `LANES` elements.
    ///
    /// # Safety
    /// `ptr` must be valid for reading `LANES` elements.
    unsafe fn load(ptr: *const Self::Elem) -> Self;

    /// Unaligned store of `LANES` elements.
    ///
    /// # Safety
    /// `ptr` must be valid for writing `LANES` elements.
    unsafe fn store(self, ptr: *mut Self::Elem);

    /// `a * b + c` with a single rounding.
    ///
    /// # Safety
    /// The CPU must support the instruction set of the implementation.
    unsafe fn fmadd(a: Self, b: Self, c: Self) -> Self;

    /// # Safety
    /// The CPU must support the instruction set of the implementation.
    unsafe fn mul(self, rhs: Self) -> Self;

    /// Cache hint for memory about to be read. Never changes results.
    ///
    /// # Safety
    /// The CPU must support the instruction set of the implementation.
    #[inline(always)]
    unsafe fn prefetch(_ptr: *const Self::Elem) {}
}

/// Floating-point element with a small-GEMM kernel.
pub trait Element: Float + Debug + Default + Send + Sync + 'static {
    const DTYPE: DType;

    /// Rows in the primary register tile: four registers of the vector width.
    const MR: usize;

    /// Lane-array fallback available on every target.
    type Portable: SimdVec<Elem = Self>;

    /// AVX2 + FMA implementation, used when detected at runtime.
    #[cfg(target_arch = "x86_64")]
    type Avx2: SimdVec<Elem = Self>;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;
    const MR: usize = 32;
    type Portable = portable::Lanes<f32, 8>;
    #[cfg(target_arch = "x86_64")]
    type Avx2 = avx2::F32x8;
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;
    const MR: usize = 16;
    type Portable = portable::Lanes<f64, 4>;
    #[cfg(target_arch = "x86_64")]
    type Avx2 = avx2::F64x4;
}

/// True when the AVX2 + FMA vectors can be used on this CPU.
pub fn avx2_available() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma")
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}
