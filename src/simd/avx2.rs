//! AVX2 + FMA registers: 8 × f32 (`__m256`) and 4 × f64 (`__m256d`).

use std::arch::x86_64::*;

use super::SimdVec;

#[derive(Clone, Copy)]
pub struct F32x8(__m256);

#[derive(Clone, Copy)]
pub struct F64x4(__m256d);

impl SimdVec for F32x8 {
    type Elem = f32;
    const LANES: usize = 8;

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn zero() -> Self {
        F32x8(_mm256_setzero_ps())
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn splat(x: f32) -> Self {
        F32x8(_mm256_set1_ps(x))
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn load(ptr: *const f32) -> Self {
        unsafe { F32x8(_mm256_loadu_ps(ptr)) }
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn store(self, ptr: *mut f32) {
        unsafe { _mm256_storeu_ps(ptr, self.0) }
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn fmadd(a: Self, b: Self, c: Self) -> Self {
        F32x8(_mm256_fmadd_ps(a.0, b.0, c.0))
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn mul(self, rhs: Self) -> Self {
        F32x8(_mm256_mul_ps(self.0, rhs.0))
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn prefetch(ptr: *const f32) {
        unsafe { _mm_prefetch::<_MM_HINT_T0>(ptr.cast::<i8>()) }
    }
}

impl SimdVec for F64x4 {
    type Elem = f64;
    const LANES: usize = 4;

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn zero() -> Self {
        F64x4(_mm256_setzero_pd())
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn splat(x: f64) -> Self {
        F64x4(_mm256_set1_pd(x))
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn load(ptr: *const f64) -> Self {
        unsafe { F64x4(_mm256_loadu_pd(ptr)) }
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn store(self, ptr: *mut f64) {
        unsafe { _mm256_storeu_pd(ptr, self.0) }
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn fmadd(a: Self, b: Self, c: Self) -> Self {
        F64x4(_mm256_fmadd_pd(a.0, b.0, c.0))
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn mul(self, rhs: Self) -> Self {
        F64x4(_mm256_mul_pd(self.0, rhs.0))
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn prefetch(ptr: *const f64) {
        unsafe { _mm_prefetch::<_MM_HINT_T0>(ptr.cast::<i8>()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::portable::Lanes;

    #[test]
    fn test_avx2_matches_portable_fmadd() {
        if !crate::simd::avx2_available() {
            println!("Skipping - AVX2/FMA not available");
            return;
        }

        let a: Vec<f32> = (0..8).map(|i| 1.0 + i as f32 * 0.1).collect();
        let b: Vec<f32> = (0..8).map(|i| 3.0 - i as f32 * 0.7).collect();
        let c: Vec<f32> = (0..8).map(|i| (i as f32).sin()).collect();
        let mut fast = [0.0f32; 8];
        let mut slow = [0.0f32; 8];

        unsafe {
            let v = F32x8::fmadd(
                F32x8::load(a.as_ptr()),
                F32x8::load(b.as_ptr()),
                F32x8::load(c.as_ptr()),
            );
            v.mul(F32x8::splat(0.5)).store(fast.as_mut_ptr());

            let w = Lanes::<f32, 8>::fmadd(
                Lanes::<f32, 8>::load(a.as_ptr()),
                Lanes::<f32, 8>::load(b.as_ptr()),
                Lanes::<f32, 8>::load(c.as_ptr()),
            );
            w.mul(Lanes::<f32, 8>::splat(0.5)).store(slow.as_mut_ptr());
        }

        assert_eq!(fast, slow);
    }

    #[test]
    fn test_f64x4_zero_and_store() {
        if !crate::simd::avx2_available() {
            println!("Skipping - AVX2/FMA not available");
            return;
        }

        let mut out = [1.0f64; 4];
        unsafe {
            F64x4::prefetch(out.as_ptr());
            F64x4::zero().store(out.as_mut_ptr());
        }
        assert_eq!(out, [0.0; 4]);
    }
}
