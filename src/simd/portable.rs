//! Lane-array vectors for targets (or CPUs) without AVX2.

use super::SimdVec;

/// `N` lanes held in an ordinary array. The compiler is free to vectorize
/// the per-lane loops; `mul_add` keeps the fused rounding of the AVX2 path.
#[derive(Debug, Clone, Copy)]
pub struct Lanes<T, const N: usize>(pub [T; N]);

macro_rules! impl_lanes {
    ($t:ty) => {
        impl<const N: usize> SimdVec for Lanes<$t, N> {
            type Elem = $t;
            const LANES: usize = N;

            #[inline(always)]
            unsafe fn zero() -> Self {
                Lanes([0.0; N])
            }

            #[inline(always)]
            unsafe fn splat(x: $t) -> Self {
                Lanes([x; N])
            }

            #[inline(always)]
            unsafe fn load(ptr: *const $t) -> Self {
                unsafe { Lanes(ptr.cast::<[$t; N]>().read_unaligned()) }
            }

            #[inline(always)]
            unsafe fn store(self, ptr: *mut $t) {
                unsafe { ptr.cast::<[$t; N]>().write_unaligned(self.0) }
            }

            #[inline(always)]
            unsafe fn fmadd(a: Self, b: Self, c: Self) -> Self {
                let mut out = c.0;
                for i in 0..N {
                    out[i] = a.0[i].mul_add(b.0[i], c.0[i]);
                }
                Lanes(out)
            }

            #[inline(always)]
            unsafe fn mul(self, rhs: Self) -> Self {
                let mut out = self.0;
                for i in 0..N {
                    out[i] = self.0[i] * rhs.0[i];
                }
                Lanes(out)
            }
        }
    };
}

impl_lanes!(f32);
impl_lanes!(f64);
