//! Reusable working memory for the small kernels.

use crate::simd::Element;

/// Working memory for one datatype's small kernel.
///
/// Allocated once when the owning [`SmallGemm`](crate::SmallGemm) is built
/// and reused by every call; the kernel itself never allocates. Holding the
/// buffers behind `&mut` is what keeps concurrent calls from sharing them.
#[derive(Debug, Clone)]
pub struct GemmScratch<T> {
    pack: Vec<T>,
    transpose: Vec<T>,
}

impl<T: Element> GemmScratch<T> {
    pub fn new(pack_len: usize, transpose_len: usize) -> Self {
        GemmScratch {
            pack: vec![T::zero(); pack_len],
            transpose: vec![T::zero(); transpose_len],
        }
    }

    pub fn transpose_capacity(&self) -> usize {
        self.transpose.len()
    }

    /// Borrows both buffers for one call.
    ///
    /// The first slot is a packed-A buffer for an MR band of depth `pack_k`,
    /// `None` when no depth is given or the buffer is too short. The second is
    /// exactly `transpose_len` elements of transpose scratch, `None` if it
    /// doesn't fit.
    pub(crate) fn split_for(
        &mut self,
        pack_k: Option<usize>,
        transpose_len: usize,
    ) -> (Option<&mut [T]>, Option<&mut [T]>) {
        let pack = pack_k
            .and_then(|k| T::MR.checked_mul(k))
            .and_then(|len| self.pack.get_mut(..len));
        (pack, self.transpose.get_mut(..transpose_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_for_respects_capacity() {
        let mut s = GemmScratch::<f32>::new(32 * 10, 0);
        let (pack, transpose) = s.split_for(Some(10), 0);
        assert_eq!(pack.map(|b| b.len()), Some(320));
        assert_eq!(transpose.map(|b| b.len()), Some(0));

        let (pack, transpose) = s.split_for(Some(11), 1);
        assert!(pack.is_none());
        assert!(transpose.is_none());

        assert!(s.split_for(None, 0).0.is_none());
    }

    #[test]
    fn test_double_band_is_sixteen_rows() {
        let mut s = GemmScratch::<f64>::new(160, 24);
        let (pack, transpose) = s.split_for(Some(10), 24);
        assert_eq!(pack.map(|b| b.len()), Some(160));
        assert_eq!(transpose.map(|b| b.len()), Some(24));
        assert_eq!(s.transpose_capacity(), 24);
    }
}
