//! Size thresholds and switches for the small-matrix path.

/// Which vector implementation the kernels run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// AVX2 + FMA when the CPU has it, lane arrays otherwise.
    #[default]
    Auto,
    /// Always use the lane-array vectors.
    Portable,
}

/// When a problem counts as "small" for one datatype.
///
/// A problem qualifies when `m * n < matrix²` or when both
/// `m < m_rect` and `k < k_rect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub matrix: usize,
    pub m_rect: usize,
    pub k_rect: usize,
}

impl Thresholds {
    /// Single-precision defaults.
    pub const SINGLE: Thresholds = Thresholds {
        matrix: 240,
        m_rect: 160,
        k_rect: 128,
    };

    /// Double-precision defaults, half of the single-precision ones.
    pub const DOUBLE: Thresholds = Thresholds::SINGLE.halved();

    pub const fn halved(self) -> Thresholds {
        Thresholds {
            matrix: self.matrix / 2,
            m_rect: self.m_rect / 2,
            k_rect: self.k_rect / 2,
        }
    }

    pub fn admits(&self, m: usize, n: usize, k: usize) -> bool {
        m.saturating_mul(n) < self.matrix * self.matrix || (m < self.m_rect && k < self.k_rect)
    }

    /// Elements needed to hold any packed MR band the thresholds allow,
    /// matching a `matrix × matrix` buffer.
    pub fn pack_capacity(&self) -> usize {
        self.matrix * self.matrix
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmallGemmConfig {
    pub single: Thresholds,
    pub double: Thresholds,
    /// Elements available to materialize a transposed single-precision A.
    pub transpose_scratch: usize,
    /// Copy each MR band of A into a contiguous buffer on its first column
    /// pass when N > NR.
    pub pack_a: bool,
    pub backend: Backend,
}

impl Default for SmallGemmConfig {
    fn default() -> Self {
        SmallGemmConfig {
            single: Thresholds::SINGLE,
            double: Thresholds::DOUBLE,
            transpose_scratch: 1024,
            pack_a: true,
            backend: Backend::Auto,
        }
    }
}

impl SmallGemmConfig {
    pub fn with_single(mut self, thresholds: Thresholds) -> Self {
        self.single = thresholds;
        self
    }

    pub fn with_double(mut self, thresholds: Thresholds) -> Self {
        self.double = thresholds;
        self
    }

    pub fn with_transpose_scratch(mut self, elements: usize) -> Self {
        self.transpose_scratch = elements;
        self
    }

    pub fn with_pack_a(mut self, pack_a: bool) -> Self {
        self.pack_a = pack_a;
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }
}
