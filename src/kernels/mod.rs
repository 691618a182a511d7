//! Register-blocked kernels for the small-matrix GEMM path.
//!
//! Every output block is computed by one const-generic routine,
//! [`tile::accumulate`], instantiated for a row tile of `R` vector registers
//! and a column group of `C` columns. The shapes in use are:
//! - row tiles: 4, 3, 2 or 1 registers ([`RowTile`]), i.e. 32/24/16/8 rows
//!   for f32 and 16/12/8/4 rows for f64
//! - column groups: 3, 2 or 1 columns ([`ColGroup`])
//!
//! Rows left over after the cascade go through `masked` (fewer rows than one
//! register, staged through a small buffer) or `scalar`.

pub mod driver;
pub mod masked;
pub mod scalar;
pub mod tile;

/// Columns per register tile.
pub const NR: usize = 3;

/// Height of a register tile, in vector registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTile {
    /// MR rows, the only shape that packs A.
    Full,
    ThreeQuarters,
    Half,
    Quarter,
}

impl RowTile {
    /// Tiles tried, largest first, once the full-MR bands are consumed.
    pub const CASCADE: [RowTile; 3] = [RowTile::ThreeQuarters, RowTile::Half, RowTile::Quarter];

    pub const fn vectors(self) -> usize {
        match self {
            RowTile::Full => 4,
            RowTile::ThreeQuarters => 3,
            RowTile::Half => 2,
            RowTile::Quarter => 1,
        }
    }

    pub const fn rows(self, lanes: usize) -> usize {
        self.vectors() * lanes
    }
}

/// Width of a column group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColGroup {
    Three,
    Two,
    One,
}

impl ColGroup {
    pub const fn width(self) -> usize {
        match self {
            ColGroup::Three => 3,
            ColGroup::Two => 2,
            ColGroup::One => 1,
        }
    }

    /// Group covering the `n % NR` columns left after full groups.
    pub const fn for_remainder(rem: usize) -> Option<ColGroup> {
        match rem {
            0 => None,
            1 => Some(ColGroup::One),
            2 => Some(ColGroup::Two),
            _ => Some(ColGroup::Three),
        }
    }
}

/// Raw operand pointers and scalars for one kernel invocation.
///
/// A is column-major `m × k` with leading dimension `lda`. B element
/// `op(B)[p, j]` lives at `b + p * b_inc_row + j * b_inc_col`, which is how a
/// transposed B is walked without copying it. C is column-major with `ldc`.
#[derive(Debug, Clone, Copy)]
pub struct GemmPtrs<T> {
    pub k: usize,
    pub alpha: T,
    pub beta: T,
    pub a: *const T,
    pub lda: usize,
    pub b: *const T,
    pub b_inc_row: usize,
    pub b_inc_col: usize,
    pub c: *mut T,
    pub ldc: usize,
}

impl<T: Copy> GemmPtrs<T> {
    /// `op(B)[p, j]`.
    ///
    /// # Safety
    ///
    /// `p < k` and `j` must address a column of op(B).
    #[inline(always)]
    pub unsafe fn b_at(&self, p: usize, j: usize) -> T {
        unsafe { *self.b.add(p * self.b_inc_row + j * self.b_inc_col) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cascade_widths() {
        let f32_rows: Vec<usize> = RowTile::CASCADE.iter().map(|t| t.rows(8)).collect();
        assert_eq!(f32_rows, vec![24, 16, 8]);
        let f64_rows: Vec<usize> = RowTile::CASCADE.iter().map(|t| t.rows(4)).collect();
        assert_eq!(f64_rows, vec![12, 8, 4]);
        assert_eq!(RowTile::Full.rows(8), 32);
    }

    #[test]
    fn test_column_remainders() {
        assert_eq!(ColGroup::for_remainder(0), None);
        assert_eq!(ColGroup::for_remainder(1).map(ColGroup::width), Some(1));
        assert_eq!(ColGroup::for_remainder(2).map(ColGroup::width), Some(2));
        assert_eq!(ColGroup::for_remainder(NR), Some(ColGroup::Three));
    }
}
