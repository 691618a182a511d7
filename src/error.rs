//! Error and status types returned by the small-matrix GEMM path.

use std::fmt;

use thiserror::Error;

use crate::matrix::object::DType;

/// Which operand of `C := alpha*op(A)*op(B) + beta*C` an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandId {
    A,
    B,
    C,
}

impl fmt::Display for OperandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperandId::A => "A",
            OperandId::B => "B",
            OperandId::C => "C",
        };
        f.write_str(name)
    }
}

/// Why the small kernel declined a problem that is otherwise well formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    /// alpha == 0 reduces to scaling C by beta, which belongs to another path.
    ZeroAlpha,
    /// op(A) = A^T is not routed here.
    TransposedA,
    /// The datatype of C has no small kernel.
    DType(DType),
    /// A, B, C or a scalar disagree with the datatype of C.
    MixedDTypes { expected: DType, got: DType },
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unsupported::ZeroAlpha => f.write_str("alpha is zero"),
            Unsupported::TransposedA => f.write_str("A is transposed"),
            Unsupported::DType(dtype) => write!(f, "no small kernel for dtype {dtype}"),
            Unsupported::MixedDTypes { expected, got } => {
                write!(f, "operand dtype {got} does not match C ({expected})")
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GemmError {
    #[error("small gemm not applicable: {0}")]
    NotApplicable(Unsupported),
    #[error("operand {operand} has row stride {stride}, expected 1")]
    InvalidRowStride { operand: OperandId, stride: usize },
    #[error("{m}x{n}x{k} problem is outside the small-matrix thresholds")]
    NonconformalDimensions { m: usize, n: usize, k: usize },
    #[error("transpose scratch holds {capacity} elements but op(A) needs {required}")]
    ScratchTooSmall { required: usize, capacity: usize },
    #[error("gemm dimension mismatch: [{m}x{k}] @ [{k2}x{n}] -> [{cm}x{cn}]")]
    ShapeMismatch {
        m: usize,
        k: usize,
        k2: usize,
        n: usize,
        cm: usize,
        cn: usize,
    },
    #[error("operand {operand} needs {required} elements but its buffer has {actual}")]
    BufferTooSmall {
        operand: OperandId,
        required: usize,
        actual: usize,
    },
    #[error("operand {operand} has leading dimension {ld} < {rows} rows")]
    InvalidLeadingDimension {
        operand: OperandId,
        ld: usize,
        rows: usize,
    },
}

impl GemmError {
    /// True when the caller should hand the problem to a general GEMM
    /// implementation instead of treating it as a hard failure.
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            GemmError::NotApplicable(_)
                | GemmError::InvalidRowStride { .. }
                | GemmError::NonconformalDimensions { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GemmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_classification() {
        assert!(GemmError::NotApplicable(Unsupported::ZeroAlpha).is_fallback());
        assert!(
            GemmError::InvalidRowStride {
                operand: OperandId::B,
                stride: 2
            }
            .is_fallback()
        );
        assert!(GemmError::NonconformalDimensions { m: 300, n: 300, k: 4 }.is_fallback());
        assert!(
            !GemmError::ScratchTooSmall {
                required: 2048,
                capacity: 1024
            }
            .is_fallback()
        );
    }

    #[test]
    fn test_messages_name_the_operand() {
        let err = GemmError::BufferTooSmall {
            operand: OperandId::C,
            required: 12,
            actual: 9,
        };
        assert_eq!(
            err.to_string(),
            "operand C needs 12 elements but its buffer has 9"
        );
        let err = GemmError::NotApplicable(Unsupported::DType(DType::C64));
        assert_eq!(
            err.to_string(),
            "small gemm not applicable: no small kernel for dtype c64"
        );
    }
}
