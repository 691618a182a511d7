//! Datatype-tagged operands consumed by the dispatcher.

use std::fmt;

use crate::matrix::view::{MatMut, MatRef};

/// Element datatype tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
    /// Complex, two 32-bit floats.
    C32,
    /// Complex, two 64-bit floats.
    C64,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::C32 => "c32",
            DType::C64 => "c64",
        };
        f.write_str(name)
    }
}

/// Scalar multiplier (alpha or beta).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    F32(f32),
    F64(f64),
}

impl Scalar {
    pub fn dtype(&self) -> DType {
        match self {
            Scalar::F32(_) => DType::F32,
            Scalar::F64(_) => DType::F64,
        }
    }

    pub fn is_zero(&self) -> bool {
        match *self {
            Scalar::F32(v) => v == 0.0,
            Scalar::F64(v) => v == 0.0,
        }
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::F32(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::F64(v)
    }
}

macro_rules! for_each_variant {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            Self::F32($m) => $body,
            Self::F64($m) => $body,
            Self::C32($m) => $body,
            Self::C64($m) => $body,
        }
    };
}

/// Read-only input operand (A or B).
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    F32(MatRef<'a, f32>),
    F64(MatRef<'a, f64>),
    C32(MatRef<'a, [f32; 2]>),
    C64(MatRef<'a, [f64; 2]>),
}

impl Operand<'_> {
    pub fn dtype(&self) -> DType {
        match self {
            Operand::F32(_) => DType::F32,
            Operand::F64(_) => DType::F64,
            Operand::C32(_) => DType::C32,
            Operand::C64(_) => DType::C64,
        }
    }

    pub fn rows(&self) -> usize {
        for_each_variant!(self, m => m.rows())
    }

    pub fn cols(&self) -> usize {
        for_each_variant!(self, m => m.cols())
    }

    pub fn row_stride(&self) -> usize {
        for_each_variant!(self, m => m.row_stride())
    }

    pub fn col_stride(&self) -> usize {
        for_each_variant!(self, m => m.col_stride())
    }

    pub fn is_transposed(&self) -> bool {
        for_each_variant!(self, m => m.is_transposed())
    }
}

/// Output operand (C).
#[derive(Debug)]
pub enum OperandMut<'a> {
    F32(MatMut<'a, f32>),
    F64(MatMut<'a, f64>),
    C32(MatMut<'a, [f32; 2]>),
    C64(MatMut<'a, [f64; 2]>),
}

impl OperandMut<'_> {
    pub fn dtype(&self) -> DType {
        match self {
            OperandMut::F32(_) => DType::F32,
            OperandMut::F64(_) => DType::F64,
            OperandMut::C32(_) => DType::C32,
            OperandMut::C64(_) => DType::C64,
        }
    }

    pub fn rows(&self) -> usize {
        for_each_variant!(self, m => m.rows())
    }

    pub fn cols(&self) -> usize {
        for_each_variant!(self, m => m.cols())
    }

    pub fn row_stride(&self) -> usize {
        for_each_variant!(self, m => m.row_stride())
    }

    pub fn col_stride(&self) -> usize {
        for_each_variant!(self, m => m.col_stride())
    }
}

macro_rules! impl_from_views {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl<'a> From<MatRef<'a, $ty>> for Operand<'a> {
                fn from(m: MatRef<'a, $ty>) -> Self {
                    Operand::$variant(m)
                }
            }

            impl<'a> From<MatMut<'a, $ty>> for OperandMut<'a> {
                fn from(m: MatMut<'a, $ty>) -> Self {
                    OperandMut::$variant(m)
                }
            }
        )*
    };
}

impl_from_views!(f32 => F32, f64 => F64, [f32; 2] => C32, [f64; 2] => C64);
