use core::fmt::Debug;
use ndarray::{LinalgScalar, ScalarOperand};
use num_traits::{Float, FloatConst, NumAssign};

/// Real scalar type the transforms are generic over.
///
/// Implemented for `f32` and `f64`.
pub trait StftFloat:
    Float + FloatConst + NumAssign + LinalgScalar + ScalarOperand + Debug + Send + Sync
{
    /// Convert an `f64` literal into this type.
    fn cast_f64(value: f64) -> Self;

    /// Convert a sample count or index into this type.
    fn cast_usize(value: usize) -> Self;
}

impl StftFloat for f32 {
    fn cast_f64(value: f64) -> Self {
        value as f32
    }

    fn cast_usize(value: usize) -> Self {
        value as f32
    }
}

impl StftFloat for f64 {
    fn cast_f64(value: f64) -> Self {
        value
    }

    fn cast_usize(value: usize) -> Self {
        value as f64
    }
}
