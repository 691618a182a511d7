//! Matrix views and basic reference operations.
//!
//! These provide the operand descriptions the kernels consume, the
//! datatype-tagged objects the dispatcher routes on, and the correctness
//! baselines the optimized paths are tested against.

pub mod naive;
pub mod object;
pub mod transpose;
pub mod view;
