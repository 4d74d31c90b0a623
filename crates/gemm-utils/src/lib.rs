//! Test-harness helpers for `gemm-core`: seeded random fills, constant fills
//! and tolerance-based matrix comparison over flat row-major `f32` buffers.

pub mod compare;
pub mod fill;

pub use compare::{check_same, max_abs_diff, Mismatch, DEFAULT_TOLERANCE};
pub use fill::{constant_fill, identity, one_fill, random_fill, random_matrix};
