//! `gemm-core` - dense `f32` matrix multiplication with interchangeable strategies.
//!
//! This crate provides:
//! - `MatrixView` / `MatrixViewMut`, non-owning strided windows over flat buffers
//! - Shape-checked elementwise add/sub/fill over views
//! - Naive, cache-blocked and Strassen multiplication, selected by `Algorithm`
//! - A per-call `ScratchArena` for temporary buffers
//! - Process-wide `GemmConfig` tunables
//! - An owned `Matrix` convenience type

pub mod arena;
pub mod config;
pub mod cpu;
pub mod error;
pub mod gemm;
pub mod matrix;
pub mod ops;
pub mod view;

// Re-export primary types at the crate root for convenience.
pub use arena::{ScratchArena, ScratchBuffer};
pub use config::GemmConfig;
pub use cpu::strassen::{stop_reason, StopReason};
pub use cpu::{Algorithm, MultiplyStats};
pub use error::{GemmError, Result};
pub use gemm::{multiply, multiply_views, multiply_with_config};
pub use matrix::Matrix;
pub use view::{MatrixView, MatrixViewMut, Quadrant};
