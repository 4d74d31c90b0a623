use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GemmError {
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    #[error("multiply shape mismatch: [{m}x{n}] @ [{n2}x{k}] -> [{out_rows}x{out_cols}]")]
    ShapeMismatchMultiply {
        m: usize,
        n: usize,
        n2: usize,
        k: usize,
        out_rows: usize,
        out_cols: usize,
    },
    #[error("invalid dimension: {rows}x{cols}")]
    InvalidDimension { rows: i64, cols: i64 },
    #[error("row stride {stride} is smaller than column count {cols}")]
    InvalidStride { stride: usize, cols: usize },
    #[error("buffer too small: need {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    #[error("failed to allocate {bytes} bytes of scratch")]
    AllocationFailure { bytes: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, GemmError>;
