use tracing::debug;

use crate::config::{self, GemmConfig};
use crate::cpu::{self, Algorithm, MultiplyStats};
use crate::error::{GemmError, Result};
use crate::view::{MatrixView, MatrixViewMut};

/// Multiply `a` (`[m, n]`, row stride `stride_a`) by `b` (`[n2, k]`, row
/// stride `stride_b`) into `c` (`[m2, k2]`, row stride `stride_c`) using the
/// process-wide config.
///
/// Every shape and layout check runs before `c` is written, so on error the
/// output buffer is left exactly as it was.
///
/// # Errors
/// - `InvalidDimension` if any extent is zero.
/// - `ShapeMismatchMultiply` if `n != n2` or `c` is not `[m, k]`.
/// - `InvalidStride` / `BufferTooSmall` if a buffer cannot hold its window.
/// - `AllocationFailure` if scratch memory cannot be acquired.
#[allow(clippy::too_many_arguments)]
pub fn multiply(
    algorithm: Algorithm,
    a: &[f32],
    m: usize,
    n: usize,
    stride_a: usize,
    b: &[f32],
    n2: usize,
    k: usize,
    stride_b: usize,
    c: &mut [f32],
    m2: usize,
    k2: usize,
    stride_c: usize,
) -> Result<()> {
    let config = config::global();
    multiply_with_config(
        &config, algorithm, a, m, n, stride_a, b, n2, k, stride_b, c, m2, k2, stride_c,
    )
    .map(|_| ())
}

/// Same as [`multiply`] with an explicit config, returning call statistics.
#[allow(clippy::too_many_arguments)]
pub fn multiply_with_config(
    config: &GemmConfig,
    algorithm: Algorithm,
    a: &[f32],
    m: usize,
    n: usize,
    stride_a: usize,
    b: &[f32],
    n2: usize,
    k: usize,
    stride_b: usize,
    c: &mut [f32],
    m2: usize,
    k2: usize,
    stride_c: usize,
) -> Result<MultiplyStats> {
    check_extents(m, n, n2, k, m2, k2)?;
    let a = MatrixView::new(a, m, n, stride_a)?;
    let b = MatrixView::new(b, n2, k, stride_b)?;
    let mut c = MatrixViewMut::new(c, m2, k2, stride_c)?;
    multiply_views(config, algorithm, &a, &b, &mut c)
}

/// Multiply two views into a third.
///
/// The views already carry valid layouts; this checks that their shapes are
/// non-empty and compatible, then runs `algorithm` with a private scratch arena.
pub fn multiply_views(
    config: &GemmConfig,
    algorithm: Algorithm,
    a: &MatrixView<'_>,
    b: &MatrixView<'_>,
    c: &mut MatrixViewMut<'_>,
) -> Result<MultiplyStats> {
    config.validate()?;
    let (m, n) = a.shape();
    let (n2, k) = b.shape();
    let (m2, k2) = c.shape();
    check_extents(m, n, n2, k, m2, k2)?;

    debug!(%algorithm, m, n, k, "multiply");
    let stats = cpu::run(algorithm, a, b, c, config)?;
    debug!(
        %algorithm,
        calls = stats.calls,
        splits = stats.splits,
        depth = stats.max_depth,
        peak_scratch_bytes = stats.peak_scratch_bytes,
        "multiply done"
    );
    Ok(stats)
}

fn check_extents(m: usize, n: usize, n2: usize, k: usize, m2: usize, k2: usize) -> Result<()> {
    for (rows, cols) in [(m, n), (n2, k), (m2, k2)] {
        if rows == 0 || cols == 0 {
            return Err(GemmError::InvalidDimension {
                rows: rows as i64,
                cols: cols as i64,
            });
        }
    }
    if n != n2 || m != m2 || k != k2 {
        return Err(GemmError::ShapeMismatchMultiply {
            m,
            n,
            n2,
            k,
            out_rows: m2,
            out_cols: k2,
        });
    }
    Ok(())
}
