pub mod blocked;
pub mod naive;
pub mod strassen;

use std::fmt;
use std::str::FromStr;

use crate::arena::ScratchArena;
use crate::config::GemmConfig;
use crate::error::{GemmError, Result};
use crate::view::{MatrixView, MatrixViewMut};

/// Multiplication strategy selector.
///
/// All strategies compute the same product; they differ only in speed and in
/// the rounding they accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Reference triple loop, summing in increasing contraction order.
    Naive,
    /// Cache-tiled iteration over `block_dim` tiles.
    Blocked,
    /// Recursive seven-product quadrant decomposition.
    Strassen,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Naive, Algorithm::Blocked, Algorithm::Strassen];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Naive => "naive",
            Algorithm::Blocked => "blocked",
            Algorithm::Strassen => "strassen",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = GemmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "naive" => Ok(Algorithm::Naive),
            "blocked" => Ok(Algorithm::Blocked),
            "strassen" => Ok(Algorithm::Strassen),
            other => Err(GemmError::InvalidConfig(format!(
                "unknown algorithm '{}'",
                other
            ))),
        }
    }
}

/// Counters collected during one multiplication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultiplyStats {
    /// Strassen invocations, including the top-level one.
    pub calls: usize,
    /// Invocations that split into quadrants.
    pub splits: usize,
    /// Invocations that delegated to the direct base-case algorithm.
    pub base_cases: usize,
    /// Deepest recursion depth entered.
    pub max_depth: usize,
    pub scratch_allocations: usize,
    pub peak_scratch_bytes: usize,
}

/// Per-call state threaded through the recursion.
pub(crate) struct Context<'a> {
    pub config: &'a GemmConfig,
    pub arena: &'a ScratchArena,
    pub stats: MultiplyStats,
}

/// Run `algorithm` on pre-validated views with a fresh scratch arena.
pub(crate) fn run(
    algorithm: Algorithm,
    a: &MatrixView<'_>,
    b: &MatrixView<'_>,
    c: &mut MatrixViewMut<'_>,
    config: &GemmConfig,
) -> Result<MultiplyStats> {
    let arena = ScratchArena::with_limit(config.scratch_limit);
    let mut ctx = Context {
        config,
        arena: &arena,
        stats: MultiplyStats::default(),
    };

    match algorithm {
        Algorithm::Naive => naive::naive(a, b, c),
        Algorithm::Blocked => blocked::blocked(a, b, c, config.block_dim, &arena)?,
        Algorithm::Strassen => strassen::strassen(a, b, c, 0, &mut ctx)?,
    }

    debug_assert_eq!(arena.live_buffers(), 0);
    let mut stats = ctx.stats;
    stats.scratch_allocations = arena.allocations();
    stats.peak_scratch_bytes = arena.peak_bytes();
    Ok(stats)
}
