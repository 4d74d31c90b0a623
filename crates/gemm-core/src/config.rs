use std::env;
use std::str::FromStr;
use std::sync::RwLock;

use crate::cpu::Algorithm;
use crate::error::{GemmError, Result};

/// Tunables for the multiplication engine.
///
/// All values only affect performance, never the shape or meaning of the
/// result. A multiplication takes a snapshot at entry, so changing the
/// process-wide config while a call is running has no effect on that call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemmConfig {
    /// Tile edge length used by the blocked algorithm.
    pub block_dim: usize,
    /// Strassen stops splitting once `min(m, n, k)` is at or below this.
    pub dim_threshold: usize,
    /// Strassen stops splitting once `m * n * k` is at or below this.
    pub scale_threshold: usize,
    /// Hard ceiling on Strassen recursion depth.
    pub max_depth: usize,
    /// Direct algorithm Strassen delegates to at its base case.
    pub base_case: Algorithm,
    /// Optional cap, in bytes, on live scratch memory per multiplication.
    pub scratch_limit: Option<usize>,
}

impl GemmConfig {
    pub const DEFAULT: GemmConfig = GemmConfig {
        block_dim: 64,
        dim_threshold: 64,
        scale_threshold: 64 * 64 * 64,
        max_depth: 10,
        base_case: Algorithm::Blocked,
        scratch_limit: None,
    };

    /// Check that every tunable is usable.
    pub fn validate(&self) -> Result<()> {
        if self.block_dim == 0 {
            return Err(GemmError::InvalidConfig(
                "block_dim must be > 0".to_string(),
            ));
        }
        if self.base_case == Algorithm::Strassen {
            return Err(GemmError::InvalidConfig(
                "base_case must be a direct algorithm (naive or blocked)".to_string(),
            ));
        }
        Ok(())
    }

    /// Build a config from `GEMM_*` environment variables over the defaults.
    ///
    /// Reads the following variables:
    /// - `GEMM_BLOCK_DIM` -> block_dim
    /// - `GEMM_DIM_THRESHOLD` -> dim_threshold
    /// - `GEMM_SCALE_THRESHOLD` -> scale_threshold
    /// - `GEMM_MAX_DEPTH` -> max_depth
    /// - `GEMM_BASE_CASE` -> base_case (`naive` or `blocked`)
    /// - `GEMM_SCRATCH_LIMIT` -> scratch_limit in bytes
    pub fn from_env() -> Result<GemmConfig> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<GemmConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = GemmConfig::DEFAULT;
        let config = GemmConfig {
            block_dim: parse_var(&lookup, "GEMM_BLOCK_DIM")?.unwrap_or(defaults.block_dim),
            dim_threshold: parse_var(&lookup, "GEMM_DIM_THRESHOLD")?
                .unwrap_or(defaults.dim_threshold),
            scale_threshold: parse_var(&lookup, "GEMM_SCALE_THRESHOLD")?
                .unwrap_or(defaults.scale_threshold),
            max_depth: parse_var(&lookup, "GEMM_MAX_DEPTH")?.unwrap_or(defaults.max_depth),
            base_case: parse_var(&lookup, "GEMM_BASE_CASE")?.unwrap_or(defaults.base_case),
            scratch_limit: parse_var(&lookup, "GEMM_SCRATCH_LIMIT")?.or(defaults.scratch_limit),
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for GemmConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| GemmError::InvalidConfig(format!("{}={:?}: {}", key, raw, e))),
    }
}

static GLOBAL: RwLock<GemmConfig> = RwLock::new(GemmConfig::DEFAULT);

/// Snapshot of the process-wide config.
pub fn global() -> GemmConfig {
    *GLOBAL.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Validate and install a new process-wide config.
pub fn set_global(config: GemmConfig) -> Result<()> {
    config.validate()?;
    *GLOBAL.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = config;
    tracing::debug!(?config, "installed global gemm config");
    Ok(())
}
