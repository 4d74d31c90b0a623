use gemm_core::{Algorithm, GemmConfig, GemmError};

/// Status codes returned by all FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GemmStatus {
    Ok = 0,
    ErrorInvalidDimension = 1,
    ErrorShapeMismatch = 2,
    ErrorInvalidArgument = 3,
    ErrorOutOfMemory = 4,
    ErrorInternal = 5,
}

impl From<&GemmError> for GemmStatus {
    fn from(err: &GemmError) -> Self {
        match err {
            GemmError::InvalidDimension { .. } => GemmStatus::ErrorInvalidDimension,
            GemmError::ShapeMismatch { .. } | GemmError::ShapeMismatchMultiply { .. } => {
                GemmStatus::ErrorShapeMismatch
            }
            GemmError::InvalidStride { .. }
            | GemmError::BufferTooSmall { .. }
            | GemmError::InvalidConfig(_) => GemmStatus::ErrorInvalidArgument,
            GemmError::AllocationFailure { .. } => GemmStatus::ErrorOutOfMemory,
        }
    }
}

/// Multiplication strategy selector.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GemmAlgorithm {
    Naive = 0,
    Blocked = 1,
    Strassen = 2,
}

impl From<GemmAlgorithm> for Algorithm {
    fn from(alg: GemmAlgorithm) -> Self {
        match alg {
            GemmAlgorithm::Naive => Algorithm::Naive,
            GemmAlgorithm::Blocked => Algorithm::Blocked,
            GemmAlgorithm::Strassen => Algorithm::Strassen,
        }
    }
}

impl From<Algorithm> for GemmAlgorithm {
    fn from(alg: Algorithm) -> Self {
        match alg {
            Algorithm::Naive => GemmAlgorithm::Naive,
            Algorithm::Blocked => GemmAlgorithm::Blocked,
            Algorithm::Strassen => GemmAlgorithm::Strassen,
        }
    }
}

/// Process-wide tunables as seen from C.
///
/// `scratch_limit` of zero means unlimited.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GemmTunables {
    pub block_dim: u64,
    pub dim_threshold: u64,
    pub scale_threshold: u64,
    pub max_depth: u64,
    pub base_case: GemmAlgorithm,
    pub scratch_limit: u64,
}

impl Default for GemmTunables {
    fn default() -> Self {
        GemmTunables::from(&GemmConfig::default())
    }
}

impl From<&GemmConfig> for GemmTunables {
    fn from(cfg: &GemmConfig) -> Self {
        GemmTunables {
            block_dim: cfg.block_dim as u64,
            dim_threshold: cfg.dim_threshold as u64,
            scale_threshold: cfg.scale_threshold as u64,
            max_depth: cfg.max_depth as u64,
            base_case: cfg.base_case.into(),
            scratch_limit: cfg.scratch_limit.map_or(0, |l| l as u64),
        }
    }
}

impl TryFrom<&GemmTunables> for GemmConfig {
    type Error = GemmError;

    fn try_from(t: &GemmTunables) -> Result<Self, Self::Error> {
        let to_usize = |name: &str, v: u64| {
            usize::try_from(v)
                .map_err(|_| GemmError::InvalidConfig(format!("{} out of range: {}", name, v)))
        };
        let cfg = GemmConfig {
            block_dim: to_usize("block_dim", t.block_dim)?,
            dim_threshold: to_usize("dim_threshold", t.dim_threshold)?,
            scale_threshold: to_usize("scale_threshold", t.scale_threshold)?,
            max_depth: to_usize("max_depth", t.max_depth)?,
            base_case: t.base_case.into(),
            scratch_limit: match t.scratch_limit {
                0 => None,
                l => Some(to_usize("scratch_limit", l)?),
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
