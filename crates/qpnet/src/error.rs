use compute::ComputeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetError {
    #[error("dimension `{0}` must be positive")]
    InvalidDimension(&'static str),
    #[error("invalid value bounds: lower {lower} must be below upper {upper}")]
    InvalidBounds { lower: f32, upper: f32 },
    #[error("exploration weight must not be NaN")]
    InvalidExplorationWeight,
    #[error("{context}: expected shape {expected:?}, got {found:?}")]
    Shape {
        context: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    #[error("checkpoint is incompatible with this network: {0}")]
    IncompatibleCheckpoint(String),
    #[error(transparent)]
    Compute(#[from] ComputeError),
    #[error("checkpoint i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed json: {0}")]
    Format(#[from] serde_json::Error),
}
