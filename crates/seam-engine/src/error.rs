use seam_types::ConfigError;
use seam_wire::WireError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("start index {start} out of range (pipeline has {num_stages} stages)")]
    StartOutOfRange { start: usize, num_stages: usize },

    #[error("local boundary {boundary} out of range (must be in 1..={num_stages})")]
    BoundaryOutOfRange {
        boundary: usize,
        num_stages: usize,
    },

    #[error("boundary crossed but no offload client is connected")]
    NoOffloadClient,

    #[error("protocol violation: {0}")]
    Protocol(String),

    #[error("connection read timed out after {0:?}")]
    ReadTimeout(std::time::Duration),

    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, EngineError>;
