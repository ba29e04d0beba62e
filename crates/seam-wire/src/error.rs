#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("argument too large: {declared} bytes (max {max})")]
    ArgTooLarge { declared: usize, max: usize },

    #[error("argument count too large: {declared} (max {max})")]
    TooManyArgs { declared: usize, max: usize },

    #[error("next stage index {0} does not fit the wire width")]
    StageIndexOverflow(usize),

    #[error("argument of {0} bytes does not fit the wire width")]
    ArgLengthOverflow(usize),

    #[error("value serialization error: {0}")]
    ValueEncode(String),

    #[error("value deserialization error: {0}")]
    ValueDecode(String),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, WireError>;
