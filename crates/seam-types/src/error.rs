#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("local stage count {local_stages} out of range (must be in 1..={num_stages})")]
    PartitionOutOfRange {
        local_stages: usize,
        num_stages: usize,
    },

    #[error("target throughput {0} is not positive")]
    InvalidTargetThroughput(f64),

    #[error("throughput period must be positive")]
    InvalidPeriod,

    #[error("offloading {remote_stages} stage(s) but no peer address configured")]
    MissingPeerAddr { remote_stages: usize },

    #[error("pipeline has no stages")]
    EmptyPipeline,
}
