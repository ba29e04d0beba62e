//! Process configuration surface, validated at startup.

use std::time::Duration;

use crate::error::ConfigError;

/// Peer port the original deployment listened on.
pub const DEFAULT_PEER_PORT: u16 = 8089;

/// Default throughput measurement window.
pub const DEFAULT_THROUGHPUT_PERIOD: Duration = Duration::from_secs(3);

/// Default ceiling for a single continuation argument on the wire: 64 MiB.
pub const DEFAULT_MAX_ARG_BYTES: usize = 64 * 1024 * 1024;

// ── Edge ─────────────────────────────────────────────────────────────────────

/// Configuration for the edge node.
#[derive(Debug, Clone)]
pub struct EdgeConfig {
    /// Initial partition index: stages `[0, local_stages)` run locally.
    pub local_stages: usize,

    /// Target completion throughput in iterations per second.
    /// `None` = manual/static partitioning, no re-adjustment.
    pub target_throughput: Option<f64>,

    /// Measurement window for the throughput controller.
    pub throughput_period: Duration,

    /// Peer address for offloading. Required whenever `local_stages`
    /// is smaller than the pipeline length.
    pub peer_addr: Option<String>,
}

impl EdgeConfig {
    /// Run all stages locally, no peer, no throughput target.
    pub fn local_only(num_stages: usize) -> Self {
        Self {
            local_stages: num_stages,
            target_throughput: None,
            throughput_period: DEFAULT_THROUGHPUT_PERIOD,
            peer_addr: None,
        }
    }

    /// Validate against the pipeline length. Fatal at startup: the
    /// process must not run with a partition outside `(0, N]`, a
    /// non-positive target or period, or an offloading split without a
    /// peer to offload to.
    pub fn validate(&self, num_stages: usize) -> Result<(), ConfigError> {
        if num_stages == 0 {
            return Err(ConfigError::EmptyPipeline);
        }
        if self.local_stages == 0 || self.local_stages > num_stages {
            return Err(ConfigError::PartitionOutOfRange {
                local_stages: self.local_stages,
                num_stages,
            });
        }
        if let Some(target) = self.target_throughput {
            if target <= 0.0 || !target.is_finite() {
                return Err(ConfigError::InvalidTargetThroughput(target));
            }
        }
        if self.throughput_period.is_zero() {
            return Err(ConfigError::InvalidPeriod);
        }
        // With a target set the controller may shrink the partition below
        // N at any window, so a peer is required even when starting at N.
        let may_offload = self.local_stages < num_stages || self.target_throughput.is_some();
        if may_offload && self.peer_addr.is_none() {
            return Err(ConfigError::MissingPeerAddr {
                remote_stages: num_stages - self.local_stages,
            });
        }
        Ok(())
    }
}

// ── Peer ─────────────────────────────────────────────────────────────────────

/// Configuration for the resumption server.
#[derive(Debug, Clone)]
pub struct PeerConfig {
    /// Listen address, e.g. `0.0.0.0:8089`.
    pub listen_addr: String,

    /// Ceiling for a single declared argument length. Larger length
    /// fields are treated as protocol corruption and fail the decode.
    pub max_arg_bytes: usize,

    /// Optional socket read timeout per connection. `None` = wait
    /// forever, matching the original behavior.
    pub read_timeout: Option<Duration>,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            listen_addr: format!("0.0.0.0:{DEFAULT_PEER_PORT}"),
            max_arg_bytes: DEFAULT_MAX_ARG_BYTES,
            read_timeout: None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn offloading_config() -> EdgeConfig {
        EdgeConfig {
            local_stages: 2,
            target_throughput: Some(30.0),
            throughput_period: Duration::from_secs(3),
            peer_addr: Some("127.0.0.1:8089".into()),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(offloading_config().validate(4).is_ok());
        assert!(EdgeConfig::local_only(4).validate(4).is_ok());
    }

    #[test]
    fn partition_bounds_enforced() {
        let mut cfg = offloading_config();
        cfg.local_stages = 0;
        assert!(matches!(
            cfg.validate(4),
            Err(ConfigError::PartitionOutOfRange { .. })
        ));

        cfg.local_stages = 5;
        assert!(matches!(
            cfg.validate(4),
            Err(ConfigError::PartitionOutOfRange { .. })
        ));
    }

    #[test]
    fn non_positive_target_rejected() {
        let mut cfg = offloading_config();
        cfg.target_throughput = Some(0.0);
        assert!(matches!(
            cfg.validate(4),
            Err(ConfigError::InvalidTargetThroughput(_))
        ));

        cfg.target_throughput = Some(-5.0);
        assert!(cfg.validate(4).is_err());
    }

    #[test]
    fn offload_split_requires_peer() {
        let mut cfg = offloading_config();
        cfg.peer_addr = None;
        assert!(matches!(
            cfg.validate(4),
            Err(ConfigError::MissingPeerAddr { .. })
        ));
    }

    #[test]
    fn auto_mode_requires_peer_even_at_full_partition() {
        let mut cfg = offloading_config();
        cfg.local_stages = 4;
        cfg.peer_addr = None;
        assert!(cfg.validate(4).is_err());
    }

    #[test]
    fn empty_pipeline_rejected() {
        assert!(matches!(
            EdgeConfig::local_only(0).validate(0),
            Err(ConfigError::EmptyPipeline)
        ));
    }
}
