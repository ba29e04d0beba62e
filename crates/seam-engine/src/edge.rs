//! Edge-side driver: the cyclical pipeline loop, the throughput
//! controller feedback, and the offload connection to the peer.
//!
//! There is exactly one active pipeline cycle at a time on the edge;
//! stage invocation and the offload write are both synchronous from the
//! loop's point of view, so back-pressure from a slow peer directly
//! throttles the observed throughput.

use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, warn};

use seam_types::{Args, EdgeConfig, Pipeline, ResumePoint};
use seam_wire::encode_resume_point;

use crate::controller::{BoundaryDecision, ThroughputController};
use crate::error::{EngineError, Result};
use crate::runner::{run_segment, RunOutcome};

// ── Offload client ───────────────────────────────────────────────────────────

/// One long-lived outbound connection to the peer for the whole run.
///
/// Writes are fire-and-forget: no acknowledgement is awaited before the
/// local loop resumes. A write error leaves the connection unusable and
/// is surfaced to the caller; reconnect policy belongs to the embedding
/// application.
pub struct OffloadClient {
    stream: TcpStream,
}

impl OffloadClient {
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        info!(peer = %addr, "offload connection established");
        Ok(Self { stream })
    }

    /// Encode and ship a live continuation to the peer.
    pub async fn send<V: Serialize>(&mut self, point: &ResumePoint<V>) -> Result<()> {
        let bytes = encode_resume_point(point)?;
        self.stream.write_all(&bytes).await?;
        Ok(())
    }
}

// ── Edge node ────────────────────────────────────────────────────────────────

/// The edge-side engine: pipeline, partition index, controller, and the
/// optional peer connection, all explicit fields owned by one loop.
pub struct EdgeNode<V> {
    pipeline: Pipeline<V>,
    boundary: usize,
    controller: ThroughputController,
    client: Option<OffloadClient>,
}

impl<V: Serialize> EdgeNode<V> {
    /// Validate the configuration and connect to the peer when the
    /// split (or a configured target) makes offloading possible.
    /// Configuration errors are fatal here, before the loop starts.
    pub async fn new(pipeline: Pipeline<V>, config: &EdgeConfig) -> Result<Self> {
        config.validate(pipeline.len())?;

        let controller =
            ThroughputController::new(config.throughput_period, config.target_throughput)?;

        let client = match &config.peer_addr {
            Some(addr) => Some(OffloadClient::connect(addr).await?),
            None => None,
        };

        if config.local_stages < pipeline.len() {
            info!(
                local = config.local_stages,
                total = pipeline.len(),
                "running a partial partition; tail offloads to the peer"
            );
        } else {
            info!(total = pipeline.len(), "running all stages locally");
        }

        Ok(Self {
            pipeline,
            boundary: config.local_stages,
            controller,
            client,
        })
    }

    /// Current partition index (for observation; mutated only by
    /// controller decisions inside [`run`](Self::run)).
    pub fn boundary(&self) -> usize {
        self.boundary
    }

    /// Drive the pipeline until the input source is exhausted.
    ///
    /// Each cycle starts fresh at stage 0, runs to one of the three
    /// stop conditions, offloads a live continuation when the boundary
    /// is crossed, then feeds the completed cycle to the controller.
    pub async fn run(mut self) -> Result<()> {
        loop {
            let outcome = run_segment(&mut self.pipeline, 0, Args::None, self.boundary)?;

            match outcome {
                RunOutcome::SourceExhausted => {
                    info!("input source exhausted; stopping");
                    return Ok(());
                }
                RunOutcome::Completed => {}
                RunOutcome::Offload(point) => {
                    let client = self
                        .client
                        .as_mut()
                        .ok_or(EngineError::NoOffloadClient)?;
                    client.send(&point).await?;
                }
            }

            self.controller.record_iteration();
            if let Some(report) = self.controller.tick(self.boundary) {
                info!(
                    period_secs = report.period.as_secs_f64(),
                    observed = report.observed,
                    "throughput window closed"
                );
                self.apply(report.decision);
            }
        }
    }

    fn apply(&mut self, decision: BoundaryDecision) {
        match decision {
            BoundaryDecision::Keep => {}
            BoundaryDecision::Shrink { from, to } => {
                let offloaded = self
                    .pipeline
                    .stage_name(to)
                    .unwrap_or("<unknown>")
                    .to_string();
                self.boundary = to;
                info!(from, to, stage = %offloaded, "target missed; offloading one more stage");
            }
            BoundaryDecision::AtFloor => {
                warn!("target missed but stage 0 cannot be offloaded; partition unchanged");
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
