//! Throughput-driven partition control.
//!
//! The edge loop reports every completed pipeline cycle; once per
//! measurement window the controller computes the observed rate and,
//! when a target is configured and missed, shrinks the local partition
//! by exactly one trailing stage. The policy is one-directional greedy:
//! single-stage steps, no hysteresis, and a shrunk partition is never
//! re-expanded within a run even if throughput later recovers.

use std::time::{Duration, Instant};

use seam_types::ConfigError;

use crate::error::Result;

// ── Decision ─────────────────────────────────────────────────────────────────

/// What to do with the partition index after a measurement window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryDecision {
    /// Partition is adequate (or no target is configured).
    Keep,
    /// Offload one more trailing stage: set the boundary to `to`.
    Shrink { from: usize, to: usize },
    /// Target missed but the boundary is already 1. Stage 0 originates
    /// the input and cannot be offloaded; the partition stays put.
    AtFloor,
}

/// Report produced at the end of each measurement window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowReport {
    /// Configured window length.
    pub period: Duration,
    /// Actual elapsed time for this window.
    pub elapsed: Duration,
    /// Completed iterations per second over the window.
    pub observed: f64,
    pub decision: BoundaryDecision,
}

/// Resolve the partition decision for one window.
///
/// Pure policy, separated from the clock so it can be exercised with
/// simulated rates.
pub fn decide(observed: f64, target: Option<f64>, boundary: usize) -> BoundaryDecision {
    let Some(target) = target else {
        return BoundaryDecision::Keep;
    };
    if observed >= target {
        return BoundaryDecision::Keep;
    }
    if boundary <= 1 {
        return BoundaryDecision::AtFloor;
    }
    BoundaryDecision::Shrink {
        from: boundary,
        to: boundary - 1,
    }
}

// ── Controller ───────────────────────────────────────────────────────────────

/// Samples completed-cycle counts over a fixed window.
///
/// Owned by the edge loop; the window state is never shared across
/// nodes or tasks.
pub struct ThroughputController {
    period: Duration,
    target: Option<f64>,
    window_start: Instant,
    iterations: u64,
}

impl ThroughputController {
    pub fn new(period: Duration, target: Option<f64>) -> Result<Self> {
        if period.is_zero() {
            return Err(ConfigError::InvalidPeriod.into());
        }
        if let Some(t) = target {
            if t <= 0.0 || !t.is_finite() {
                return Err(ConfigError::InvalidTargetThroughput(t).into());
            }
        }
        Ok(Self {
            period,
            target,
            window_start: Instant::now(),
            iterations: 0,
        })
    }

    pub fn target(&self) -> Option<f64> {
        self.target
    }

    /// Record one completed pipeline cycle.
    pub fn record_iteration(&mut self) {
        self.iterations += 1;
    }

    /// Close the window if the period has elapsed.
    ///
    /// Returns the window report when one was produced; the window is
    /// reset regardless of the decision. The caller owns the boundary
    /// and applies (or logs the refusal of) the decision.
    pub fn tick(&mut self, boundary: usize) -> Option<WindowReport> {
        let elapsed = self.window_start.elapsed();
        if elapsed <= self.period {
            return None;
        }

        let observed = self.iterations as f64 / elapsed.as_secs_f64();
        let decision = decide(observed, self.target, boundary);

        self.iterations = 0;
        self.window_start = Instant::now();

        Some(WindowReport {
            period: self.period,
            elapsed,
            observed,
            decision,
        })
    }

    /// Shift the current window start back in time, simulating an
    /// elapsed period without sleeping.
    #[cfg(test)]
    pub(crate) fn backdate(&mut self, by: Duration) {
        self.window_start -= by;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missed_target_shrinks_by_one() {
        assert_eq!(
            decide(50.0, Some(100.0), 5),
            BoundaryDecision::Shrink { from: 5, to: 4 }
        );
    }

    #[test]
    fn met_target_keeps_partition() {
        assert_eq!(decide(100.0, Some(100.0), 5), BoundaryDecision::Keep);
        assert_eq!(decide(250.0, Some(100.0), 5), BoundaryDecision::Keep);
    }

    #[test]
    fn manual_mode_never_adjusts() {
        assert_eq!(decide(0.0, None, 5), BoundaryDecision::Keep);
    }

    #[test]
    fn refuses_to_offload_stage_zero() {
        assert_eq!(decide(50.0, Some(100.0), 1), BoundaryDecision::AtFloor);
    }

    #[test]
    fn never_re_expands() {
        // Drive the boundary down, then report throughput far above
        // target: the decision is Keep, never an increase.
        let mut boundary = 3;
        for _ in 0..2 {
            if let BoundaryDecision::Shrink { to, .. } = decide(10.0, Some(100.0), boundary) {
                boundary = to;
            }
        }
        assert_eq!(boundary, 1);
        assert_eq!(decide(1000.0, Some(100.0), boundary), BoundaryDecision::Keep);
        assert_eq!(decide(10.0, Some(100.0), boundary), BoundaryDecision::AtFloor);
    }

    #[test]
    fn window_produces_report_and_resets() {
        let mut ctl =
            ThroughputController::new(Duration::from_secs(3), Some(100.0)).unwrap();
        for _ in 0..30 {
            ctl.record_iteration();
        }

        // Window not yet elapsed: no report, counter keeps accumulating.
        assert!(ctl.tick(5).is_none());

        ctl.backdate(Duration::from_secs(6));
        let report = ctl.tick(5).expect("window elapsed");
        assert!(report.elapsed >= Duration::from_secs(6));
        // 30 iterations over ~6 s ≈ 5/s, far below target.
        assert!(report.observed > 0.0 && report.observed < 100.0);
        assert_eq!(report.decision, BoundaryDecision::Shrink { from: 5, to: 4 });

        // Counter was reset: an immediately elapsed second window
        // observes a zero rate.
        ctl.backdate(Duration::from_secs(6));
        let report = ctl.tick(4).expect("second window");
        assert_eq!(report.observed, 0.0);
    }

    #[test]
    fn invalid_parameters_rejected() {
        assert!(ThroughputController::new(Duration::ZERO, None).is_err());
        assert!(ThroughputController::new(Duration::from_secs(3), Some(0.0)).is_err());
        assert!(ThroughputController::new(Duration::from_secs(3), Some(-1.0)).is_err());
    }
}
