//! Demo telemetry pipeline.
//!
//! Four stages over `f64` samples, exercising every argument arity the
//! engine supports:
//!
//! 1. `sense`   — no-arg source; synthesizes a bounded stream of samples
//! 2. `smooth`  — tracks an exponential moving average; emits both values
//! 3. `detect`  — drops samples near the average, forwards the deviation
//! 4. `alert`   — terminal reporter
//!
//! Only `detect` hits occasionally, so most cycles end early — the same
//! shape as a filter stage dropping uninteresting frames.

use tracing::info;

use seam_types::{Args, FnStage, Pipeline, Stage, StageOutput};

/// Smoothing factor for the moving average.
const EWMA_ALPHA: f64 = 0.2;

/// Deviation below this is considered noise and dropped.
const DEVIATION_THRESHOLD: f64 = 1.0;

/// Every n-th sample carries an injected spike so the detector fires.
const SPIKE_INTERVAL: u64 = 7;

/// Waste CPU to emulate a resource-constrained device. Scales each
/// stage call so the local/remote split visibly moves throughput.
fn emulate_constrained_device(iters: u64) {
    for i in 0..iters {
        std::hint::black_box(i);
    }
}

// ── Stage 0: sense ───────────────────────────────────────────────────────────

/// Bounded synthetic sample source. Stops the run once the budget is
/// spent, driving the end-of-stream shutdown path.
struct Sense {
    produced: u64,
    budget: u64,
    work: u64,
}

impl Stage<f64> for Sense {
    fn name(&self) -> &str {
        "sense"
    }

    fn call(&mut self, _args: Args<f64>) -> StageOutput<f64> {
        emulate_constrained_device(self.work);
        if self.produced == self.budget {
            return StageOutput::Stop;
        }
        self.produced += 1;

        let base = (self.produced as f64 * 0.25).sin();
        let spike = if self.produced % SPIKE_INTERVAL == 0 {
            2.5
        } else {
            0.0
        };
        StageOutput::Continue(Args::One(base + spike))
    }
}

// ── Stage 1: smooth ──────────────────────────────────────────────────────────

/// Exponential moving average; forwards the raw sample alongside the
/// running average.
struct Smooth {
    ewma: Option<f64>,
    work: u64,
}

impl Stage<f64> for Smooth {
    fn name(&self) -> &str {
        "smooth"
    }

    fn call(&mut self, args: Args<f64>) -> StageOutput<f64> {
        emulate_constrained_device(self.work);
        let Args::One(sample) = args else {
            return StageOutput::Stop;
        };
        let ewma = match self.ewma {
            Some(prev) => prev + EWMA_ALPHA * (sample - prev),
            None => sample,
        };
        self.ewma = Some(ewma);
        StageOutput::Continue(Args::Many(vec![sample, ewma]))
    }
}

// ── Stage 2: detect ──────────────────────────────────────────────────────────

/// Forwards the deviation when a sample strays from its average;
/// otherwise ends the cycle.
fn detect(work: u64) -> impl FnMut(Args<f64>) -> StageOutput<f64> + Send {
    move |args| {
        emulate_constrained_device(work);
        let Args::Many(vs) = args else {
            return StageOutput::Stop;
        };
        let (sample, ewma) = (vs[0], vs[1]);
        let deviation = sample - ewma;
        if deviation.abs() < DEVIATION_THRESHOLD {
            return StageOutput::Stop;
        }
        StageOutput::Continue(Args::One(deviation))
    }
}

// ── Stage 3: alert ───────────────────────────────────────────────────────────

fn alert(work: u64) -> impl FnMut(Args<f64>) -> StageOutput<f64> + Send {
    move |args| {
        emulate_constrained_device(work);
        if let Args::One(deviation) = args {
            info!(deviation, "anomaly detected");
        }
        StageOutput::Stop
    }
}

// ── Assembly ─────────────────────────────────────────────────────────────────

/// Build the demo pipeline.
///
/// `sample_budget` bounds the source (the run stops afterwards); `work`
/// busy-spins per stage call to emulate a slow device — pass 0 on the
/// peer.
pub fn demo_pipeline(sample_budget: u64, work: u64) -> Pipeline<f64> {
    Pipeline::new()
        .with_stage(Box::new(Sense {
            produced: 0,
            budget: sample_budget,
            work,
        }))
        .with_stage(Box::new(Smooth { ewma: None, work }))
        .with_stage(Box::new(FnStage::new("detect", detect(work))))
        .with_stage(Box::new(FnStage::new("alert", alert(work))))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use seam_engine::{run_segment, RunOutcome};

    #[test]
    fn source_exhausts_after_budget() {
        let mut p = demo_pipeline(2, 0);
        assert!(matches!(
            run_segment(&mut p, 0, Args::None, 4),
            Ok(RunOutcome::Completed)
        ));
        assert!(matches!(
            run_segment(&mut p, 0, Args::None, 4),
            Ok(RunOutcome::Completed)
        ));
        assert!(matches!(
            run_segment(&mut p, 0, Args::None, 4),
            Ok(RunOutcome::SourceExhausted)
        ));
    }

    #[test]
    fn quiet_samples_are_filtered() {
        // Sample 1 carries no spike and matches its own initial average,
        // so the cycle must end at `detect` without reaching `alert`.
        let mut p = demo_pipeline(1, 0);
        let outcome = run_segment(&mut p, 0, Args::None, 4).unwrap();
        assert_eq!(outcome, RunOutcome::Completed);
    }

    #[test]
    fn spikes_cross_the_boundary() {
        // With `alert` past the boundary, quiet cycles end at `detect`
        // locally; the first spiked sample (the 7th) passes the
        // detector and yields a live continuation for `alert`.
        let mut p = demo_pipeline(20, 0);
        for _ in 0..6 {
            let outcome = run_segment(&mut p, 0, Args::None, 3).unwrap();
            assert_eq!(outcome, RunOutcome::Completed);
        }
        match run_segment(&mut p, 0, Args::None, 3).unwrap() {
            RunOutcome::Offload(point) => {
                assert_eq!(point.next_stage, 3);
                assert!(matches!(point.args, Args::One(d) if d.abs() >= DEVIATION_THRESHOLD));
            }
            other => panic!("expected offload, got {other:?}"),
        }
    }
}
