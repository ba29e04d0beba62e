//! Stage-chaining execution of one pipeline pass.
//!
//! A segment run starts at some index with the arguments ready for it
//! and advances stage by stage until the pipeline stops, the terminal
//! stage completes, or the local boundary is crossed with work still
//! pending — in which case the live continuation is returned to the
//! caller instead of being executed.

use seam_types::{Args, Pipeline, ResumePoint, StageOutput};

use crate::error::{EngineError, Result};

// ── Outcome ──────────────────────────────────────────────────────────────────

/// How a segment run ended.
#[derive(Debug, PartialEq)]
pub enum RunOutcome<V> {
    /// A stage signalled stop, or the terminal stage was reached.
    /// The caller recycles to stage 0 for the next unit of work.
    Completed,

    /// Stage 0 itself signalled stop: the input source is exhausted and
    /// the outer loop must stop permanently instead of recycling.
    SourceExhausted,

    /// The boundary was reached with work remaining. The continuation
    /// must be handed to the peer; stage `next_stage` was not invoked.
    Offload(ResumePoint<V>),
}

// ── Runner ───────────────────────────────────────────────────────────────────

/// Run stages `[start, ..)` until one of the three stop conditions.
///
/// `boundary` is the local partition bound in `1..=N`: stages at indices
/// `>= boundary` never execute here, so it must lie past `start`. A
/// boundary equal to the pipeline length means the terminal stage runs
/// locally and nothing is ever offloaded.
pub fn run_segment<V>(
    pipeline: &mut Pipeline<V>,
    start: usize,
    initial_args: Args<V>,
    boundary: usize,
) -> Result<RunOutcome<V>> {
    let num_stages = pipeline.len();
    if start >= num_stages {
        return Err(EngineError::StartOutOfRange { start, num_stages });
    }
    if boundary == 0 || boundary > num_stages || boundary <= start {
        return Err(EngineError::BoundaryOutOfRange {
            boundary,
            num_stages,
        });
    }

    let mut index = start;
    let mut args = initial_args;

    loop {
        let stage = pipeline
            .stage_mut(index)
            .ok_or(EngineError::StartOutOfRange { start: index, num_stages })?;

        match stage.call(args) {
            StageOutput::Stop => {
                return Ok(if index == 0 {
                    RunOutcome::SourceExhausted
                } else {
                    RunOutcome::Completed
                });
            }
            StageOutput::Continue(next_args) => {
                index += 1;
                if index == num_stages {
                    // Terminal stage done; checked before the boundary so
                    // a full-length partition completes rather than
                    // offloading past the end.
                    return Ok(RunOutcome::Completed);
                }
                if index == boundary {
                    return Ok(RunOutcome::Offload(ResumePoint {
                        next_stage: index,
                        args: next_args,
                    }));
                }
                args = next_args;
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
