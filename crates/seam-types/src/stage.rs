//! The stage plugin interface and the ordered pipeline over it.

use crate::args::{Args, StageOutput};

// ── Stage ────────────────────────────────────────────────────────────────────

/// One callable unit of the pipeline, identified by registration order.
///
/// Stage 0 is special: it originates a new unit of work and is invoked
/// with `Args::None`. Returning [`StageOutput::Stop`] signals "stop
/// advancing, recycle to stage 0" — from stage 0 itself it means the
/// input source is exhausted.
///
/// Implementations must keep the argument arity deterministic per call
/// path; the engine treats the call as opaque and does not constrain its
/// side effects.
pub trait Stage<V>: Send {
    /// Stable name for logs and reports.
    fn name(&self) -> &str;

    /// Run the stage on the carried arguments.
    fn call(&mut self, args: Args<V>) -> StageOutput<V>;
}

// ── FnStage ──────────────────────────────────────────────────────────────────

/// Adapter turning a closure into a [`Stage`].
pub struct FnStage<F> {
    name: String,
    func: F,
}

impl<F> FnStage<F> {
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<V, F> Stage<V> for FnStage<F>
where
    F: FnMut(Args<V>) -> StageOutput<V> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&mut self, args: Args<V>) -> StageOutput<V> {
        (self.func)(args)
    }
}

// ── Pipeline ─────────────────────────────────────────────────────────────────

/// The fixed ordered sequence of stages for a run, indices `0..N-1`.
///
/// The sequence is registered once at configuration time and never
/// changes afterwards; only the partition index into it does.
pub struct Pipeline<V> {
    stages: Vec<Box<dyn Stage<V>>>,
}

impl<V> Pipeline<V> {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage. Registration order is the stage's index.
    pub fn push(&mut self, stage: Box<dyn Stage<V>>) {
        self.stages.push(stage);
    }

    /// Builder-style [`push`](Self::push).
    pub fn with_stage(mut self, stage: Box<dyn Stage<V>>) -> Self {
        self.push(stage);
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_name(&self, index: usize) -> Option<&str> {
        self.stages.get(index).map(|s| s.name())
    }

    pub fn stage_mut(&mut self, index: usize) -> Option<&mut dyn Stage<V>> {
        match self.stages.get_mut(index) {
            Some(stage) => Some(stage.as_mut()),
            None => None,
        }
    }
}

impl<V> Default for Pipeline<V> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_order_is_identity() {
        let mut p: Pipeline<u32> = Pipeline::new();
        p.push(Box::new(FnStage::new("first", |_| StageOutput::Stop)));
        p.push(Box::new(FnStage::new("second", |_| StageOutput::Stop)));

        assert_eq!(p.len(), 2);
        assert_eq!(p.stage_name(0), Some("first"));
        assert_eq!(p.stage_name(1), Some("second"));
        assert_eq!(p.stage_name(2), None);
    }

    #[test]
    fn fn_stage_threads_args() {
        let mut stage = FnStage::new("double", |args: Args<u32>| match args {
            Args::One(v) => StageOutput::Continue(Args::One(v * 2)),
            _ => StageOutput::Stop,
        });

        assert_eq!(
            stage.call(Args::One(21)),
            StageOutput::Continue(Args::One(42))
        );
        assert_eq!(stage.call(Args::None), StageOutput::Stop);
    }
}
