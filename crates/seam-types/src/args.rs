//! Argument passing between stages.
//!
//! A stage accepts zero, one, or an ordered tuple of values and returns
//! the same shape for its successor. Rather than inspecting a single
//! untyped slot at run time, the arity is an explicit variant: the
//! runner pattern-matches, and the wire layer maps each variant to a
//! plain list of opaque payloads (0, 1, or n entries).

use serde::{Deserialize, Serialize};

// ── Args ─────────────────────────────────────────────────────────────────────

/// Arguments carried from one stage into the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Args<V> {
    /// No carried values. Only stage 0 is ever invoked like this.
    None,
    /// A single value.
    One(V),
    /// An ordered tuple of values.
    Many(Vec<V>),
}

impl<V> Args<V> {
    /// Number of carried values.
    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::One(_) => 1,
            Self::Many(vs) => vs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Flatten into an ordered list, erasing the arity distinction.
    pub fn into_vec(self) -> Vec<V> {
        match self {
            Self::None => Vec::new(),
            Self::One(v) => vec![v],
            Self::Many(vs) => vs,
        }
    }

    /// Rebuild from an ordered list. The count alone selects the variant:
    /// an empty list is `None`, a single element is `One`.
    pub fn from_vec(mut values: Vec<V>) -> Self {
        match values.len() {
            0 => Self::None,
            1 => Self::One(values.remove(0)),
            _ => Self::Many(values),
        }
    }
}

// ── Stage output ─────────────────────────────────────────────────────────────

/// What a stage hands back to the runner.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutput<V> {
    /// Feed these arguments to the next stage.
    Continue(Args<V>),
    /// Stop advancing; the runner recycles to stage 0.
    Stop,
}

// ── Resume point ─────────────────────────────────────────────────────────────

/// The minimal state needed to continue a pipeline on another node:
/// the index of the next stage to run and the arguments ready for it.
///
/// Constructed when the local boundary is crossed, consumed immediately
/// by the receiver, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumePoint<V> {
    pub next_stage: usize,
    pub args: Args<V>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
