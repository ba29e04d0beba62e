//! `seam-engine` — adaptive pipeline execution and offload.
//!
//! A multi-stage pipeline is split at a run-time partition index: the
//! edge runs stages `[0, boundary)` and hands a live continuation to
//! the peer whenever work remains past the boundary. A throughput
//! controller watches the edge's completion rate and sheds one trailing
//! stage per missed window.
//!
//! # Architecture
//!
//! ```text
//!  edge                                         peer
//!  ┌─────────────────────────────┐              ┌──────────────────────────┐
//!  │ stage0 → stage1 → ┆ offload ├── tcp ──────▶│ resume: stage2 → stage3  │
//!  │          boundary ┆         │  continuation│  (per-connection task)   │
//!  └───────▲─────────────────────┘              └──────────────────────────┘
//!          │ shrink boundary on missed target
//!    ThroughputController
//! ```

pub mod controller;
pub mod edge;
pub mod error;
pub mod runner;
pub mod server;

// ── Public re-exports ────────────────────────────────────────────────────────

pub use controller::{decide, BoundaryDecision, ThroughputController, WindowReport};
pub use edge::{EdgeNode, OffloadClient};
pub use error::{EngineError, Result};
pub use runner::{run_segment, RunOutcome};
pub use server::{serve, serve_on};
