//! seam binary — run one side of the adaptive offload pair.
//!
//! ```bash
//! # Machine 1 — peer: accept continuations and finish them
//! RUST_LOG=info cargo run --bin seam-node -- peer --listen 0.0.0.0:8089
//!
//! # Machine 2 — edge: run 2 of 4 stages locally, offload the rest
//! RUST_LOG=info cargo run --bin seam-node -- edge \
//!     --peer 192.168.1.20:8089 --local-stages 2
//!
//! # Edge with automatic partitioning: shed stages below 30 cycles/s
//! RUST_LOG=info cargo run --bin seam-node -- edge \
//!     --peer 192.168.1.20:8089 --target 30
//! ```

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use seam_engine::EdgeNode;
use seam_types::{EdgeConfig, PeerConfig};

mod stages;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name    = "seam-node",
    version = env!("CARGO_PKG_VERSION"),
    about   = "Adaptive edge→peer pipeline offload"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the edge loop over the demo telemetry pipeline.
    Edge {
        /// Peer address to offload to, e.g. `192.168.1.20:8089`.
        #[arg(long)]
        peer: Option<String>,

        /// Stages to run locally. Defaults to the whole pipeline.
        #[arg(long)]
        local_stages: Option<usize>,

        /// Target throughput in completed cycles per second. Enables
        /// automatic partitioning; omit for a static split.
        #[arg(long)]
        target: Option<f64>,

        /// Throughput measurement window in seconds.
        #[arg(long, default_value_t = 3)]
        period: u64,

        /// Busy-spin iterations per stage call, emulating a
        /// resource-constrained device.
        #[arg(long, default_value_t = 500_000)]
        work: u64,

        /// Samples to produce before the source dries up.
        #[arg(long, default_value_t = 10_000)]
        samples: u64,
    },

    /// Accept continuations and finish the remaining stages.
    Peer {
        /// Listen address.
        #[arg(long, default_value = "0.0.0.0:8089")]
        listen: String,

        /// Per-connection socket read timeout in seconds. Omit to wait
        /// forever.
        #[arg(long)]
        read_timeout: Option<u64>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Default log level: INFO. Override with RUST_LOG=seam_engine=debug etc.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Edge {
            peer,
            local_stages,
            target,
            period,
            work,
            samples,
        } => run_edge(peer, local_stages, target, period, work, samples).await,
        Command::Peer {
            listen,
            read_timeout,
        } => run_peer(listen, read_timeout).await,
    }
}

// ── Edge mode ─────────────────────────────────────────────────────────────────

async fn run_edge(
    peer: Option<String>,
    local_stages: Option<usize>,
    target: Option<f64>,
    period: u64,
    work: u64,
    samples: u64,
) -> Result<()> {
    let pipeline = stages::demo_pipeline(samples, work);

    let config = EdgeConfig {
        local_stages: local_stages.unwrap_or(pipeline.len()),
        target_throughput: target,
        throughput_period: Duration::from_secs(period),
        peer_addr: peer,
    };

    let edge = EdgeNode::new(pipeline, &config).await?;
    edge.run().await?;

    info!("edge run finished");
    Ok(())
}

// ── Peer mode ─────────────────────────────────────────────────────────────────

async fn run_peer(listen: String, read_timeout: Option<u64>) -> Result<()> {
    let config = PeerConfig {
        listen_addr: listen,
        read_timeout: read_timeout.map(Duration::from_secs),
        ..PeerConfig::default()
    };

    // Peer stages run at full speed: no device emulation, and the
    // source budget is irrelevant since stage 0 never runs here.
    let make_pipeline = || stages::demo_pipeline(0, 0);

    tokio::select! {
        result = seam_engine::serve(config, make_pipeline) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C — shutting down");
        }
    }
    Ok(())
}
