//! Concurrent resumption server.
//!
//! Accepts inbound connections and, per connection, repeatedly decodes
//! continuation frames and resumes a private pipeline instance at the
//! received stage index with `boundary = N` — the peer always finishes
//! the remaining stages locally and never initiates a reply.
//!
//! Each accepted connection gets its own spawned task owning a fresh
//! pipeline from the factory and a private receive buffer; nothing is
//! shared between connections beyond the listener itself. There is no
//! connection pool and no cap on concurrent connections.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use seam_types::{PeerConfig, Pipeline, ResumePoint};
use seam_wire::{decode_resume_point, FrameDecoder, WireFrame};

use crate::error::{EngineError, Result};
use crate::runner::run_segment;

/// Socket read chunk size.
const RECV_CHUNK_BYTES: usize = 4096;

// ── Accept loop ──────────────────────────────────────────────────────────────

/// Bind the configured listen address and serve forever.
///
/// `make_pipeline` is invoked once per accepted connection so every
/// session gets an isolated pipeline (and therefore isolated stage
/// state).
pub async fn serve<V, F>(config: PeerConfig, make_pipeline: F) -> Result<()>
where
    V: DeserializeOwned + Send + 'static,
    F: Fn() -> Pipeline<V> + Send + 'static,
{
    let listener = TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %listener.local_addr()?, "resumption server listening");
    serve_on(listener, config, make_pipeline).await
}

/// Serve on an already-bound listener.
pub async fn serve_on<V, F>(
    listener: TcpListener,
    config: PeerConfig,
    make_pipeline: F,
) -> Result<()>
where
    V: DeserializeOwned + Send + 'static,
    F: Fn() -> Pipeline<V> + Send + 'static,
{
    loop {
        let (stream, remote) = listener.accept().await?;
        info!(%remote, "connection accepted");

        let pipeline = make_pipeline();
        let max_arg_bytes = config.max_arg_bytes;
        let read_timeout = config.read_timeout;

        tokio::spawn(async move {
            match handle_connection(stream, pipeline, max_arg_bytes, read_timeout).await {
                Ok(resumed) => info!(%remote, resumed, "connection closed"),
                Err(e) => warn!(%remote, error = %e, "connection terminated"),
            }
        });
    }
}

// ── Per-connection context ───────────────────────────────────────────────────

/// Drive one connection to EOF or failure. Returns the number of
/// continuations resumed.
pub(crate) async fn handle_connection<V: DeserializeOwned>(
    mut stream: TcpStream,
    mut pipeline: Pipeline<V>,
    max_arg_bytes: usize,
    read_timeout: Option<Duration>,
) -> Result<u64> {
    let num_stages = pipeline.len();
    let mut decoder = FrameDecoder::new(max_arg_bytes);
    let mut chunk = vec![0u8; RECV_CHUNK_BYTES];
    let mut resumed = 0u64;

    loop {
        // Drain every complete frame before touching the socket again.
        while let Some(frame) = decoder.try_decode()? {
            let point = validate_resume_point(&frame, num_stages)?;
            // `boundary = N` and `next_stage >= 1`, so completion is the
            // only reachable outcome of the segment run.
            run_segment(&mut pipeline, point.next_stage, point.args, num_stages)?;
            resumed += 1;
        }

        let n = match read_timeout {
            Some(limit) => tokio::time::timeout(limit, stream.read(&mut chunk))
                .await
                .map_err(|_| EngineError::ReadTimeout(limit))??,
            None => stream.read(&mut chunk).await?,
        };

        if n == 0 {
            if decoder.buffered() > 0 {
                warn!(
                    trailing = decoder.buffered(),
                    "client closed mid-frame; discarding partial continuation"
                );
            }
            return Ok(resumed);
        }
        decoder.extend(&chunk[..n]);
    }
}

/// Bounds-check the received stage index and decode the argument blobs.
fn validate_resume_point<V: DeserializeOwned>(
    frame: &WireFrame,
    num_stages: usize,
) -> Result<ResumePoint<V>> {
    let next_stage = frame.next_stage as usize;
    if next_stage == 0 {
        return Err(EngineError::Protocol(
            "stage 0 originates input and cannot be resumed remotely".into(),
        ));
    }
    if next_stage >= num_stages {
        return Err(EngineError::Protocol(format!(
            "resume index {next_stage} out of range (pipeline has {num_stages} stages)"
        )));
    }
    Ok(decode_resume_point(frame)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
