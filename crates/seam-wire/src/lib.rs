//! `seam-wire` — the continuation protocol.
//!
//! A resume point crosses the network as a self-delimiting frame over a
//! raw byte stream (no message boundaries, partial reads, arbitrary
//! chunk sizes):
//!
//! ```text
//! arg_count(u32 BE) | next_stage(u32 BE) | repeated{ arg_len(u32 BE) | arg_bytes }
//! ```
//!
//! All integers are 32-bit big-endian — the width and endianness are part
//! of the protocol, not inherited from a host type. The frame codec
//! treats each argument as an opaque blob; turning values into blobs and
//! back is the job of the [`value`] module (bincode/serde), a boundary
//! the embedding application can swap as long as byte lengths round-trip
//! exactly.
//!
//! There is no handshake, versioning, or checksum. Declared lengths and
//! counts above the configured ceilings are rejected as corruption; a
//! plausible corrupted length still stalls the reader or misparses what
//! follows, which is inherent to the ack-less framing.

pub mod codec;
pub mod error;
pub mod value;

pub use codec::{encode_frame, FrameDecoder, WireFrame, MAX_ARGS_PER_FRAME};
pub use error::{Result, WireError};
pub use value::{decode_resume_point, encode_resume_point};
