//! The value-serialization boundary.
//!
//! The frame codec moves opaque blobs; this module is the collaborator
//! that turns the embedding application's values into blobs and back,
//! using bincode over serde. Swapping the format only requires that each
//! argument's byte length round-trip exactly.

use serde::de::DeserializeOwned;
use serde::Serialize;

use seam_types::{Args, ResumePoint};

use crate::codec::{encode_frame, WireFrame};
use crate::error::{Result, WireError};

/// Serialize one value to its opaque wire blob.
fn encode_value<V: Serialize>(value: &V) -> Result<Vec<u8>> {
    bincode::serde::encode_to_vec(value, bincode::config::standard())
        .map_err(|e| WireError::ValueEncode(e.to_string()))
}

/// Deserialize one value from its opaque wire blob. The blob must be
/// consumed exactly.
fn decode_value<V: DeserializeOwned>(blob: &[u8]) -> Result<V> {
    let (value, consumed) =
        bincode::serde::decode_from_slice(blob, bincode::config::standard())
            .map_err(|e| WireError::ValueDecode(e.to_string()))?;
    if consumed != blob.len() {
        return Err(WireError::ValueDecode(format!(
            "trailing bytes in argument: {} of {} consumed",
            consumed,
            blob.len()
        )));
    }
    Ok(value)
}

/// Lower an argument pack to its ordered blob list.
pub fn encode_args<V: Serialize>(args: &Args<V>) -> Result<Vec<Vec<u8>>> {
    match args {
        Args::None => Ok(Vec::new()),
        Args::One(v) => Ok(vec![encode_value(v)?]),
        Args::Many(vs) => vs.iter().map(encode_value).collect(),
    }
}

/// Rebuild an argument pack from an ordered blob list. The count alone
/// selects the variant, as on the encode side.
pub fn decode_args<V: DeserializeOwned>(blobs: &[Vec<u8>]) -> Result<Args<V>> {
    let values = blobs
        .iter()
        .map(|b| decode_value(b))
        .collect::<Result<Vec<V>>>()?;
    Ok(Args::from_vec(values))
}

/// Encode a resume point to its full wire byte form.
pub fn encode_resume_point<V: Serialize>(point: &ResumePoint<V>) -> Result<Vec<u8>> {
    let next_stage = u32::try_from(point.next_stage)
        .map_err(|_| WireError::StageIndexOverflow(point.next_stage))?;
    let frame = WireFrame {
        next_stage,
        args: encode_args(&point.args)?,
    };
    encode_frame(&frame)
}

/// Rebuild a resume point from a decoded frame.
pub fn decode_resume_point<V: DeserializeOwned>(frame: &WireFrame) -> Result<ResumePoint<V>> {
    Ok(ResumePoint {
        next_stage: frame.next_stage as usize,
        args: decode_args(&frame.args)?,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FrameDecoder;

    fn round_trip(point: &ResumePoint<f64>) -> ResumePoint<f64> {
        let bytes = encode_resume_point(point).unwrap();
        let mut dec = FrameDecoder::new(1024);
        dec.extend(&bytes);
        let frame = dec.try_decode().unwrap().unwrap();
        decode_resume_point(&frame).unwrap()
    }

    #[test]
    fn resume_point_round_trip_all_arities() {
        for args in [
            Args::None,
            Args::One(1.5f64),
            Args::Many(vec![1.0, -2.0, 3.25]),
        ] {
            let point = ResumePoint {
                next_stage: 3,
                args,
            };
            assert_eq!(round_trip(&point), point);
        }
    }

    #[test]
    fn single_element_list_decodes_as_one() {
        // Arity is carried by the count alone: a one-entry blob list is
        // indistinguishable from `One` on the wire.
        let blobs = encode_args(&Args::Many(vec![42u32])).unwrap();
        assert_eq!(decode_args::<u32>(&blobs).unwrap(), Args::One(42));
    }

    #[test]
    fn empty_list_decodes_as_none() {
        let blobs = encode_args::<u32>(&Args::None).unwrap();
        assert!(blobs.is_empty());
        assert_eq!(decode_args::<u32>(&blobs).unwrap(), Args::None);
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut blob = encode_value(&7u32).unwrap();
        blob.push(0xFF);
        assert!(matches!(
            decode_args::<u32>(&[blob]),
            Err(WireError::ValueDecode(_))
        ));
    }

    #[test]
    fn structured_values_round_trip() {
        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Sample {
            t: u64,
            value: f64,
        }

        let blobs = encode_args(&Args::One(Sample { t: 9, value: 0.5 })).unwrap();
        let back: Args<Sample> = decode_args(&blobs).unwrap();
        assert_eq!(back, Args::One(Sample { t: 9, value: 0.5 }));
    }
}
