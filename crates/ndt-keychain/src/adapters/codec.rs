//! # JSON Reference Codec
//!
//! A deterministic stand-in for a real wire codec: signed portions are the
//! JSON encoding of the covered fields. Adequate for tests and for any
//! deployment where both ends agree on it; production stacks supply their
//! own [`PacketCodec`].

use crate::ports::codec::PacketCodec;
use ndt_types::{Data, Name, SignatureInfo};
use serde::Serialize;

/// JSON-based packet codec.
#[derive(Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }

    // Serialization of these derived types cannot fail: every map key is a
    // string and no value is a non-finite float.
    fn encode(value: &impl Serialize) -> Vec<u8> {
        serde_json::to_vec(value).unwrap_or_default()
    }
}

#[derive(Serialize)]
struct DataSignedPortion<'a> {
    name: &'a Name,
    content: &'a [u8],
    signature_info: &'a SignatureInfo,
}

#[derive(Serialize)]
struct InterestSignedPortion<'a> {
    name: &'a Name,
    signature_info: &'a SignatureInfo,
}

impl PacketCodec for JsonCodec {
    fn data_signed_portion(&self, data: &Data) -> Vec<u8> {
        Self::encode(&DataSignedPortion {
            name: &data.name,
            content: &data.content,
            signature_info: &data.signature_info,
        })
    }

    fn interest_signed_portion(&self, name: &Name, info: &SignatureInfo) -> Vec<u8> {
        Self::encode(&InterestSignedPortion {
            name,
            signature_info: info,
        })
    }

    fn encode_signature_info(&self, info: &SignatureInfo) -> Vec<u8> {
        Self::encode(info)
    }
}
