//! # Wire Codec Port
//!
//! The binary wire format of packets belongs to an external codec. The
//! trust core only needs three projections from it: the byte span a data
//! signature covers, the byte span an interest signature covers, and the
//! encoded form of signature metadata appended to signed interest names.

use ndt_types::{Data, Name, SignatureInfo};

/// Abstract interface to the external wire codec.
pub trait PacketCodec: Send + Sync {
    /// The bytes a data-packet signature covers: name, content, and
    /// signature metadata, excluding the signature value itself.
    fn data_signed_portion(&self, data: &Data) -> Vec<u8>;

    /// The bytes a signed-interest signature covers: the full name as
    /// prepared so far (including timestamp, nonce, and the encoded
    /// signature-info component) plus the metadata.
    fn interest_signed_portion(&self, name: &Name, info: &SignatureInfo) -> Vec<u8>;

    /// Encode signature metadata for appending as a name component.
    fn encode_signature_info(&self, info: &SignatureInfo) -> Vec<u8>;
}
