//! Codec for a textual, tag-framed tracker wire protocol.
//!
//! Every message on the wire is a single self-delimiting frame:
//!
//! ```text
//! <TAG>field_1;field_2;...;field_n;CCCC</TAG>
//! ```
//!
//! The tag is one to three ASCII letters and must match between the
//! opening and closing brackets. Each field is followed by a `;`, and the
//! final four characters before the closing tag are an uppercase-hex
//! CRC-16/IBM-SDLC checksum of the field text (semicolons included, tag
//! excluded). Zero-field packets still carry one `;` so the checksum has
//! a payload.
//!
//! The crate is split along the layers of that format:
//!
//! - [`frame`] parses and builds the envelope,
//! - [`checksum`] computes and verifies the CRC,
//! - [`field`] holds the per-type field codecs,
//! - [`packet`] defines the variants and the [`Packet`] enum,
//! - [`registry`] dispatches verified frames to variants by tag.
//!
//! # Example
//!
//! ```
//! use trackwire::{Packet, PaPacket};
//!
//! let wire = Packet::Pa(PaPacket {
//!     ident: "phkenny123".into(),
//!     password: String::new(),
//! })
//! .encode()
//! .unwrap();
//! assert_eq!(wire, "<Pa>phkenny123;;2664</Pa>");
//!
//! match Packet::decode(&wire).unwrap() {
//!     Packet::Pa(pa) => assert_eq!(pa.ident, "phkenny123"),
//!     other => panic!("unexpected packet {}", other.tag()),
//! }
//! ```
//!
//! Decoding is strict: a frame with a bad envelope, a stale checksum, an
//! unknown tag or a wrong field count is rejected with a
//! [`ProtocolError`] naming the earliest failing stage.

pub mod checksum;
pub mod error;
pub mod field;
pub mod frame;
pub mod packet;
pub mod registry;

pub use error::{ProtocolError, Result};
pub use field::{
    ArgValue, Args, BleAdvertisement, BleData, BleManufacturerData, BleServiceData,
    FirmwareBranch, Position,
};
pub use packet::{
    AbPacket, AcPacket, AoPacket, ArPacket, AsPacket, AuPacket, Command, PaPacket, Packet,
    PacketBody, PbPacket, PcPacket, PdPacket, PiPacket, PmPacket, PrPacket, PsPacket, TePacket,
    TsPacket,
};
