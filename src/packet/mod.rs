//! Packet variants and the generic encode/decode entry points.
//!
//! A packet is a tag plus an ordered, typed field list. Variants are
//! purely declarative — each one states its tag, its field names and how
//! its fields map onto the field codecs — and everything else (framing,
//! checksums, dispatch) is generic and lives elsewhere. Adding a packet
//! kind means adding a struct here and one registry entry, never touching
//! the frame or checksum logic.
//!
//! # Example
//!
//! ```
//! use trackwire::{Packet, TsPacket};
//! use chrono::DateTime;
//!
//! let packet = Packet::Ts(TsPacket {
//!     timestamp: DateTime::from_timestamp(1_735_689_600, 0).unwrap(),
//!     trip_id: "123e4567-e89b-12d3-a456-426614174000".parse().unwrap(),
//! });
//! let wire = packet.encode().unwrap();
//! assert_eq!(
//!     wire,
//!     "<Ts>1735689600;123e4567-e89b-12d3-a456-426614174000;696E</Ts>"
//! );
//! assert_eq!(Packet::decode(&wire).unwrap(), packet);
//! ```

mod client;
mod server;
mod trip;

pub use client::{PaPacket, PbPacket, PcPacket, PdPacket, PiPacket, PmPacket, PrPacket, PsPacket};
pub use server::{AbPacket, AcPacket, AoPacket, ArPacket, AsPacket, AuPacket, Command, COMMAND_SLOTS};
pub use trip::{TePacket, TsPacket};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::Result;
use crate::frame::{self, RawFrame};
use crate::registry;

/// A packet variant's declarative schema: tag, field names, and the
/// mapping between its typed fields and their wire text.
///
/// Implementations carry no behavior beyond this mapping; field counts
/// are validated by the registry before `decode_fields` runs, so the
/// slice length always matches the declared arity.
pub trait PacketBody: Sized {
    /// Wire tag, 1–3 ASCII letters, case-significant.
    const TAG: &'static str;

    /// Field names in wire order, for diagnostics and introspection.
    const FIELD_NAMES: &'static [&'static str];

    /// Render the ordered field list.
    fn encode_fields(&self) -> Result<Vec<String>>;

    /// Rebuild the packet from its ordered field list.
    fn decode_fields(fields: &[&str]) -> Result<Self>;
}

/// Encode any packet body into a complete wire frame.
pub fn encode<P: PacketBody>(packet: &P) -> Result<String> {
    let fields = packet.encode_fields()?;
    Ok(frame::build(P::TAG, &fields))
}

/// Any packet of the protocol, tagged by variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Packet {
    /// Authentication (device → server).
    Pa(PaPacket),
    /// BLE scan report (device → server).
    Pb(PbPacket),
    /// Command response (device → server).
    Pc(PcPacket),
    /// Telemetry (device → server).
    Pd(PdPacket),
    /// Identification (device → server).
    Pi(PiPacket),
    /// Media upload (device → server).
    Pm(PmPacket),
    /// Synchronization ping (device → server).
    Pr(PrPacket),
    /// Settings report (device → server).
    Ps(PsPacket),
    /// BLE allowlist (server → device).
    Ab(AbPacket),
    /// Command queue (server → device).
    Ac(AcPacket),
    /// Acknowledgement (server → device).
    Ao(AoPacket),
    /// Rejection (server → device).
    Ar(ArPacket),
    /// Authentication accepted (server → device).
    As(AsPacket),
    /// Authentication required (server → device).
    Au(AuPacket),
    /// Trip start marker.
    Ts(TsPacket),
    /// Trip end marker.
    Te(TePacket),
}

impl Packet {
    /// The wire tag of this packet's variant.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Pa(_) => PaPacket::TAG,
            Self::Pb(_) => PbPacket::TAG,
            Self::Pc(_) => PcPacket::TAG,
            Self::Pd(_) => PdPacket::TAG,
            Self::Pi(_) => PiPacket::TAG,
            Self::Pm(_) => PmPacket::TAG,
            Self::Pr(_) => PrPacket::TAG,
            Self::Ps(_) => PsPacket::TAG,
            Self::Ab(_) => AbPacket::TAG,
            Self::Ac(_) => AcPacket::TAG,
            Self::Ao(_) => AoPacket::TAG,
            Self::Ar(_) => ArPacket::TAG,
            Self::As(_) => AsPacket::TAG,
            Self::Au(_) => AuPacket::TAG,
            Self::Ts(_) => TsPacket::TAG,
            Self::Te(_) => TePacket::TAG,
        }
    }

    /// Encode this packet into its canonical wire frame.
    ///
    /// # Errors
    ///
    /// Fails only when a field value cannot be represented on the wire
    /// (delimiter collision, non-finite float, malformed MAC...).
    pub fn encode(&self) -> Result<String> {
        match self {
            Self::Pa(p) => encode(p),
            Self::Pb(p) => encode(p),
            Self::Pc(p) => encode(p),
            Self::Pd(p) => encode(p),
            Self::Pi(p) => encode(p),
            Self::Pm(p) => encode(p),
            Self::Pr(p) => encode(p),
            Self::Ps(p) => encode(p),
            Self::Ab(p) => encode(p),
            Self::Ac(p) => encode(p),
            Self::Ao(p) => encode(p),
            Self::Ar(p) => encode(p),
            Self::As(p) => encode(p),
            Self::Au(p) => encode(p),
            Self::Ts(p) => encode(p),
            Self::Te(p) => encode(p),
        }
    }

    /// Decode a wire frame into exactly one packet, or reject it.
    ///
    /// Validation order: frame envelope, checksum, tag resolution, field
    /// count, per-field decode. A corrupted payload is rejected by the
    /// checksum before any field codec sees it.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::Frame`], [`ProtocolError::Checksum`],
    /// [`ProtocolError::UnknownPacket`] or
    /// [`ProtocolError::FieldDecode`], from the earliest failing stage.
    ///
    /// [`ProtocolError::Frame`]: crate::ProtocolError::Frame
    /// [`ProtocolError::Checksum`]: crate::ProtocolError::Checksum
    /// [`ProtocolError::UnknownPacket`]: crate::ProtocolError::UnknownPacket
    /// [`ProtocolError::FieldDecode`]: crate::ProtocolError::FieldDecode
    pub fn decode(text: &str) -> Result<Self> {
        let frame = RawFrame::parse(text)?;
        if let Err(err) = frame.verify_checksum() {
            debug!(tag = frame.tag, %err, "rejected frame");
            return Err(err);
        }

        let descriptor = registry::resolve(frame.tag)?;
        let fields = frame.fields();
        descriptor.check_field_count(fields.len())?;

        let packet = (descriptor.decode)(&fields)?;
        trace!(tag = frame.tag, fields = fields.len(), "decoded packet");
        Ok(packet)
    }
}
