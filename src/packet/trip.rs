//! Trip boundary packets.
//!
//! A trip is delimited by a start and an end marker, both carrying the
//! same two fields: the boundary timestamp and the trip's UUID. The two
//! packets differ only by tag, so identical fields produce identical
//! checksums — the checksum never covers the tag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PacketBody;
use crate::error::Result;
use crate::field::{TimestampCodec, UuidCodec};

/// `Ts` — trip start marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsPacket {
    /// When the trip started.
    pub timestamp: DateTime<Utc>,
    /// Identifier shared by both boundaries of the trip.
    pub trip_id: Uuid,
}

impl PacketBody for TsPacket {
    const TAG: &'static str = "Ts";
    const FIELD_NAMES: &'static [&'static str] = &["timestamp", "trip_id"];

    fn encode_fields(&self) -> Result<Vec<String>> {
        Ok(vec![
            TimestampCodec::encode(&self.timestamp),
            UuidCodec::encode(&self.trip_id),
        ])
    }

    fn decode_fields(fields: &[&str]) -> Result<Self> {
        Ok(Self {
            timestamp: TimestampCodec::decode("timestamp", fields[0])?,
            trip_id: UuidCodec::decode("trip_id", fields[1])?,
        })
    }
}

/// `Te` — trip end marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TePacket {
    /// When the trip ended.
    pub timestamp: DateTime<Utc>,
    /// Identifier shared by both boundaries of the trip.
    pub trip_id: Uuid,
}

impl PacketBody for TePacket {
    const TAG: &'static str = "Te";
    const FIELD_NAMES: &'static [&'static str] = &["timestamp", "trip_id"];

    fn encode_fields(&self) -> Result<Vec<String>> {
        Ok(vec![
            TimestampCodec::encode(&self.timestamp),
            UuidCodec::encode(&self.trip_id),
        ])
    }

    fn decode_fields(fields: &[&str]) -> Result<Self> {
        Ok(Self {
            timestamp: TimestampCodec::decode("timestamp", fields[0])?,
            trip_id: UuidCodec::decode("trip_id", fields[1])?,
        })
    }
}
