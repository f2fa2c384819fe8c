//! GPS position — seven consecutive field slots.
//!
//! A position occupies the slots latitude, longitude, altitude, speed,
//! direction, satellite count and HDOP, in that order. Every component is
//! optional and an absent component encodes as empty text, so a device
//! without a fix reports `;;;;;;;` and still frames a valid packet.

use serde::{Deserialize, Serialize};

use super::{FloatCodec, IntCodec};
use crate::error::Result;

/// Number of consecutive field slots a position occupies.
pub const POSITION_SLOTS: usize = 7;

/// A GPS fix as reported by the device. All components optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// Altitude in meters above sea level.
    pub altitude: Option<f64>,
    /// Speed in km/h.
    pub speed: Option<f64>,
    /// Course over ground in degrees.
    pub direction: Option<f64>,
    /// Number of satellites in the fix.
    pub satellite_count: Option<u32>,
    /// Horizontal dilution of precision.
    pub hdop: Option<f64>,
}

impl Position {
    /// Whether no component is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Append the seven encoded slots to a field list.
    pub(crate) fn encode_slots(&self, out: &mut Vec<String>) -> Result<()> {
        out.push(FloatCodec::encode_opt("latitude", self.latitude)?);
        out.push(FloatCodec::encode_opt("longitude", self.longitude)?);
        out.push(FloatCodec::encode_opt("altitude", self.altitude)?);
        out.push(FloatCodec::encode_opt("speed", self.speed)?);
        out.push(FloatCodec::encode_opt("direction", self.direction)?);
        out.push(match self.satellite_count {
            Some(n) => IntCodec::encode(n),
            None => String::new(),
        });
        out.push(FloatCodec::encode_opt("hdop", self.hdop)?);
        Ok(())
    }

    /// Decode the seven slots of a position.
    ///
    /// # Panics
    ///
    /// Debug-asserts the slice length; the registry's arity check
    /// guarantees it.
    pub(crate) fn decode_slots(slots: &[&str]) -> Result<Self> {
        debug_assert_eq!(slots.len(), POSITION_SLOTS);
        Ok(Self {
            latitude: FloatCodec::decode_opt("latitude", slots[0])?,
            longitude: FloatCodec::decode_opt("longitude", slots[1])?,
            altitude: FloatCodec::decode_opt("altitude", slots[2])?,
            speed: FloatCodec::decode_opt("speed", slots[3])?,
            direction: FloatCodec::decode_opt("direction", slots[4])?,
            satellite_count: if slots[5].is_empty() {
                None
            } else {
                Some(IntCodec::decode("satellite_count", slots[5])?)
            },
            hdop: FloatCodec::decode_opt("hdop", slots[6])?,
        })
    }
}
