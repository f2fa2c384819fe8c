//! Field codecs — canonical text for every semantic field type.
//!
//! Codecs are implemented as marker structs with static methods rather
//! than trait objects, so variant definitions pick their codecs at
//! compile time and the encode/decode pair for a type stays a strict
//! inverse.
//!
//! All codecs enforce the delimiter guard: a value may never contain the
//! field separator (`;`) or the frame delimiters (`<`, `>`). That guard
//! is the protocol's primary injection boundary and applies on both
//! encode and decode.

pub mod args;
pub mod ble;
pub mod position;

pub use args::{ArgValue, Args};
pub use ble::{BleAdvertisement, BleData, BleManufacturerData, BleServiceData};
pub use position::Position;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ProtocolError, Result};

/// Characters that may never appear inside an encoded field value.
pub(crate) const RESERVED: [char; 3] = [';', '<', '>'];

/// Reject values that would collide with frame or field delimiters.
pub(crate) fn guard_text(field: &'static str, value: &str) -> Result<()> {
    if value.contains(RESERVED) {
        return Err(ProtocolError::field(
            field,
            "value contains a reserved delimiter",
        ));
    }
    Ok(())
}

/// Free-text field codec (idents, passwords, messages, filenames...).
///
/// Pass-through apart from the delimiter guard.
pub struct TextCodec;

impl TextCodec {
    /// Encode a text value, rejecting delimiter collisions.
    pub fn encode(field: &'static str, value: &str) -> Result<String> {
        guard_text(field, value)?;
        Ok(value.to_string())
    }

    /// Decode a text value, rejecting stray frame delimiters.
    pub fn decode(field: &'static str, text: &str) -> Result<String> {
        guard_text(field, text)?;
        Ok(text.to_string())
    }
}

/// Epoch-seconds timestamp codec: decimal ASCII digits, no sign, no
/// fractional part, UTC.
pub struct TimestampCodec;

impl TimestampCodec {
    /// Encode a timestamp as epoch seconds.
    #[inline]
    pub fn encode(value: &DateTime<Utc>) -> String {
        value.timestamp().to_string()
    }

    /// Decode epoch seconds into a UTC timestamp.
    ///
    /// # Errors
    ///
    /// Rejects empty text, any non-digit character (including a sign)
    /// and values outside the representable range.
    pub fn decode(field: &'static str, text: &str) -> Result<DateTime<Utc>> {
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProtocolError::field(
                field,
                format!("`{text}` is not an unsigned epoch timestamp"),
            ));
        }
        let secs: i64 = text
            .parse()
            .map_err(|_| ProtocolError::field(field, format!("timestamp `{text}` out of range")))?;
        DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| ProtocolError::field(field, format!("timestamp `{text}` out of range")))
    }
}

/// UUID codec: canonical hyphenated form, lowercase on encode,
/// case-insensitive on decode.
pub struct UuidCodec;

impl UuidCodec {
    /// Encode a UUID in canonical hyphenated lowercase.
    #[inline]
    pub fn encode(value: &Uuid) -> String {
        value.hyphenated().to_string()
    }

    /// Decode a hyphenated UUID, accepting either case.
    pub fn decode(field: &'static str, text: &str) -> Result<Uuid> {
        // Only the 36-character hyphenated form is valid on the wire;
        // braced, simple and URN forms are not.
        if text.len() != 36 {
            return Err(ProtocolError::field(
                field,
                format!("`{text}` is not a hyphenated UUID"),
            ));
        }
        Uuid::parse_str(text)
            .map_err(|_| ProtocolError::field(field, format!("`{text}` is not a hyphenated UUID")))
    }
}

/// Signed integer codec, shared by every integral field.
pub struct IntCodec;

impl IntCodec {
    /// Encode any integer as decimal text.
    #[inline]
    pub fn encode<T: ToString>(value: T) -> String {
        value.to_string()
    }

    /// Decode decimal text into the target integer type.
    pub fn decode<T: FromStr>(field: &'static str, text: &str) -> Result<T> {
        text.parse()
            .map_err(|_| ProtocolError::field(field, format!("`{text}` is not a valid integer")))
    }
}

/// Floating-point codec using the shortest round-trip representation.
///
/// Integral values are rendered with one decimal (`5.0`, not `5`) so the
/// text stays recognizably a float; everything else prints the shortest
/// digits that parse back to the same `f64`, which also reproduces the
/// reference wire captures byte-for-byte.
pub struct FloatCodec;

impl FloatCodec {
    /// Encode a finite float.
    ///
    /// # Errors
    ///
    /// Rejects NaN and infinities, which have no wire representation.
    pub fn encode(field: &'static str, value: f64) -> Result<String> {
        if !value.is_finite() {
            return Err(ProtocolError::field(field, "non-finite float"));
        }
        if value.fract() == 0.0 {
            Ok(format!("{value:.1}"))
        } else {
            Ok(format!("{value}"))
        }
    }

    /// Decode a finite float.
    pub fn decode(field: &'static str, text: &str) -> Result<f64> {
        let value: f64 = text
            .parse()
            .map_err(|_| ProtocolError::field(field, format!("`{text}` is not a valid float")))?;
        if !value.is_finite() {
            return Err(ProtocolError::field(
                field,
                format!("`{text}` is not a finite float"),
            ));
        }
        Ok(value)
    }

    /// Decode an optional float: empty text means absent.
    pub fn decode_opt(field: &'static str, text: &str) -> Result<Option<f64>> {
        if text.is_empty() {
            Ok(None)
        } else {
            Self::decode(field, text).map(Some)
        }
    }

    /// Encode an optional float: absent encodes as empty text.
    pub fn encode_opt(field: &'static str, value: Option<f64>) -> Result<String> {
        match value {
            Some(v) => Self::encode(field, v),
            None => Ok(String::new()),
        }
    }
}

/// Boolean codec over the closed alphabet `true`/`false`/`1`/`0`.
///
/// Encode always emits `true`/`false`; anything outside the alphabet is
/// an error, never coerced.
pub struct BoolCodec;

impl BoolCodec {
    /// Encode a boolean as `true` or `false`.
    #[inline]
    pub fn encode(value: bool) -> String {
        if value { "true" } else { "false" }.to_string()
    }

    /// Decode a boolean from the declared alphabet.
    pub fn decode(field: &'static str, text: &str) -> Result<bool> {
        match text {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ProtocolError::field(
                field,
                format!("`{other}` is not a boolean"),
            )),
        }
    }
}

/// Firmware release branch reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FirmwareBranch {
    /// Production firmware, code `0`.
    Stable,
    /// Development firmware, code `1`.
    Development,
}

impl FirmwareBranch {
    /// The single-character wire code for this branch.
    #[inline]
    pub fn code(self) -> &'static str {
        match self {
            Self::Stable => "0",
            Self::Development => "1",
        }
    }

    /// Encode the branch as its wire code.
    #[inline]
    pub fn encode(self) -> String {
        self.code().to_string()
    }

    /// Decode a branch code; unknown codes are an error, never coerced.
    pub fn decode(field: &'static str, text: &str) -> Result<Self> {
        match text {
            "0" => Ok(Self::Stable),
            "1" => Ok(Self::Development),
            other => Err(ProtocolError::field(
                field,
                format!("unknown firmware branch code `{other}`"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_roundtrip() {
        let ts = TimestampCodec::decode("t", "1735689600").unwrap();
        assert_eq!(TimestampCodec::encode(&ts), "1735689600");
        assert_eq!(ts.timestamp(), 1_735_689_600);
    }

    #[test]
    fn test_timestamp_rejects_bad_digits() {
        for text in ["", "-5", "12a", "1.5", "+3"] {
            assert!(TimestampCodec::decode("t", text).is_err(), "{text}");
        }
    }

    #[test]
    fn test_uuid_lowercase_encode_case_insensitive_decode() {
        let upper = "123E4567-E89B-12D3-A456-426614174000";
        let id = UuidCodec::decode("id", upper).unwrap();
        assert_eq!(
            UuidCodec::encode(&id),
            "123e4567-e89b-12d3-a456-426614174000"
        );
    }

    #[test]
    fn test_uuid_rejects_non_hyphenated_forms() {
        for text in [
            "123e4567e89b12d3a456426614174000",
            "{123e4567-e89b-12d3-a456-426614174000}",
            "not-a-uuid",
            "",
        ] {
            assert!(UuidCodec::decode("id", text).is_err(), "{text}");
        }
    }

    #[test]
    fn test_float_shortest_roundtrip() {
        assert_eq!(FloatCodec::encode("f", 19.4346059).unwrap(), "19.4346059");
        assert_eq!(
            FloatCodec::encode("f", 2240.800048828125).unwrap(),
            "2240.800048828125"
        );
        assert_eq!(FloatCodec::encode("f", 5.0).unwrap(), "5.0");
        assert_eq!(FloatCodec::encode("f", -99.1802234).unwrap(), "-99.1802234");
    }

    #[test]
    fn test_float_rejects_non_finite() {
        assert!(FloatCodec::encode("f", f64::NAN).is_err());
        assert!(FloatCodec::encode("f", f64::INFINITY).is_err());
        assert!(FloatCodec::decode("f", "inf").is_err());
        assert!(FloatCodec::decode("f", "NaN").is_err());
    }

    #[test]
    fn test_bool_alphabet() {
        assert!(BoolCodec::decode("b", "true").unwrap());
        assert!(BoolCodec::decode("b", "1").unwrap());
        assert!(!BoolCodec::decode("b", "false").unwrap());
        assert!(!BoolCodec::decode("b", "0").unwrap());
        assert!(BoolCodec::decode("b", "yes").is_err());
        assert!(BoolCodec::decode("b", "").is_err());
    }

    #[test]
    fn test_firmware_branch_codes() {
        assert_eq!(FirmwareBranch::decode("fw", "0").unwrap(), FirmwareBranch::Stable);
        assert_eq!(
            FirmwareBranch::decode("fw", "1").unwrap(),
            FirmwareBranch::Development
        );
        assert!(FirmwareBranch::decode("fw", "2").is_err());
        assert_eq!(FirmwareBranch::Development.encode(), "1");
    }

    #[test]
    fn test_text_delimiter_guard() {
        assert!(TextCodec::encode("msg", "hello;world").is_err());
        assert!(TextCodec::encode("msg", "a<b").is_err());
        assert!(TextCodec::decode("msg", "a>b").is_err());
        assert_eq!(TextCodec::encode("msg", "plain text").unwrap(), "plain text");
    }

    #[test]
    fn test_int_decode() {
        assert_eq!(IntCodec::decode::<i32>("n", "-60").unwrap(), -60);
        assert_eq!(IntCodec::decode::<i64>("n", "1919").unwrap(), 1919);
        assert!(IntCodec::decode::<i32>("n", "12.5").is_err());
        assert!(IntCodec::decode::<u32>("n", "-1").is_err());
    }
}
