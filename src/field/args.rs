//! Ordered `key:value` argument maps.
//!
//! Telemetry, settings and command packets carry free-form arguments in a
//! single field slot: entries joined by `,`, each entry `key:value`. The
//! value keeps any further `:` characters verbatim.
//!
//! Order is significant on the wire, so the map preserves insertion order
//! on encode and wire order on decode. Values are typed by inference —
//! integer, float, boolean, else text — matching the device firmware's
//! conventions, and well-known IO alias keys are rewritten to their
//! canonical names on decode (`io1.di` → `gpio.1.digital.input`). Encode
//! always emits the canonical key, so a decoded packet re-encodes
//! deterministically.

use serde::{Deserialize, Serialize};

use super::{guard_text, FloatCodec};
use crate::error::{ProtocolError, Result};

/// Separator between argument entries inside one field slot.
pub const ENTRY_SEPARATOR: char = ',';

/// Separator between an argument key and its value.
pub const KEY_SEPARATOR: char = ':';

/// A typed argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArgValue {
    /// Decimal integer, e.g. `fw.build:49`.
    Int(i64),
    /// Decimal float with a fractional part, e.g. `hdop:1.2`.
    Float(f64),
    /// `true` or `false`.
    Bool(bool),
    /// Anything else, verbatim.
    Text(String),
}

impl ArgValue {
    fn encode(&self, field: &'static str) -> Result<String> {
        match self {
            Self::Int(v) => Ok(v.to_string()),
            Self::Float(v) => FloatCodec::encode(field, *v),
            Self::Bool(v) => Ok(if *v { "true" } else { "false" }.to_string()),
            Self::Text(v) => {
                guard_text(field, v)?;
                if v.contains(ENTRY_SEPARATOR) {
                    return Err(ProtocolError::field(
                        field,
                        "argument value contains the entry separator",
                    ));
                }
                Ok(v.clone())
            }
        }
    }

    /// Infer the value type from its wire text.
    fn infer(text: &str) -> Self {
        if let Some(v) = parse_wire_int(text) {
            return Self::Int(v);
        }
        if let Some(v) = parse_wire_float(text) {
            return Self::Float(v);
        }
        match text {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => Self::Text(text.to_string()),
        }
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// `-?digits`, full match.
fn parse_wire_int(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// `-?digits.digits`, full match.
fn parse_wire_float(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (int_part, frac_part) = unsigned.split_once('.')?;
    if int_part.is_empty()
        || frac_part.is_empty()
        || !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    text.parse().ok()
}

/// Rewrite firmware IO alias keys to their canonical names.
fn normalize_key(key: &str) -> String {
    if let Some(rest) = key.strip_prefix("io") {
        if let Some((index, suffix)) = rest.split_once('.') {
            if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
                let mapped = match suffix {
                    "di" => Some("digital.input"),
                    "do" => Some("digital.output"),
                    "ai" => Some("analog.input"),
                    "ao" => Some("analog.output"),
                    "counter" => Some("event.count"),
                    _ => None,
                };
                if let Some(canonical) = mapped {
                    return format!("gpio.{index}.{canonical}");
                }
            }
        }
    }
    match key {
        "report" => "report.code".to_string(),
        "confiot_ble" => "ble.confiot.connection.status".to_string(),
        "confiot_serial" => "serial.confiot.connection.status".to_string(),
        _ => key.to_string(),
    }
}

/// An ordered argument map occupying one field slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Args {
    entries: Vec<(String, ArgValue)>,
}

impl Args {
    /// Create an empty argument map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an argument, replacing an existing value in place if the
    /// key is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ArgValue>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Look up an argument by key.
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Iterate entries in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode the map into one field slot. An empty map encodes as empty
    /// text.
    ///
    /// # Errors
    ///
    /// Rejects keys and values that collide with the entry, key, field
    /// or frame delimiters.
    pub fn encode(&self, field: &'static str) -> Result<String> {
        let mut parts = Vec::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            guard_text(field, key)?;
            if key.is_empty() || key.contains([ENTRY_SEPARATOR, KEY_SEPARATOR]) {
                return Err(ProtocolError::field(
                    field,
                    format!("invalid argument key `{key}`"),
                ));
            }
            parts.push(format!("{key}{KEY_SEPARATOR}{}", value.encode(field)?));
        }
        Ok(parts.join(","))
    }

    /// Decode a field slot into an argument map. Empty text decodes as
    /// an empty map.
    ///
    /// # Errors
    ///
    /// Rejects entries without a key separator and stray frame
    /// delimiters.
    pub fn decode(field: &'static str, text: &str) -> Result<Self> {
        guard_text(field, text)?;
        if text.is_empty() {
            return Ok(Self::new());
        }

        let mut args = Self::new();
        for entry in text.split(ENTRY_SEPARATOR) {
            let (key, value) = entry.split_once(KEY_SEPARATOR).ok_or_else(|| {
                ProtocolError::field(field, format!("argument `{entry}` has no key separator"))
            })?;
            if key.is_empty() {
                return Err(ProtocolError::field(
                    field,
                    format!("argument `{entry}` has an empty key"),
                ));
            }
            args.insert(normalize_key(key), ArgValue::infer(value));
        }
        Ok(args)
    }
}

impl FromIterator<(String, ArgValue)> for Args {
    fn from_iter<I: IntoIterator<Item = (String, ArgValue)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (key, value) in iter {
            args.insert(key, value);
        }
        args
    }
}
