//! BLE scan structures.
//!
//! A scan report carries detected advertisements as repeating groups of
//! twelve consecutive field slots: MAC address, detection timestamp, the
//! scanner's position (lat/lon/alt), model, device name, RSSI, TX power,
//! manufacturer data, service data, and a per-group checksum over the
//! preceding eleven slots. The group checksum is the same engine as the
//! frame checksum, applied recursively, so a corrupted advertisement is
//! rejected without touching its neighbours.
//!
//! Manufacturer and service data are `,`-joined `ID:HEXDATA` tokens
//! inside one slot — a 4-hex-digit uppercase identifier and the payload
//! bytes as uppercase hex pairs.
//!
//! The server-side allowlist packet uses the lighter [`BleData`] token:
//! `MAC:model` in a single slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{guard_text, FloatCodec, IntCodec, TextCodec, TimestampCodec};
use crate::checksum;
use crate::error::{ProtocolError, Result};

/// Number of consecutive field slots one advertisement occupies,
/// including its group checksum.
pub const ADVERTISEMENT_SLOTS: usize = 12;

/// MAC address length on the wire: 12 hex characters, no separators.
const MAC_WIRE_LEN: usize = 12;

/// Render a canonical colon-separated MAC into its wire form.
fn encode_mac(field: &'static str, mac: &str) -> Result<String> {
    let wire: String = mac.chars().filter(|c| *c != ':').collect();
    if wire.len() != MAC_WIRE_LEN || !wire.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ProtocolError::field(
            field,
            format!("`{mac}` is not a MAC address"),
        ));
    }
    Ok(wire)
}

/// Parse a wire MAC (12 hex chars) into canonical colon-separated form.
fn decode_mac(field: &'static str, text: &str) -> Result<String> {
    if text.len() != MAC_WIRE_LEN || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ProtocolError::field(
            field,
            format!("`{text}` is not a MAC address"),
        ));
    }
    let mut mac = String::with_capacity(MAC_WIRE_LEN + 5);
    for (i, chunk) in text.as_bytes().chunks(2).enumerate() {
        if i > 0 {
            mac.push(':');
        }
        mac.push(chunk[0] as char);
        mac.push(chunk[1] as char);
    }
    Ok(mac)
}

/// Manufacturer-specific data advertised by a detected device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BleManufacturerData {
    /// Bluetooth SIG company identifier.
    pub company_id: u16,
    /// Raw manufacturer payload.
    pub data: Vec<u8>,
}

/// Service data advertised by a detected device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BleServiceData {
    /// 16-bit service UUID.
    pub uuid: u16,
    /// Raw service payload.
    pub data: Vec<u8>,
}

fn encode_id_data_list<'a, I>(entries: I) -> String
where
    I: Iterator<Item = (u16, &'a [u8])>,
{
    entries
        .map(|(id, data)| format!("{id:04X}:{}", hex::encode_upper(data)))
        .collect::<Vec<_>>()
        .join(",")
}

fn decode_id_data_list(field: &'static str, text: &str) -> Result<Vec<(u16, Vec<u8>)>> {
    guard_text(field, text)?;
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let mut entries = Vec::new();
    for token in text.split(',') {
        let (id, data) = token.split_once(':').ok_or_else(|| {
            ProtocolError::field(field, format!("`{token}` is not an ID:DATA token"))
        })?;
        let id = u16::from_str_radix(id, 16).map_err(|_| {
            ProtocolError::field(field, format!("`{id}` is not a 16-bit hex identifier"))
        })?;
        let data = hex::decode(data)
            .map_err(|_| ProtocolError::field(field, format!("`{data}` is not hex data")))?;
        entries.push((id, data));
    }
    Ok(entries)
}

/// One BLE advertisement detected during a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BleAdvertisement {
    /// MAC of the detected device, canonical `AA:BB:CC:DD:EE:FF` form.
    pub mac_address: String,
    /// When the device was detected.
    pub timestamp: DateTime<Utc>,
    /// Scanner latitude at detection time, if known.
    pub latitude: Option<f64>,
    /// Scanner longitude at detection time, if known.
    pub longitude: Option<f64>,
    /// Scanner altitude at detection time, if known.
    pub altitude: Option<f64>,
    /// Model identifier of the detected device.
    pub model: String,
    /// Advertised device name, possibly empty.
    pub device_name: String,
    /// Received signal strength in dBm.
    pub rssi: i32,
    /// Advertised TX power, if present in the advertisement.
    pub tx_power: Option<i32>,
    /// Manufacturer data entries.
    pub manufacturer_data: Vec<BleManufacturerData>,
    /// Service data entries.
    pub service_data: Vec<BleServiceData>,
}

impl BleAdvertisement {
    /// Append the twelve encoded slots of this advertisement, group
    /// checksum included.
    pub(crate) fn encode_slots(&self, out: &mut Vec<String>) -> Result<()> {
        let start = out.len();
        out.push(encode_mac("mac_address", &self.mac_address)?);
        out.push(TimestampCodec::encode(&self.timestamp));
        out.push(FloatCodec::encode_opt("latitude", self.latitude)?);
        out.push(FloatCodec::encode_opt("longitude", self.longitude)?);
        out.push(FloatCodec::encode_opt("altitude", self.altitude)?);
        out.push(TextCodec::encode("model", &self.model)?);
        out.push(TextCodec::encode("device_name", &self.device_name)?);
        out.push(IntCodec::encode(self.rssi));
        out.push(match self.tx_power {
            Some(power) => IntCodec::encode(power),
            None => String::new(),
        });
        out.push(encode_id_data_list(
            self.manufacturer_data
                .iter()
                .map(|m| (m.company_id, m.data.as_slice())),
        ));
        out.push(encode_id_data_list(
            self.service_data.iter().map(|s| (s.uuid, s.data.as_slice())),
        ));

        let crc = checksum::checksum(&group_payload(&out[start..]));
        out.push(crc);
        Ok(())
    }

    /// Decode one twelve-slot advertisement group.
    ///
    /// The group checksum is verified before any slot is parsed.
    pub(crate) fn decode_slots(slots: &[&str]) -> Result<Self> {
        debug_assert_eq!(slots.len(), ADVERTISEMENT_SLOTS);
        let (group, received) = (
            &slots[..ADVERTISEMENT_SLOTS - 1],
            slots[ADVERTISEMENT_SLOTS - 1],
        );
        checksum::verify(&group_payload_borrowed(group), received)?;

        Ok(Self {
            mac_address: decode_mac("mac_address", group[0])?,
            timestamp: TimestampCodec::decode("timestamp", group[1])?,
            latitude: FloatCodec::decode_opt("latitude", group[2])?,
            longitude: FloatCodec::decode_opt("longitude", group[3])?,
            altitude: FloatCodec::decode_opt("altitude", group[4])?,
            model: TextCodec::decode("model", group[5])?,
            device_name: TextCodec::decode("device_name", group[6])?,
            rssi: IntCodec::decode("rssi", group[7])?,
            tx_power: if group[8].is_empty() {
                None
            } else {
                Some(IntCodec::decode("tx_power", group[8])?)
            },
            manufacturer_data: decode_id_data_list("manufacturer_data", group[9])?
                .into_iter()
                .map(|(company_id, data)| BleManufacturerData { company_id, data })
                .collect(),
            service_data: decode_id_data_list("service_data", group[10])?
                .into_iter()
                .map(|(uuid, data)| BleServiceData { uuid, data })
                .collect(),
        })
    }
}

fn group_payload(slots: &[String]) -> String {
    let mut payload = String::new();
    for slot in slots {
        payload.push_str(slot);
        payload.push(';');
    }
    payload
}

fn group_payload_borrowed(slots: &[&str]) -> String {
    let mut payload = String::new();
    for slot in slots {
        payload.push_str(slot);
        payload.push(';');
    }
    payload
}

/// One allowlist entry: a device the server wants scanned for.
///
/// Occupies a single field slot as `MAC:model`, the MAC in its 12-char
/// wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BleData {
    /// MAC of the device, canonical `AA:BB:CC:DD:EE:FF` form.
    pub mac_address: String,
    /// Model identifier expected from the device.
    pub model: String,
}

impl BleData {
    /// Encode the `MAC:model` token.
    pub(crate) fn encode_token(&self) -> Result<String> {
        let mac = encode_mac("mac_address", &self.mac_address)?;
        TextCodec::encode("model", &self.model)?;
        if self.model.contains(':') {
            return Err(ProtocolError::field(
                "model",
                "model contains the token separator",
            ));
        }
        Ok(format!("{mac}:{}", self.model))
    }

    /// Decode one `MAC:model` token.
    pub(crate) fn decode_token(text: &str) -> Result<Self> {
        let (mac, model) = text.split_once(':').ok_or_else(|| {
            ProtocolError::field("devices", format!("`{text}` is not a MAC:model token"))
        })?;
        if model.contains(':') {
            return Err(ProtocolError::field(
                "devices",
                format!("`{text}` is not a MAC:model token"),
            ));
        }
        Ok(Self {
            mac_address: decode_mac("mac_address", mac)?,
            model: TextCodec::decode("model", model)?,
        })
    }
}
