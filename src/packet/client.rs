//! Client-originated packets: everything a device sends to the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;

use super::PacketBody;
use crate::error::{ProtocolError, Result};
use crate::field::{
    Args, BleAdvertisement, BoolCodec, FirmwareBranch, IntCodec, Position, TextCodec,
    TimestampCodec,
};
use crate::field::position::POSITION_SLOTS;
use crate::field::ble::ADVERTISEMENT_SLOTS;

/// `Pa` — authentication, opens a session with the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaPacket {
    /// Device identity, usually the IMEI.
    pub ident: String,
    /// Device password; may be empty.
    pub password: String,
}

impl PacketBody for PaPacket {
    const TAG: &'static str = "Pa";
    const FIELD_NAMES: &'static [&'static str] = &["ident", "password"];

    fn encode_fields(&self) -> Result<Vec<String>> {
        Ok(vec![
            TextCodec::encode("ident", &self.ident)?,
            TextCodec::encode("password", &self.password)?,
        ])
    }

    fn decode_fields(fields: &[&str]) -> Result<Self> {
        Ok(Self {
            ident: TextCodec::decode("ident", fields[0])?,
            password: TextCodec::decode("password", fields[1])?,
        })
    }
}

/// `Pb` — BLE scan report: every advertisement detected since the last
/// report, each a twelve-slot group with its own checksum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PbPacket {
    /// Detected advertisements.
    pub advertisements: Vec<BleAdvertisement>,
}

impl PacketBody for PbPacket {
    const TAG: &'static str = "Pb";
    const FIELD_NAMES: &'static [&'static str] = &["advertisements"];

    fn encode_fields(&self) -> Result<Vec<String>> {
        if self.advertisements.is_empty() {
            return Err(ProtocolError::field(
                "advertisements",
                "scan report cannot be empty",
            ));
        }
        let mut fields = Vec::with_capacity(self.advertisements.len() * ADVERTISEMENT_SLOTS);
        for advertisement in &self.advertisements {
            advertisement.encode_slots(&mut fields)?;
        }
        Ok(fields)
    }

    fn decode_fields(fields: &[&str]) -> Result<Self> {
        let advertisements = fields
            .chunks(ADVERTISEMENT_SLOTS)
            .map(BleAdvertisement::decode_slots)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { advertisements })
    }
}

/// `Pc` — command response: the outcome of a previously queued command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcPacket {
    /// When the command finished on the device.
    pub timestamp: DateTime<Utc>,
    /// Identifier of the command being answered.
    pub command_id: i64,
    /// Human-readable outcome.
    pub message: String,
}

impl PacketBody for PcPacket {
    const TAG: &'static str = "Pc";
    const FIELD_NAMES: &'static [&'static str] = &["timestamp", "command_id", "message"];

    fn encode_fields(&self) -> Result<Vec<String>> {
        Ok(vec![
            TimestampCodec::encode(&self.timestamp),
            IntCodec::encode(self.command_id),
            TextCodec::encode("message", &self.message)?,
        ])
    }

    fn decode_fields(fields: &[&str]) -> Result<Self> {
        Ok(Self {
            timestamp: TimestampCodec::decode("timestamp", fields[0])?,
            command_id: IntCodec::decode("command_id", fields[1])?,
            message: TextCodec::decode("message", fields[2])?,
        })
    }
}

/// `Pd` — telemetry: a timestamped position plus free-form extra data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdPacket {
    /// When the sample was taken.
    pub timestamp: DateTime<Utc>,
    /// GPS fix; all components optional.
    pub position: Position,
    /// Additional sensor and status readings.
    pub extra_data: Args,
}

impl PacketBody for PdPacket {
    const TAG: &'static str = "Pd";
    const FIELD_NAMES: &'static [&'static str] = &[
        "timestamp",
        "latitude",
        "longitude",
        "altitude",
        "speed",
        "direction",
        "satellite_count",
        "hdop",
        "extra_data",
    ];

    fn encode_fields(&self) -> Result<Vec<String>> {
        let mut fields = Vec::with_capacity(2 + POSITION_SLOTS);
        fields.push(TimestampCodec::encode(&self.timestamp));
        self.position.encode_slots(&mut fields)?;
        fields.push(self.extra_data.encode("extra_data")?);
        Ok(fields)
    }

    fn decode_fields(fields: &[&str]) -> Result<Self> {
        Ok(Self {
            timestamp: TimestampCodec::decode("timestamp", fields[0])?,
            position: Position::decode_slots(&fields[1..1 + POSITION_SLOTS])?,
            extra_data: Args::decode("extra_data", fields[1 + POSITION_SLOTS])?,
        })
    }
}

/// `Pi` — identification: static description of the device and its
/// firmware, sent once after authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiPacket {
    /// Device identity, usually the IMEI.
    pub ident: String,
    /// Firmware identifier, e.g. `layrz.hub12.base`.
    pub firmware_id: String,
    /// Incremental firmware build number.
    pub firmware_build: u32,
    /// Internal device id.
    pub device_id: u32,
    /// Internal hardware id.
    pub hardware_id: u32,
    /// Internal model id.
    pub model_id: u32,
    /// Release branch the firmware was built from.
    pub firmware_branch: FirmwareBranch,
    /// Whether the device accepts firmware-over-the-air updates.
    pub fota_enabled: bool,
}

impl PacketBody for PiPacket {
    const TAG: &'static str = "Pi";
    const FIELD_NAMES: &'static [&'static str] = &[
        "ident",
        "firmware_id",
        "firmware_build",
        "device_id",
        "hardware_id",
        "model_id",
        "firmware_branch",
        "fota_enabled",
    ];

    fn encode_fields(&self) -> Result<Vec<String>> {
        Ok(vec![
            TextCodec::encode("ident", &self.ident)?,
            TextCodec::encode("firmware_id", &self.firmware_id)?,
            IntCodec::encode(self.firmware_build),
            IntCodec::encode(self.device_id),
            IntCodec::encode(self.hardware_id),
            IntCodec::encode(self.model_id),
            self.firmware_branch.encode(),
            BoolCodec::encode(self.fota_enabled),
        ])
    }

    fn decode_fields(fields: &[&str]) -> Result<Self> {
        Ok(Self {
            ident: TextCodec::decode("ident", fields[0])?,
            firmware_id: TextCodec::decode("firmware_id", fields[1])?,
            firmware_build: IntCodec::decode("firmware_build", fields[2])?,
            device_id: IntCodec::decode("device_id", fields[3])?,
            hardware_id: IntCodec::decode("hardware_id", fields[4])?,
            model_id: IntCodec::decode("model_id", fields[5])?,
            firmware_branch: FirmwareBranch::decode("firmware_branch", fields[6])?,
            fota_enabled: BoolCodec::decode("fota_enabled", fields[7])?,
        })
    }
}

/// `Pm` — media upload: a named binary blob, base64 on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PmPacket {
    /// File name of the media.
    pub filename: String,
    /// MIME content type.
    pub content_type: String,
    /// Raw media bytes.
    pub data: Vec<u8>,
}

impl PacketBody for PmPacket {
    const TAG: &'static str = "Pm";
    const FIELD_NAMES: &'static [&'static str] = &["filename", "content_type", "data"];

    fn encode_fields(&self) -> Result<Vec<String>> {
        Ok(vec![
            TextCodec::encode("filename", &self.filename)?,
            TextCodec::encode("content_type", &self.content_type)?,
            BASE64_STANDARD.encode(&self.data),
        ])
    }

    fn decode_fields(fields: &[&str]) -> Result<Self> {
        Ok(Self {
            filename: TextCodec::decode("filename", fields[0])?,
            content_type: TextCodec::decode("content_type", fields[1])?,
            data: BASE64_STANDARD.decode(fields[2]).map_err(|_| {
                ProtocolError::field("data", "invalid base64 payload")
            })?,
        })
    }
}

/// `Pr` — synchronization ping; carries no fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrPacket;

impl PacketBody for PrPacket {
    const TAG: &'static str = "Pr";
    const FIELD_NAMES: &'static [&'static str] = &[];

    fn encode_fields(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn decode_fields(_fields: &[&str]) -> Result<Self> {
        Ok(Self)
    }
}

/// `Ps` — settings report: the device's current configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PsPacket {
    /// When the configuration was read.
    pub timestamp: DateTime<Utc>,
    /// Configuration parameters.
    pub params: Args,
}

impl PacketBody for PsPacket {
    const TAG: &'static str = "Ps";
    const FIELD_NAMES: &'static [&'static str] = &["timestamp", "params"];

    fn encode_fields(&self) -> Result<Vec<String>> {
        Ok(vec![
            TimestampCodec::encode(&self.timestamp),
            self.params.encode("params")?,
        ])
    }

    fn decode_fields(fields: &[&str]) -> Result<Self> {
        Ok(Self {
            timestamp: TimestampCodec::decode("timestamp", fields[0])?,
            params: Args::decode("params", fields[1])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::Packet;

    fn roundtrip(packet: Packet) {
        let wire = packet.encode().unwrap();
        assert_eq!(Packet::decode(&wire).unwrap(), packet);
    }

    #[test]
    fn test_pa_roundtrip() {
        roundtrip(Packet::Pa(PaPacket {
            ident: "phkenny123".into(),
            password: String::new(),
        }));
    }

    #[test]
    fn test_pc_roundtrip() {
        roundtrip(Packet::Pc(PcPacket {
            timestamp: TimestampCodec::decode("t", "1739998848").unwrap(),
            command_id: 1919,
            message: "Cannot sniff in foreground".into(),
        }));
    }

    #[test]
    fn test_pd_roundtrip() {
        let mut extra_data = Args::new();
        extra_data.insert("report.code", "LKSEN");
        extra_data.insert("fw.build", 49i64);
        roundtrip(Packet::Pd(PdPacket {
            timestamp: TimestampCodec::decode("t", "1740081532").unwrap(),
            position: Position {
                latitude: Some(19.4346059),
                longitude: Some(-99.1802234),
                ..Position::default()
            },
            extra_data,
        }));
    }

    #[test]
    fn test_pi_roundtrip() {
        roundtrip(Packet::Pi(PiPacket {
            ident: "744DBD89B0D9".into(),
            firmware_id: "layrz.hub12.base".into(),
            firmware_build: 49,
            device_id: 22246,
            hardware_id: 1,
            model_id: 460,
            firmware_branch: FirmwareBranch::Stable,
            fota_enabled: false,
        }));
    }

    #[test]
    fn test_pm_roundtrip() {
        roundtrip(Packet::Pm(PmPacket {
            filename: "snapshot.jpg".into(),
            content_type: "image/jpeg".into(),
            data: vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00],
        }));
    }

    #[test]
    fn test_pm_rejects_bad_base64() {
        let wire = Packet::Pm(PmPacket {
            filename: "f".into(),
            content_type: "text/plain".into(),
            data: b"hello".to_vec(),
        })
        .encode()
        .unwrap();
        // Corrupt the base64 field while keeping the checksum honest.
        let frame = crate::frame::RawFrame::parse(&wire).unwrap();
        let mut fields: Vec<String> = frame.fields().iter().map(|f| f.to_string()).collect();
        fields[2] = "!!not-base64!!".into();
        let tampered = crate::frame::build("Pm", &fields);
        assert!(matches!(
            Packet::decode(&tampered).unwrap_err(),
            ProtocolError::FieldDecode { field: "data", .. }
        ));
    }

    #[test]
    fn test_pr_roundtrip() {
        roundtrip(Packet::Pr(PrPacket));
    }

    #[test]
    fn test_ps_roundtrip() {
        let mut params = Args::new();
        params.insert("configuration.accuracy", "best");
        params.insert("configuration.sniff.interval", 30i64);
        roundtrip(Packet::Ps(PsPacket {
            timestamp: TimestampCodec::decode("t", "1739998822").unwrap(),
            params,
        }));
    }

    #[test]
    fn test_pb_roundtrip() {
        roundtrip(Packet::Pb(PbPacket {
            advertisements: vec![BleAdvertisement {
                mac_address: "1C:9D:C2:69:14:36".into(),
                timestamp: TimestampCodec::decode("t", "1740000984").unwrap(),
                latitude: Some(19.4346059),
                longitude: Some(-99.1802234),
                altitude: None,
                model: "GENERIC".into(),
                device_name: "Core200S".into(),
                rssi: -60,
                tx_power: None,
                manufacturer_data: Vec::new(),
                service_data: Vec::new(),
            }],
        }));
    }

    #[test]
    fn test_pb_rejects_empty_report() {
        // An empty report has no wire form: zero groups never pass the
        // field-count check on receipt, so encoding one is an error too.
        assert!(matches!(
            Packet::Pb(PbPacket::default()).encode().unwrap_err(),
            ProtocolError::FieldDecode {
                field: "advertisements",
                ..
            }
        ));
    }

    #[test]
    fn test_pa_injection_rejected() {
        let packet = PaPacket {
            ident: "abc;def".into(),
            password: String::new(),
        };
        assert!(matches!(
            Packet::Pa(packet).encode().unwrap_err(),
            ProtocolError::FieldDecode { field: "ident", .. }
        ));
    }
}
