//! Server-originated packets: acknowledgements and queued work pushed
//! down to the device.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PacketBody;
use crate::checksum;
use crate::error::{ProtocolError, Result};
use crate::field::{Args, BleData, IntCodec, TextCodec, TimestampCodec};

/// Slots per queued command inside an `Ac` frame: id, name, args and the
/// group checksum.
pub const COMMAND_SLOTS: usize = 4;

/// `Ab` — BLE allowlist: the devices the server wants scanned for, one
/// `MAC:model` token per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbPacket {
    /// Devices to watch for during scans.
    pub devices: Vec<BleData>,
}

impl PacketBody for AbPacket {
    const TAG: &'static str = "Ab";
    const FIELD_NAMES: &'static [&'static str] = &["devices"];

    fn encode_fields(&self) -> Result<Vec<String>> {
        self.devices.iter().map(BleData::encode_token).collect()
    }

    fn decode_fields(fields: &[&str]) -> Result<Self> {
        let devices = fields
            .iter()
            .map(|token| BleData::decode_token(token))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { devices })
    }
}

/// One queued command inside an `Ac` frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Unique command id; the device answers it with a `Pc` packet.
    pub command_id: i64,
    /// Command name, e.g. `set_config`.
    pub name: String,
    /// Command arguments.
    pub args: Args,
}

impl Command {
    fn encode_slots(&self, out: &mut Vec<String>) -> Result<()> {
        let start = out.len();
        out.push(IntCodec::encode(self.command_id));
        out.push(TextCodec::encode("name", &self.name)?);
        out.push(self.args.encode("args")?);

        let mut payload = String::new();
        for slot in &out[start..] {
            payload.push_str(slot);
            payload.push(';');
        }
        out.push(checksum::checksum(&payload));
        Ok(())
    }

    fn decode_slots(slots: &[&str]) -> Result<Self> {
        debug_assert_eq!(slots.len(), COMMAND_SLOTS);
        let payload = format!("{};{};{};", slots[0], slots[1], slots[2]);
        checksum::verify(&payload, slots[3])?;

        Ok(Self {
            command_id: IntCodec::decode("command_id", slots[0])?,
            name: TextCodec::decode("name", slots[1])?,
            args: Args::decode("args", slots[2])?,
        })
    }
}

/// `Ac` — command queue: one or more commands for the device, each a
/// four-slot group with its own checksum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcPacket {
    /// Queued commands, oldest first.
    pub commands: Vec<Command>,
}

impl PacketBody for AcPacket {
    const TAG: &'static str = "Ac";
    const FIELD_NAMES: &'static [&'static str] = &["commands"];

    fn encode_fields(&self) -> Result<Vec<String>> {
        if self.commands.is_empty() {
            return Err(ProtocolError::field(
                "commands",
                "command queue cannot be empty",
            ));
        }
        let mut fields = Vec::with_capacity(self.commands.len() * COMMAND_SLOTS);
        for command in &self.commands {
            command.encode_slots(&mut fields)?;
        }
        Ok(fields)
    }

    fn decode_fields(fields: &[&str]) -> Result<Self> {
        if fields.is_empty() {
            return Err(ProtocolError::field(
                "commands",
                "command queue cannot be empty",
            ));
        }
        let commands = fields
            .chunks(COMMAND_SLOTS)
            .map(Command::decode_slots)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { commands })
    }
}

/// `Ao` — acknowledgement: the server accepted the last packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AoPacket {
    /// Server time of acceptance.
    pub timestamp: DateTime<Utc>,
}

impl PacketBody for AoPacket {
    const TAG: &'static str = "Ao";
    const FIELD_NAMES: &'static [&'static str] = &["timestamp"];

    fn encode_fields(&self) -> Result<Vec<String>> {
        Ok(vec![TimestampCodec::encode(&self.timestamp)])
    }

    fn decode_fields(fields: &[&str]) -> Result<Self> {
        Ok(Self {
            timestamp: TimestampCodec::decode("timestamp", fields[0])?,
        })
    }
}

/// `Ar` — rejection: the server refused the last packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArPacket {
    /// Why the packet was refused.
    pub reason: String,
}

impl PacketBody for ArPacket {
    const TAG: &'static str = "Ar";
    const FIELD_NAMES: &'static [&'static str] = &["reason"];

    fn encode_fields(&self) -> Result<Vec<String>> {
        Ok(vec![TextCodec::encode("reason", &self.reason)?])
    }

    fn decode_fields(fields: &[&str]) -> Result<Self> {
        Ok(Self {
            reason: TextCodec::decode("reason", fields[0])?,
        })
    }
}

/// `As` — authentication accepted; carries no fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsPacket;

impl PacketBody for AsPacket {
    const TAG: &'static str = "As";
    const FIELD_NAMES: &'static [&'static str] = &[];

    fn encode_fields(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn decode_fields(_fields: &[&str]) -> Result<Self> {
        Ok(Self)
    }
}

/// `Au` — authentication required: the server asks the device to send
/// `Pa` before anything else; carries no fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuPacket;

impl PacketBody for AuPacket {
    const TAG: &'static str = "Au";
    const FIELD_NAMES: &'static [&'static str] = &[];

    fn encode_fields(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn decode_fields(_fields: &[&str]) -> Result<Self> {
        Ok(Self)
    }
}
