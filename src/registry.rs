//! Static variant registry: maps wire tags to packet descriptors.
//!
//! The registry is the single dispatch point between a verified frame
//! and a typed packet. Every variant registers exactly one descriptor;
//! tags are case-significant, so `Ts` and `TS` are different lookups and
//! only the former resolves.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{ProtocolError, Result};
use crate::field::ble::ADVERTISEMENT_SLOTS;
use crate::packet::{
    AbPacket, AcPacket, AoPacket, ArPacket, AsPacket, AuPacket, PaPacket, PacketBody, PbPacket,
    PcPacket, PdPacket, PiPacket, PmPacket, Packet, PrPacket, PsPacket, TePacket, TsPacket,
    COMMAND_SLOTS,
};

/// How many fields a variant accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many fields.
    Exact(usize),
    /// Any nonzero multiple of the group size (repeating-group variants).
    Groups(usize),
    /// Any field count, including zero.
    Any,
}

impl Arity {
    /// Whether `count` satisfies this arity.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(n) => count == n,
            Self::Groups(size) => count > 0 && count % size == 0,
            Self::Any => true,
        }
    }
}

/// Everything the decoder needs to know about one packet variant.
#[derive(Debug)]
pub struct VariantDescriptor {
    /// Wire tag.
    pub tag: &'static str,
    /// Field names in wire order (one group for repeating variants).
    pub field_names: &'static [&'static str],
    /// Accepted field counts.
    pub arity: Arity,
    /// Build the typed packet from a field slice of accepted length.
    pub decode: fn(&[&str]) -> Result<Packet>,
}

impl VariantDescriptor {
    /// Validate a frame's field count against this variant's arity.
    pub fn check_field_count(&self, count: usize) -> Result<()> {
        if self.arity.accepts(count) {
            return Ok(());
        }
        let expected = match self.arity {
            Arity::Exact(n) => format!("{n}"),
            Arity::Groups(size) => format!("a nonzero multiple of {size}"),
            Arity::Any => unreachable!("Any accepts every count"),
        };
        Err(ProtocolError::Frame(format!(
            "`{}` expects {expected} field(s), got {count}",
            self.tag
        )))
    }
}

static VARIANTS: [VariantDescriptor; 16] = [
    VariantDescriptor {
        tag: PaPacket::TAG,
        field_names: PaPacket::FIELD_NAMES,
        arity: Arity::Exact(2),
        decode: |f| PaPacket::decode_fields(f).map(Packet::Pa),
    },
    VariantDescriptor {
        tag: PbPacket::TAG,
        field_names: PbPacket::FIELD_NAMES,
        arity: Arity::Groups(ADVERTISEMENT_SLOTS),
        decode: |f| PbPacket::decode_fields(f).map(Packet::Pb),
    },
    VariantDescriptor {
        tag: PcPacket::TAG,
        field_names: PcPacket::FIELD_NAMES,
        arity: Arity::Exact(3),
        decode: |f| PcPacket::decode_fields(f).map(Packet::Pc),
    },
    VariantDescriptor {
        tag: PdPacket::TAG,
        field_names: PdPacket::FIELD_NAMES,
        arity: Arity::Exact(9),
        decode: |f| PdPacket::decode_fields(f).map(Packet::Pd),
    },
    VariantDescriptor {
        tag: PiPacket::TAG,
        field_names: PiPacket::FIELD_NAMES,
        arity: Arity::Exact(8),
        decode: |f| PiPacket::decode_fields(f).map(Packet::Pi),
    },
    VariantDescriptor {
        tag: PmPacket::TAG,
        field_names: PmPacket::FIELD_NAMES,
        arity: Arity::Exact(3),
        decode: |f| PmPacket::decode_fields(f).map(Packet::Pm),
    },
    VariantDescriptor {
        tag: PrPacket::TAG,
        field_names: PrPacket::FIELD_NAMES,
        arity: Arity::Exact(0),
        decode: |f| PrPacket::decode_fields(f).map(Packet::Pr),
    },
    VariantDescriptor {
        tag: PsPacket::TAG,
        field_names: PsPacket::FIELD_NAMES,
        arity: Arity::Exact(2),
        decode: |f| PsPacket::decode_fields(f).map(Packet::Ps),
    },
    VariantDescriptor {
        tag: AbPacket::TAG,
        field_names: AbPacket::FIELD_NAMES,
        arity: Arity::Any,
        decode: |f| AbPacket::decode_fields(f).map(Packet::Ab),
    },
    VariantDescriptor {
        tag: AcPacket::TAG,
        field_names: AcPacket::FIELD_NAMES,
        arity: Arity::Groups(COMMAND_SLOTS),
        decode: |f| AcPacket::decode_fields(f).map(Packet::Ac),
    },
    VariantDescriptor {
        tag: AoPacket::TAG,
        field_names: AoPacket::FIELD_NAMES,
        arity: Arity::Exact(1),
        decode: |f| AoPacket::decode_fields(f).map(Packet::Ao),
    },
    VariantDescriptor {
        tag: ArPacket::TAG,
        field_names: ArPacket::FIELD_NAMES,
        arity: Arity::Exact(1),
        decode: |f| ArPacket::decode_fields(f).map(Packet::Ar),
    },
    VariantDescriptor {
        tag: AsPacket::TAG,
        field_names: AsPacket::FIELD_NAMES,
        arity: Arity::Exact(0),
        decode: |f| AsPacket::decode_fields(f).map(Packet::As),
    },
    VariantDescriptor {
        tag: AuPacket::TAG,
        field_names: AuPacket::FIELD_NAMES,
        arity: Arity::Exact(0),
        decode: |f| AuPacket::decode_fields(f).map(Packet::Au),
    },
    VariantDescriptor {
        tag: TsPacket::TAG,
        field_names: TsPacket::FIELD_NAMES,
        arity: Arity::Exact(2),
        decode: |f| TsPacket::decode_fields(f).map(Packet::Ts),
    },
    VariantDescriptor {
        tag: TePacket::TAG,
        field_names: TePacket::FIELD_NAMES,
        arity: Arity::Exact(2),
        decode: |f| TePacket::decode_fields(f).map(Packet::Te),
    },
];

fn table() -> &'static HashMap<&'static str, &'static VariantDescriptor> {
    static TABLE: OnceLock<HashMap<&'static str, &'static VariantDescriptor>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut map = HashMap::with_capacity(VARIANTS.len());
        for descriptor in &VARIANTS {
            let previous = map.insert(descriptor.tag, descriptor);
            debug_assert!(previous.is_none(), "duplicate tag `{}`", descriptor.tag);
        }
        map
    })
}

/// Look up the descriptor for a wire tag.
///
/// # Errors
///
/// [`ProtocolError::UnknownPacket`] when no variant registers the tag.
pub fn resolve(tag: &str) -> Result<&'static VariantDescriptor> {
    table()
        .get(tag)
        .copied()
        .ok_or_else(|| ProtocolError::UnknownPacket(tag.to_string()))
}

/// Every registered descriptor, in registration order.
pub fn variants() -> &'static [VariantDescriptor] {
    &VARIANTS
}
