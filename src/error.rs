//! Error types for trackwire.

use thiserror::Error;

/// Main error type for all encode/decode operations.
///
/// Decoding validates in a fixed order — frame, checksum, tag, fields —
/// and reports the earliest stage that rejects the input. Nothing is
/// retried and no partial packet is ever produced.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Malformed envelope: missing or mismatched tags, empty frame,
    /// wrong checksum width, wrong field count.
    #[error("malformed frame: {0}")]
    Frame(String),

    /// The checksum recomputed over the received payload disagrees with
    /// the received checksum field. Comparison is case-sensitive.
    #[error("checksum mismatch: calculated {calculated}, received {received}")]
    Checksum {
        /// Checksum recomputed over the received payload.
        calculated: String,
        /// Checksum field as it appeared on the wire.
        received: String,
    },

    /// The frame tag is not present in the packet registry.
    #[error("unknown packet tag: {0}")]
    UnknownPacket(String),

    /// A field's text does not match its codec's grammar.
    #[error("invalid field `{field}`: {reason}")]
    FieldDecode {
        /// Name of the offending field.
        field: &'static str,
        /// What the codec rejected.
        reason: String,
    },
}

impl ProtocolError {
    /// Shorthand for a [`ProtocolError::FieldDecode`].
    pub(crate) fn field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::FieldDecode {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type alias using ProtocolError.
pub type Result<T> = std::result::Result<T, ProtocolError>;
