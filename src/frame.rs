//! Packet frame: the outer envelope of every wire packet.
//!
//! A frame is ASCII text of the shape
//!
//! ```text
//! <TAG>field_1;field_2;...;field_n;CCCC</TAG>
//! ```
//!
//! where `TAG` is 1–3 ASCII letters (case-significant) repeated in the
//! closing marker, fields are `;`-separated, and `CCCC` is the 4-hex-digit
//! checksum over `field_1;...;field_n;` — every field followed by the
//! separator, trailing one included. A packet with no fields still frames
//! as `<TAG>;CCCC</TAG>`.
//!
//! Parsing validates the envelope only; checksum verification and field
//! decoding are the caller's next steps, in that order.

use crate::checksum::{self, CHECKSUM_WIDTH};
use crate::error::{ProtocolError, Result};

/// Separator between ordered fields inside a frame.
pub const FIELD_SEPARATOR: char = ';';

/// Maximum tag length in ASCII letters.
pub const MAX_TAG_LEN: usize = 3;

/// A parsed frame envelope, borrowing from the input text.
///
/// Holds the tag, the checksum payload (fields with their trailing
/// separators) and the received checksum. Field splitting is deferred so
/// corrupt payloads are rejected by the checksum before any field text is
/// examined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame<'a> {
    /// Frame tag, as it appeared between the angle brackets.
    pub tag: &'a str,
    /// Fields with their trailing separators; exactly the checksum input.
    pub payload: &'a str,
    /// Received checksum field (4 hex characters).
    pub checksum: &'a str,
}

impl<'a> RawFrame<'a> {
    /// Parse a frame envelope out of wire text.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Frame`] for any envelope violation:
    /// missing or mismatched tags, an interior too short to hold a
    /// checksum, a checksum of the wrong width or alphabet, or a payload
    /// that does not end with the field separator.
    pub fn parse(text: &'a str) -> Result<Self> {
        if !text.is_ascii() {
            return Err(ProtocolError::Frame("frame is not ASCII".into()));
        }

        let rest = text
            .strip_prefix('<')
            .ok_or_else(|| ProtocolError::Frame("missing opening tag".into()))?;
        let (tag, rest) = rest
            .split_once('>')
            .ok_or_else(|| ProtocolError::Frame("unterminated opening tag".into()))?;

        if tag.is_empty() || tag.len() > MAX_TAG_LEN || !tag.bytes().all(|b| b.is_ascii_alphabetic())
        {
            return Err(ProtocolError::Frame(format!(
                "invalid tag `{tag}`, expected 1-{MAX_TAG_LEN} ASCII letters"
            )));
        }

        let closing = format!("</{tag}>");
        let interior = rest.strip_suffix(closing.as_str()).ok_or_else(|| {
            ProtocolError::Frame(format!("frame should be <{tag}>...{closing}"))
        })?;

        // Shortest legal interior: a bare separator plus the checksum.
        if interior.len() < 1 + CHECKSUM_WIDTH {
            return Err(ProtocolError::Frame("frame interior too short".into()));
        }

        let (payload, received) = interior.split_at(interior.len() - CHECKSUM_WIDTH);
        if !received.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ProtocolError::Frame(format!(
                "checksum `{received}` is not {CHECKSUM_WIDTH} hex digits"
            )));
        }
        if !payload.ends_with(FIELD_SEPARATOR) {
            return Err(ProtocolError::Frame(
                "payload must end with the field separator".into(),
            ));
        }

        Ok(Self {
            tag,
            payload,
            checksum: received,
        })
    }

    /// Recompute the checksum over the payload and compare it with the
    /// received one.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Checksum`] on mismatch.
    #[inline]
    pub fn verify_checksum(&self) -> Result<()> {
        checksum::verify(self.payload, self.checksum)
    }

    /// The payload without its trailing separator.
    #[inline]
    pub fn body(&self) -> &'a str {
        &self.payload[..self.payload.len() - 1]
    }

    /// Split the body into ordered fields.
    ///
    /// An empty body yields zero fields, matching the `<TAG>;CCCC</TAG>`
    /// framing of field-less packets.
    pub fn fields(&self) -> Vec<&'a str> {
        let body = self.body();
        if body.is_empty() {
            Vec::new()
        } else {
            body.split(FIELD_SEPARATOR).collect()
        }
    }
}

/// Assemble a frame from a tag and its ordered, already-encoded fields.
///
/// The checksum is always computed here; callers never supply one.
pub fn build(tag: &str, fields: &[String]) -> String {
    debug_assert!(
        !tag.is_empty() && tag.len() <= MAX_TAG_LEN && tag.bytes().all(|b| b.is_ascii_alphabetic()),
        "invalid tag `{tag}`"
    );

    let mut payload = String::new();
    for field in fields {
        payload.push_str(field);
        payload.push(FIELD_SEPARATOR);
    }
    if fields.is_empty() {
        payload.push(FIELD_SEPARATOR);
    }

    let crc = checksum::checksum(&payload);
    format!("<{tag}>{payload}{crc}</{tag}>")
}
