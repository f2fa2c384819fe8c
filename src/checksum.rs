//! Checksum engine.
//!
//! Every frame carries a trailing 4-hex-digit checksum computed over the
//! field payload: the ordered fields, each followed by the `;` separator,
//! and nothing else. The tag is *not* covered — `<Ts>` and `<Te>` frames
//! with identical fields carry identical checksums.
//!
//! The algorithm is CRC-16/IBM-SDLC (X-25): polynomial 0x1021 reflected,
//! initial value 0xFFFF, final XOR 0xFFFF. It was pinned empirically
//! against known-good wire captures rather than assumed; the vectors live
//! in the tests below.
//!
//! # Example
//!
//! ```
//! use trackwire::checksum;
//!
//! let crc = checksum::checksum("1735689600;123e4567-e89b-12d3-a456-426614174000;");
//! assert_eq!(crc, "696E");
//! ```

use crc::{Crc, CRC_16_IBM_SDLC};

use crate::error::{ProtocolError, Result};

/// Checksum width on the wire: 4 hex characters.
pub const CHECKSUM_WIDTH: usize = 4;

const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_SDLC);

/// Compute the checksum over the exact bytes of a field payload.
#[inline]
pub fn checksum_value(payload: &str) -> u16 {
    CRC16.checksum(payload.as_bytes())
}

/// Compute the checksum and render it as 4 uppercase hex digits,
/// zero-padded.
#[inline]
pub fn checksum(payload: &str) -> String {
    format!("{:04X}", checksum_value(payload))
}

/// Verify a received checksum against the payload it claims to cover.
///
/// The comparison is case-sensitive: a lowercase checksum never matches,
/// even when it denotes the right value.
///
/// # Errors
///
/// Returns [`ProtocolError::Checksum`] on any mismatch.
pub fn verify(payload: &str, received: &str) -> Result<()> {
    let calculated = checksum(payload);
    if calculated != received {
        return Err(ProtocolError::Checksum {
            calculated,
            received: received.to_string(),
        });
    }
    Ok(())
}
