//! Codec for the raw frame-injection console protocol: one line of text
//! `IDH:DATA` where `IDH` is exactly three hex digits and `DATA` is 0 to 16
//! hex digits with no separators. Malformed lines are reported as errors
//! here and discarded silently by the callers in the core.
use crate::error::LineParseError;
use crate::protocol::transport::can_frame::CanFrame;
use embedded_can::StandardId;

/// Byte offset at which the `:` separator must sit (after three ID digits).
const SEPARATOR_OFFSET: usize = 3;
/// At most eight payload bytes, sixteen hex digits.
const MAX_DATA_DIGITS: usize = 16;

/// Convert one ASCII hex digit to its value.
fn hex_nibble(digit: u8) -> Result<u8, LineParseError> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(LineParseError::IllegalHexDigit { digit }),
    }
}

/// Parse a console line into a CAN frame.
///
/// The identifier field is three hex digits (12 bits on the wire); values
/// above the 11-bit standard range are rejected since this protocol never
/// uses them. Data digits are consumed in pairs; a trailing odd digit and
/// digits beyond the sixteenth are ignored, matching the console's
/// best-effort contract.
pub fn parse_line(line: &[u8]) -> Result<CanFrame, LineParseError> {
    if line.len() < SEPARATOR_OFFSET + 1 || line[SEPARATOR_OFFSET] != b':' {
        return Err(LineParseError::MisplacedSeparator);
    }

    let mut raw_id: u16 = 0;
    for &digit in &line[..SEPARATOR_OFFSET] {
        raw_id = (raw_id << 4) | u16::from(hex_nibble(digit)?);
    }
    let id = StandardId::new(raw_id).ok_or(LineParseError::IdOutOfRange { id: raw_id })?;

    let digits = &line[SEPARATOR_OFFSET + 1..];
    let digits = &digits[..digits.len().min(MAX_DATA_DIGITS)];

    let mut data = [0u8; 8];
    let mut len = 0;
    for pair in digits.chunks_exact(2) {
        data[len] = (hex_nibble(pair[0])? << 4) | hex_nibble(pair[1])?;
        len += 1;
    }

    Ok(CanFrame { id, data, len })
}
