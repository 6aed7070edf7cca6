//! In-memory representation of a classic 11-bit CAN frame as exchanged
//! with the transceiver driver.
use embedded_can::StandardId;

/// Build a compile-time-validated standard identifier.
/// Panics at const-evaluation time when `raw` exceeds the 11-bit range.
pub const fn std_id(raw: u16) -> StandardId {
    match StandardId::new(raw) {
        Some(id) => id,
        None => panic!("identifier outside the 11-bit standard range"),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Raw CAN frame as read from or written to the bus. Immutable value type,
/// constructed fresh per frame.
pub struct CanFrame {
    /// 11-bit standard identifier.
    pub id: StandardId,
    /// Payload buffer. Classic CAN frames always provide eight byte slots.
    pub data: [u8; 8],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: usize,
}

impl CanFrame {
    /// Build a frame from an identifier and up to eight payload bytes.
    /// Extra bytes beyond the eighth are ignored.
    pub fn new(id: StandardId, bytes: &[u8]) -> Self {
        let mut data = [0u8; 8];
        let len = bytes.len().min(8);
        data[..len].copy_from_slice(&bytes[..len]);
        Self { id, data, len }
    }

    /// The meaningful slice of the payload.
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A frame paired with its arrival timestamp, copied whole into the
/// deferred-log queue so it survives past interrupt return.
pub struct LogEntry {
    pub frame: CanFrame,
    pub timestamp_ms: u32,
}
