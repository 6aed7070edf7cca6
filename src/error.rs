//! Error definitions shared across library modules.
//! Best-effort paths (frame decode, queue overflow) are deliberately
//! silent per the gateway's error policy; only control requests and the
//! console line codec surface typed errors.
use thiserror_no_std::Error;

#[derive(Error, Debug)]
/// Errors raised by the gateway's actuation surface.
pub enum ControlError<E: core::fmt::Debug> {
    /// CAN bus rejected the frame during transmission.
    #[error("CAN bus send error: {0:?}")]
    Send(E),

    /// Seat-heater level must stay in the 0..=3 range.
    #[error("Seat heater level out of range: {level}")]
    InvalidHeaterLevel { level: u8 },
}

#[derive(Error, Debug, PartialEq, Eq)]
/// Failures while parsing a raw `IDH:DATA` console line.
/// Callers in the core discard these silently; the variants exist so a
/// diagnostics console can report why a line was dropped.
pub enum LineParseError {
    /// The colon separator is missing or not at byte offset 3.
    #[error("Separator ':' missing or misplaced")]
    MisplacedSeparator,

    /// A character outside `[0-9a-fA-F]` appeared in the identifier or data.
    #[error("Illegal hex digit: {digit}")]
    IllegalHexDigit { digit: u8 },

    /// The parsed identifier does not fit the 11-bit standard range.
    #[error("Identifier out of standard range: {id:#x}")]
    IdOutOfRange { id: u16 },
}
