//! Minimal abstraction over the CAN transceiver driver. Allows the core to
//! plug into various implementations (MCP2515 over SPI, socketcan on a
//! desktop, an in-memory double in tests).
//!
//! Receive is deliberately absent from this contract: the driver's
//! interrupt handler reads the hardware itself and pushes raw frames into
//! the intake ring; decode never runs in interrupt context.
use crate::protocol::transport::can_frame::CanFrame;

/// Contract to transmit CAN frames. Implementations must not block the
/// control loop beyond the driver's own mailbox latency.
pub trait CanBus {
    type Error: core::fmt::Debug;

    /// Emit a frame on the bus. No retry is attempted by the core; the
    /// error is propagated to the immediate caller and absorbed there.
    fn write(&mut self, frame: &CanFrame) -> Result<(), Self::Error>;
}
