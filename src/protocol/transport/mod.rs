//! CAN transport layer: the in-memory frame representation and the traits
//! the core needs from its external collaborators.

/// In-memory CAN frame and deferred-log entry types.
pub mod can_frame;
/// Abstractions over the transceiver driver and the platform delay.
pub mod traits;
