//! Vehicle protocol implementation: CAN transport types, the frame codec
//! with its owned state snapshots, the non-blocking command sequencer, and
//! the button gesture recognizer.

/// Frame codec: decode table, derived accessors, and encode builders.
pub mod codec;
/// Non-blocking multi-frame command sequencer.
pub mod control;
/// Finite state machine turning a sampled button signal into gestures.
pub mod gesture;
/// Typed vehicle and climate state snapshots.
pub mod state;
/// CAN transport: frame type, bus and delay abstractions.
pub mod transport;
