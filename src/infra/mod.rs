//! Infrastructure primitives shared between interrupt and application
//! context: the lock-free frame transport queue and the console hex codec.

/// Hex-line codec for the raw frame-injection console protocol.
pub mod hex;
/// Lock-free single-producer/single-consumer ring buffer.
pub mod spsc;
