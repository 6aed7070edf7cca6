//! Contracts the core expects from its external collaborators.

/// Transmit contract toward the transceiver driver.
pub mod can_bus;
/// Blocking millisecond delay for the one bounded synchronous sequence.
pub mod delay;
