//! Blocking delay abstraction. Only the bounded seat-heater level cycling
//! uses it; every other timed behavior runs off the tick counter.

/// Platform delay provider.
pub trait Delay {
    /// Busy-wait or sleep for `millis` milliseconds.
    fn delay_ms(&mut self, millis: u32);
}
