/// Test doubles to simulate the CAN bus and the platform delay during
/// integration tests.
use canbridge::protocol::transport::{
    can_frame::CanFrame,
    traits::{can_bus::CanBus, delay::Delay},
};

#[derive(Default)]
#[allow(dead_code)]
/// In-memory CAN bus recording every transmitted frame in order.
pub struct MockBus {
    pub sent: Vec<CanFrame>,
    /// When set, every write is rejected.
    pub reject_writes: bool,
}

impl CanBus for MockBus {
    type Error = ();

    fn write(&mut self, frame: &CanFrame) -> Result<(), Self::Error> {
        if self.reject_writes {
            return Err(());
        }
        self.sent.push(*frame);
        Ok(())
    }
}

#[derive(Default)]
#[allow(dead_code)]
/// Delay double recording the requested sleep lengths instead of sleeping.
pub struct MockDelay {
    pub slept_ms: Vec<u32>,
}

impl Delay for MockDelay {
    fn delay_ms(&mut self, millis: u32) {
        self.slept_ms.push(millis);
    }
}
