//! Gateway assembling the protocol components behind one tick-driven API.
//!
//! The gateway owns the bus handle, the codec snapshots, the command
//! sequencer, and the gesture recognizer. Interrupt context stays out of
//! all of them: the receive interrupt pushes raw frames into the intake
//! ring, and `tick` drains that ring in application context, decodes, logs,
//! reacts to gestures, and advances the sequencer. Everything in `tick` is
//! non-blocking; the one bounded blocking path is the explicit seat-heater
//! level request.
use crate::config::{FRAME_QUEUE_DEPTH, STEERING_BTN_CUSTOM};
use crate::error::ControlError;
use crate::infra::hex;
use crate::infra::spsc::{Consumer, Producer};
use crate::protocol::codec::{
    diagnostic_error_frame, fake_rpm_frame, reverse_light_spoof, window_command, VehicleCodec,
};
use crate::protocol::control::{heater_steps, step_seat_heater, CommandKind, CommandSet};
use crate::protocol::gesture::{GestureEvent, GestureRecognizer};
use crate::protocol::state::{WindowDirection, DRIVER_REAR, PASSENGER_REAR};
use crate::protocol::transport::can_frame::{CanFrame, LogEntry};
use crate::protocol::transport::traits::{can_bus::CanBus, delay::Delay};

/// Windows almost fully open snap to roll-up on the next toggle.
const WINDOW_NEARLY_OPEN: u8 = 230;
/// Windows almost fully closed snap to roll-down on the next toggle.
const WINDOW_NEARLY_CLOSED: u8 = 25;

//==================================================================================GATEWAY
/// Tick-driven vehicle gateway core.
///
/// Construction wires the two ring endpoints: the intake [`Consumer`] whose
/// matching producer lives with the receive interrupt, and the deferred-log
/// [`Producer`] whose matching consumer belongs to whatever drains the log
/// (serial console, storage, nothing at all).
pub struct Gateway<'a, B: CanBus> {
    bus: B,
    intake: Consumer<'a, CanFrame, FRAME_QUEUE_DEPTH>,
    log_tx: Producer<'a, LogEntry, FRAME_QUEUE_DEPTH>,
    codec: VehicleCodec,
    commands: CommandSet,
    custom_button: GestureRecognizer,
    last_window_action: WindowDirection,
    heater_level: u8,
}

impl<'a, B: CanBus> Gateway<'a, B> {
    pub fn new(
        bus: B,
        intake: Consumer<'a, CanFrame, FRAME_QUEUE_DEPTH>,
        log_tx: Producer<'a, LogEntry, FRAME_QUEUE_DEPTH>,
    ) -> Self {
        Self {
            bus,
            intake,
            log_tx,
            codec: VehicleCodec::new(),
            commands: CommandSet::new(),
            custom_button: GestureRecognizer::new(),
            // First toggle on an ambiguous mid-travel window rolls down.
            last_window_action: WindowDirection::RollUp,
            heater_level: 0,
        }
    }

    /// Read access to the decoded vehicle and climate state.
    pub fn state(&self) -> &VehicleCodec {
        &self.codec
    }

    /// Access to the underlying bus handle, e.g. for driver maintenance.
    pub fn bus(&mut self) -> &mut B {
        &mut self.bus
    }

    /// One iteration of the cooperative control loop. Drains the intake
    /// ring, updates the gesture recognizer from the decoded button state,
    /// and advances the command sequencer. Never blocks.
    pub fn tick(&mut self, now_ms: u32) {
        while let Some(frame) = self.intake.get() {
            self.codec.decode(&frame);
            if !self.log_tx.put(LogEntry {
                frame,
                timestamp_ms: now_ms,
            }) {
                #[cfg(feature = "defmt")]
                defmt::trace!("log queue full, entry dropped");
            }
        }

        let pressed = self.codec.steering_button_pressed(STEERING_BTN_CUSTOM);
        if let Some(event) = self.custom_button.update(pressed, now_ms) {
            self.on_gesture(event);
        }

        self.commands.tick(now_ms, &mut self.bus);
    }

    fn on_gesture(&mut self, event: GestureEvent) {
        match event {
            GestureEvent::SinglePress => self.commands.arm(CommandKind::Gong),
            GestureEvent::DoublePress => self.toggle_rear_windows(),
            // Reserved for a future binding; recognized but unmapped.
            GestureEvent::LongPress => {}
        }
    }

    /// Move both rear windows together, choosing the direction from the
    /// passenger-rear travel: snap near the end stops, alternate in between.
    fn toggle_rear_windows(&mut self) {
        let position = self.codec.window_position(PASSENGER_REAR);
        let direction = if position > WINDOW_NEARLY_OPEN {
            WindowDirection::RollUp
        } else if position < WINDOW_NEARLY_CLOSED {
            WindowDirection::RollDown
        } else {
            match self.last_window_action {
                WindowDirection::RollUp => WindowDirection::RollDown,
                _ => WindowDirection::RollUp,
            }
        };
        self.last_window_action = direction;

        let frame = window_command(PASSENGER_REAR | DRIVER_REAR, direction);
        if self.bus.write(&frame).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("rear window frame rejected by bus");
        }
    }

    //==============================================================================CONTROL_SURFACE
    /// Actuate the windows selected by `mask` in `direction`.
    pub fn set_window(
        &mut self,
        mask: u8,
        direction: WindowDirection,
    ) -> Result<(), ControlError<B::Error>> {
        self.last_window_action = direction;
        self.bus
            .write(&window_command(mask, direction))
            .map_err(ControlError::Send)
    }

    /// Toggle the dome light toward the desired state. When the observed
    /// brightness already matches, nothing is sent.
    pub fn set_dome_light(&mut self, on: bool) -> Result<(), ControlError<B::Error>> {
        let currently_on = self.codec.dome_light_brightness() > 50;
        if currently_on == on {
            return Ok(());
        }
        self.commands.arm(CommandKind::DomeLightToggle);
        Ok(())
    }

    /// Simulate one press of the seat-heater button.
    pub fn set_seat_heater(&mut self, on: bool) -> Result<(), ControlError<B::Error>> {
        self.commands.arm(CommandKind::SeatHeaterToggle { on });
        Ok(())
    }

    /// Drive the seat heater to an absolute level by cycling the button
    /// through 0 -> 3 -> 2 -> 1 -> 0. Blocks for up to three press/release
    /// pairs; must not be called from interrupt context.
    pub fn set_seat_heater_level<D: Delay>(
        &mut self,
        level: u8,
        delay: &mut D,
    ) -> Result<(), ControlError<B::Error>> {
        if level > 3 {
            return Err(ControlError::InvalidHeaterLevel { level });
        }
        let steps = heater_steps(self.heater_level, level);
        step_seat_heater(&mut self.bus, delay, steps).map_err(ControlError::Send)?;
        self.heater_level = level;
        Ok(())
    }

    /// Toggle traction control: a tap for the partial mode, a long hold for
    /// the complete disable.
    pub fn toggle_traction_control(&mut self, hold: bool) -> Result<(), ControlError<B::Error>> {
        self.commands.arm(CommandKind::TractionToggle { hold });
        Ok(())
    }

    /// Sound the gong chime once.
    pub fn play_gong(&mut self) -> Result<(), ControlError<B::Error>> {
        self.commands.arm(CommandKind::Gong);
        Ok(())
    }

    /// Inject a synthetic RPM reading for gauge testing.
    pub fn send_fake_rpm(&mut self, rpm: u16) -> Result<(), ControlError<B::Error>> {
        self.bus
            .write(&fake_rpm_frame(rpm))
            .map_err(ControlError::Send)
    }

    /// Light the reverse lamps without engaging reverse gear.
    pub fn spoof_reverse_lights(&mut self) -> Result<(), ControlError<B::Error>> {
        self.bus
            .write(&reverse_light_spoof())
            .map_err(ControlError::Send)
    }

    /// Raise a diagnostic error code on the instrument cluster.
    pub fn send_diagnostic_error(&mut self, code: u16) -> Result<(), ControlError<B::Error>> {
        self.bus
            .write(&diagnostic_error_frame(code))
            .map_err(ControlError::Send)
    }

    /// Transmit a raw frame parsed from a console line. Malformed lines
    /// are discarded without error; bus failures still surface.
    pub fn inject_console_line(&mut self, line: &[u8]) -> Result<(), ControlError<B::Error>> {
        match hex::parse_line(line) {
            Ok(frame) => self.bus.write(&frame).map_err(ControlError::Send),
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("malformed console line discarded");
                Ok(())
            }
        }
    }
}
