//! Non-blocking command sequencer: each armable action is a tagged variant
//! carrying its own timing state, polled once per control-loop tick and
//! removed from the active set the moment it completes. Arming and
//! completion are decoupled across ticks, so the caller's thread is never
//! blocked.
use crate::config::{
    BUTTON_PRESS_DURATION_MS, GONG_INTERVAL_MS, HEATER_STEP_INTERVAL_MS, TRACTION_HOLD_MS,
    TRACTION_TAP_MS,
};
use crate::protocol::transport::can_frame::{std_id, CanFrame};
use crate::protocol::transport::traits::{can_bus::CanBus, delay::Delay};
use heapless::Vec;

/// Upper bound on concurrently active command kinds.
const MAX_ACTIVE_COMMANDS: usize = 8;

const ID_DOME_LIGHT: u16 = 0x1E3;
const ID_SEAT_HEATER: u16 = 0x1E7;
const ID_TRACTION: u16 = 0x316;
const ID_GONG: u16 = 0x24B;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Closed set of armable press/release actions. Variant kind, not payload,
/// identifies a command for de-duplication.
pub enum CommandKind {
    DomeLightToggle,
    SeatHeaterToggle { on: bool },
    /// `hold` keeps the button pressed long enough to disable traction
    /// control completely instead of tapping it.
    TractionToggle { hold: bool },
    Gong,
}

impl CommandKind {
    fn press_frame(&self) -> CanFrame {
        match self {
            Self::DomeLightToggle => CanFrame::new(std_id(ID_DOME_LIGHT), &[0xF1, 0xFF]),
            Self::SeatHeaterToggle { on } => {
                CanFrame::new(std_id(ID_SEAT_HEATER), &[if *on { 0xD0 } else { 0xC0 }])
            }
            Self::TractionToggle { .. } => CanFrame::new(std_id(ID_TRACTION), &[0xFD, 0xFF]),
            Self::Gong => CanFrame::new(std_id(ID_GONG), &[0x01, 0xF8]),
        }
    }

    fn release_frame(&self) -> CanFrame {
        match self {
            Self::DomeLightToggle => CanFrame::new(std_id(ID_DOME_LIGHT), &[0xF0, 0xFF]),
            Self::SeatHeaterToggle { .. } => CanFrame::new(std_id(ID_SEAT_HEATER), &[0xC0]),
            Self::TractionToggle { .. } => CanFrame::new(std_id(ID_TRACTION), &[0xFC, 0xFF]),
            Self::Gong => CanFrame::new(std_id(ID_GONG), &[0x00, 0xF8]),
        }
    }

    /// How long the simulated button stays pressed.
    fn duration_ms(&self) -> u32 {
        match self {
            Self::DomeLightToggle | Self::SeatHeaterToggle { .. } => BUTTON_PRESS_DURATION_MS,
            Self::TractionToggle { hold } => {
                if *hold {
                    TRACTION_HOLD_MS
                } else {
                    TRACTION_TAP_MS
                }
            }
            Self::Gong => GONG_INTERVAL_MS,
        }
    }

    fn same_kind(&self, other: &Self) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }
}

#[derive(Debug)]
/// One armed action plus the state its step function needs.
struct PendingCommand {
    kind: CommandKind,
    pending: bool,
    active: bool,
    started_at_ms: u32,
}

#[derive(Debug, Default)]
/// Collection of independently-scheduled command executions. Iteration is
/// insertion order, but entries are independent and must not rely on it.
pub struct CommandSet {
    entries: Vec<PendingCommand, MAX_ACTIVE_COMMANDS>,
}

impl CommandSet {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Arm an action. Re-arming a kind that is already scheduled restarts
    /// its timing instead of creating a second concurrent instance.
    pub fn arm(&mut self, kind: CommandKind) {
        #[cfg(feature = "defmt")]
        defmt::debug!("arming command");

        if let Some(entry) = self.entries.iter_mut().find(|e| e.kind.same_kind(&kind)) {
            entry.kind = kind;
            entry.pending = true;
            return;
        }
        // The set is bounded by the number of kinds, so this cannot fail
        // while MAX_ACTIVE_COMMANDS covers the enum.
        let _ = self.entries.push(PendingCommand {
            kind,
            pending: true,
            active: false,
            started_at_ms: 0,
        });
    }

    /// Number of scheduled entries (pending or mid-sequence).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advance every scheduled command by one tick. Completed entries are
    /// removed immediately; send failures are absorbed, actuation is
    /// best-effort.
    pub fn tick<B: CanBus>(&mut self, now_ms: u32, bus: &mut B) {
        self.entries.retain_mut(|entry| {
            if entry.pending {
                entry.pending = false;
                entry.active = true;
                entry.started_at_ms = now_ms;
                if bus.write(&entry.kind.press_frame()).is_err() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("press frame rejected by bus");
                }
            }

            if !entry.active {
                return false;
            }

            if now_ms.wrapping_sub(entry.started_at_ms) >= entry.kind.duration_ms() {
                if bus.write(&entry.kind.release_frame()).is_err() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("release frame rejected by bus");
                }
                entry.active = false;
                return false;
            }

            true
        });
    }
}

//==================================================================================SEAT_HEATER_LEVEL
/// Forward-only level cycle of the seat-heater button: 0 -> 3 -> 2 -> 1 -> 0.
const HEATER_CYCLE: [u8; 4] = [0, 3, 2, 1];

/// Number of button presses needed to cycle from `current` to `target`.
/// Both levels must already be validated to the 0..=3 range.
pub(crate) fn heater_steps(current: u8, target: u8) -> u8 {
    let position = |level: u8| {
        HEATER_CYCLE
            .iter()
            .position(|&l| l == level)
            .unwrap_or(0) as u8
    };
    (position(target) + 4 - position(current)) % 4
}

/// Issue `steps` immediate press/release pairs on the seat-heater button.
/// This is the one deliberately blocking path in the core, bounded by at
/// most three steps; it must never run in interrupt context.
pub(crate) fn step_seat_heater<B: CanBus, D: Delay>(
    bus: &mut B,
    delay: &mut D,
    steps: u8,
) -> Result<(), B::Error> {
    let press = CommandKind::SeatHeaterToggle { on: true }.press_frame();
    let release = CommandKind::SeatHeaterToggle { on: true }.release_frame();

    for _ in 0..steps {
        bus.write(&press)?;
        delay.delay_ms(BUTTON_PRESS_DURATION_MS);
        bus.write(&release)?;
        delay.delay_ms(HEATER_STEP_INTERVAL_MS);
    }
    Ok(())
}
