//! Finite state machine turning a sampled boolean button signal into
//! single-press, double-press, and long-press events. The signal is
//! sampled once per control-loop tick; edges are detected against the
//! previous tick's value, and every timeout uses wrapping elapsed-time
//! arithmetic on the millisecond tick counter.
use crate::config::{DOUBLE_PRESS_WINDOW_MS, LONG_PRESS_THRESHOLD_MS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Recognizer state. Reset to `Idle` after every completed or timed-out
/// gesture.
pub enum GestureState {
    Idle,
    FirstPressDown,
    WaitingForSecondPress,
    SecondPressDown,
    LongPressActive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Completed gesture, emitted exactly once per recognition.
pub enum GestureEvent {
    SinglePress,
    DoublePress,
    LongPress,
}

#[derive(Debug)]
/// One recognizer instance per gesture source.
pub struct GestureRecognizer {
    state: GestureState,
    press_start_ms: u32,
    first_release_ms: u32,
    last_pressed: bool,
}

impl GestureRecognizer {
    pub const fn new() -> Self {
        Self {
            state: GestureState::Idle,
            press_start_ms: 0,
            first_release_ms: 0,
            last_pressed: false,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Feed one sample of the button signal. Returns the gesture completed
    /// at this tick, if any.
    pub fn update(&mut self, pressed: bool, now_ms: u32) -> Option<GestureEvent> {
        let rising = pressed && !self.last_pressed;
        let mut event = None;

        match self.state {
            GestureState::Idle => {
                if rising {
                    self.state = GestureState::FirstPressDown;
                    self.press_start_ms = now_ms;
                }
            }

            GestureState::FirstPressDown => {
                if !pressed {
                    self.state = GestureState::WaitingForSecondPress;
                    self.first_release_ms = now_ms;
                } else if now_ms.wrapping_sub(self.press_start_ms) >= LONG_PRESS_THRESHOLD_MS {
                    self.state = GestureState::LongPressActive;
                    event = Some(GestureEvent::LongPress);
                }
            }

            GestureState::WaitingForSecondPress => {
                if rising {
                    self.state = GestureState::SecondPressDown;
                } else if now_ms.wrapping_sub(self.first_release_ms) >= DOUBLE_PRESS_WINDOW_MS {
                    // Window elapsed with no second press: it was a single.
                    event = Some(GestureEvent::SinglePress);
                    self.state = GestureState::Idle;
                }
            }

            GestureState::SecondPressDown => {
                if !pressed {
                    event = Some(GestureEvent::DoublePress);
                    self.state = GestureState::Idle;
                }
            }

            GestureState::LongPressActive => {
                if !pressed {
                    self.state = GestureState::Idle;
                }
            }
        }

        self.last_pressed = pressed;

        #[cfg(feature = "defmt")]
        if event.is_some() {
            defmt::info!("gesture recognized");
        }

        event
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new()
    }
}
