//! Compile-time configuration shared by the protocol modules.
//! These mirror the constants a deployment would tune per vehicle platform:
//! timing windows for simulated button presses and gestures, transport
//! queue sizing, and the logical steering-wheel button masks.

/// Depth of both frame transport queues (raw intake and deferred log).
pub const FRAME_QUEUE_DEPTH: usize = 32;

/// How long a simulated button stays pressed before the release frame.
pub const BUTTON_PRESS_DURATION_MS: u32 = 200;
/// Gap between the two frames of the gong chime.
pub const GONG_INTERVAL_MS: u32 = 150;
/// Short tap on the traction-control button (partial disable).
pub const TRACTION_TAP_MS: u32 = 80;
/// Long hold on the traction-control button (complete disable).
pub const TRACTION_HOLD_MS: u32 = 1000;
/// Delay between the press/release steps of seat-heater level cycling.
pub const HEATER_STEP_INTERVAL_MS: u32 = 200;

/// Hold time after which a press counts as a long press.
pub const LONG_PRESS_THRESHOLD_MS: u32 = 800;
/// Window after the first release in which a second press counts as a
/// double press.
pub const DOUBLE_PRESS_WINDOW_MS: u32 = 400;

/// RPM above which the engine is considered running by the derived
/// ignition and engine-running accessors.
pub const RPM_RUNNING_THRESHOLD: u16 = 400;

//==================================================================================STEERING_BUTTONS
// Logical steering-wheel button masks, OR-able for combined queries.
pub const STEERING_BTN_VOLUME_UP: u8 = 0b1000_0000;
pub const STEERING_BTN_VOLUME_DOWN: u8 = 0b0100_0000;
pub const STEERING_BTN_SIRI: u8 = 0b0010_0000;
pub const STEERING_BTN_PHONE: u8 = 0b0001_0000;
pub const STEERING_BTN_CUSTOM: u8 = 0b0000_1000;
pub const STEERING_BTN_CHANNEL: u8 = 0b0000_0100;
pub const STEERING_BTN_PREV: u8 = 0b0000_0010;
pub const STEERING_BTN_NEXT: u8 = 0b0000_0001;
