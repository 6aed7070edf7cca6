//! Stateful frame codec: maps CAN identifiers to vehicle-state field
//! updates, exposes derived read accessors, and builds the fixed-shape
//! frames for the control surface. Decode is best-effort: unknown
//! identifiers are ignored and short payloads update only the fields whose
//! bytes are present.
use crate::config::{
    RPM_RUNNING_THRESHOLD, STEERING_BTN_CHANNEL, STEERING_BTN_CUSTOM, STEERING_BTN_NEXT,
    STEERING_BTN_PHONE, STEERING_BTN_PREV, STEERING_BTN_SIRI, STEERING_BTN_VOLUME_DOWN,
    STEERING_BTN_VOLUME_UP,
};
use crate::protocol::state::{
    ClimateState, GearPosition, IgnitionStatus, KeyState, VehicleState, WindowDirection,
    BLOWER_AUTO, BLOWER_CENTER, BLOWER_FOOTWELL, BLOWER_WINDSHIELD, DRIVER_FRONT, DRIVER_REAR,
    PASSENGER_FRONT, PASSENGER_REAR,
};
use crate::protocol::transport::can_frame::{std_id, CanFrame};

//==================================================================================IDENTIFIERS
const ID_BRAKE_TORQUE: u16 = 0x0A8;
const ID_RPM_THROTTLE: u16 = 0x0AA;
const ID_STEERING_ANGLE: u16 = 0x0C8;
const ID_CENTRAL_LOCK: u16 = 0x0E2;
const ID_DOOR_AJAR: u16 = 0x0E6;
const ID_RESERVED_0EA: u16 = 0x0EA;
const ID_RESERVED_0EE: u16 = 0x0EE;
const ID_MIRRORS: u16 = 0x0F6;
const ID_WINDOW_CONTROL: u16 = 0x0FA;
const ID_KEY_STATE: u16 = 0x130;
const ID_SPEED: u16 = 0x1A1;
const ID_PARKING_BRAKE: u16 = 0x1B4;
const ID_ENGINE_TEMP: u16 = 0x1D0;
const ID_STEERING_BUTTONS: u16 = 0x1D6;
const ID_DRIVER_DOOR: u16 = 0x1E1;
const ID_AC_STATUS: u16 = 0x242;
const ID_DOME_BRIGHTNESS: u16 = 0x286;
const ID_BRAKE_STATUS: u16 = 0x2B2;
const ID_BLOWER_FAN: u16 = 0x2E6;
const ID_PASSENGER_TEMP: u16 = 0x2EA;
const ID_SEAT_BELT: u16 = 0x2F1;
const ID_DOOR_STATES: u16 = 0x2FC;
const ID_GEAR_REVERSE_SPOOF: u16 = 0x304;
const ID_ODO_FUEL_RANGE: u16 = 0x330;
const ID_DIAG_ERROR: u16 = 0x338;
const ID_BATTERY_ENGINE: u16 = 0x3B4;
const ID_WINDOW_POS_DRIVER_FRONT: u16 = 0x3B6;
const ID_WINDOW_POS_DRIVER_REAR: u16 = 0x3B7;
const ID_WINDOW_POS_PASSENGER_FRONT: u16 = 0x3B8;
const ID_WINDOW_POS_PASSENGER_REAR: u16 = 0x3B9;

/// Kickdown marker in byte 6 of the RPM/throttle frame.
const KICKDOWN_MARKER: u8 = 0xB4;
/// Throttle value reserved for kickdown.
const THROTTLE_KICKDOWN: u8 = 255;
/// Conversion constant between RPM x Nm and kW.
const POWER_DIVISOR: f32 = 9549.296_585_5;

//==================================================================================HELPERS
fn low_nibble(byte: u8) -> u8 {
    byte & 0x0F
}

fn high_nibble(byte: u8) -> u8 {
    (byte >> 4) & 0x0F
}

fn bit(byte: u8, pos: u8) -> bool {
    byte & (1 << pos) != 0
}

/// Window travel rescaled from the raw 0x00-0x50 range to 0-255.
fn scale_window(raw: u8) -> u8 {
    (u16::from(raw.min(0x50)) * 255 / 0x50) as u8
}

/// Cabin temperature from the raw 0x20-0x38 dial range to 16-28 degrees C.
/// Values outside the dial range leave the previous reading in place.
fn scale_cabin_temp(raw: u8) -> Option<i8> {
    if (0x20..=0x38).contains(&raw) {
        Some((16 + (u16::from(raw) - 0x20) * 11 / 24) as i8)
    } else {
        None
    }
}

//==================================================================================CODEC
/// Decoder/encoder owning the authoritative vehicle and climate snapshots.
/// Decode runs in application-loop context only; interrupt context pushes
/// raw frames into the intake ring instead.
#[derive(Debug, Default)]
pub struct VehicleCodec {
    vehicle: VehicleState,
    climate: ClimateState,
}

impl VehicleCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one frame's decode rule to the owned snapshots. Best-effort:
    /// never fails loudly.
    pub fn decode(&mut self, frame: &CanFrame) {
        let data = frame.payload();
        if data.is_empty() {
            return;
        }

        match frame.id.as_raw() {
            ID_BRAKE_TORQUE => {
                if data.len() > 1 {
                    self.vehicle.braking = high_nibble(data[1]) == 6;
                }
                if data.len() > 2 {
                    let raw = i16::from_le_bytes([data[1], data[2]]);
                    self.vehicle.torque_nm = f32::from(raw) / 32.0;
                }
            }

            ID_RPM_THROTTLE => {
                if data.len() > 5 {
                    let raw = u16::from_le_bytes([data[4], data[5]]);
                    self.vehicle.engine_rpm = raw / 4;
                }
                if data.len() > 3 {
                    let raw = u16::from_le_bytes([data[2], data[3]]);
                    let kickdown = data.len() > 6 && data[6] == KICKDOWN_MARKER;
                    self.vehicle.throttle_position = if kickdown {
                        THROTTLE_KICKDOWN
                    } else if raw <= 255 {
                        // Foot off the pedal reports the idle floor.
                        0
                    } else {
                        let scaled = (u32::from(raw) - 255) * 254 / 64809;
                        scaled.min(254) as u8
                    };
                }
            }

            ID_STEERING_ANGLE => {
                if data.len() > 1 {
                    let raw = u16::from_le_bytes([data[0], data[1]]);
                    // Two's complement over the full unsigned range: the
                    // sign flips exactly at 32768.
                    let signed = if raw > 32767 {
                        i32::from(raw) - 65536
                    } else {
                        i32::from(raw)
                    };
                    self.vehicle.steering_wheel_angle = signed as f32 / 23.0;
                }
            }

            ID_CENTRAL_LOCK => {
                self.vehicle.door_locked = data[0] == 2;
            }

            ID_DOOR_AJAR => {
                if data.len() > 2 {
                    self.vehicle.door_ajar = data[2] == 0xFD;
                }
            }

            // Reserved identifiers with unconfirmed payload layouts. Kept
            // as explicit no-ops so future catalogue entries have a clear
            // attachment point.
            ID_RESERVED_0EA | ID_RESERVED_0EE => {}

            ID_MIRRORS => {
                self.vehicle.mirrors_retracted = data[0] == 0xF3;
            }

            ID_KEY_STATE => {
                self.vehicle.key_state_raw = data[0];
                self.vehicle.key_state_available = true;
            }

            ID_SPEED => {
                if data.len() > 3 {
                    let raw = u16::from_le_bytes([data[2], data[3]]);
                    self.vehicle.speed_mph = f32::from(raw) / 100.0;
                }
            }

            ID_PARKING_BRAKE => {
                if data.len() > 5 {
                    self.vehicle.parking_brake_on = data[5] == 0x32;
                }
            }

            ID_ENGINE_TEMP => {
                self.vehicle.engine_temp_c = data[0].wrapping_sub(48) as i8;
            }

            ID_STEERING_BUTTONS => {
                if data.len() > 1 {
                    self.vehicle.steering_buttons_raw =
                        u16::from(data[0]) << 8 | u16::from(data[1]);
                }
            }

            ID_DRIVER_DOOR => {
                if data.len() > 2 {
                    self.vehicle.driver_door_open = low_nibble(data[2]) == 1;
                }
            }

            ID_DOME_BRIGHTNESS => {
                if data.len() > 1 {
                    self.vehicle.dome_light_brightness = data[1];
                }
            }

            ID_BRAKE_STATUS => {
                self.vehicle.brake_status = (u16::from(data[0].min(0x80)) * 255 / 0x80) as u8;
            }

            ID_SEAT_BELT => {
                if data.len() > 2 {
                    self.vehicle.seat_belt_plugged = low_nibble(data[2]) & 0b0001 > 0;
                }
            }

            ID_DOOR_STATES => {
                if data.len() > 1 {
                    self.vehicle.door_open_driver_front = bit(data[1], 0);
                    self.vehicle.door_open_passenger_front = bit(data[1], 2);
                    self.vehicle.door_open_driver_rear = bit(data[1], 4);
                    self.vehicle.door_open_passenger_rear = bit(data[1], 6);
                }
            }

            ID_GEAR_REVERSE_SPOOF => {
                self.vehicle.gear_position_raw = data[0];
            }

            ID_ODO_FUEL_RANGE => {
                if data.len() > 2 {
                    self.vehicle.odometer_km = u32::from(data[2]) << 16
                        | u32::from(data[1]) << 8
                        | u32::from(data[0]);
                }
                if data.len() > 3 {
                    self.vehicle.fuel_level_l = data[3];
                }
                if data.len() > 7 {
                    let raw = u16::from_be_bytes([data[6], data[7]]);
                    self.vehicle.range_km = f32::from(raw) / 16.0;
                }
            }

            ID_BATTERY_ENGINE => {
                if data.len() > 1 {
                    let raw = u16::from_le_bytes([data[0], data[1]]);
                    self.vehicle.battery_voltage = (i32::from(raw) - 0xF000) as f32 / 68.0;
                }
                if data.len() > 2 {
                    self.vehicle.engine_flag_from_can = data[2] == 0x00;
                }
            }

            ID_WINDOW_POS_DRIVER_FRONT => {
                self.vehicle.window_pos_driver_front = scale_window(data[0]);
            }
            ID_WINDOW_POS_DRIVER_REAR => {
                self.vehicle.window_pos_driver_rear = scale_window(data[0]);
            }
            ID_WINDOW_POS_PASSENGER_FRONT => {
                self.vehicle.window_pos_passenger_front = scale_window(data[0]);
            }
            ID_WINDOW_POS_PASSENGER_REAR => {
                self.vehicle.window_pos_passenger_rear = scale_window(data[0]);
            }

            ID_BLOWER_FAN => {
                if data.len() > 2 {
                    self.climate.blower_state =
                        if data[0] == 0x00 && data[1] == 0x64 && data[2] == 0x1E {
                            BLOWER_AUTO
                        } else {
                            let mut flags = 0;
                            if data[0] > 0 {
                                flags |= BLOWER_WINDSHIELD;
                            }
                            if data[1] > 0 {
                                flags |= BLOWER_CENTER;
                            }
                            if data[2] > 0 {
                                flags |= BLOWER_FOOTWELL;
                            }
                            // All idle without the auto pattern still means
                            // the unit is distributing on its own.
                            if flags == 0 {
                                BLOWER_AUTO
                            } else {
                                flags
                            }
                        };
                }
                if data.len() > 5 {
                    self.climate.fan_speed_raw = data[5] & 0x07;
                }
                if data.len() > 7 {
                    if let Some(temp) = scale_cabin_temp(data[7]) {
                        self.climate.driver_temp_c = temp;
                    }
                }
            }

            ID_PASSENGER_TEMP => {
                if data.len() > 7 {
                    if let Some(temp) = scale_cabin_temp(data[7]) {
                        self.climate.passenger_temp_c = temp;
                    }
                }
            }

            ID_AC_STATUS => {
                self.climate.ac_active = bit(data[0], 0);
                if data.len() > 2 {
                    self.climate.fan_on = bit(data[2], 0);
                }
            }

            // Unknown identifier: not part of the catalogue, ignore.
            _ => {}
        }
    }

    //==============================================================================RAW_ACCESSORS
    pub fn is_braking(&self) -> bool {
        self.vehicle.braking
    }

    pub fn is_door_locked(&self) -> bool {
        self.vehicle.door_locked
    }

    /// Coarse body-controller flag; see `is_door_open` for per-door states.
    pub fn is_door_ajar(&self) -> bool {
        self.vehicle.door_ajar
    }

    /// True when any door selected by `mask` is open. `ALL_POSITIONS`
    /// (or any mask covering all four doors) reports any open door.
    pub fn is_door_open(&self, mask: u8) -> bool {
        (mask & DRIVER_FRONT != 0 && self.vehicle.door_open_driver_front)
            || (mask & PASSENGER_FRONT != 0 && self.vehicle.door_open_passenger_front)
            || (mask & DRIVER_REAR != 0 && self.vehicle.door_open_driver_rear)
            || (mask & PASSENGER_REAR != 0 && self.vehicle.door_open_passenger_rear)
    }

    pub fn is_driver_door_open(&self) -> bool {
        self.vehicle.driver_door_open
    }

    pub fn mirrors_retracted(&self) -> bool {
        self.vehicle.mirrors_retracted
    }

    pub fn is_parking_brake_on(&self) -> bool {
        self.vehicle.parking_brake_on
    }

    pub fn is_seat_belt_plugged(&self) -> bool {
        self.vehicle.seat_belt_plugged
    }

    pub fn brake_status(&self) -> u8 {
        self.vehicle.brake_status
    }

    pub fn dome_light_brightness(&self) -> u8 {
        self.vehicle.dome_light_brightness
    }

    pub fn battery_voltage(&self) -> f32 {
        self.vehicle.battery_voltage
    }

    pub fn engine_rpm(&self) -> u16 {
        self.vehicle.engine_rpm
    }

    /// 0 = foot off, 1-254 linear, 255 = kickdown.
    pub fn throttle_position(&self) -> u8 {
        self.vehicle.throttle_position
    }

    pub fn steering_wheel_angle(&self) -> f32 {
        self.vehicle.steering_wheel_angle
    }

    pub fn speed(&self) -> f32 {
        self.vehicle.speed_mph
    }

    pub fn engine_temp(&self) -> i8 {
        self.vehicle.engine_temp_c
    }

    pub fn odometer(&self) -> u32 {
        self.vehicle.odometer_km
    }

    pub fn fuel_level(&self) -> u8 {
        self.vehicle.fuel_level_l
    }

    pub fn range(&self) -> f32 {
        self.vehicle.range_km
    }

    /// Window travel for the first window selected by `mask`, 0 (closed)
    /// to 255 (fully open).
    pub fn window_position(&self, mask: u8) -> u8 {
        if mask & DRIVER_FRONT != 0 {
            return self.vehicle.window_pos_driver_front;
        }
        if mask & PASSENGER_FRONT != 0 {
            return self.vehicle.window_pos_passenger_front;
        }
        if mask & DRIVER_REAR != 0 {
            return self.vehicle.window_pos_driver_rear;
        }
        if mask & PASSENGER_REAR != 0 {
            return self.vehicle.window_pos_passenger_rear;
        }
        0
    }

    /// True when any logical steering-wheel button selected by `mask` is
    /// currently pressed. Remaps the raw frame bits onto the stable
    /// `STEERING_BTN_*` masks.
    pub fn steering_button_pressed(&self, mask: u8) -> bool {
        let raw = self.vehicle.steering_buttons_raw;
        let mut logical = 0u8;
        if raw & 0b0000_1000_0000_0000 != 0 {
            logical |= STEERING_BTN_VOLUME_UP;
        }
        if raw & 0b0000_0100_0000_0000 != 0 {
            logical |= STEERING_BTN_VOLUME_DOWN;
        }
        if raw & 0b0000_0000_0000_0001 != 0 {
            logical |= STEERING_BTN_SIRI;
        }
        if raw & 0b0000_0001_0000_0000 != 0 {
            logical |= STEERING_BTN_PHONE;
        }
        if raw & 0b0000_0000_0100_0000 != 0 {
            logical |= STEERING_BTN_CUSTOM;
        }
        if raw & 0b0000_0000_0001_0000 != 0 {
            logical |= STEERING_BTN_CHANNEL;
        }
        if raw & 0b0010_0000_0000_0000 != 0 {
            logical |= STEERING_BTN_PREV;
        }
        if raw & 0b0001_0000_0000_0000 != 0 {
            logical |= STEERING_BTN_NEXT;
        }
        logical & mask > 0
    }

    //==============================================================================DERIVED_ACCESSORS
    /// Key position, `EngineOff` as the fail-safe default for unknown raw
    /// codes and for vehicles that never reported the key-state frame.
    pub fn key_state(&self) -> KeyState {
        if !self.vehicle.key_state_available {
            return KeyState::EngineOff;
        }
        match self.vehicle.key_state_raw {
            0x00 => KeyState::EngineOff,
            0x40 => KeyState::Inserting,
            0x41 => KeyState::Position1,
            0x45 => KeyState::Position2,
            0x55 => KeyState::Cranking,
            _ => KeyState::EngineOff,
        }
    }

    /// Priority 1: key state with RPM confirmation. Priority 2: legacy
    /// engine flag for vehicles without the key-state frame.
    pub fn is_engine_running(&self) -> bool {
        if self.vehicle.key_state_available {
            let key = self.key_state();
            return matches!(key, KeyState::Position2 | KeyState::Cranking)
                && self.vehicle.engine_rpm > RPM_RUNNING_THRESHOLD;
        }
        self.vehicle.engine_flag_from_can && self.vehicle.engine_rpm > RPM_RUNNING_THRESHOLD
    }

    pub fn is_engine_cranking(&self) -> bool {
        if self.vehicle.key_state_available {
            return self.key_state() == KeyState::Cranking
                && self.vehicle.engine_rpm < RPM_RUNNING_THRESHOLD;
        }
        // Heuristic for vehicles without the key-state frame.
        self.vehicle.engine_flag_from_can
            && self.vehicle.engine_rpm > 0
            && self.vehicle.engine_rpm < RPM_RUNNING_THRESHOLD
    }

    /// Priority order: RPM above the running threshold always wins, then
    /// the key state when available, then the legacy engine flag.
    pub fn ignition_status(&self) -> IgnitionStatus {
        if self.vehicle.engine_rpm > RPM_RUNNING_THRESHOLD {
            return IgnitionStatus::Running;
        }
        if self.vehicle.key_state_available {
            return match self.key_state() {
                KeyState::EngineOff | KeyState::Inserting | KeyState::Position1 => {
                    IgnitionStatus::Off
                }
                // Position 2 or cranking with low RPM.
                KeyState::Position2 | KeyState::Cranking => IgnitionStatus::Second,
            };
        }
        if !self.vehicle.engine_flag_from_can {
            return IgnitionStatus::Off;
        }
        IgnitionStatus::Second
    }

    pub fn gear_position(&self) -> GearPosition {
        match self.vehicle.gear_position_raw {
            0xE3 => GearPosition::Park,
            0xC2 => GearPosition::Reverse,
            0xD1 => GearPosition::Neutral,
            0xC7 => GearPosition::Drive,
            _ => GearPosition::Unknown,
        }
    }

    /// Torque in Nm, zero while the engine is not running.
    pub fn torque(&self) -> f32 {
        if self.is_engine_running() {
            self.vehicle.torque_nm
        } else {
            0.0
        }
    }

    /// Power in kW (RPM x Nm / 9549.3), zero while the engine is not
    /// running.
    pub fn power(&self) -> f32 {
        if !self.is_engine_running() {
            return 0.0;
        }
        f32::from(self.vehicle.engine_rpm) * self.vehicle.torque_nm / POWER_DIVISOR
    }

    //==============================================================================CLIMATE_ACCESSORS
    /// Fan step 0-7. The bus reports a minimum of 1 even when the fan is
    /// off; the on/off flag disambiguates that case.
    pub fn fan_speed(&self) -> u8 {
        if self.climate.fan_speed_raw == 1 && !self.climate.fan_on {
            return 0;
        }
        self.climate.fan_speed_raw
    }

    pub fn driver_temp(&self) -> i8 {
        self.climate.driver_temp_c
    }

    pub fn passenger_temp(&self) -> i8 {
        self.climate.passenger_temp_c
    }

    pub fn is_ac_active(&self) -> bool {
        self.climate.ac_active
    }

    /// OR'd `BLOWER_*` flags, or `BLOWER_AUTO`.
    pub fn blower_state(&self) -> u8 {
        self.climate.blower_state
    }
}

//==================================================================================ENCODE_BUILDERS
// Per-window direction bits of the window command frame: front windows in
// byte 0, rear windows in byte 1.
const WINDOW_LEFT_DOWN: u8 = 0x02;
const WINDOW_LEFT_UP: u8 = 0x04;
const WINDOW_RIGHT_DOWN: u8 = 0x10;
const WINDOW_RIGHT_UP: u8 = 0x20;

/// Build the window actuation frame: per-window direction flags OR'd into
/// a 3-byte payload with fixed high bits.
pub fn window_command(mask: u8, direction: WindowDirection) -> CanFrame {
    let mut data = [0xC0u8, 0xC0, 0xFF];

    let mut apply = |byte: &mut u8, down: u8, up: u8| match direction {
        WindowDirection::RollDown => *byte |= down,
        WindowDirection::RollUp => *byte |= up,
        WindowDirection::Neutral => {}
    };

    let [front, rear, _] = &mut data;
    if mask & DRIVER_FRONT != 0 {
        apply(front, WINDOW_LEFT_DOWN, WINDOW_LEFT_UP);
    }
    if mask & PASSENGER_FRONT != 0 {
        apply(front, WINDOW_RIGHT_DOWN, WINDOW_RIGHT_UP);
    }
    if mask & DRIVER_REAR != 0 {
        apply(rear, WINDOW_LEFT_DOWN, WINDOW_LEFT_UP);
    }
    if mask & PASSENGER_REAR != 0 {
        apply(rear, WINDOW_RIGHT_DOWN, WINDOW_RIGHT_UP);
    }

    CanFrame::new(std_id(ID_WINDOW_CONTROL), &data)
}

/// Build a synthetic RPM/throttle frame: raw RPM is `rpm x 4` little-endian
/// in bytes 4-5, throttle bytes report the idle floor.
pub fn fake_rpm_frame(rpm: u16) -> CanFrame {
    let raw = rpm.wrapping_mul(4).to_le_bytes();
    let data = [0x00, 0x00, 0xFF, 0x00, raw[0], raw[1], 0x00, 0x00];
    CanFrame::new(std_id(ID_RPM_THROTTLE), &data)
}

/// Build the reverse-gear spoof frame (lights up the reverse lamps).
pub fn reverse_light_spoof() -> CanFrame {
    CanFrame::new(std_id(ID_GEAR_REVERSE_SPOOF), &[0xC2, 0xFF])
}

/// Build a diagnostic error-code frame, code little-endian in bytes 0-1.
pub fn diagnostic_error_frame(code: u16) -> CanFrame {
    let code = code.to_le_bytes();
    let data = [code[0], code[1], 0x20, 0xF0, 0x00, 0xFE, 0xFE, 0xFE];
    CanFrame::new(std_id(ID_DIAG_ERROR), &data)
}

#[cfg(test)]
mod tests;
