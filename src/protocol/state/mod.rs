//! Typed snapshots of the decoded vehicle and climate state, owned
//! exclusively by the codec. Every field is written by exactly one decode
//! rule; fields for identifiers never observed keep their zero-initialized
//! default.

//==================================================================================SELECTION_MASKS
// Window / door selection flags, OR-able for combined queries.
pub const DRIVER_FRONT: u8 = 0x01;
pub const PASSENGER_FRONT: u8 = 0x02;
pub const DRIVER_REAR: u8 = 0x04;
pub const PASSENGER_REAR: u8 = 0x08;
/// Selects every door or window.
pub const ALL_POSITIONS: u8 = 0xFF;

//==================================================================================BLOWER_FLAGS
// Climate blower distribution flags, OR-able. `BLOWER_AUTO` is the special
// all-clear value reported when the unit manages distribution itself.
pub const BLOWER_AUTO: u8 = 0x00;
pub const BLOWER_WINDSHIELD: u8 = 0x01;
pub const BLOWER_CENTER: u8 = 0x02;
pub const BLOWER_FOOTWELL: u8 = 0x04;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Direction request for a window actuation command.
pub enum WindowDirection {
    Neutral,
    RollDown,
    RollUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Position of the ignition key, decoded from its raw status byte.
pub enum KeyState {
    EngineOff,
    Inserting,
    Position1,
    Position2,
    Cranking,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Gear selector position. `Unknown` is the explicit terminal value for
/// raw codes outside the catalogue.
pub enum GearPosition {
    Park,
    Reverse,
    Neutral,
    Drive,
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Ignition status derived from RPM, key state, and the legacy engine flag.
pub enum IgnitionStatus {
    Off,
    Second,
    Running,
}

#[derive(Debug, Default)]
/// Drivetrain, body, and instrumentation snapshot.
pub struct VehicleState {
    pub braking: bool,
    /// Raw torque in Nm; gate through the codec accessor, which reports
    /// zero while the engine is not running.
    pub torque_nm: f32,
    pub engine_rpm: u16,
    /// 0 = foot off, 1-254 linear, 255 reserved for kickdown.
    pub throttle_position: u8,
    pub key_state_raw: u8,
    /// True once the key-state identifier has been observed; vehicles
    /// without it fall back to the legacy engine flag.
    pub key_state_available: bool,
    pub speed_mph: f32,
    pub steering_wheel_angle: f32,
    pub door_locked: bool,
    /// Coarse body-controller flag; per-door states are tracked separately.
    pub door_ajar: bool,
    pub mirrors_retracted: bool,
    pub parking_brake_on: bool,
    pub engine_temp_c: i8,
    pub steering_buttons_raw: u16,
    pub driver_door_open: bool,
    pub dome_light_brightness: u8,
    /// Brake pressure rescaled to 0-255.
    pub brake_status: u8,
    pub seat_belt_plugged: bool,
    pub door_open_driver_front: bool,
    pub door_open_passenger_front: bool,
    pub door_open_driver_rear: bool,
    pub door_open_passenger_rear: bool,
    pub gear_position_raw: u8,
    pub odometer_km: u32,
    pub fuel_level_l: u8,
    pub range_km: f32,
    pub battery_voltage: f32,
    /// Legacy engine-running flag for vehicles without the key-state frame.
    pub engine_flag_from_can: bool,
    /// Window positions rescaled to 0 (closed) - 255 (fully open).
    pub window_pos_driver_front: u8,
    pub window_pos_passenger_front: u8,
    pub window_pos_driver_rear: u8,
    pub window_pos_passenger_rear: u8,
}

#[derive(Debug, Default)]
/// Climate unit snapshot.
pub struct ClimateState {
    /// Raw fan step 0-7; the bus reports a minimum of 1 even when the fan
    /// is off, see the codec's `fan_speed` accessor.
    pub fan_speed_raw: u8,
    pub fan_on: bool,
    pub driver_temp_c: i8,
    pub passenger_temp_c: i8,
    pub ac_active: bool,
    /// OR'd `BLOWER_*` flags, or `BLOWER_AUTO`.
    pub blower_state: u8,
}
