//! Unit tests for the decode table, the derived accessors, and the encode
//! builders.
use super::*;
use crate::protocol::state::ALL_POSITIONS;

fn frame(id: u16, bytes: &[u8]) -> CanFrame {
    CanFrame::new(std_id(id), bytes)
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

/// Codec with the engine reported as running: key in position 2 plus RPM
/// confirmation.
fn running_codec(rpm: u16) -> VehicleCodec {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x130, &[0x45]));
    let raw = rpm.wrapping_mul(4).to_le_bytes();
    codec.decode(&frame(0x0AA, &[0, 0, 0, 0, raw[0], raw[1]]));
    codec
}

//==================================================================================THROTTLE
#[test]
/// Raw values at or below the idle floor decode to zero.
fn test_throttle_idle_floor() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x0AA, &[0, 0, 0xFF, 0x00, 0, 0]));
    assert_eq!(codec.throttle_position(), 0);

    codec.decode(&frame(0x0AA, &[0, 0, 0x00, 0x00, 0, 0]));
    assert_eq!(codec.throttle_position(), 0);
}

#[test]
fn test_throttle_linear_rescale_and_clamp() {
    let mut codec = VehicleCodec::new();
    // Raw 256: barely above the floor, rescales to 0.
    codec.decode(&frame(0x0AA, &[0, 0, 0x00, 0x01, 0, 0]));
    assert_eq!(codec.throttle_position(), 0);

    // Raw 65064 (top of the documented range): exactly 254.
    let raw = 65064u16.to_le_bytes();
    codec.decode(&frame(0x0AA, &[0, 0, raw[0], raw[1], 0, 0]));
    assert_eq!(codec.throttle_position(), 254);

    // Raw 65535: past the range, clamped at 254.
    codec.decode(&frame(0x0AA, &[0, 0, 0xFF, 0xFF, 0, 0]));
    assert_eq!(codec.throttle_position(), 254);
}

#[test]
/// The kickdown marker byte forces the reserved value 255 regardless of
/// the raw throttle.
fn test_throttle_kickdown_marker() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x0AA, &[0, 0, 0x10, 0x00, 0, 0, 0xB4, 0]));
    assert_eq!(codec.throttle_position(), 255);
}

//==================================================================================RPM
#[test]
fn test_rpm_decode_divides_raw_by_four() {
    let mut codec = VehicleCodec::new();
    let raw = 8000u16.to_le_bytes();
    codec.decode(&frame(0x0AA, &[0, 0, 0, 0, raw[0], raw[1]]));
    assert_eq!(codec.engine_rpm(), 2000);
}

#[test]
/// Injecting RPM 2000 produces raw 8000, and decoding that frame yields
/// RPM 2000 again.
fn test_rpm_injection_round_trip() {
    let injected = fake_rpm_frame(2000);
    assert_eq!(injected.id.as_raw(), 0x0AA);
    assert_eq!(u16::from_le_bytes([injected.data[4], injected.data[5]]), 8000);

    let mut codec = VehicleCodec::new();
    codec.decode(&injected);
    assert_eq!(codec.engine_rpm(), 2000);
    // The injected frame reports the idle throttle floor.
    assert_eq!(codec.throttle_position(), 0);
}

//==================================================================================STEERING_ANGLE
#[test]
/// The sign flips exactly at the 32768 boundary.
fn test_steering_angle_sign_boundary() {
    let mut codec = VehicleCodec::new();

    codec.decode(&frame(0x0C8, &[0x00, 0x00]));
    assert!(approx(codec.steering_wheel_angle(), 0.0));

    let raw = 32767u16.to_le_bytes();
    codec.decode(&frame(0x0C8, &[raw[0], raw[1]]));
    assert!(approx(codec.steering_wheel_angle(), 32767.0 / 23.0));

    let raw = 32768u16.to_le_bytes();
    codec.decode(&frame(0x0C8, &[raw[0], raw[1]]));
    assert!(approx(codec.steering_wheel_angle(), -32768.0 / 23.0));
}

//==================================================================================KEY_STATE
#[test]
fn test_key_state_lookup() {
    let cases = [
        (0x00, KeyState::EngineOff),
        (0x40, KeyState::Inserting),
        (0x41, KeyState::Position1),
        (0x45, KeyState::Position2),
        (0x55, KeyState::Cranking),
        // Unknown raw code falls back to off.
        (0x99, KeyState::EngineOff),
    ];
    for (raw, expected) in cases {
        let mut codec = VehicleCodec::new();
        codec.decode(&frame(0x130, &[raw]));
        assert_eq!(codec.key_state(), expected, "raw {raw:#x}");
    }
}

#[test]
fn test_key_state_defaults_to_off_when_never_observed() {
    let codec = VehicleCodec::new();
    assert_eq!(codec.key_state(), KeyState::EngineOff);
}

//==================================================================================DERIVED_PRIORITIES
#[test]
fn test_engine_running_requires_rpm_confirmation() {
    // Key in position 2 but RPM below the threshold: not running.
    let codec = running_codec(300);
    assert!(!codec.is_engine_running());

    let codec = running_codec(500);
    assert!(codec.is_engine_running());
}

#[test]
/// Without the key-state frame the legacy engine flag decides.
fn test_engine_running_legacy_fallback() {
    let mut codec = VehicleCodec::new();
    let raw = 2000u16.to_le_bytes();
    codec.decode(&frame(0x0AA, &[0, 0, 0, 0, raw[0], raw[1]]));
    assert!(!codec.is_engine_running());

    // 0x3B4 byte 2 == 0x00 sets the legacy flag.
    codec.decode(&frame(0x3B4, &[0x00, 0xF0, 0x00]));
    assert!(codec.is_engine_running());
}

#[test]
fn test_engine_cranking() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x130, &[0x55]));
    assert!(codec.is_engine_cranking());

    // Above the running threshold it is no longer cranking.
    let raw = 2000u16.to_le_bytes();
    codec.decode(&frame(0x0AA, &[0, 0, 0, 0, raw[0], raw[1]]));
    assert!(!codec.is_engine_cranking());
}

#[test]
/// RPM above the threshold reports running regardless of key state.
fn test_ignition_rpm_has_top_priority() {
    let mut codec = VehicleCodec::new();
    let raw = 2000u16.to_le_bytes();
    codec.decode(&frame(0x0AA, &[0, 0, 0, 0, raw[0], raw[1]]));
    assert_eq!(codec.ignition_status(), IgnitionStatus::Running);
}

#[test]
fn test_ignition_from_key_state() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x130, &[0x41]));
    assert_eq!(codec.ignition_status(), IgnitionStatus::Off);

    codec.decode(&frame(0x130, &[0x45]));
    assert_eq!(codec.ignition_status(), IgnitionStatus::Second);
}

#[test]
/// The legacy flag is only consulted when no key state was ever observed.
fn test_ignition_legacy_fallback() {
    let mut codec = VehicleCodec::new();
    assert_eq!(codec.ignition_status(), IgnitionStatus::Off);

    codec.decode(&frame(0x3B4, &[0x00, 0xF0, 0x00]));
    assert_eq!(codec.ignition_status(), IgnitionStatus::Second);

    // Byte 2 != 0 clears the flag again.
    codec.decode(&frame(0x3B4, &[0x00, 0xF0, 0x01]));
    assert_eq!(codec.ignition_status(), IgnitionStatus::Off);
}

#[test]
fn test_torque_and_power_gated_by_engine_state() {
    // Torque 320/32 = 10 Nm, engine not running: both gated to zero.
    let mut codec = VehicleCodec::new();
    let raw = 320i16.to_le_bytes();
    codec.decode(&frame(0x0A8, &[0x00, raw[0], raw[1]]));
    assert!(approx(codec.torque(), 0.0));
    assert!(approx(codec.power(), 0.0));

    let mut codec = running_codec(2000);
    let raw = 3200i16.to_le_bytes();
    codec.decode(&frame(0x0A8, &[0x00, raw[0], raw[1]]));
    assert!(approx(codec.torque(), 100.0));
    assert!(approx(codec.power(), 2000.0 * 100.0 / 9549.296_585_5));
}

//==================================================================================BODY
#[test]
fn test_braking_flag_from_upper_nibble() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x0A8, &[0x00, 0x60]));
    assert!(codec.is_braking());

    codec.decode(&frame(0x0A8, &[0x00, 0x50]));
    assert!(!codec.is_braking());
}

#[test]
fn test_central_lock_and_mirrors() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x0E2, &[0x02]));
    assert!(codec.is_door_locked());
    codec.decode(&frame(0x0E2, &[0x01]));
    assert!(!codec.is_door_locked());

    codec.decode(&frame(0x0F6, &[0xF3]));
    assert!(codec.mirrors_retracted());
}

#[test]
fn test_per_door_open_bits() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x2FC, &[0x00, 0b0001_0001]));
    assert!(codec.is_door_open(DRIVER_FRONT));
    assert!(codec.is_door_open(DRIVER_REAR));
    assert!(!codec.is_door_open(PASSENGER_FRONT));
    assert!(!codec.is_door_open(PASSENGER_REAR));
    assert!(codec.is_door_open(ALL_POSITIONS));

    codec.decode(&frame(0x2FC, &[0x00, 0x00]));
    assert!(!codec.is_door_open(ALL_POSITIONS));
}

#[test]
fn test_driver_door_and_seat_belt_nibbles() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x1E1, &[0, 0, 0xA1]));
    assert!(codec.is_driver_door_open());

    codec.decode(&frame(0x2F1, &[0, 0, 0x05]));
    assert!(codec.is_seat_belt_plugged());
    codec.decode(&frame(0x2F1, &[0, 0, 0x04]));
    assert!(!codec.is_seat_belt_plugged());
}

#[test]
fn test_parking_brake_and_brake_status() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x1B4, &[0, 0, 0, 0, 0, 0x32]));
    assert!(codec.is_parking_brake_on());

    codec.decode(&frame(0x2B2, &[0x80]));
    assert_eq!(codec.brake_status(), 255);
    codec.decode(&frame(0x2B2, &[0x40]));
    assert_eq!(codec.brake_status(), 127);
    // Values past the saturation point clamp.
    codec.decode(&frame(0x2B2, &[0xFF]));
    assert_eq!(codec.brake_status(), 255);
}

#[test]
fn test_steering_button_remap() {
    let mut codec = VehicleCodec::new();
    // Raw bit 6 is the custom button.
    codec.decode(&frame(0x1D6, &[0x00, 0x40]));
    assert!(codec.steering_button_pressed(STEERING_BTN_CUSTOM));
    assert!(!codec.steering_button_pressed(STEERING_BTN_VOLUME_UP));

    // Raw bit 11 is volume up.
    codec.decode(&frame(0x1D6, &[0x08, 0x00]));
    assert!(codec.steering_button_pressed(STEERING_BTN_VOLUME_UP));
    assert!(!codec.steering_button_pressed(STEERING_BTN_CUSTOM));

    // Combined mask queries match any pressed button.
    assert!(codec.steering_button_pressed(STEERING_BTN_VOLUME_UP | STEERING_BTN_PHONE));
}

//==================================================================================INSTRUMENTATION
#[test]
fn test_battery_voltage() {
    let mut codec = VehicleCodec::new();
    // Raw 0xF3C0: (0xF3C0 - 0xF000) / 68 = 14.117 V.
    codec.decode(&frame(0x3B4, &[0xC0, 0xF3]));
    assert!(approx(codec.battery_voltage(), 960.0 / 68.0));
}

#[test]
fn test_speed_and_engine_temp() {
    let mut codec = VehicleCodec::new();
    let raw = 5000u16.to_le_bytes();
    codec.decode(&frame(0x1A1, &[0, 0, raw[0], raw[1]]));
    assert!(approx(codec.speed(), 50.0));

    codec.decode(&frame(0x1D0, &[68]));
    assert_eq!(codec.engine_temp(), 20);
    codec.decode(&frame(0x1D0, &[20]));
    assert_eq!(codec.engine_temp(), -28);
}

#[test]
fn test_window_position_scaling() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x3B6, &[0x50]));
    assert_eq!(codec.window_position(DRIVER_FRONT), 255);

    codec.decode(&frame(0x3B9, &[0x28]));
    assert_eq!(codec.window_position(PASSENGER_REAR), 127);

    // Raw values past full travel clamp.
    codec.decode(&frame(0x3B8, &[0x60]));
    assert_eq!(codec.window_position(PASSENGER_FRONT), 255);

    codec.decode(&frame(0x3B7, &[0x00]));
    assert_eq!(codec.window_position(DRIVER_REAR), 0);
}

#[test]
fn test_odometer_fuel_range() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x330, &[0x10, 0x27, 0x00, 40, 0, 0, 0x0A, 0x00]));
    assert_eq!(codec.odometer(), 10000);
    assert_eq!(codec.fuel_level(), 40);
    assert!(approx(codec.range(), 2560.0 / 16.0));
}

#[test]
/// A short payload updates only the fields whose bytes are present.
fn test_partial_payload_updates_partially() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x330, &[0x10, 0x27, 0x00, 40]));
    assert_eq!(codec.odometer(), 10000);
    assert_eq!(codec.fuel_level(), 40);
    assert!(approx(codec.range(), 0.0));
}

#[test]
fn test_gear_position_lookup() {
    let cases = [
        (0xE3, GearPosition::Park),
        (0xC2, GearPosition::Reverse),
        (0xD1, GearPosition::Neutral),
        (0xC7, GearPosition::Drive),
        (0x00, GearPosition::Unknown),
    ];
    for (raw, expected) in cases {
        let mut codec = VehicleCodec::new();
        codec.decode(&frame(0x304, &[raw]));
        assert_eq!(codec.gear_position(), expected, "raw {raw:#x}");
    }
}

#[test]
fn test_dome_light_brightness() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x286, &[0x00, 0xC8]));
    assert_eq!(codec.dome_light_brightness(), 0xC8);
}

//==================================================================================IGNORED_INPUT
#[test]
fn test_unknown_identifier_is_ignored() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x7F0, &[0xFF; 8]));
    assert_eq!(codec.engine_rpm(), 0);
    assert!(!codec.is_braking());
    assert_eq!(codec.key_state(), KeyState::EngineOff);
}

#[test]
/// Reserved identifiers are explicit no-ops until their layouts are
/// confirmed.
fn test_reserved_identifiers_are_noops() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x0EA, &[0xFF; 8]));
    codec.decode(&frame(0x0EE, &[0xFF; 8]));
    assert_eq!(codec.engine_rpm(), 0);
    assert!(!codec.is_door_locked());
}

#[test]
fn test_empty_payload_is_ignored() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x0E2, &[]));
    assert!(!codec.is_door_locked());
}

//==================================================================================CLIMATE
#[test]
fn test_blower_auto_pattern() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x2E6, &[0x00, 0x64, 0x1E]));
    assert_eq!(codec.blower_state(), BLOWER_AUTO);
}

#[test]
fn test_blower_manual_flags() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x2E6, &[0x10, 0x00, 0x20]));
    assert_eq!(codec.blower_state(), BLOWER_WINDSHIELD | BLOWER_FOOTWELL);

    // All zero without the auto pattern still reports auto.
    codec.decode(&frame(0x2E6, &[0x00, 0x00, 0x00]));
    assert_eq!(codec.blower_state(), BLOWER_AUTO);
}

#[test]
fn test_fan_speed_and_cabin_temps() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x2E6, &[0x00, 0x64, 0x1E, 0, 0, 0x03, 0, 0x20]));
    assert_eq!(codec.fan_speed(), 3);
    assert_eq!(codec.driver_temp(), 16);

    codec.decode(&frame(0x2E6, &[0x00, 0x64, 0x1E, 0, 0, 0x03, 0, 0x38]));
    assert_eq!(codec.driver_temp(), 27);

    // Raw 0x2C: 16 + (12 * 11) / 24 = 21 degrees.
    codec.decode(&frame(0x2EA, &[0, 0, 0, 0, 0, 0, 0, 0x2C]));
    assert_eq!(codec.passenger_temp(), 21);

    // Out-of-dial values leave the previous reading in place.
    codec.decode(&frame(0x2EA, &[0, 0, 0, 0, 0, 0, 0, 0xFF]));
    assert_eq!(codec.passenger_temp(), 21);
}

#[test]
/// The bus reports fan step 1 even when the fan is off; the on/off flag
/// disambiguates.
fn test_fan_speed_off_disambiguation() {
    let mut codec = VehicleCodec::new();
    codec.decode(&frame(0x2E6, &[0x00, 0x64, 0x1E, 0, 0, 0x01, 0, 0]));
    assert_eq!(codec.fan_speed(), 0);

    // 0x242 byte 2 bit 0 turns the fan flag on.
    codec.decode(&frame(0x242, &[0x11, 0x00, 0xF1]));
    assert_eq!(codec.fan_speed(), 1);
    assert!(codec.is_ac_active());
}

//==================================================================================ENCODE
#[test]
fn test_window_command_direction_bits() {
    let frame = window_command(DRIVER_FRONT | PASSENGER_REAR, WindowDirection::RollDown);
    assert_eq!(frame.id.as_raw(), 0x0FA);
    assert_eq!(frame.payload(), &[0xC2, 0xD0, 0xFF]);

    let frame = window_command(DRIVER_FRONT, WindowDirection::RollUp);
    assert_eq!(frame.payload(), &[0xC4, 0xC0, 0xFF]);

    let frame = window_command(DRIVER_REAR | PASSENGER_REAR, WindowDirection::RollUp);
    assert_eq!(frame.payload(), &[0xC0, 0xE4, 0xFF]);

    // Neutral leaves the fixed high bits untouched.
    let frame = window_command(ALL_POSITIONS, WindowDirection::Neutral);
    assert_eq!(frame.payload(), &[0xC0, 0xC0, 0xFF]);
}

#[test]
fn test_reverse_light_spoof_frame() {
    let frame = reverse_light_spoof();
    assert_eq!(frame.id.as_raw(), 0x304);
    assert_eq!(frame.payload(), &[0xC2, 0xFF]);
}

#[test]
fn test_diagnostic_error_frame_layout() {
    let frame = diagnostic_error_frame(0x1234);
    assert_eq!(frame.id.as_raw(), 0x338);
    assert_eq!(
        frame.payload(),
        &[0x34, 0x12, 0x20, 0xF0, 0x00, 0xFE, 0xFE, 0xFE]
    );
}
