//! EV3 direct-command payload builders
//!
//! Frames follow the EV3 direct-command layout: a little-endian
//! `[length u16][counter u8][type u8]` header followed by the opcode
//! payload. Only the handful of commands the runner needs are built here.

/// Message counter; a single in-flight command at a time needs no sequencing
const MESSAGE_COUNTER: u8 = 0x00;

/// Direct command, no reply requested
const DIRECT_COMMAND_NO_REPLY: u8 = 0x80;

const OUTPUT_STEP_POWER: u8 = 0x0a;
const OUTPUT_STOP: u8 = 0x0b;
const SOUND: u8 = 0x94;
const SOUND_TONE: u8 = 0x01;

/// Layer 0 = the local brick
const LAYER: u8 = 0x00;

/// Motor port A
const MOTOR_A: u8 = 0x01;

/// All four motor ports (A+B+C+D)
const ALL_MOTORS: u8 = 0x0f;

const BRAKE: u8 = 0x01;

/// Wrap an opcode payload in a direct-command frame
pub fn direct_command(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(payload.len() + 4);
    frame.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    frame.push(MESSAGE_COUNTER);
    frame.push(DIRECT_COMMAND_NO_REPLY);
    frame.extend_from_slice(payload);
    frame
}

/// Payload that starts a stored program
///
/// The brick has no opcode to launch a program by name over a direct
/// command; like the reference controller, this drives motor A as the
/// stand-in movement (50% power, 1000 steps up and down, brake at the end).
pub fn start_program() -> Vec<u8> {
    let mut payload = vec![OUTPUT_STEP_POWER, LAYER, MOTOR_A, 0x32];
    payload.extend_from_slice(&0u32.to_le_bytes());
    payload.extend_from_slice(&1000u32.to_le_bytes());
    payload.extend_from_slice(&1000u32.to_le_bytes());
    payload.push(BRAKE);
    payload
}

/// Payload that brakes all motors immediately
pub fn stop_all_motors() -> Vec<u8> {
    vec![OUTPUT_STOP, LAYER, ALL_MOTORS, BRAKE]
}

/// Payload that plays a tone at minimum volume
pub fn play_tone(frequency_hz: u16, duration_ms: u16) -> Vec<u8> {
    let mut payload = vec![SOUND, SOUND_TONE, 0x01];
    payload.extend_from_slice(&frequency_hz.to_le_bytes());
    payload.extend_from_slice(&duration_ms.to_le_bytes());
    payload
}

/// Render a frame as lowercase hex for logging
pub fn hex(frame: &[u8]) -> String {
    frame.iter().map(|b| format!("{:02x}", b)).collect()
}
