//! Simulated brick for demos and tests

use crate::device::{commands, DeviceController, DeviceError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// Default simulated battery charge, in percent
const DEFAULT_BATTERY_PERCENT: u8 = 75;

/// An in-process stand-in for a real EV3 brick
///
/// Builds and records the same direct-command frames a Bluetooth
/// controller would send, without any transport underneath. Failure
/// injection knobs make the abort paths reachable from tests and demos.
pub struct SimulatedBrick {
    connected: AtomicBool,
    fail_connect: bool,
    fail_sound: bool,
    fail_programs: HashSet<String>,
    battery_percent: u8,
    sent_frames: Mutex<Vec<Vec<u8>>>,
}

impl SimulatedBrick {
    /// Create a healthy brick with a three-quarters-full battery
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
            fail_connect: false,
            fail_sound: false,
            fail_programs: HashSet::new(),
            battery_percent: DEFAULT_BATTERY_PERCENT,
            sent_frames: Mutex::new(Vec::new()),
        }
    }

    /// Set the simulated battery charge
    pub fn with_battery(mut self, percent: u8) -> Self {
        self.battery_percent = percent.min(100);
        self
    }

    /// Make every connection attempt fail
    pub fn failing_connect(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    /// Make a specific program rejection-prone
    pub fn failing_program(mut self, name: &str) -> Self {
        self.fail_programs.insert(name.to_string());
        self
    }

    /// Make every sound command fail
    pub fn failing_sound(mut self) -> Self {
        self.fail_sound = true;
        self
    }

    /// Current battery charge in percent
    pub fn battery_level(&self) -> u8 {
        self.battery_percent
    }

    /// Frames "sent" so far, in order
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        self.sent_frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn send(&self, frame: Vec<u8>) -> Result<(), DeviceError> {
        if !self.is_connected() {
            return Err(DeviceError::NotConnected);
        }
        debug!(frame = %commands::hex(&frame), "sent command");
        self.sent_frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(frame);
        Ok(())
    }
}

impl Default for SimulatedBrick {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceController for SimulatedBrick {
    async fn connect(&self) -> Result<(), DeviceError> {
        if self.fail_connect {
            return Err(DeviceError::Unreachable(
                "no EV3 brick in range".to_string(),
            ));
        }
        self.connected.store(true, Ordering::SeqCst);
        info!("connected to simulated EV3 brick");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn run_program(&self, name: &str) -> Result<(), DeviceError> {
        if self.fail_programs.contains(name) {
            return Err(DeviceError::CommandRejected(format!(
                "program '{}' refused to start",
                name
            )));
        }
        info!(program = name, "running program");
        self.send(commands::direct_command(&commands::start_program()))
    }

    async fn play_sound(&self, frequency_hz: u32, duration_ms: u32) -> Result<(), DeviceError> {
        if self.fail_sound {
            return Err(DeviceError::CommandRejected("speaker error".to_string()));
        }
        info!(frequency_hz, duration_ms, "playing sound");
        // The brick caps both fields at 16 bits on the wire.
        let frequency = frequency_hz.min(u16::MAX as u32) as u16;
        let duration = duration_ms.min(u16::MAX as u32) as u16;
        self.send(commands::direct_command(&commands::play_tone(
            frequency, duration,
        )))
    }

    async fn stop_all(&self) -> Result<(), DeviceError> {
        info!("stopping all motors");
        self.send(commands::direct_command(&commands::stop_all_motors()))
    }

    async fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            info!("disconnected from simulated EV3 brick");
        }
    }
}
