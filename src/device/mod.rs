//! Device capability layer for the EV3 brick

pub mod commands;
pub mod simulated;

use async_trait::async_trait;
use thiserror::Error;

pub use simulated::SimulatedBrick;

/// Error types for device operations
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device unreachable: {0}")]
    Unreachable(String),

    #[error("not connected to the brick")]
    NotConnected,

    #[error("command rejected: {0}")]
    CommandRejected(String),

    #[error("transport error: {0}")]
    Io(String),
}

/// Capability surface the automation core drives
///
/// The core never looks behind these calls: how a controller reaches the
/// brick (Bluetooth, BLE, or a simulation) is its own business.
#[async_trait]
pub trait DeviceController: Send + Sync {
    /// Establish a connection to the brick
    async fn connect(&self) -> Result<(), DeviceError>;

    /// Whether a connection is currently up
    fn is_connected(&self) -> bool;

    /// Start a program stored on the brick
    async fn run_program(&self, name: &str) -> Result<(), DeviceError>;

    /// Play a tone on the brick speaker
    async fn play_sound(&self, frequency_hz: u32, duration_ms: u32) -> Result<(), DeviceError>;

    /// Emergency stop: halt all motors immediately
    async fn stop_all(&self) -> Result<(), DeviceError>;

    /// Tear the connection down, best-effort
    async fn disconnect(&self);
}
