//! Step domain model

use std::fmt;
use std::time::Duration;

/// A single step in an automation sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Run a program stored on the brick
    Program {
        /// Name of the program file on the brick (without extension)
        name: String,

        /// How long to pause after the program was started
        wait_after: Duration,

        /// Optional named condition gating this step
        condition: Option<String>,
    },

    /// Pause without touching the device
    Wait {
        /// How long to pause
        duration: Duration,
    },

    /// Play a tone on the brick speaker
    Sound {
        /// Tone frequency in Hz
        frequency_hz: u32,

        /// Tone duration in milliseconds
        duration_ms: u32,

        /// How long to pause after the tone finished
        wait_after: Duration,
    },
}

impl Step {
    /// Stable lowercase label used in logs and events
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Program { .. } => "program",
            Step::Wait { .. } => "wait",
            Step::Sound { .. } => "sound",
        }
    }

    /// Name of the condition gating this step, if any
    pub fn condition(&self) -> Option<&str> {
        match self {
            Step::Program { condition, .. } => condition.as_deref(),
            _ => None,
        }
    }

    /// The pause applied after a successful dispatch (zero for wait steps,
    /// whose whole body is the pause)
    pub fn wait_after(&self) -> Duration {
        match self {
            Step::Program { wait_after, .. } | Step::Sound { wait_after, .. } => *wait_after,
            Step::Wait { .. } => Duration::ZERO,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Program {
                name,
                wait_after,
                condition,
            } => {
                write!(f, "PROGRAM: {}", name)?;
                if !wait_after.is_zero() {
                    write!(f, " (wait {}s)", wait_after.as_secs_f64())?;
                }
                if let Some(condition) = condition {
                    write!(f, " [if {}]", condition)?;
                }
                Ok(())
            }
            Step::Wait { duration } => {
                write!(f, "WAIT: {} seconds", duration.as_secs_f64())
            }
            Step::Sound {
                frequency_hz,
                duration_ms,
                wait_after,
            } => {
                write!(f, "SOUND: {}Hz for {}ms", frequency_hz, duration_ms)?;
                if !wait_after.is_zero() {
                    write!(f, " (wait {}s)", wait_after.as_secs_f64())?;
                }
                Ok(())
            }
        }
    }
}
