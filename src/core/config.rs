//! Sequence configuration from YAML

use crate::core::sequence::Sequence;
use anyhow::Result;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// How often a schedule entry fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    /// Fire a single time, then drop the trigger
    Once,
    /// Fire every hour at the minute of the given time
    Hourly,
    /// Fire every day at the given time
    Daily,
}

/// Top-level sequence configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// Sequence name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Sequence steps, in execution order
    pub steps: Vec<StepConfig>,

    /// Wall-clock schedules for this sequence
    #[serde(default)]
    pub schedules: Vec<ScheduleConfig>,
}

/// Step entry as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StepConfig {
    /// Run a program stored on the brick
    Program {
        /// Program name on the brick
        program: String,

        /// Seconds to pause after starting the program
        #[serde(default)]
        wait_after_secs: f64,

        /// Optional condition name gating this step
        #[serde(default)]
        condition: Option<String>,
    },

    /// Pause without touching the device
    Wait {
        /// Seconds to pause
        secs: f64,
    },

    /// Play a tone on the brick speaker
    Sound {
        /// Tone frequency in Hz
        #[serde(default = "default_frequency_hz")]
        frequency_hz: u32,

        /// Tone duration in milliseconds
        #[serde(default = "default_duration_ms")]
        duration_ms: u32,

        /// Seconds to pause after the tone
        #[serde(default)]
        wait_after_secs: f64,
    },
}

/// Schedule entry as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Time of day in HH:MM
    pub at: String,

    /// Repeat cadence
    #[serde(default = "default_repeat")]
    pub repeat: Repeat,
}

fn default_frequency_hz() -> u32 {
    440
}

fn default_duration_ms() -> u32 {
    1000
}

fn default_repeat() -> Repeat {
    Repeat::Daily
}

impl SequenceConfig {
    /// Load a sequence configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a sequence configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: SequenceConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            match step {
                StepConfig::Program {
                    program,
                    wait_after_secs,
                    ..
                } => {
                    if program.trim().is_empty() {
                        anyhow::bail!("step {}: program name must not be empty", index + 1);
                    }
                    validate_seconds(index, "wait_after_secs", *wait_after_secs)?;
                }
                StepConfig::Wait { secs } => {
                    validate_seconds(index, "secs", *secs)?;
                }
                StepConfig::Sound {
                    frequency_hz,
                    duration_ms,
                    wait_after_secs,
                } => {
                    if *frequency_hz == 0 {
                        anyhow::bail!("step {}: frequency_hz must be greater than 0", index + 1);
                    }
                    if *duration_ms == 0 {
                        anyhow::bail!("step {}: duration_ms must be greater than 0", index + 1);
                    }
                    validate_seconds(index, "wait_after_secs", *wait_after_secs)?;
                }
            }
        }

        for schedule in &self.schedules {
            if NaiveTime::parse_from_str(&schedule.at, "%H:%M").is_err() {
                anyhow::bail!("invalid schedule time '{}', expected HH:MM", schedule.at);
            }
        }

        Ok(())
    }

    /// Convert the configuration into a domain [`Sequence`]
    pub fn to_sequence(&self) -> Sequence {
        let mut sequence = Sequence::new(&self.name);

        for step in &self.steps {
            match step {
                StepConfig::Program {
                    program,
                    wait_after_secs,
                    condition,
                } => {
                    sequence.add_program_step(
                        program,
                        Duration::from_secs_f64(*wait_after_secs),
                        condition.as_deref(),
                    );
                }
                StepConfig::Wait { secs } => {
                    sequence.add_wait_step(Duration::from_secs_f64(*secs));
                }
                StepConfig::Sound {
                    frequency_hz,
                    duration_ms,
                    wait_after_secs,
                } => {
                    sequence.add_sound_step(
                        *frequency_hz,
                        *duration_ms,
                        Duration::from_secs_f64(*wait_after_secs),
                    );
                }
            }
        }

        sequence
    }
}

fn validate_seconds(index: usize, field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        anyhow::bail!(
            "step {}: {} must be a non-negative number of seconds",
            index + 1,
            field
        );
    }
    Ok(())
}
