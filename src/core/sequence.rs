//! Sequence domain model

use crate::core::step::Step;
use std::time::Duration;

/// An ordered automation sequence
///
/// Steps execute in insertion order. The list only grows through the
/// `add_*` builders (or `push`) and only shrinks through [`Sequence::clear`];
/// a run never mutates it.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    /// Sequence name, used in logs and listings
    name: String,

    /// Steps in execution order
    steps: Vec<Step>,
}

impl Sequence {
    /// Create an empty sequence
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Sequence name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a program execution step
    pub fn add_program_step(
        &mut self,
        name: impl Into<String>,
        wait_after: Duration,
        condition: Option<&str>,
    ) -> &mut Self {
        self.push(Step::Program {
            name: name.into(),
            wait_after,
            condition: condition.map(str::to_string),
        })
    }

    /// Append a wait step
    pub fn add_wait_step(&mut self, duration: Duration) -> &mut Self {
        self.push(Step::Wait { duration })
    }

    /// Append a sound step
    pub fn add_sound_step(
        &mut self,
        frequency_hz: u32,
        duration_ms: u32,
        wait_after: Duration,
    ) -> &mut Self {
        self.push(Step::Sound {
            frequency_hz,
            duration_ms,
            wait_after,
        })
    }

    /// Append an already-built step
    pub fn push(&mut self, step: Step) -> &mut Self {
        self.steps.push(step);
        self
    }

    /// Steps in insertion order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Remove all steps
    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the sequence has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
