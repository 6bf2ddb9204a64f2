//! Sequence execution engine

pub mod engine;
pub mod executor;
pub mod scheduler;

pub use engine::{EventHandler, RunnerEvent, SequenceRunner};
pub use executor::{StepExecutor, StepResult};
pub use scheduler::{ScheduleError, SchedulerHandle, Trigger, TriggerSet};
