//! brickflow - automation sequence runner for LEGO Mindstorms EV3 bricks

pub mod cli;
pub mod core;
pub mod device;
pub mod execution;

// Re-export commonly used types
pub use crate::core::{
    ConditionError, ConditionRegistry, Repeat, RunReport, RunStatus, Sequence, SequenceConfig,
    Step,
};
pub use crate::device::{DeviceController, DeviceError, SimulatedBrick};
pub use crate::execution::{RunnerEvent, ScheduleError, SequenceRunner, Trigger, TriggerSet};
