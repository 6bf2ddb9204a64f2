//! Step executor - dispatches individual steps to the device

use crate::core::{condition::ConditionRegistry, step::Step};
use crate::device::DeviceController;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Granularity at which waits observe the cancel flag
const WAIT_SLICE: Duration = Duration::from_millis(100);

/// Result of executing a single step
#[derive(Debug, Clone)]
pub enum StepResult {
    /// Step was dispatched (and any trailing wait elapsed)
    Completed,

    /// Step's condition did not hold; no device call, no wait
    Skipped { reason: String },

    /// Device rejected the dispatch
    Failed { error: String },

    /// An external cancellation tripped during the step
    Interrupted,
}

/// Executes a single step against the device
pub struct StepExecutor<D> {
    device: Arc<D>,
}

impl<D: DeviceController> StepExecutor<D> {
    pub fn new(device: Arc<D>) -> Self {
        Self { device }
    }

    /// Execute a step and return the result
    ///
    /// Conditions are evaluated here, fresh, at the moment the step is
    /// reached. All waits are sliced so `cancel` takes effect within
    /// roughly [`WAIT_SLICE`].
    pub async fn execute(
        &self,
        step: &Step,
        conditions: &ConditionRegistry,
        cancel: &AtomicBool,
    ) -> StepResult {
        if cancel.load(Ordering::SeqCst) {
            return StepResult::Interrupted;
        }

        if let Some(name) = step.condition() {
            if !conditions.evaluate(name) {
                return StepResult::Skipped {
                    reason: format!("condition '{}' not met", name),
                };
            }
        }

        match step {
            Step::Program { name, wait_after, .. } => {
                if let Err(e) = self.device.run_program(name).await {
                    return StepResult::Failed {
                        error: e.to_string(),
                    };
                }
                if self.pause(*wait_after, cancel).await {
                    return StepResult::Interrupted;
                }
            }
            Step::Wait { duration } => {
                info!(seconds = duration.as_secs_f64(), "waiting");
                if self.pause(*duration, cancel).await {
                    return StepResult::Interrupted;
                }
            }
            Step::Sound {
                frequency_hz,
                duration_ms,
                wait_after,
            } => {
                if let Err(e) = self.device.play_sound(*frequency_hz, *duration_ms).await {
                    return StepResult::Failed {
                        error: e.to_string(),
                    };
                }
                // The tone rings on the brick asynchronously; hold the
                // sequence for its duration before the trailing wait.
                let ringing = Duration::from_millis(u64::from(*duration_ms));
                if self.pause(ringing, cancel).await || self.pause(*wait_after, cancel).await {
                    return StepResult::Interrupted;
                }
            }
        }

        StepResult::Completed
    }

    /// Sleep in slices, reporting whether the cancel flag tripped
    async fn pause(&self, duration: Duration, cancel: &AtomicBool) -> bool {
        if duration.is_zero() {
            return cancel.load(Ordering::SeqCst);
        }

        debug!(seconds = duration.as_secs_f64(), "pausing");
        let mut remaining = duration;
        while !remaining.is_zero() {
            if cancel.load(Ordering::SeqCst) {
                return true;
            }
            let slice = remaining.min(WAIT_SLICE);
            tokio::time::sleep(slice).await;
            remaining = remaining.saturating_sub(slice);
        }
        cancel.load(Ordering::SeqCst)
    }
}
