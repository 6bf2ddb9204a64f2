//! Sequence runner - orchestrates full automation runs

use crate::core::{
    condition::{ConditionError, ConditionRegistry},
    config::Repeat,
    sequence::Sequence,
    state::RunReport,
    step::Step,
};
use crate::device::DeviceController;
use crate::execution::{
    executor::{StepExecutor, StepResult},
    scheduler::{ScheduleError, SchedulerHandle, TriggerSet},
};
use chrono::Local;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Default trigger-poll resolution
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Events emitted while building and running sequences
#[derive(Debug, Clone)]
pub enum RunnerEvent {
    StepAdded {
        index: usize,
        kind: &'static str,
    },
    SequenceStarted {
        run_id: Uuid,
        total_steps: usize,
    },
    StepStarted {
        index: usize,
        kind: &'static str,
    },
    StepSkipped {
        index: usize,
        reason: String,
    },
    StepFailed {
        index: usize,
        error: String,
    },
    StepCompleted {
        index: usize,
    },
    SequenceCompleted {
        run_id: Uuid,
    },
    SequenceCancelled {
        run_id: Uuid,
    },
    SequenceError {
        run_id: Uuid,
        message: String,
    },
    SchedulerStarted,
    SchedulerStopped,
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(RunnerEvent) + Send + Sync>;

/// Automation sequence runner
///
/// Owns the step list, the condition registry and the trigger set, and
/// drives them against one device. All shared state sits behind `Arc`, so
/// cloning a runner yields another handle onto the same session — that is
/// how the scheduler task runs sequences in the background.
///
/// A runner supports at most one run in flight; overlapping `run` calls
/// would share the single device connection and are not supported (this is
/// a documented constraint, not enforced with a lock).
pub struct SequenceRunner<D> {
    device: Arc<D>,
    executor: Arc<StepExecutor<D>>,
    sequence: Arc<Mutex<Sequence>>,
    conditions: Arc<Mutex<ConditionRegistry>>,
    triggers: Arc<Mutex<TriggerSet>>,
    handlers: Arc<Mutex<Vec<EventHandler>>>,
    cancel: Arc<AtomicBool>,
    scheduler: Arc<Mutex<Option<SchedulerHandle>>>,
}

impl<D> Clone for SequenceRunner<D> {
    fn clone(&self) -> Self {
        Self {
            device: self.device.clone(),
            executor: self.executor.clone(),
            sequence: self.sequence.clone(),
            conditions: self.conditions.clone(),
            triggers: self.triggers.clone(),
            handlers: self.handlers.clone(),
            cancel: self.cancel.clone(),
            scheduler: self.scheduler.clone(),
        }
    }
}

impl<D: DeviceController + 'static> SequenceRunner<D> {
    /// Create a runner for the given device with an empty sequence
    pub fn new(device: Arc<D>) -> Self {
        Self {
            executor: Arc::new(StepExecutor::new(device.clone())),
            device,
            sequence: Arc::new(Mutex::new(Sequence::new("sequence"))),
            conditions: Arc::new(Mutex::new(ConditionRegistry::new())),
            triggers: Arc::new(Mutex::new(TriggerSet::new())),
            handlers: Arc::new(Mutex::new(Vec::new())),
            cancel: Arc::new(AtomicBool::new(false)),
            scheduler: Arc::new(Mutex::new(None)),
        }
    }

    // ── building ───────────────────────────────────────────────────

    /// Replace the whole sequence (used when loading one from config)
    pub fn load(&self, sequence: Sequence) -> &Self {
        *self.sequence_guard() = sequence;
        self
    }

    /// Append a program execution step
    pub fn add_program_step(
        &self,
        name: impl Into<String>,
        wait_after: Duration,
        condition: Option<&str>,
    ) -> &Self {
        self.push_step(Step::Program {
            name: name.into(),
            wait_after,
            condition: condition.map(str::to_string),
        })
    }

    /// Append a wait step
    pub fn add_wait_step(&self, duration: Duration) -> &Self {
        self.push_step(Step::Wait { duration })
    }

    /// Append a sound step
    pub fn add_sound_step(&self, frequency_hz: u32, duration_ms: u32, wait_after: Duration) -> &Self {
        self.push_step(Step::Sound {
            frequency_hz,
            duration_ms,
            wait_after,
        })
    }

    /// Append an already-built step
    pub fn push_step(&self, step: Step) -> &Self {
        let kind = step.kind();
        let index = {
            let mut sequence = self.sequence_guard();
            sequence.push(step);
            sequence.len() - 1
        };
        info!(index, kind, "added step");
        self.emit(RunnerEvent::StepAdded { index, kind });
        self
    }

    /// Register a named condition, overwriting any existing one
    pub fn add_condition<F>(&self, name: impl Into<String>, predicate: F) -> &Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        info!(condition = %name, "added condition");
        self.conditions_guard().register(name, predicate);
        self
    }

    /// Register a condition whose probe can fail
    pub fn add_fallible_condition<F>(&self, name: impl Into<String>, predicate: F) -> &Self
    where
        F: Fn() -> Result<bool, ConditionError> + Send + Sync + 'static,
    {
        let name = name.into();
        info!(condition = %name, "added condition");
        self.conditions_guard().register_fallible(name, predicate);
        self
    }

    /// Register an event listener
    pub fn add_event_handler<F>(&self, handler: F) -> &Self
    where
        F: Fn(RunnerEvent) + Send + Sync + 'static,
    {
        self.handlers_guard().push(Arc::new(handler));
        self
    }

    /// Current steps, in execution order
    pub fn steps(&self) -> Vec<Step> {
        self.sequence_guard().steps().to_vec()
    }

    /// Name of the loaded sequence
    pub fn sequence_name(&self) -> String {
        self.sequence_guard().name().to_string()
    }

    /// Remove all steps; scheduled triggers are unaffected
    pub fn clear(&self) {
        self.sequence_guard().clear();
        info!("automation sequence cleared");
    }

    // ── running ────────────────────────────────────────────────────

    /// Execute the sequence once, returning whether it ran to the end
    pub async fn run(&self, connect_first: bool) -> bool {
        self.run_with_report(connect_first).await.succeeded()
    }

    /// Execute the sequence once and return the full run report
    pub async fn run_with_report(&self, connect_first: bool) -> RunReport {
        let steps = self.steps();
        let mut report = RunReport::new(steps.len());

        if steps.is_empty() {
            warn!("no automation sequence defined");
            return report;
        }

        // A fresh run clears any cancellation left over from the last one.
        self.cancel.store(false, Ordering::SeqCst);

        if connect_first && !self.device.is_connected() {
            info!("connecting to the brick");
            if let Err(e) = self.device.connect().await {
                error!(error = %e, "failed to connect to the brick");
                self.emit(RunnerEvent::SequenceError {
                    run_id: report.run_id,
                    message: e.to_string(),
                });
                report.fail();
                return report;
            }
        }

        // Snapshot the registry: steps read it, never write it, and the
        // predicates themselves still run fresh at each gate.
        let conditions = self.conditions_guard().clone();

        report.start();
        info!(steps = steps.len(), "starting automation sequence");
        self.emit(RunnerEvent::SequenceStarted {
            run_id: report.run_id,
            total_steps: steps.len(),
        });

        for (index, step) in steps.iter().enumerate() {
            info!(
                step = index + 1,
                total = steps.len(),
                kind = step.kind(),
                "executing step"
            );
            self.emit(RunnerEvent::StepStarted {
                index,
                kind: step.kind(),
            });

            match self.executor.execute(step, &conditions, &self.cancel).await {
                StepResult::Completed => {
                    report.executed_steps += 1;
                    self.emit(RunnerEvent::StepCompleted { index });
                }
                StepResult::Skipped { reason } => {
                    info!(step = index + 1, reason = %reason, "skipping step");
                    report.skipped_steps += 1;
                    self.emit(RunnerEvent::StepSkipped { index, reason });
                }
                StepResult::Failed { error } => {
                    error!(step = index + 1, error = %error, "step failed");
                    self.emit(RunnerEvent::StepFailed { index, error });
                    self.halt_device().await;
                    report.fail();
                    return report;
                }
                StepResult::Interrupted => {
                    info!("automation sequence interrupted");
                    self.halt_device().await;
                    self.emit(RunnerEvent::SequenceCancelled {
                        run_id: report.run_id,
                    });
                    report.cancel();
                    return report;
                }
            }
        }

        report.complete();
        info!("automation sequence completed");
        self.emit(RunnerEvent::SequenceCompleted {
            run_id: report.run_id,
        });
        report
    }

    /// Interrupt the run in flight, if any
    ///
    /// The executor notices the flag at its next wait slice and the run
    /// takes the stop-all abort path.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    async fn halt_device(&self) {
        if let Err(e) = self.device.stop_all().await {
            error!(error = %e, "failed to stop motors");
        }
    }

    // ── scheduling ─────────────────────────────────────────────────

    /// Register a trigger that runs the sequence at a "HH:MM" local time
    ///
    /// A malformed time is reported and dropped; existing triggers are
    /// unaffected either way.
    pub fn schedule(&self, at: &str, repeat: Repeat) -> Result<Uuid, ScheduleError> {
        let id = self.triggers_guard().add(at, repeat)?;
        info!(%at, ?repeat, "scheduled sequence");
        Ok(id)
    }

    /// Registered triggers
    pub fn scheduled_triggers(&self) -> Vec<crate::execution::scheduler::Trigger> {
        self.triggers_guard().triggers().to_vec()
    }

    /// Drop all triggers; a running scheduler keeps polling the empty set
    pub fn clear_schedule(&self) {
        self.triggers_guard().clear();
        info!("all scheduled triggers cleared");
    }

    /// Start the background trigger-poll loop (~1 s resolution)
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_scheduler(&self) {
        self.start_scheduler_with_interval(POLL_INTERVAL);
    }

    /// Start the poll loop with a custom poll interval
    pub fn start_scheduler_with_interval(&self, poll_interval: Duration) {
        let mut slot = self.scheduler_guard();
        if slot.as_ref().map(SchedulerHandle::is_running).unwrap_or(false) {
            warn!("scheduler is already running");
            return;
        }

        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let runner = self.clone();
        let task = tokio::spawn(async move {
            info!("scheduler started");
            loop {
                if stop_flag.load(Ordering::SeqCst) {
                    break;
                }
                let due = runner.triggers_guard().due(Local::now());
                for trigger_id in due {
                    info!(%trigger_id, "running scheduled automation sequence");
                    if !runner.run(true).await {
                        warn!(%trigger_id, "scheduled run did not complete");
                    }
                }
                tokio::time::sleep(poll_interval).await;
            }
            info!("scheduler stopped");
        });

        *slot = Some(SchedulerHandle::new(stop, task));
        drop(slot);
        self.emit(RunnerEvent::SchedulerStarted);
    }

    /// Stop the trigger-poll loop; safe to call any number of times
    pub async fn stop_scheduler(&self) {
        let handle = self.scheduler_guard().take();
        match handle {
            Some(handle) => {
                handle.stop().await;
                self.emit(RunnerEvent::SchedulerStopped);
            }
            None => debug!("scheduler is not running"),
        }
    }

    // ── internals ──────────────────────────────────────────────────

    fn emit(&self, event: RunnerEvent) {
        let handlers = self.handlers_guard().clone();
        for handler in handlers {
            handler(event.clone());
        }
    }

    fn sequence_guard(&self) -> MutexGuard<'_, Sequence> {
        self.sequence.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn conditions_guard(&self) -> MutexGuard<'_, ConditionRegistry> {
        self.conditions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn triggers_guard(&self) -> MutexGuard<'_, TriggerSet> {
        self.triggers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handlers_guard(&self) -> MutexGuard<'_, Vec<EventHandler>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn scheduler_guard(&self) -> MutexGuard<'_, Option<SchedulerHandle>> {
        self.scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
