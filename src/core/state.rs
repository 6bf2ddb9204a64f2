//! Run state bookkeeping

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a single sequence run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run has not started
    Pending,
    /// Run is in progress
    Running,
    /// Every step completed or was skipped
    Completed,
    /// A step failed or the device was unreachable
    Failed,
    /// The run was interrupted from outside
    Cancelled,
}

/// Summary of one `run` invocation
///
/// Purely informational: reports live only as long as the process,
/// nothing is persisted across restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique id for this run
    pub run_id: Uuid,

    /// Current status
    pub status: RunStatus,

    /// When the run started
    pub started_at: Option<DateTime<Utc>>,

    /// When the run finished, failed or was cancelled
    pub completed_at: Option<DateTime<Utc>>,

    /// Number of steps in the snapshot this run walked
    pub total_steps: usize,

    /// Steps that were dispatched and completed
    pub executed_steps: usize,

    /// Steps skipped because their condition did not hold
    pub skipped_steps: usize,
}

impl RunReport {
    /// Create a report for a run over `total_steps` steps
    pub fn new(total_steps: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            status: RunStatus::Pending,
            started_at: None,
            completed_at: None,
            total_steps,
            executed_steps: 0,
            skipped_steps: 0,
        }
    }

    /// Mark the run as started
    pub fn start(&mut self) {
        self.status = RunStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Mark the run as completed
    pub fn complete(&mut self) {
        self.status = RunStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the run as failed
    pub fn fail(&mut self) {
        self.status = RunStatus::Failed;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the run as cancelled
    pub fn cancel(&mut self) {
        self.status = RunStatus::Cancelled;
        self.completed_at = Some(Utc::now());
    }

    /// Whether the run walked the whole sequence
    pub fn succeeded(&self) -> bool {
        self.status == RunStatus::Completed
    }
}
