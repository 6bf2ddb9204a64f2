//! Wall-clock triggers - fire full sequence runs at scheduled times

use crate::core::config::Repeat;
use chrono::{DateTime, Local, NaiveTime, Timelike};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Error types for scheduling requests
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid time of day '{0}', expected HH:MM")]
    BadTime(String),

    #[error("unknown repeat mode '{0}', expected once, hourly or daily")]
    UnknownRepeat(String),
}

impl FromStr for Repeat {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "once" => Ok(Repeat::Once),
            "hourly" => Ok(Repeat::Hourly),
            "daily" => Ok(Repeat::Daily),
            other => Err(ScheduleError::UnknownRepeat(other.to_string())),
        }
    }
}

/// A single wall-clock trigger
#[derive(Debug, Clone)]
pub struct Trigger {
    /// Trigger id, handed back by `schedule`
    pub id: Uuid,

    /// Local time of day the trigger fires at
    pub at: NaiveTime,

    /// Repeat cadence
    pub repeat: Repeat,

    last_fired: Option<DateTime<Local>>,
}

impl Trigger {
    fn new(at: NaiveTime, repeat: Repeat) -> Self {
        Self {
            id: Uuid::new_v4(),
            at,
            repeat,
            last_fired: None,
        }
    }

    /// Whether the trigger should fire at `now`
    ///
    /// Daily (and once) triggers fire during the matching HH:MM minute,
    /// at most once per day; hourly triggers fire during the matching
    /// minute of every hour, at most once per hour. Pure over `now`, so
    /// the rules are testable without a clock.
    pub fn is_due(&self, now: DateTime<Local>) -> bool {
        match self.repeat {
            Repeat::Once | Repeat::Daily => {
                now.hour() == self.at.hour()
                    && now.minute() == self.at.minute()
                    && self
                        .last_fired
                        .map_or(true, |fired| fired.date_naive() != now.date_naive())
            }
            Repeat::Hourly => {
                now.minute() == self.at.minute()
                    && self.last_fired.map_or(true, |fired| {
                        (fired.date_naive(), fired.hour()) != (now.date_naive(), now.hour())
                    })
            }
        }
    }
}

/// Runner-owned collection of triggers
///
/// Replaces the process-wide registry a shared scheduling library would
/// keep: every runner polls only its own triggers.
#[derive(Debug, Default)]
pub struct TriggerSet {
    triggers: Vec<Trigger>,
}

impl TriggerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a trigger for a "HH:MM" time of day
    ///
    /// A malformed time drops the request and leaves existing triggers
    /// untouched.
    pub fn add(&mut self, at: &str, repeat: Repeat) -> Result<Uuid, ScheduleError> {
        let time = NaiveTime::parse_from_str(at, "%H:%M")
            .map_err(|_| ScheduleError::BadTime(at.to_string()))?;
        let trigger = Trigger::new(time, repeat);
        let id = trigger.id;
        self.triggers.push(trigger);
        Ok(id)
    }

    /// Collect the ids of triggers due at `now`, marking them fired
    ///
    /// Once-triggers leave the set after their single firing, whether or
    /// not the run they start succeeds.
    pub fn due(&mut self, now: DateTime<Local>) -> Vec<Uuid> {
        let mut fired = Vec::new();
        for trigger in &mut self.triggers {
            if trigger.is_due(now) {
                trigger.last_fired = Some(now);
                fired.push(trigger.id);
            }
        }
        self.triggers
            .retain(|t| !(matches!(t.repeat, Repeat::Once) && t.last_fired.is_some()));
        fired
    }

    /// Registered triggers, in insertion order
    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// Drop all triggers
    pub fn clear(&mut self) {
        self.triggers.clear();
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}

/// Handle to the background trigger-poll task
pub struct SchedulerHandle {
    stop: Arc<AtomicBool>,
    task: tokio::task::JoinHandle<()>,
}

impl SchedulerHandle {
    pub(crate) fn new(stop: Arc<AtomicBool>, task: tokio::task::JoinHandle<()>) -> Self {
        Self { stop, task }
    }

    /// Whether the poll task is still alive
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Request the poll loop to stop and wait briefly for it
    ///
    /// The join is bounded and best-effort: a loop stuck inside a run is
    /// reported, not awaited forever.
    pub async fn stop(self) {
        self.stop.store(true, Ordering::SeqCst);
        match tokio::time::timeout(Duration::from_secs(2), self.task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "scheduler task ended abnormally"),
            Err(_) => warn!("scheduler task did not stop within 2s"),
        }
    }
}
