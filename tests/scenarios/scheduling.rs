//! Test: Scheduling - wall-clock triggers fire sequence runs

use crate::helpers::*;
use brickflow::{Repeat, RunnerEvent};
use chrono::{Local, Timelike};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Current local HH:MM, waiting out the end of a minute so the trigger
/// cannot slip past its window while the test is still setting up
async fn stable_now_hhmm() -> String {
    loop {
        let now = Local::now();
        if now.second() < 57 {
            return now.format("%H:%M").to_string();
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
}

/// A once-trigger fires exactly one run across many poll cycles, then
/// disappears from the trigger set
#[tokio::test]
async fn test_once_trigger_fires_exactly_once() {
    let (runner, device) = runner_with_mock();
    runner.add_program_step("Scheduled", Duration::ZERO, None);

    let at = stable_now_hhmm().await;
    runner.schedule(&at, Repeat::Once).unwrap();

    runner.start_scheduler_with_interval(Duration::from_millis(20));
    tokio::time::sleep(Duration::from_millis(400)).await;
    runner.stop_scheduler().await;

    assert_programs_run(&device, &["Scheduled"]);
    assert!(runner.scheduled_triggers().is_empty());
}

/// A daily trigger fires once in its minute and stays registered
#[tokio::test]
async fn test_daily_trigger_fires_once_and_remains() {
    let (runner, device) = runner_with_mock();
    runner.add_program_step("Scheduled", Duration::ZERO, None);

    let at = stable_now_hhmm().await;
    runner.schedule(&at, Repeat::Daily).unwrap();

    runner.start_scheduler_with_interval(Duration::from_millis(20));
    tokio::time::sleep(Duration::from_millis(400)).await;
    runner.stop_scheduler().await;

    assert_programs_run(&device, &["Scheduled"]);
    assert_eq!(runner.scheduled_triggers().len(), 1);
}

/// A trigger whose time is not now never fires
#[tokio::test]
async fn test_trigger_outside_its_window_does_not_fire() {
    let (runner, device) = runner_with_mock();
    runner.add_program_step("Scheduled", Duration::ZERO, None);

    // Pick a minute guaranteed not to be the current one.
    let now = Local::now();
    let other_minute = (now.minute() + 30) % 60;
    let at = format!("{:02}:{:02}", now.hour(), other_minute);
    runner.schedule(&at, Repeat::Daily).unwrap();

    runner.start_scheduler_with_interval(Duration::from_millis(20));
    tokio::time::sleep(Duration::from_millis(200)).await;
    runner.stop_scheduler().await;

    assert_programs_run(&device, &[]);
}

/// Starting and stopping the scheduler emits the matching events
#[tokio::test]
async fn test_scheduler_lifecycle_events() {
    let (runner, _device) = runner_with_mock();
    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    runner.add_event_handler(move |event| match event {
        RunnerEvent::SchedulerStarted => sink.lock().unwrap().push("started".to_string()),
        RunnerEvent::SchedulerStopped => sink.lock().unwrap().push("stopped".to_string()),
        _ => {}
    });

    runner.start_scheduler_with_interval(Duration::from_millis(20));
    runner.stop_scheduler().await;
    // Stopping again is a no-op and emits nothing.
    runner.stop_scheduler().await;

    assert_eq!(*seen.lock().unwrap(), vec!["started", "stopped"]);
}

/// A malformed schedule request is dropped without touching existing triggers
#[tokio::test]
async fn test_bad_schedule_leaves_existing_triggers_alone() {
    let (runner, _device) = runner_with_mock();
    runner.schedule("06:00", Repeat::Daily).unwrap();

    assert!(runner.schedule("six in the morning", Repeat::Daily).is_err());
    assert!(runner.schedule("25:99", Repeat::Once).is_err());
    assert_eq!(runner.scheduled_triggers().len(), 1);
}
