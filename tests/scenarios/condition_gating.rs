//! Test: Condition gating - named conditions decide whether steps run

use crate::helpers::*;
use brickflow::ConditionError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A step with an unregistered condition name always executes
#[tokio::test]
async fn test_unregistered_condition_executes() {
    let (runner, device) = runner_with_mock();
    runner.add_program_step("Init", Duration::ZERO, Some("never_registered"));

    assert!(runner.run(true).await);
    assert_programs_run(&device, &["Init"]);
}

/// A false condition skips the step: no device call and no trailing wait
#[tokio::test]
async fn test_false_condition_skips_device_call_and_wait() {
    let (runner, device) = runner_with_mock();
    runner.add_condition("battery_ok", || false);
    runner
        .add_program_step("Init", Duration::from_secs(60), Some("battery_ok"))
        .add_program_step("Clean", Duration::ZERO, None);

    let start = std::time::Instant::now();
    let report = runner.run_with_report(true).await;

    assert!(report.succeeded());
    assert_eq!(report.skipped_steps, 1);
    assert_eq!(report.executed_steps, 1);
    assert_programs_run(&device, &["Clean"]);
    // The skipped step's 60 s wait_after must not have been applied.
    assert!(start.elapsed() < Duration::from_secs(10));
}

/// Conditions are re-evaluated on every run, never cached
#[tokio::test]
async fn test_condition_reevaluated_each_run() {
    let (runner, device) = runner_with_mock();

    let gate = Arc::new(AtomicBool::new(false));
    let probe = gate.clone();
    runner.add_condition("docked", move || probe.load(Ordering::SeqCst));
    runner.add_program_step("Unload", Duration::ZERO, Some("docked"));

    assert!(runner.run(true).await);
    assert_programs_run(&device, &[]);

    gate.store(true, Ordering::SeqCst);
    assert!(runner.run(true).await);
    assert_programs_run(&device, &["Unload"]);
}

/// A failing probe counts as false: the step is skipped, the run goes on
#[tokio::test]
async fn test_failing_probe_skips_step_without_aborting() {
    let (runner, device) = runner_with_mock();
    runner.add_fallible_condition("gyro_ready", || {
        Err(ConditionError::SensorUnavailable("port 2".to_string()))
    });
    runner
        .add_program_step("Calibrate", Duration::ZERO, Some("gyro_ready"))
        .add_program_step("Clean", Duration::ZERO, None);

    let report = runner.run_with_report(true).await;
    assert!(report.succeeded());
    assert_eq!(report.skipped_steps, 1);
    assert_programs_run(&device, &["Clean"]);
    assert_stop_all_count(&device, 0);
}

/// Missing and failing conditions land on opposite defaults
#[tokio::test]
async fn test_missing_and_failing_conditions_are_asymmetric() {
    let (runner, device) = runner_with_mock();
    runner.add_fallible_condition("broken", || {
        Err(ConditionError::Probe("boom".to_string()))
    });
    runner
        .add_program_step("RunsAnyway", Duration::ZERO, Some("missing"))
        .add_program_step("Skipped", Duration::ZERO, Some("broken"));

    assert!(runner.run(true).await);
    assert_programs_run(&device, &["RunsAnyway"]);
}
