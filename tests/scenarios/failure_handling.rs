//! Test: Failure handling - a rejected dispatch aborts the whole run

use crate::helpers::*;
use std::time::Duration;

/// If step k fails, steps k+1..N never run and stop-all fires exactly once
#[tokio::test]
async fn test_failed_step_aborts_remaining_steps() {
    let (runner, device) = runner_with(MockDevice::new().failing_program("CleanRoom2"));
    runner
        .add_program_step("Initialize", Duration::ZERO, None)
        .add_program_step("CleanRoom1", Duration::ZERO, None)
        .add_program_step("CleanRoom2", Duration::ZERO, None)
        .add_program_step("ReturnHome", Duration::ZERO, None);

    assert!(!runner.run(true).await);

    // Steps already executed stay executed; the failing dispatch is the last.
    assert_programs_run(&device, &["Initialize", "CleanRoom1", "CleanRoom2"]);
    assert_stop_all_count(&device, 1);
}

/// A failed sound dispatch takes the same abort path as a failed program
#[tokio::test]
async fn test_failed_sound_aborts() {
    let (runner, device) = runner_with(MockDevice::new().failing_sound());
    runner
        .add_sound_step(440, 500, Duration::ZERO)
        .add_program_step("Never", Duration::ZERO, None);

    assert!(!runner.run(true).await);
    assert_programs_run(&device, &[]);
    assert_stop_all_count(&device, 1);
}

/// An unreachable device aborts the run before any step executes
#[tokio::test]
async fn test_connect_failure_runs_no_steps() {
    let (runner, device) = runner_with(MockDevice::new().failing_connect());
    runner
        .add_program_step("Init", Duration::ZERO, None)
        .add_sound_step(440, 500, Duration::ZERO);

    assert!(!runner.run(true).await);
    assert_eq!(device.calls(), vec![DeviceCall::Connect]);
}

/// The wait_after of a failed step is not applied
#[tokio::test]
async fn test_failed_step_skips_its_trailing_wait() {
    let (runner, _device) = runner_with(MockDevice::new().failing_program("Broken"));
    runner.add_program_step("Broken", Duration::from_secs(60), None);

    let start = std::time::Instant::now();
    assert!(!runner.run(true).await);
    assert!(start.elapsed() < Duration::from_secs(10));
}

/// A failed run leaves the sequence intact for an explicit re-run
#[tokio::test]
async fn test_failed_run_can_be_reinitiated() {
    let (runner, device) = runner_with(MockDevice::new().failing_program("Flaky"));
    runner
        .add_program_step("Setup", Duration::ZERO, None)
        .add_program_step("Flaky", Duration::ZERO, None);

    assert!(!runner.run(true).await);
    assert!(!runner.run(true).await);

    // No retries inside a run; each explicit run walks the list again.
    assert_programs_run(&device, &["Setup", "Flaky", "Setup", "Flaky"]);
    assert_stop_all_count(&device, 2);
}
