//! Test: Ordering - steps run in insertion order and read back exactly

use crate::helpers::*;
use brickflow::Step;
use std::time::Duration;

/// Every step of an unconditional sequence runs, in insertion order
#[tokio::test]
async fn test_all_steps_execute_in_insertion_order() {
    let (runner, device) = runner_with_mock();
    runner
        .add_program_step("Initialize", Duration::ZERO, None)
        .add_program_step("CleanRoom1", Duration::ZERO, None)
        .add_program_step("CleanRoom2", Duration::ZERO, None)
        .add_program_step("ReturnHome", Duration::ZERO, None);

    assert!(runner.run(true).await);
    assert_programs_run(
        &device,
        &["Initialize", "CleanRoom1", "CleanRoom2", "ReturnHome"],
    );
    assert_stop_all_count(&device, 0);
}

/// Mixed step kinds keep their relative order on the device
#[tokio::test]
async fn test_mixed_kinds_dispatch_in_order() {
    let (runner, device) = runner_with_mock();
    runner
        .add_sound_step(220, 1, Duration::ZERO)
        .add_program_step("PatrolRoute1", Duration::ZERO, None)
        .add_wait_step(Duration::from_millis(10))
        .add_sound_step(880, 1, Duration::ZERO);

    assert!(runner.run(true).await);
    assert_eq!(
        device.calls(),
        vec![
            DeviceCall::Connect,
            DeviceCall::PlaySound(220, 1),
            DeviceCall::RunProgram("PatrolRoute1".to_string()),
            DeviceCall::PlaySound(880, 1),
        ]
    );
}

/// Building a sequence and reading it back yields the exact steps added
#[tokio::test]
async fn test_round_trip_listing() {
    let (runner, _device) = runner_with_mock();
    runner
        .add_sound_step(440, 500, Duration::ZERO)
        .add_program_step("Init", Duration::from_secs(2), Some("battery_ok"))
        .add_wait_step(Duration::from_secs(1))
        .add_program_step("Clean", Duration::from_secs(1), None);

    assert_eq!(
        runner.steps(),
        vec![
            Step::Sound {
                frequency_hz: 440,
                duration_ms: 500,
                wait_after: Duration::ZERO,
            },
            Step::Program {
                name: "Init".to_string(),
                wait_after: Duration::from_secs(2),
                condition: Some("battery_ok".to_string()),
            },
            Step::Wait {
                duration: Duration::from_secs(1),
            },
            Step::Program {
                name: "Clean".to_string(),
                wait_after: Duration::from_secs(1),
                condition: None,
            },
        ]
    );
}

/// An emptied sequence refuses to run without touching the device
#[tokio::test]
async fn test_clear_then_run_returns_false_without_device_calls() {
    let (runner, device) = runner_with_mock();
    runner
        .add_program_step("Init", Duration::ZERO, None)
        .add_sound_step(440, 1, Duration::ZERO);
    runner.clear();

    assert!(!runner.run(true).await);
    assert!(device.calls().is_empty());
}
