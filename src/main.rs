mod cli;
mod core;
mod device;
mod execution;

use anyhow::{Context, Result};
use cli::commands::{RunCommand, ShowCommand, ValidateCommand};
use cli::output::*;
use cli::{Cli, Command};
use crate::core::config::SequenceConfig;
use device::{DeviceController, SimulatedBrick};
use execution::{RunnerEvent, SequenceRunner};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    match &cli.command {
        Command::Run(cmd) => run_sequence(cmd).await?,
        Command::Validate(cmd) => validate_sequence(cmd)?,
        Command::Show(cmd) => show_sequence(cmd)?,
    }

    Ok(())
}

async fn run_sequence(cmd: &RunCommand) -> Result<()> {
    let config = SequenceConfig::from_file(&cmd.file)
        .context("Failed to load sequence config")?;

    println!("{} Loaded sequence: {}", INFO, style(&config.name).bold());

    let brick = Arc::new(SimulatedBrick::new().with_battery(cmd.battery));
    let runner = SequenceRunner::new(brick.clone());
    runner.load(config.to_sequence());

    // Battery gate used by the bundled sequences
    let battery = brick.clone();
    runner.add_condition("battery_ok", move || battery.battery_level() > 30);

    // Ctrl-C interrupts the run in flight and stops the motors
    let interrupter = runner.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupter.cancel();
        }
    });

    if cmd.watch {
        return watch_sequence(cmd, &config, runner).await;
    }

    let progress = create_progress_bar(config.steps.len());
    let bar = progress.clone();
    runner.add_event_handler(move |event| {
        if matches!(
            event,
            RunnerEvent::StepCompleted { .. } | RunnerEvent::StepSkipped { .. }
        ) {
            bar.inc(1);
        }
        bar.println(format_runner_event(&event));
    });

    println!();
    let report = runner.run_with_report(!cmd.no_connect).await;
    progress.finish_and_clear();
    brick.disconnect().await;

    println!(
        "\n{} executed, {} skipped - {}",
        report.executed_steps,
        report.skipped_steps,
        format_status(report.status)
    );

    if report.succeeded() {
        println!(
            "{} {} completed {}",
            CHECK,
            style(&config.name).bold(),
            style("successfully").green()
        );
    } else {
        println!(
            "{} {} {}",
            CROSS,
            style(&config.name).bold(),
            style("failed").red()
        );
        std::process::exit(1);
    }

    Ok(())
}

async fn watch_sequence(
    cmd: &RunCommand,
    config: &SequenceConfig,
    runner: SequenceRunner<SimulatedBrick>,
) -> Result<()> {
    runner.add_event_handler(|event| println!("{}", format_runner_event(&event)));

    for schedule in &config.schedules {
        match runner.schedule(&schedule.at, schedule.repeat) {
            Ok(_) => println!(
                "{} Scheduled at {} ({})",
                INFO,
                style(&schedule.at).cyan(),
                style(format!("{:?}", schedule.repeat).to_lowercase()).dim()
            ),
            Err(e) => println!("{} {}", WARN, style(e).yellow()),
        }
    }

    if runner.scheduled_triggers().is_empty() {
        anyhow::bail!("'{}' has no valid schedules to watch", cmd.file);
    }

    runner.start_scheduler();
    println!("{} Scheduler running, press Ctrl-C to stop", ROCKET);

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    runner.cancel();
    runner.stop_scheduler().await;

    Ok(())
}

fn validate_sequence(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating sequence...", INFO);

    match SequenceConfig::from_file(&cmd.file) {
        Ok(config) => {
            println!("{} Sequence configuration is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            println!("  Steps: {}", style(config.steps.len()).cyan());
            println!("  Schedules: {}", style(config.schedules.len()).cyan());

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}

fn show_sequence(cmd: &ShowCommand) -> Result<()> {
    let config = SequenceConfig::from_file(&cmd.file)
        .context("Failed to load sequence config")?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let sequence = config.to_sequence();
    if sequence.is_empty() {
        println!("{} No automation sequence defined", INFO);
        return Ok(());
    }

    println!(
        "{} {} ({} steps)",
        INFO,
        style(sequence.name()).bold(),
        sequence.len()
    );
    for (index, step) in sequence.steps().iter().enumerate() {
        println!("  {}. {}", index + 1, step);
    }

    for schedule in &config.schedules {
        println!(
            "  {} at {} ({})",
            style("scheduled").dim(),
            style(&schedule.at).cyan(),
            style(format!("{:?}", schedule.repeat).to_lowercase()).dim()
        );
    }

    Ok(())
}
