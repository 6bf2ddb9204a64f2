//! Scenario-based tests for brickflow

#[path = "../helpers.rs"]
mod helpers;

mod condition_gating;
mod failure_handling;
mod ordering;
mod scheduling;
