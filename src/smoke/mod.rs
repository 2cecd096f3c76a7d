//! Smoke-test probe: polling client and acceptance checks.

pub mod client;
pub mod runner;

pub use client::TargetClient;
pub use runner::{run_checks, wait_for_healthy, PollConfig, SmokeReport};
