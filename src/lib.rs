//! Demo test-target HTTP service and smoke-test probe.
//!
//! The service exposes three stateless endpoints used by test
//! orchestrators as a known-good target:
//!
//! ```text
//! GET  /health  -> {"status": "ok"}
//! GET  /info    -> {"service": "demo-test-target", "host": ..., "env": ..., "uptime_seconds": ...}
//! POST /echo    -> {"echo": <message>}
//! ```
//!
//! The smoke probe polls `/health` until the target comes up, then runs
//! the acceptance checks against all three endpoints.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`api`]: HTTP handlers and routes for the target service
//! - [`smoke`]: Polling client and smoke-check runner
//! - [`metrics`]: Request and probe metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod smoke;
pub mod utils;

pub use config::Config;
pub use error::{Result, SmokeError, TargetError};

/// Service name reported by `/info` and asserted by the smoke checks.
pub const SERVICE_NAME: &str = "demo-test-target";
