//! AWS-oriented adapters and handlers for fleet updates.
//!
//! This crate owns runtime integration details (the Lambda handler, the Auto
//! Scaling and Systems Manager clients, log initialization) on top of the
//! provider-independent update loop in `fleet_update_core`.

pub mod adapters;
pub mod handlers;
pub mod logging;
