//! Provider-independent fleet update primitives.
//!
//! This crate owns configuration, deployment command rendering, the
//! membership and remote-command capability traits, and the sequential
//! update loop. It intentionally excludes AWS SDK and Lambda runtime concerns,
//! which live in `fleet_update_lambda`.

pub mod command;
pub mod config;
pub mod contract;
pub mod error;
pub mod fleet;

pub use command::DeploymentCommand;
pub use config::FleetUpdateConfig;
pub use contract::{CommandSubmission, DispatchRecord, FleetUpdateReport};
pub use error::FleetUpdateError;
pub use fleet::{discover_instances, update_fleet, FleetMembership, RemoteCommandService};
