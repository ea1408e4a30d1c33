use thiserror::Error;

/// Failures that abort a fleet update invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FleetUpdateError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("auto scaling group '{group_name}' was not found")]
    GroupNotFound { group_name: String },

    /// The membership query itself failed (transport, auth, throttling).
    #[error("failed to list group members: {0}")]
    Discovery(String),

    #[error("failed to submit command to instance '{instance_id}': {message}")]
    Dispatch {
        instance_id: String,
        message: String,
    },
}
