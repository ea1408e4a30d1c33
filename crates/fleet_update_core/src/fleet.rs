use std::time::Instant;

use tracing::{error, info};

use crate::command::DeploymentCommand;
use crate::config::FleetUpdateConfig;
use crate::contract::{CommandSubmission, DispatchRecord, FleetUpdateReport};
use crate::error::FleetUpdateError;

/// Read-only view of scaling group membership.
pub trait FleetMembership {
    /// Instance ids registered in `group_name`, in provider order.
    ///
    /// `Ok(None)` means the provider does not know the group; an existing
    /// group without members is `Ok(Some(vec![]))`.
    fn list_members(&self, group_name: &str) -> Result<Option<Vec<String>>, String>;
}

/// Fire-and-forget shell execution on one instance.
pub trait RemoteCommandService {
    fn submit(
        &self,
        instance_id: &str,
        command: &DeploymentCommand,
    ) -> Result<CommandSubmission, String>;
}

pub fn discover_instances(
    group_name: &str,
    membership: &impl FleetMembership,
) -> Result<Vec<String>, FleetUpdateError> {
    match membership.list_members(group_name) {
        Ok(Some(instance_ids)) => Ok(instance_ids),
        Ok(None) => Err(FleetUpdateError::GroupNotFound {
            group_name: group_name.to_string(),
        }),
        Err(message) => Err(FleetUpdateError::Discovery(message)),
    }
}

/// Deploy the configured artifact to every member of the group, one instance
/// at a time. The first failure aborts the run; instances after it are not
/// contacted.
pub fn update_fleet(
    config: &FleetUpdateConfig,
    membership: &impl FleetMembership,
    commands: &impl RemoteCommandService,
) -> Result<FleetUpdateReport, FleetUpdateError> {
    config.validate()?;

    let started_at = Instant::now();
    let command = DeploymentCommand::render(config);
    let command_fingerprint = command.fingerprint();
    let group_name = config.group_name.as_str();

    let instance_ids = discover_instances(group_name, membership).inspect_err(|error| {
        error!(group_name, error = %error, "fleet discovery failed");
    })?;
    info!(
        group_name,
        members = instance_ids.len(),
        command_fingerprint = %command_fingerprint,
        "fleet members discovered"
    );

    let mut dispatches = Vec::with_capacity(instance_ids.len());
    for instance_id in instance_ids {
        let submission = commands.submit(&instance_id, &command).map_err(|message| {
            error!(
                group_name,
                instance_id = %instance_id,
                dispatched = dispatches.len(),
                error = %message,
                "command submission failed"
            );
            FleetUpdateError::Dispatch {
                instance_id: instance_id.clone(),
                message,
            }
        })?;

        info!(
            group_name,
            instance_id = %instance_id,
            command_id = submission.command_id.as_deref().unwrap_or("-"),
            "command submitted"
        );
        dispatches.push(DispatchRecord {
            instance_id,
            command_id: submission.command_id,
        });
    }

    info!(
        group_name,
        instances_dispatched = dispatches.len(),
        duration_ms = started_at.elapsed().as_millis() as u64,
        "fleet update submitted"
    );

    Ok(FleetUpdateReport::submitted(
        group_name,
        dispatches,
        command_fingerprint,
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct StaticMembership(Result<Option<Vec<String>>, String>);

    impl FleetMembership for StaticMembership {
        fn list_members(&self, _group_name: &str) -> Result<Option<Vec<String>>, String> {
            self.0.clone()
        }
    }

    struct CapturingCommands {
        submitted: Mutex<Vec<String>>,
    }

    impl CapturingCommands {
        fn new() -> Self {
            Self {
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn submitted(&self) -> Vec<String> {
            self.submitted.lock().expect("poisoned mutex").clone()
        }
    }

    impl RemoteCommandService for CapturingCommands {
        fn submit(
            &self,
            instance_id: &str,
            _command: &DeploymentCommand,
        ) -> Result<CommandSubmission, String> {
            let mut submitted = self.submitted.lock().expect("poisoned mutex");
            submitted.push(instance_id.to_string());
            Ok(CommandSubmission {
                command_id: Some(format!("cmd-{}", submitted.len())),
            })
        }
    }

    #[test]
    fn missing_group_is_reported_as_not_found() {
        let error = discover_instances("ghost-asg", &StaticMembership(Ok(None)))
            .expect_err("missing group should fail");
        assert_eq!(
            error,
            FleetUpdateError::GroupNotFound {
                group_name: "ghost-asg".to_string()
            }
        );
    }

    #[test]
    fn discovery_error_message_is_preserved() {
        let membership = StaticMembership(Err("ExpiredToken: credentials expired".to_string()));
        let error = discover_instances("jobify-asg", &membership).expect_err("should fail");
        assert_eq!(
            error,
            FleetUpdateError::Discovery("ExpiredToken: credentials expired".to_string())
        );
    }

    #[test]
    fn records_command_ids_in_dispatch_order() {
        let membership = StaticMembership(Ok(Some(vec![
            "i-aaa".to_string(),
            "i-bbb".to_string(),
        ])));
        let commands = CapturingCommands::new();

        let report = update_fleet(&FleetUpdateConfig::default(), &membership, &commands)
            .expect("update should succeed");

        assert_eq!(commands.submitted(), vec!["i-aaa", "i-bbb"]);
        assert_eq!(report.instances_dispatched, 2);
        assert_eq!(report.dispatches[1].command_id.as_deref(), Some("cmd-2"));
        assert_eq!(
            report.command_fingerprint,
            DeploymentCommand::render(&FleetUpdateConfig::default()).fingerprint()
        );
    }

    #[test]
    fn invalid_config_skips_discovery() {
        struct PanickingMembership;

        impl FleetMembership for PanickingMembership {
            fn list_members(&self, _group_name: &str) -> Result<Option<Vec<String>>, String> {
                panic!("discovery must not run for an invalid config");
            }
        }

        let config = FleetUpdateConfig {
            group_name: " ".to_string(),
            ..FleetUpdateConfig::default()
        };
        let commands = CapturingCommands::new();
        let error = update_fleet(&config, &PanickingMembership, &commands)
            .expect_err("blank group should fail");

        assert!(matches!(error, FleetUpdateError::InvalidConfig(_)));
        assert!(commands.submitted().is_empty());
    }
}
