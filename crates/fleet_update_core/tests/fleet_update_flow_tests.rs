use std::cell::RefCell;

use fleet_update_core::{
    update_fleet, CommandSubmission, DeploymentCommand, FleetMembership, FleetUpdateConfig,
    FleetUpdateError, RemoteCommandService,
};

#[derive(Default)]
struct RecordingMembership {
    members: Option<Vec<String>>,
    failure: Option<String>,
    queried_groups: RefCell<Vec<String>>,
}

impl RecordingMembership {
    fn with_members(members: &[&str]) -> Self {
        Self {
            members: Some(members.iter().map(|id| id.to_string()).collect()),
            ..Self::default()
        }
    }
}

impl FleetMembership for RecordingMembership {
    fn list_members(&self, group_name: &str) -> Result<Option<Vec<String>>, String> {
        self.queried_groups.borrow_mut().push(group_name.to_string());
        match &self.failure {
            Some(message) => Err(message.clone()),
            None => Ok(self.members.clone()),
        }
    }
}

#[derive(Default)]
struct RecordingCommands {
    fail_on: Option<String>,
    calls: RefCell<Vec<(String, String)>>,
}

impl RemoteCommandService for RecordingCommands {
    fn submit(
        &self,
        instance_id: &str,
        command: &DeploymentCommand,
    ) -> Result<CommandSubmission, String> {
        self.calls
            .borrow_mut()
            .push((instance_id.to_string(), command.as_str().to_string()));
        if self.fail_on.as_deref() == Some(instance_id) {
            return Err(format!("InvalidInstanceId: {instance_id} is not managed"));
        }
        Ok(CommandSubmission {
            command_id: Some(format!("cmd-{instance_id}")),
        })
    }
}

#[test]
fn jobify_group_receives_identical_command_per_member() {
    let config = FleetUpdateConfig::default();
    let membership = RecordingMembership::with_members(&["i-aaa", "i-bbb"]);
    let commands = RecordingCommands::default();

    let report = update_fleet(&config, &membership, &commands).expect("update should succeed");

    assert_eq!(*membership.queried_groups.borrow(), vec!["jobify-asg"]);
    let calls = commands.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "i-aaa");
    assert_eq!(calls[1].0, "i-bbb");

    let expected = DeploymentCommand::render(&config);
    assert_eq!(calls[0].1, expected.as_str());
    assert_eq!(calls[1].1, expected.as_str());

    assert_eq!(report.group_name, "jobify-asg");
    assert_eq!(report.instances_dispatched, 2);
    assert_eq!(report.status, "dispatch_submitted");
}

#[test]
fn provider_order_is_preserved_for_every_member() {
    let ids = ["i-09", "i-01", "i-05", "i-03", "i-07"];
    let membership = RecordingMembership::with_members(&ids);
    let commands = RecordingCommands::default();

    let report = update_fleet(&FleetUpdateConfig::default(), &membership, &commands)
        .expect("update should succeed");

    let dispatched: Vec<&str> = report
        .dispatches
        .iter()
        .map(|record| record.instance_id.as_str())
        .collect();
    assert_eq!(dispatched, ids);
    assert_eq!(commands.calls.borrow().len(), ids.len());
}

#[test]
fn empty_group_dispatches_nothing_and_succeeds() {
    let membership = RecordingMembership::with_members(&[]);
    let commands = RecordingCommands::default();

    let report = update_fleet(&FleetUpdateConfig::default(), &membership, &commands)
        .expect("empty group is not an error");

    assert!(commands.calls.borrow().is_empty());
    assert_eq!(report.instances_dispatched, 0);
    assert!(report.dispatches.is_empty());
}

#[test]
fn missing_group_fails_without_dispatch() {
    let membership = RecordingMembership::default();
    let commands = RecordingCommands::default();

    let error = update_fleet(&FleetUpdateConfig::default(), &membership, &commands)
        .expect_err("missing group should fail");

    assert!(matches!(error, FleetUpdateError::GroupNotFound { .. }));
    assert!(commands.calls.borrow().is_empty());
}

#[test]
fn discovery_failure_never_dispatches() {
    let membership = RecordingMembership {
        members: Some(vec!["i-aaa".to_string()]),
        failure: Some("AccessDenied: autoscaling:DescribeAutoScalingGroups".to_string()),
        ..RecordingMembership::default()
    };
    let commands = RecordingCommands::default();

    let error = update_fleet(&FleetUpdateConfig::default(), &membership, &commands)
        .expect_err("discovery failure should abort");

    assert_eq!(
        error,
        FleetUpdateError::Discovery("AccessDenied: autoscaling:DescribeAutoScalingGroups".into())
    );
    assert!(commands.calls.borrow().is_empty());
}

#[test]
fn dispatch_failure_stops_remaining_instances() {
    let membership = RecordingMembership::with_members(&["i-aaa", "i-bbb", "i-ccc", "i-ddd"]);
    let commands = RecordingCommands {
        fail_on: Some("i-bbb".to_string()),
        ..RecordingCommands::default()
    };

    let error = update_fleet(&FleetUpdateConfig::default(), &membership, &commands)
        .expect_err("dispatch failure should abort");

    let attempted: Vec<String> = commands
        .calls
        .borrow()
        .iter()
        .map(|(id, _)| id.clone())
        .collect();
    assert_eq!(attempted, vec!["i-aaa", "i-bbb"]);
    assert_eq!(
        error,
        FleetUpdateError::Dispatch {
            instance_id: "i-bbb".to_string(),
            message: "InvalidInstanceId: i-bbb is not managed".to_string(),
        }
    );
}
