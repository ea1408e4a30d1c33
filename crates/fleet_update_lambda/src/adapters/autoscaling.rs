use aws_sdk_autoscaling::types::AutoScalingGroup;
use fleet_update_core::FleetMembership;

/// Group membership read through `DescribeAutoScalingGroups`.
#[derive(Clone)]
pub struct AutoScalingMembership {
    client: aws_sdk_autoscaling::Client,
}

impl AutoScalingMembership {
    pub fn new(client: aws_sdk_autoscaling::Client) -> Self {
        Self { client }
    }
}

impl FleetMembership for AutoScalingMembership {
    fn list_members(&self, group_name: &str) -> Result<Option<Vec<String>>, String> {
        let client = self.client.clone();
        let group_name = group_name.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .describe_auto_scaling_groups()
                    .auto_scaling_group_names(group_name)
                    .send()
                    .await
                    .map(|output| first_group_members(output.auto_scaling_groups()))
                    .map_err(|error| {
                        format!("failed to describe auto scaling group: {error}")
                    })
            })
        })
    }
}

/// Only one name is requested, so the provider returns at most one group.
fn first_group_members(groups: &[AutoScalingGroup]) -> Option<Vec<String>> {
    groups.first().map(|group| {
        group
            .instances()
            .iter()
            .map(|instance| instance.instance_id().to_string())
            .collect()
    })
}
