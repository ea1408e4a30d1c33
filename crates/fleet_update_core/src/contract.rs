use serde::{Deserialize, Serialize};

pub const REPORT_SCHEMA_VERSION: &str = "v1";
pub const STATUS_DISPATCH_SUBMITTED: &str = "dispatch_submitted";

/// Acknowledgment from the remote command service. Says nothing about
/// whether the script succeeded on the instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandSubmission {
    pub command_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchRecord {
    pub instance_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FleetUpdateReport {
    pub group_name: String,
    pub instances_dispatched: usize,
    pub dispatches: Vec<DispatchRecord>,
    pub command_fingerprint: String,
    pub status: String,
    pub schema_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_time: Option<String>,
}

impl FleetUpdateReport {
    pub fn submitted(
        group_name: impl Into<String>,
        dispatches: Vec<DispatchRecord>,
        command_fingerprint: String,
    ) -> Self {
        Self {
            group_name: group_name.into(),
            instances_dispatched: dispatches.len(),
            dispatches,
            command_fingerprint,
            status: STATUS_DISPATCH_SUBMITTED.to_string(),
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            event_time: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn report_serializes_without_absent_fields() {
        let report = FleetUpdateReport::submitted(
            "jobify-asg",
            vec![DispatchRecord {
                instance_id: "i-aaa".to_string(),
                command_id: None,
            }],
            "abc".to_string(),
        );

        let value = serde_json::to_value(&report).expect("report should serialize");
        assert_eq!(
            value,
            json!({
                "group_name": "jobify-asg",
                "instances_dispatched": 1,
                "dispatches": [{"instance_id": "i-aaa"}],
                "command_fingerprint": "abc",
                "status": "dispatch_submitted",
                "schema_version": "v1",
            })
        );
    }
}
