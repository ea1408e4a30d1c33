use std::collections::HashMap;

use fleet_update_core::{CommandSubmission, DeploymentCommand, RemoteCommandService};

pub const RUN_SHELL_SCRIPT_DOCUMENT: &str = "AWS-RunShellScript";
const COMMANDS_PARAMETER: &str = "commands";

/// Submits deployment scripts through Systems Manager `SendCommand`.
#[derive(Clone)]
pub struct SsmCommandService {
    client: aws_sdk_ssm::Client,
}

impl SsmCommandService {
    pub fn new(client: aws_sdk_ssm::Client) -> Self {
        Self { client }
    }
}

impl RemoteCommandService for SsmCommandService {
    fn submit(
        &self,
        instance_id: &str,
        command: &DeploymentCommand,
    ) -> Result<CommandSubmission, String> {
        let client = self.client.clone();
        let target = instance_id.to_string();
        let parameters = run_shell_script_parameters(command);

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .send_command()
                    .document_name(RUN_SHELL_SCRIPT_DOCUMENT)
                    .instance_ids(target)
                    .set_parameters(Some(parameters))
                    .send()
                    .await
                    .map(|output| CommandSubmission {
                        command_id: output
                            .command()
                            .and_then(|sent| sent.command_id())
                            .map(str::to_string),
                    })
                    .map_err(|error| format!("failed to send ssm command: {error}"))
            })
        })
    }
}

/// The whole script travels as a single `commands` entry, matching how the
/// document runs it as one shell file.
fn run_shell_script_parameters(command: &DeploymentCommand) -> HashMap<String, Vec<String>> {
    HashMap::from([(
        COMMANDS_PARAMETER.to_string(),
        vec![command.as_str().to_string()],
    )])
}
