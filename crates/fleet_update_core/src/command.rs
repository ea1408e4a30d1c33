use sha2::{Digest, Sha256};

use crate::config::FleetUpdateConfig;

const SYSTEMD_UNIT_DIR: &str = "/etc/systemd/system";
const UNIT_HEREDOC_MARKER: &str = "UNIT";

/// Shell script sent verbatim to every instance of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentCommand {
    script: String,
}

impl DeploymentCommand {
    /// Render the deployment script for `config`.
    ///
    /// The script downloads the artifact to the staging path, extracts it over
    /// the extraction directory, removes the archive, optionally installs
    /// dependencies and rewrites the systemd unit, then restarts the service.
    /// Nothing in it depends on the target instance.
    pub fn render(config: &FleetUpdateConfig) -> Self {
        let service = config.unit_name();
        let staging = shell_quote(&config.staging_path);
        let extraction = shell_quote(&config.extraction_dir);
        let mut lines = vec![
            "set -e".to_string(),
            format!(
                "aws s3 cp {} {staging}",
                shell_quote(&config.artifact_location)
            ),
            format!("unzip -o {staging} -d {extraction}"),
            format!("rm {staging}"),
        ];

        if let Some(install) = &config.install_command {
            // `set -e` does not stop on a failure left of `&&`.
            lines.push(format!("cd {extraction}"));
            lines.push(install.clone());
        }

        let quoted_service = shell_quote(&service);
        if let Some(exec_start) = &config.service_exec_start {
            lines.push(format!(
                "cat > {} <<'{UNIT_HEREDOC_MARKER}'",
                shell_quote(&format!("{SYSTEMD_UNIT_DIR}/{service}"))
            ));
            lines.extend(unit_file_lines(&service, &config.extraction_dir, exec_start));
            lines.push(UNIT_HEREDOC_MARKER.to_string());
            lines.push("systemctl daemon-reload".to_string());
            lines.push(format!("systemctl enable {quoted_service}"));
        }

        lines.push(format!("systemctl restart {quoted_service}"));

        let mut script = lines.join("\n");
        script.push('\n');
        Self { script }
    }

    pub fn as_str(&self) -> &str {
        &self.script
    }

    /// Hex SHA-256 of the script, logged so submissions can be matched to a render.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.script.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Single-quote `value` for POSIX sh unless every character is shell-safe.
fn shell_quote(value: &str) -> String {
    let is_safe = |c: char| c.is_ascii_alphanumeric() || "_-./:@%+=,".contains(c);
    if !value.is_empty() && value.chars().all(is_safe) {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn unit_file_lines(service: &str, working_dir: &str, exec_start: &str) -> Vec<String> {
    let description = service.strip_suffix(".service").unwrap_or(service);
    vec![
        "[Unit]".to_string(),
        format!("Description={description}"),
        "After=network.target".to_string(),
        String::new(),
        "[Service]".to_string(),
        format!("WorkingDirectory={working_dir}"),
        format!("ExecStart={exec_start}"),
        "Restart=always".to_string(),
        String::new(),
        "[Install]".to_string(),
        "WantedBy=multi-user.target".to_string(),
    ]
}
