use crate::error::FleetUpdateError;

pub const DEFAULT_GROUP_NAME: &str = "jobify-asg";
pub const DEFAULT_ARTIFACT_LOCATION: &str = "s3://jobify-artifacts-bucket/backend-code.zip";
pub const DEFAULT_STAGING_PATH: &str = "/tmp/backend-code.zip";
pub const DEFAULT_EXTRACTION_DIR: &str = "/var/www/html";
pub const DEFAULT_SERVICE_NAME: &str = "myapp.service";

/// Everything the updater needs to know about the fleet and what to deploy on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetUpdateConfig {
    /// Auto Scaling Group whose members receive the deployment.
    pub group_name: String,
    /// `s3://` location of the build artifact archive.
    pub artifact_location: String,
    /// Where the archive is downloaded on the instance before extraction.
    pub staging_path: String,
    pub extraction_dir: String,
    /// systemd unit restarted after extraction, e.g. `myapp.service`.
    pub service_name: String,
    /// Run inside `extraction_dir` after unpacking, e.g. `npm ci --omit=dev`.
    pub install_command: Option<String>,
    /// When set, the unit file is (re)written with this `ExecStart=` and enabled.
    pub service_exec_start: Option<String>,
}

impl Default for FleetUpdateConfig {
    fn default() -> Self {
        Self {
            group_name: DEFAULT_GROUP_NAME.to_string(),
            artifact_location: DEFAULT_ARTIFACT_LOCATION.to_string(),
            staging_path: DEFAULT_STAGING_PATH.to_string(),
            extraction_dir: DEFAULT_EXTRACTION_DIR.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            install_command: None,
            service_exec_start: None,
        }
    }
}

impl FleetUpdateConfig {
    /// Load configuration from `FLEET_*` environment variables.
    pub fn from_env() -> Result<Self, FleetUpdateError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Blank values fall back
    /// to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, FleetUpdateError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let config = Self {
            group_name: read("FLEET_GROUP_NAME").unwrap_or(defaults.group_name),
            artifact_location: read("FLEET_ARTIFACT_LOCATION")
                .unwrap_or(defaults.artifact_location),
            staging_path: read("FLEET_STAGING_PATH").unwrap_or(defaults.staging_path),
            extraction_dir: read("FLEET_EXTRACTION_DIR").unwrap_or(defaults.extraction_dir),
            service_name: read("FLEET_SERVICE_NAME").unwrap_or(defaults.service_name),
            install_command: read("FLEET_INSTALL_COMMAND"),
            service_exec_start: read("FLEET_SERVICE_EXEC_START"),
        };
        config.validate()?;
        Ok(config)
    }

    /// Unit name with a `.service` suffix added when the configured name has no
    /// unit type, matching how `systemctl` resolves bare names.
    pub fn unit_name(&self) -> String {
        let name = self.service_name.trim();
        if name.contains('.') {
            name.to_string()
        } else {
            format!("{name}.service")
        }
    }

    pub fn validate(&self) -> Result<(), FleetUpdateError> {
        if self.group_name.trim().is_empty() {
            return Err(invalid("group_name cannot be empty"));
        }

        if !self.artifact_location.starts_with("s3://")
            || self.artifact_location.len() <= "s3://".len()
        {
            return Err(invalid(format!(
                "artifact_location '{}' must be an s3:// URI",
                self.artifact_location
            )));
        }

        if !self.staging_path.starts_with('/') {
            return Err(invalid("staging_path must be an absolute path"));
        }

        if !self.extraction_dir.starts_with('/') {
            return Err(invalid("extraction_dir must be an absolute path"));
        }

        let service_name = self.service_name.trim();
        if service_name.is_empty() {
            return Err(invalid("service_name cannot be empty"));
        }
        if service_name.contains('/') || service_name.contains(char::is_whitespace) {
            return Err(invalid(format!(
                "service_name '{service_name}' must be a bare unit name"
            )));
        }

        if self.service_exec_start.is_some() && !self.unit_name().ends_with(".service") {
            return Err(invalid(format!(
                "service_name '{service_name}' must be a .service unit when service_exec_start is set"
            )));
        }

        // The script is line-oriented; an embedded newline would split a step.
        let fields = [
            ("group_name", Some(&self.group_name)),
            ("artifact_location", Some(&self.artifact_location)),
            ("staging_path", Some(&self.staging_path)),
            ("extraction_dir", Some(&self.extraction_dir)),
            ("install_command", self.install_command.as_ref()),
            ("service_exec_start", self.service_exec_start.as_ref()),
        ];
        for (name, value) in fields {
            if value.is_some_and(|text| text.contains(['\n', '\r'])) {
                return Err(invalid(format!("{name} must be a single line")));
            }
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> FleetUpdateError {
    FleetUpdateError::InvalidConfig(message.into())
}
