use fleet_update_core::{
    update_fleet, FleetMembership, FleetUpdateConfig, FleetUpdateError, FleetUpdateReport,
    RemoteCommandService,
};
use serde_json::Value;

/// Lambda entry point logic. The triggering event (schedule, pipeline hook,
/// manual test invoke) carries nothing the update needs, so it is ignored.
pub fn handle_update_event(
    _event: Value,
    config: &FleetUpdateConfig,
    event_time: &str,
    membership: &impl FleetMembership,
    commands: &impl RemoteCommandService,
) -> Result<FleetUpdateReport, FleetUpdateError> {
    let mut report = update_fleet(config, membership, commands)?;
    report.event_time = Some(event_time.to_string());
    Ok(report)
}
