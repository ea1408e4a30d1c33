use chrono::Utc;
use fleet_update_core::{FleetUpdateConfig, FleetUpdateReport};
use fleet_update_lambda::adapters::{AutoScalingMembership, SsmCommandService};
use fleet_update_lambda::handlers::update::handle_update_event;
use fleet_update_lambda::logging::init_tracing;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

struct RuntimeDependencies {
    config: FleetUpdateConfig,
    membership: AutoScalingMembership,
    commands: SsmCommandService,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<FleetUpdateReport, Error> {
    tracing::info!(
        request_id = %event.context.request_id,
        group_name = %deps.config.group_name,
        "fleet update invoked"
    );

    let event_time = Utc::now().to_rfc3339();
    handle_update_event(
        event.payload,
        &deps.config,
        &event_time,
        &deps.membership,
        &deps.commands,
    )
    .map_err(|error| Error::from(error.to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = FleetUpdateConfig::from_env().map_err(|error| Error::from(error.to_string()))?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        config,
        membership: AutoScalingMembership::new(aws_sdk_autoscaling::Client::new(&aws_config)),
        commands: SsmCommandService::new(aws_sdk_ssm::Client::new(&aws_config)),
    };

    let deps = &deps;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, deps).await
    }))
    .await
}
