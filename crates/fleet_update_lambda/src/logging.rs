use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install JSON logs filtered by `RUST_LOG` (default `info`). Call once per process.
///
/// CloudWatch stamps every line already, so the subscriber omits its own
/// timestamp.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .without_time()
                .with_current_span(false),
        )
        .init();
}
