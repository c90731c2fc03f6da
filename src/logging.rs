use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install a stderr subscriber. `RUST_LOG` wins over `filter`, which wins over `info`.
pub fn init_tracing(filter: Option<&str>) -> Result<(), String> {
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(filter.unwrap_or(DEFAULT_LOG_FILTER)).map_err(|e| e.to_string())?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .map_err(|e| e.to_string())
}
