use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Install color-eyre with a project-standard configuration.
///
/// Call this early in main() so reports from any later failure are
/// colored. Calling it again is a no-op.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Filter used when `RUST_LOG` is not set.
///
/// SQL statement logs come through the `sqlx` target; development keeps
/// them at info so every statement is visible.
pub fn default_filter(environment: &Environment) -> &'static str {
    match environment {
        Environment::Production => "info,tower_http=info,sea_orm=warn,sqlx=warn",
        Environment::Development => "debug,tower_http=debug,sea_orm=info,sqlx=info",
    }
}

/// Initialize the global subscriber.
///
/// - **Production** (`APP_ENV=production`): flattened JSON events, no targets
/// - **Development** (default): pretty multi-line output
///
/// Both install `tracing_error::ErrorLayer` so `eyre` reports carry span
/// traces. `RUST_LOG` overrides [`default_filter`].
///
/// A second call (common in tests) leaves the first subscriber in place.
///
/// ```ignore
/// use core_config::{Environment, tracing::init_tracing};
///
/// init_tracing(&Environment::from_env());
/// ```
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(environment)));

    let fmt_layer = if environment.is_production() {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .flatten_event(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .pretty()
            .boxed()
    };

    let result = tracing_subscriber::registry()
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .with(filter)
        .try_init();

    match result {
        Ok(_) => info!(?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}
