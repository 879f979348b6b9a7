//! Process-wide error reporting and log output for the Todos API.

use crate::config::Environment;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Install color-eyre before any fallible startup work.
///
/// Safe to call more than once; later calls are ignored.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Directives used when `RUST_LOG` is unset. This service's own crates log
/// one level above their dependencies.
pub fn default_directives(environment: Environment) -> &'static str {
    match environment {
        Environment::Production => {
            "warn,todos_api=info,domain_todos=info,tower_http=info,sea_orm=warn"
        }
        Environment::Development => {
            "info,todos_api=debug,domain_todos=debug,tower_http=debug,sea_orm=info"
        }
    }
}

/// `RUST_LOG` if it is set and parses, otherwise [`default_directives`].
pub fn env_filter(environment: Environment) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(environment)))
}

/// Install the global subscriber.
///
/// Production writes one flattened JSON object per event; development
/// writes the pretty multi-line format. Both carry an `ErrorLayer` so
/// eyre reports include the active spans. Does nothing if a subscriber is
/// already installed.
pub fn init_tracing(environment: Environment) {
    let filter = env_filter(environment);
    let directives = filter.to_string();

    let json = environment
        .is_production()
        .then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let pretty = (!environment.is_production()).then(|| {
        tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(false)
            .with_line_number(false)
    });

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .with(tracing_error::ErrorLayer::default())
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(?environment, %directives, "Logging initialized");
    }
}
