//! Todos API - REST server for guest and per-user task lists

use axum::Router;
use domain_todos::{InMemoryTaskRepository, PgTaskRepository, TaskRepository, TaskService};
use eyre::WrapErr;
use tracing::{info, warn};

mod app;
mod config;
mod shutdown;
mod telemetry;

use config::{Config, FromEnv, TasksConfig};
use shutdown::shutdown_signal;
use telemetry::{init_tracing, install_color_eyre};

fn build_service<R: TaskRepository>(repository: R, tasks: TasksConfig) -> TaskService<R> {
    TaskService::new(repository)
        .with_ordering(tasks.ordering)
        .with_guest_window_months(tasks.guest_window_months)
}

async fn build_router(config: &Config) -> eyre::Result<Router> {
    match &config.database_url {
        Some(url) => {
            let db = domain_todos::postgres::connect(url)
                .await
                .wrap_err("Failed to connect to PostgreSQL")?;
            let repository = PgTaskRepository::new(db);
            repository
                .ensure_schema()
                .await
                .wrap_err("Failed to prepare tasks table")?;
            Ok(app::router(build_service(repository, config.tasks)))
        }
        None => {
            warn!("DATABASE_URL not set, tasks are kept in memory only");
            Ok(app::router(build_service(
                InMemoryTaskRepository::new(),
                config.tasks,
            )))
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(config.environment);

    let router = build_router(&config).await?;

    let listener = tokio::net::TcpListener::bind(config.server.address())
        .await
        .wrap_err_with(|| format!("Failed to bind {}", config.server.address()))?;

    info!(
        address = %listener.local_addr()?,
        guest_ordering = %config.tasks.ordering.guest,
        owner_ordering = %config.tasks.ordering.owner,
        guest_window_months = config.tasks.guest_window_months,
        "Starting Todos API"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Server error")?;

    info!("Todos API shutdown complete");
    Ok(())
}
