use std::{net::SocketAddr, sync::Arc};

use activities::{ActivityStore, InMemoryActivityStore};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::outbound::postgres::PostgresActivityStore,
    app_state::AppState,
    config::{Settings, StoreBackend},
};

mod adapters;
mod app_state;
mod auth;
mod config;
mod repositories;
mod router;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,reactivities_api=debug,activities=debug,sqlx=warn,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let config = config::read_config().context("Failed to read configuration")?;
    let store = connect_store(&config).await?;

    let app_state = AppState::new(store);
    let app = router::create(app_state, config.application.client_url.clone());

    let addr: SocketAddr = format!("{}:{}", config.application.host, config.application.port)
        .parse()
        .context("Invalid listen address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn connect_store(config: &Settings) -> anyhow::Result<Arc<dyn ActivityStore>> {
    match config.application.store {
        StoreBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect_with(config.database.with_db())
                .await
                .context("Failed to connect to database")?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!(
                "Using postgres store at {}:{}",
                config.database.host,
                config.database.port
            );
            Ok(Arc::new(PostgresActivityStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; activities are lost on shutdown");
            Ok(Arc::new(InMemoryActivityStore::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        return;
    }
    tracing::info!("Shutting down");
}
