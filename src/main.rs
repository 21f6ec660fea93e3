// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Roleplay Hub API server
//!
//! Serves the character API from the seeded mock store, so the client
//! façades have a live peer during development.

use roleplay_hub::{config::Config, db::MockDb, time_utils::SystemClock, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(port = config.port, fallback = ?config.fallback_mode, "Starting Roleplay Hub API");

    let db = MockDb::seeded();
    tracing::info!(
        characters = db.all_characters().len(),
        rooms = db.rooms().len(),
        "Mock store seeded"
    );

    let state = Arc::new(AppState::new(config.clone(), db, Arc::new(SystemClock)));
    let app = roleplay_hub::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("roleplay_hub=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
