// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Footprint-Tracker API Server
//!
//! Collects travel legs for youth-exchange projects and reports the CO₂
//! they cause, per transport mode.

use footprint_tracker::{config::Config, db::Database, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        storage = ?config.storage,
        "Starting Footprint-Tracker API"
    );
    tracing::debug!(factors = ?config.emission_factors, "Emission factors loaded");

    let db = Database::from_config(&config).await?;

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
    });

    // Build router
    let app = footprint_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("footprint_tracker=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
