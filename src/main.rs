//! extdemo - Main Application Entry Point
//!
//! A small REST API server that translates ad-hoc local routes into
//! Google Cloud Storage and Compute API calls: listing buckets, fetching
//! a managed instance group and its members, listing instance templates,
//! and patching a managed instance group to roll out a new template via
//! a rolling or canary strategy.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Provider Access**: reqwest against the Google REST APIs, behind
//!   the `GcpApi` trait
//! - **Format**: JSON responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Build the Google API client
//! 3. Build HTTP router with routes and middleware
//! 4. Start server on configured port

mod config;
mod error;
mod gcp;
mod handlers;
mod models;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded, project {}", config.gcp_project);

    // Build the Google API client
    let gcp = gcp::GcpClient::new(&config)?;
    let state = AppState {
        gcp: Arc::new(gcp),
        project: config.gcp_project.clone(),
    };

    let app = Router::new()
        // Storage routes
        .route("/storage/list", get(handlers::storage::list_buckets))
        // Managed instance group routes
        .route(
            "/compute/instancegroup/{project}/{region}/{group}",
            get(handlers::instance_groups::get_instance_group),
        )
        .route(
            "/compute/instancegroup/get/{project}/{region}/{group}",
            get(handlers::instance_groups::get_instance_group),
        )
        .route(
            "/compute/instancegroup/update/{project}/{region}/{group}",
            get(handlers::instance_groups::update_instance_group),
        )
        // Instance template routes
        .route(
            "/compute/instancetemplate/list/{project}",
            get(handlers::instance_templates::list_instance_templates),
        )
        // Liveness
        .route("/health", get(handlers::health::health_check))
        // The demo UI is served from another origin
        .layer(CorsLayer::permissive())
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share the provider client with all handlers via State extraction
        .with_state(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
