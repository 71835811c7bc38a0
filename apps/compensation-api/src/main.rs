mod compensation;
mod config;
mod errors;
mod routes;
mod state;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::compensation::{AmazonBands, ReferenceTables};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Compensation API v{}", env!("CARGO_PKG_VERSION"));

    // Reference tables are validated once here and shared read-only afterwards
    let tables = ReferenceTables::builtin().context("Invalid built-in reference tables")?;
    info!(
        "Reference tables loaded: {} industries, {} company types, {} career levels, {} locations",
        tables.industries().len(),
        tables.company_types().len(),
        tables.career_levels().len(),
        tables.locations().len()
    );

    let amazon = AmazonBands::builtin().context("Invalid built-in Amazon bands")?;
    info!("Amazon bands loaded: {} levels", amazon.levels().len());
    info!("Default base salary: {}", config.default_base_salary);

    let cors = build_cors_layer(&config)?;

    let state = AppState {
        config: config.clone(),
        tables: Arc::new(tables),
        amazon: Arc::new(amazon),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Restricts CORS to `CORS_ALLOWED_ORIGIN` when set, permissive otherwise.
fn build_cors_layer(config: &Config) -> Result<CorsLayer> {
    match &config.cors_allowed_origin {
        Some(origin) => {
            let origin: HeaderValue = origin
                .parse()
                .with_context(|| format!("CORS_ALLOWED_ORIGIN '{origin}' is not a valid header value"))?;
            info!("CORS restricted to {origin:?}");
            Ok(CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE]))
        }
        None => Ok(CorsLayer::permissive()),
    }
}
