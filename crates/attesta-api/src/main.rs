//! attesta-api - HTTP API server for certificate sealing and verification.

mod config;
mod handlers;
mod services;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use attesta_core::AnchorLedger;
use attesta_store::{FileStore, HttpAnchorClient, IpfsClient, MemoryLedger};

use config::AppConfig;
use handlers::certificates::{
    anchor_certificate, decrypt_certificate, fetch_certificate, process_certificate,
    verify_certificate,
};
use handlers::issuers::{list_issuers, register_issuer};
use services::SealService;

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "service": "attesta-api" }))
}

/// Build the application router over a fully wired service.
fn router(service: Arc<SealService>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/cert/process", post(process_certificate))
        .route("/api/cert/anchor", post(anchor_certificate))
        .route("/api/cert/verify", post(verify_certificate))
        .route("/api/cert/fetch/:cid", get(fetch_certificate))
        .route("/api/cert/decrypt", post(decrypt_certificate))
        .route("/api/issuer/register", post(register_issuer))
        .route("/api/issuer/list", get(list_issuers))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .with_state(service)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attesta_api=info,attesta_store=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    info!(?config, "starting attesta-api");

    let objects = Arc::new(IpfsClient::from_env()?);
    let registry = Arc::new(FileStore::new(&config.registry_path));

    let ledger: Arc<dyn AnchorLedger> = match &config.anchor_endpoint {
        Some(endpoint) => Arc::new(HttpAnchorClient::with_config(endpoint.clone())?),
        None => {
            warn!("ANCHOR_ENDPOINT not set, anchoring to in-memory ledger");
            Arc::new(MemoryLedger::new())
        }
    };

    let service = Arc::new(SealService::new(
        objects,
        ledger,
        registry.clone(),
        registry,
    ));

    let app = router(service, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
