//! Issuer directory handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use attesta_core::IssuerRecord;

use crate::handlers::ApiError;
use crate::services::SealService;

#[derive(Debug, Deserialize)]
pub struct RegisterIssuerRequest {
    pub name: String,
    pub pubkey: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterIssuerResponse {
    pub status: &'static str,
    pub issuer: RegisteredIssuer,
}

#[derive(Debug, Serialize)]
pub struct RegisteredIssuer {
    pub name: String,
    pub pubkey: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ListIssuersResponse {
    pub issuers: BTreeMap<String, IssuerRecord>,
}

/// Register a certificate issuer (university, organization).
///
/// POST /api/issuer/register
pub async fn register_issuer(
    State(service): State<Arc<SealService>>,
    Json(req): Json<RegisterIssuerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    service
        .register_issuer(
            &req.name,
            IssuerRecord {
                pubkey: req.pubkey.clone(),
                email: req.email.clone(),
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterIssuerResponse {
            status: "success",
            issuer: RegisteredIssuer {
                name: req.name,
                pubkey: req.pubkey,
                email: req.email,
            },
        }),
    ))
}

/// List all registered issuers.
///
/// GET /api/issuer/list
pub async fn list_issuers(
    State(service): State<Arc<SealService>>,
) -> Result<impl IntoResponse, ApiError> {
    let issuers = service.list_issuers().await?;
    Ok(Json(ListIssuersResponse { issuers }))
}
