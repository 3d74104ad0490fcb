//! Certificate processing handlers: seal, anchor, verify, fetch, decrypt.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use attesta_core::{DocumentMetadata, Verification};
use attesta_crypto::{IdentityInput, SealedBundle};

use crate::handlers::ApiError;
use crate::services::SealService;

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AnchorRequest {
    pub core_hash: String,
    pub storage_reference: String,
    pub metadata: DocumentMetadata,
    pub recipient_identity: String,
}

#[derive(Debug, Serialize)]
pub struct AnchorResponse {
    pub status: &'static str,
    pub core_hash: String,
    pub tx_id: String,
    pub replaced: bool,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub core_hash: String,
    #[serde(flatten)]
    pub verification: Verification,
}

#[derive(Debug, Serialize)]
pub struct FetchResponse {
    pub status: &'static str,
    pub file_data_b64: String,
}

#[derive(Debug, Deserialize)]
pub struct DecryptRequest {
    pub bundle: SealedBundle,
    /// Recipient signing private key: base58 or hex, 32-byte seed or
    /// 64-byte expanded secret.
    pub private_identity: String,
}

// =============================================================================
// MULTIPART HELPERS
// =============================================================================

/// Pull the document bytes and optional text fields out of a multipart
/// upload. The file arrives under the `file` part name.
async fn read_upload(
    multipart: &mut Multipart,
    text_field: Option<&str>,
) -> Result<(Vec<u8>, Option<String>), ApiError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut text_value: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request("invalid_multipart", e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request("invalid_multipart", e.to_string()))?;
                file_bytes = Some(bytes.to_vec());
            }
            Some(name) if Some(name) == text_field => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request("invalid_multipart", e.to_string()))?;
                text_value = Some(text);
            }
            _ => {}
        }
    }

    let file_bytes = file_bytes
        .ok_or_else(|| ApiError::bad_request("missing_file", "multipart part 'file' is required"))?;
    Ok((file_bytes, text_value))
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Seal an uploaded document for a recipient.
///
/// POST /api/cert/process (multipart: `file`, `recipient_identity`)
pub async fn process_certificate(
    State(service): State<Arc<SealService>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (file_bytes, recipient) = read_upload(&mut multipart, Some("recipient_identity")).await?;
    let recipient = recipient.ok_or_else(|| {
        ApiError::bad_request(
            "missing_recipient",
            "multipart part 'recipient_identity' is required",
        )
    })?;

    let bundle = service.process(&file_bytes, &recipient).await?;
    Ok((StatusCode::CREATED, Json(bundle)))
}

/// Anchor a sealed certificate on the ledger and persist its record.
///
/// POST /api/cert/anchor
pub async fn anchor_certificate(
    State(service): State<Arc<SealService>>,
    Json(req): Json<AnchorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = service
        .anchor(
            &req.core_hash,
            req.storage_reference,
            req.metadata,
            req.recipient_identity,
        )
        .await?;

    Ok(Json(AnchorResponse {
        status: "success",
        core_hash: req.core_hash,
        tx_id: outcome.tx_id,
        replaced: outcome.replaced,
    }))
}

/// Verify an uploaded document against the registry.
///
/// POST /api/cert/verify (multipart: `file`)
pub async fn verify_certificate(
    State(service): State<Arc<SealService>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (file_bytes, _) = read_upload(&mut multipart, None).await?;
    let (core_hash, verification) = service.verify(&file_bytes).await?;

    Ok(Json(VerifyResponse {
        core_hash,
        verification,
    }))
}

/// Fetch stored ciphertext by content identifier.
///
/// GET /api/cert/fetch/:cid
pub async fn fetch_certificate(
    State(service): State<Arc<SealService>>,
    Path(cid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = service.fetch(&cid).await?;
    Ok(Json(FetchResponse {
        status: "success",
        file_data_b64: BASE64.encode(bytes),
    }))
}

/// Open a sealed bundle with the recipient's private identity and return
/// the recovered document.
///
/// POST /api/cert/decrypt
pub async fn decrypt_certificate(
    State(service): State<Arc<SealService>>,
    Json(req): Json<DecryptRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let plaintext = service.decrypt(
        &req.bundle,
        &IdentityInput::Encoded(req.private_identity),
    )?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=decrypted_certificate.pdf",
            ),
        ],
        plaintext,
    ))
}
