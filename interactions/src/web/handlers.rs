//! Endpoint handlers.
//!
//! The interactions handler runs the whole pipeline inline:
//! 1. Verify the Ed25519 signature over the raw body
//! 2. Decode the body into a typed interaction
//! 3. Dispatch it to a response
//! 4. Serialize the response
//!
//! Any failure short-circuits into an [`EndpointError`] response.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::dispatch::InteractionDispatcher;
use crate::error::{ConfigError, EndpointError};
use crate::interaction::Interaction;
use crate::verify::{
    verify_request, SignedRequest, VerificationKey, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Arc<InteractionDispatcher>,
    key: Result<VerificationKey, ConfigError>,
}

impl AppState {
    /// Build state from config, parsing the public key once.
    pub fn new(config: Config, dispatcher: InteractionDispatcher) -> Self {
        let key = config.verification_key();
        if let Err(e) = &key {
            error!(error = %e, "discord_public_key_invalid");
        }

        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
            key,
        }
    }

    pub fn verification_key(&self) -> Result<&VerificationKey, &ConfigError> {
        self.key.as_ref()
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Interactions Webhook
// =============================================================================

/// Discord interactions endpoint.
///
/// The body is taken as raw bytes so the signature is checked against
/// exactly what was sent, and the same buffer is decoded afterwards.
pub async fn interactions_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match handle_interaction(&state, &headers, &body) {
        Ok(encoded) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            encoded,
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

fn handle_interaction(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Vec<u8>, EndpointError> {
    info!(
        has_signature = headers.contains_key(SIGNATURE_HEADER),
        has_timestamp = headers.contains_key(TIMESTAMP_HEADER),
        body_length = body.len(),
        "interaction_received"
    );

    let key = state.verification_key().map_err(|e| {
        error!(error = %e, "interaction_config_invalid");
        e.clone()
    })?;

    // verify_request logs the failing step
    if !verify_request(&SignedRequest::new(headers, body), key) {
        return Err(EndpointError::Verification);
    }

    let interaction = Interaction::from_slice(body).map_err(|e| {
        warn!(error = %e, "interaction_decode_failed");
        e
    })?;
    let kind = interaction.event.kind();

    let response = state.dispatcher.dispatch(&interaction.event).map_err(|e| {
        warn!(kind = %kind, error = %e, "interaction_dispatch_failed");
        e
    })?;

    let encoded = serde_json::to_vec(&response).map_err(|e| {
        error!(kind = %kind, error = %e, "interaction_response_serialize_failed");
        EndpointError::Serialize(e)
    })?;

    info!(
        interaction_id = interaction.id.as_deref().unwrap_or_default(),
        kind = %kind,
        response_type = response.response_type().code(),
        "interaction_dispatched"
    );

    Ok(encoded)
}
