//! Error types for the interactions endpoint.
//!
//! Every failure on the request path ends up as an [`EndpointError`], which
//! knows its HTTP status and renders itself as a response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::interaction::InteractionType;

/// Public key configuration problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("discord public key is not configured")]
    MissingPublicKey,

    #[error("discord public key is not valid hex: {0}")]
    InvalidHex(String),

    #[error("discord public key must be {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("discord public key is not a valid ed25519 point")]
    InvalidPoint,
}

/// Request body could not be decoded into an interaction.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid interaction payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown interaction type {0}")]
    UnknownType(u8),

    #[error("interaction of kind {0} is missing data")]
    MissingData(InteractionType),

    #[error("invalid data for {kind} interaction: {source}")]
    InvalidData {
        kind: InteractionType,
        #[source]
        source: serde_json::Error,
    },
}

/// Interaction could not be routed to a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("unsupported interaction kind: {0}")]
    UnsupportedKind(InteractionType),
}

/// Failure of the verify, decode, dispatch and serialize pipeline.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Carries no detail so callers cannot learn which check failed.
    #[error("request signature verification failed")]
    Verification,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("failed to serialize interaction response: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl EndpointError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration(_) | Self::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Verification => StatusCode::UNAUTHORIZED,
            Self::Decode(_) | Self::Dispatch(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Error body for 400 and 500 responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IntoResponse for EndpointError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::Verification => return status.into_response(),
            Self::Decode(_) | Self::Dispatch(_) => ErrorResponse {
                status: "bad_request",
                message: Some(self.to_string()),
            },
            // Details are logged server-side only.
            Self::Configuration(_) | Self::Serialize(_) => ErrorResponse {
                status: "error",
                message: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
