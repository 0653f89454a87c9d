//! Discord interactions endpoint.
//!
//! This library provides the request verification and interaction dispatch
//! behind the `interactions-web` binary. Any transport can reuse it: hand the
//! raw headers and body to [`verify::verify_request`], decode with
//! [`Interaction::from_slice`], then map the event with
//! [`InteractionDispatcher::dispatch`].
//!
//! ## Architecture
//!
//! ```text
//! Discord → POST /interactions → verify → decode → dispatch → JSON response
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod interaction;
pub mod verify;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use dispatch::{InteractionDispatcher, UNKNOWN_COMMAND_MESSAGE};
pub use error::{ConfigError, DecodeError, DispatchError, EndpointError};
pub use interaction::{Interaction, InteractionEvent, InteractionResponse, MessageData};
pub use verify::{verify_request, SignedRequest, VerificationKey};
pub use web::{build_router, AppState};
