//! HTTP client for the OSE game backend.
//!
//! This crate provides:
//! - Token authentication (form login, refresh, current user)
//! - Character CRUD against `api/v1/characters/`
//! - Health probing with endpoint fallbacks
//! - Read-only JWT claim decoding

mod client;
pub mod config;
pub mod token;
pub mod types;

use thiserror::Error;

pub use client::OseClient;
pub use config::ApiConfig;
pub use token::TokenClaims;
pub use types::{CreateCharacterRequest, HealthStatus, StoredCharacter, TokenResponse, UserProfile};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API credentials not configured")]
    NoCredentials,

    #[error("No token available")]
    NoToken,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
