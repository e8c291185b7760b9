// Error types for token operations

use thiserror::Error;

/// Errors produced by the token codec.
///
/// `decode` only ever yields [`JwtError::TokenExpired`] or
/// [`JwtError::InvalidToken`]. The other variants come from construction
/// and signing.
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token expired")]
    TokenExpired,

    /// Malformed token, bad signature, wrong algorithm, or missing/mistyped
    /// claims. The specific cause is not carried.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl JwtError {
    /// Expired tokens may be answered with a refresh; any other failure
    /// needs a new login.
    pub fn is_expired(&self) -> bool {
        matches!(self, JwtError::TokenExpired)
    }
}

pub type Result<T> = std::result::Result<T, JwtError>;
