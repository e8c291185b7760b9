//! Stateless session tokens for Tollgate.
//!
//! [`JwtService`] issues HMAC-signed JWTs carrying [`IdentityClaims`] and
//! verifies them again, reporting failures as either
//! [`JwtError::TokenExpired`] or [`JwtError::InvalidToken`].
//!
//! ```rust
//! use tollgate_jwt::{JwtConfig, JwtService};
//!
//! let codec = JwtService::new(JwtConfig::new("change-me")).unwrap();
//! let token = codec.issue("user-1", Some("org-7")).unwrap();
//! let claims = codec.decode(&token).unwrap();
//! assert_eq!(claims.subject_id, "user-1");
//! ```

pub mod claims;
pub mod config;
pub mod env;
pub mod error;
pub mod service;
pub mod token;

pub use claims::IdentityClaims;
pub use config::{DEFAULT_EXPIRES_IN, JwtConfig, MAX_EXPIRES_IN, MAX_LEEWAY};
pub use env::EnvLoader;
pub use error::{JwtError, Result};
pub use service::JwtService;
pub use token::AccessToken;

// Re-export jsonwebtoken types
pub use jsonwebtoken::Algorithm;
