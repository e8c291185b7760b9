// Authentication and authorization error taxonomy

use http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tollgate_jwt::JwtError;

/// Value of the `WWW-Authenticate` challenge attached to token failures.
pub const BEARER_CHALLENGE: &str = "Bearer";

/// The closed set of failures an authenticated endpoint can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthErrorKind {
    /// No credentials were presented
    AuthenticationRequired,
    /// Authentic token past its expiry (plus leeway)
    TokenExpired,
    /// Malformed, forged, or otherwise unusable token
    InvalidToken,
    /// Login failed
    InvalidCredentials,
    AccountInactive,
    InsufficientPermissions,
}

impl AuthErrorKind {
    pub const ALL: [AuthErrorKind; 6] = [
        AuthErrorKind::AuthenticationRequired,
        AuthErrorKind::TokenExpired,
        AuthErrorKind::InvalidToken,
        AuthErrorKind::InvalidCredentials,
        AuthErrorKind::AccountInactive,
        AuthErrorKind::InsufficientPermissions,
    ];

    pub fn status(self) -> StatusCode {
        match self {
            AuthErrorKind::InsufficientPermissions => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Machine-readable error code
    pub fn code(self) -> &'static str {
        match self {
            AuthErrorKind::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            AuthErrorKind::TokenExpired => "TOKEN_EXPIRED",
            AuthErrorKind::InvalidToken => "INVALID_TOKEN",
            AuthErrorKind::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthErrorKind::AccountInactive => "ACCOUNT_INACTIVE",
            AuthErrorKind::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
        }
    }

    pub fn default_detail(self) -> &'static str {
        match self {
            AuthErrorKind::AuthenticationRequired => "Authentication required",
            AuthErrorKind::TokenExpired => "Token has expired",
            AuthErrorKind::InvalidToken => "Invalid token",
            AuthErrorKind::InvalidCredentials => "Invalid credentials",
            AuthErrorKind::AccountInactive => "Account is inactive",
            AuthErrorKind::InsufficientPermissions => "Insufficient permissions",
        }
    }

    /// Whether responses carry a `WWW-Authenticate` challenge, inviting the
    /// client to (re-)authenticate with a bearer token.
    pub fn challenges(self) -> bool {
        matches!(
            self,
            AuthErrorKind::AuthenticationRequired
                | AuthErrorKind::TokenExpired
                | AuthErrorKind::InvalidToken
        )
    }
}

/// A single authentication/authorization failure.
///
/// Built with the per-kind constructors, which fill in the default detail
/// message; `with_detail` overrides it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}: {}", .kind.code(), .detail)]
pub struct AuthError {
    kind: AuthErrorKind,
    detail: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind) -> Self {
        Self {
            kind,
            detail: kind.default_detail().to_string(),
        }
    }

    pub fn authentication_required() -> Self {
        Self::new(AuthErrorKind::AuthenticationRequired)
    }

    pub fn token_expired() -> Self {
        Self::new(AuthErrorKind::TokenExpired)
    }

    pub fn invalid_token() -> Self {
        Self::new(AuthErrorKind::InvalidToken)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(AuthErrorKind::InvalidCredentials)
    }

    pub fn account_inactive() -> Self {
        Self::new(AuthErrorKind::AccountInactive)
    }

    pub fn insufficient_permissions() -> Self {
        Self::new(AuthErrorKind::InsufficientPermissions)
    }

    /// Replace the default detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Challenge header value, if this kind carries one
    pub fn challenge(&self) -> Option<&'static str> {
        self.kind.challenges().then_some(BEARER_CHALLENGE)
    }
}

impl From<AuthErrorKind> for AuthError {
    fn from(kind: AuthErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Codec failures collapse onto the two token kinds. Anything that is not
/// an expiry (including signing or configuration faults) is reported as an
/// invalid token, so callers never learn which check failed.
impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenExpired => AuthError::token_expired(),
            _ => AuthError::invalid_token(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
