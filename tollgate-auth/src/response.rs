// Rendering auth failures as HTTP responses

use crate::AuthError;
use http::header::{CONTENT_TYPE, WWW_AUTHENTICATE};
use http::{HeaderValue, Response};
use serde::{Deserialize, Serialize};

/// Body shared by every auth error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error_code: String,
    pub detail: String,
}

impl From<&AuthError> for ErrorResponse {
    fn from(err: &AuthError) -> Self {
        Self {
            error_code: err.code().to_string(),
            detail: err.detail().to_string(),
        }
    }
}

impl AuthError {
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::from(self)
    }

    /// Build a JSON response with the mapped status and, for token
    /// failures, a `WWW-Authenticate: Bearer` header.
    pub fn into_http_response(self) -> Response<String> {
        let body = serde_json::json!({
            "error_code": self.code(),
            "detail": self.detail(),
        })
        .to_string();

        let mut response = Response::new(body);
        *response.status_mut() = self.status();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(challenge) = self.challenge() {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static(challenge));
        }
        response
    }
}

impl From<AuthError> for Response<String> {
    fn from(err: AuthError) -> Self {
        err.into_http_response()
    }
}
