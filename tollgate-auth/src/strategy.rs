// Bearer token extraction and verification

use crate::{AuthError, Result};
use http::HeaderMap;
use http::header::AUTHORIZATION;
use std::sync::Arc;
use tollgate_jwt::{IdentityClaims, JwtService};
use tollgate_log::debug;

/// Pull the token out of an `Authorization: Bearer <token>` value.
///
/// A missing or blank header means no credentials were presented. Any other
/// scheme, or a bearer scheme with nothing after it, is an invalid token.
/// The scheme name is matched case-insensitively.
pub fn extract_bearer(header: Option<&str>) -> Result<&str> {
    let header = match header.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::authentication_required()),
    };

    let (scheme, token) = header.split_once(' ').unwrap_or((header, ""));
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::invalid_token().with_detail("Invalid authorization scheme"));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::invalid_token());
    }

    Ok(token)
}

/// Authenticates requests by their bearer token.
#[derive(Clone)]
pub struct JwtStrategy {
    jwt: Arc<JwtService>,
}

impl JwtStrategy {
    pub fn new(jwt: Arc<JwtService>) -> Self {
        Self { jwt }
    }

    /// Decode the bearer token in an `Authorization` header value.
    pub fn authenticate(&self, header: Option<&str>) -> Result<IdentityClaims> {
        let token = extract_bearer(header)?;
        self.jwt.decode(token).map_err(AuthError::from)
    }

    /// Decode the bearer token carried by a request's headers.
    pub fn authenticate_headers(&self, headers: &HeaderMap) -> Result<IdentityClaims> {
        let header = match headers.get(AUTHORIZATION) {
            None => None,
            Some(value) => Some(value.to_str().map_err(|_| {
                debug!("authorization header is not visible ASCII");
                AuthError::invalid_token()
            })?),
        };
        self.authenticate(header)
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}
