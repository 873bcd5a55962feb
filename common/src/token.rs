use actix_session::SessionExt;
use actix_web::{HttpMessage, HttpRequest, dev::ServiceRequest, http::header::HeaderMap};

/// Session key holding the BaaS access token after a login callback.
pub const SESSION_TOKEN_KEY: &str = "token";

/// Access token of the caller, as handed to the external service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(pub String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Reads `Authorization: Bearer <token>` from the headers.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

/// Bearer header first, session cookie second.
pub fn token_from_service_request(req: &ServiceRequest) -> Option<AccessToken> {
    if let Some(token) = bearer_token(req.headers()) {
        return Some(AccessToken(token));
    }
    req.get_session()
        .get::<String>(SESSION_TOKEN_KEY)
        .ok()
        .flatten()
        .map(AccessToken)
}

/// Same lookup for plain handlers that live outside the auth middleware.
pub fn token_from_request(req: &HttpRequest) -> Option<AccessToken> {
    if let Some(token) = req.extensions().get::<AccessToken>() {
        return Some(token.clone());
    }
    if let Some(token) = bearer_token(req.headers()) {
        return Some(AccessToken(token));
    }
    req.get_session()
        .get::<String>(SESSION_TOKEN_KEY)
        .ok()
        .flatten()
        .map(AccessToken)
}
