//! Request authentication and acting-user resolution.

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Box header naming the user a request acts for (`As-User`).
pub const AS_USER_HEADER: &str = "as-user";

/// Validates the bearer token in `headers` against the configured key.
///
/// Passes when no key is configured.
pub fn validate_api_key(expected: Option<&str>, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = expected else {
        return Ok(());
    };
    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;

    if provided.trim() == expected {
        Ok(())
    } else {
        Err(ApiError::unauthorized("invalid API key"))
    }
}

/// Middleware rejecting requests without a valid API key.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    validate_api_key(state.api_key.as_deref(), request.headers())?;
    Ok(next.run(request).await)
}

/// The login named by `As-User`, or `default_user` when the header is absent or blank.
pub fn acting_user(headers: &HeaderMap, default_user: &str) -> String {
    headers
        .get(AS_USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default_user)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn no_configured_key_allows_everything() {
        assert!(validate_api_key(None, &HeaderMap::new()).is_ok());
    }

    #[test]
    fn bearer_token_must_match() {
        let mut headers = HeaderMap::new();
        assert!(validate_api_key(Some("s3cret"), &headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer nope"));
        assert!(validate_api_key(Some("s3cret"), &headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer s3cret"));
        assert!(validate_api_key(Some("s3cret"), &headers).is_ok());
    }

    #[test]
    fn as_user_falls_back_to_default() {
        let mut headers = HeaderMap::new();
        assert_eq!(acting_user(&headers, "Administrator"), "Administrator");

        headers.insert(AS_USER_HEADER, HeaderValue::from_static("  "));
        assert_eq!(acting_user(&headers, "Administrator"), "Administrator");

        headers.insert(AS_USER_HEADER, HeaderValue::from_static("jdoe"));
        assert_eq!(acting_user(&headers, "Administrator"), "jdoe");
    }
}
