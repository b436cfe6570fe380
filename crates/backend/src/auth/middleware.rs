//! Authentication middleware layer for protecting routes.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::AppState;

use super::jwt;
use super::types::{AuthConfig, AuthUser};

/// Middleware function that requires a valid bearer token.
///
/// Use with `axum::middleware::from_fn_with_state`. On success the
/// [`AuthUser`] is inserted into the request extensions for handlers to
/// pick up with `Extension<AuthUser>`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match extract_auth_user(request.headers(), &state.auth_config) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}

/// Extract and validate the user from an `Authorization: Bearer` header.
pub fn extract_auth_user(headers: &HeaderMap, config: &AuthConfig) -> Result<AuthUser, ApiError> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let token = header_value
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Invalid authentication header format"))?;

    let claims = jwt::validate_token(config, token).map_err(|e| {
        tracing::debug!("Rejected bearer token: {}", e);
        ApiError::unauthorized("Invalid or expired token")
    })?;

    Ok(claims.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use uuid::Uuid;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "middleware-test-secret".to_string(),
            token_ttl_hours: 1,
        }
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn unauthorized_message(result: Result<AuthUser, ApiError>) -> String {
        match result {
            Err(ApiError::Unauthorized(msg)) => msg,
            other => panic!("expected unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_header() {
        let msg = unauthorized_message(extract_auth_user(&HeaderMap::new(), &config()));
        assert_eq!(msg, "Authentication required");
    }

    #[test]
    fn test_wrong_scheme() {
        let msg = unauthorized_message(extract_auth_user(&headers_with("Token abc"), &config()));
        assert_eq!(msg, "Invalid authentication header format");

        let msg = unauthorized_message(extract_auth_user(&headers_with("Bearer "), &config()));
        assert_eq!(msg, "Invalid authentication header format");
    }

    #[test]
    fn test_bad_token() {
        let msg = unauthorized_message(extract_auth_user(
            &headers_with("Bearer not.a.jwt"),
            &config(),
        ));
        assert_eq!(msg, "Invalid or expired token");
    }

    #[test]
    fn test_valid_token() {
        let config = config();
        let user_id = Uuid::new_v4();
        let token = jwt::create_token(&config, user_id, "bob").unwrap();

        let user = extract_auth_user(&headers_with(&format!("Bearer {}", token)), &config)
            .expect("token should be accepted");
        assert_eq!(
            user,
            AuthUser {
                id: user_id,
                username: "bob".to_string(),
            }
        );
    }
}
