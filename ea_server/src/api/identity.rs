//! Caller identity middleware.
//!
//! Authentication happens in a fronting identity provider; by the time a
//! request reaches this server it carries the verified account email in the
//! `x-user-id` header and an optional role in `x-user-role`. This middleware
//! turns those headers into an [`Identity`] available to every handler via
//! request extensions.

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use esports_arena::auth::{Identity, Role};

use super::{ApiError, error};

/// Header carrying the verified account email
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the caller's role; absent means player
pub const USER_ROLE_HEADER: &str = "x-user-role";

fn identity_from_headers(headers: &HeaderMap) -> Result<Identity, ApiError> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Missing x-user-id header"))?;

    let role = match headers.get(USER_ROLE_HEADER) {
        None => Role::Player,
        Some(raw) => raw
            .to_str()
            .ok()
            .and_then(|s| s.parse::<Role>().ok())
            .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Unknown role"))?,
    };

    Ok(Identity {
        user_id: user_id.to_string(),
        role,
    })
}

/// Middleware attaching the caller [`Identity`] to the request.
///
/// Rejects requests without a usable `x-user-id` header with `401`.
pub async fn identity_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let identity = identity_from_headers(request.headers())?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_identity_defaults_to_player() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("p@example.com"));

        let identity = identity_from_headers(&headers).expect("Identity should parse");
        assert_eq!(identity.user_id, "p@example.com");
        assert_eq!(identity.role, Role::Player);
    }

    #[test]
    fn test_identity_admin_role() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("a@example.com"));
        headers.insert(USER_ROLE_HEADER, HeaderValue::from_static("admin"));

        let identity = identity_from_headers(&headers).expect("Identity should parse");
        assert!(identity.is_admin());
    }

    #[test]
    fn test_missing_user_id_rejected() {
        let headers = HeaderMap::new();
        let (status, _) = identity_from_headers(&headers).unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("p@example.com"));
        headers.insert(USER_ROLE_HEADER, HeaderValue::from_static("superuser"));

        let (status, _) = identity_from_headers(&headers).unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
