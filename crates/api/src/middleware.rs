use axum::{
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};

use shade_core::UserId;

use crate::app::errors;
use crate::context::SessionContext;

/// Name of the cookie carrying the session identifier.
pub const SESSION_COOKIE: &str = "user";

/// Session precondition for `/events` routes.
///
/// Reads the session cookie, rejects missing or blank values with 400, and
/// attaches the identifier to the request as a typed extension. The value
/// is passed through verbatim; whether it refers to a known user is the
/// store's concern, not this layer's.
pub async fn session_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let user_id = extract_session_cookie(req.headers())?;

    req.extensions_mut().insert(SessionContext::new(user_id));

    Ok(next.run(req).await)
}

fn extract_session_cookie(headers: &HeaderMap) -> Result<UserId, Response> {
    let value = read_cookie(headers, SESSION_COOKIE).ok_or_else(|| {
        errors::json_error(StatusCode::BAD_REQUEST, "bad_request", "cookie read error")
    })?;

    if value.is_empty() {
        return Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "bad_request",
            "received blank user identifier",
        ));
    }

    Ok(UserId::from(value))
}

fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(header::COOKIE) {
        let Ok(raw) = header.to_str() else { continue };
        for pair in raw.split(';') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            if key.trim() == name {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn cookie_headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn reads_the_named_cookie_among_others() {
        let headers = cookie_headers("theme=dark; user=abc123; lang=en");
        assert_eq!(
            read_cookie(&headers, SESSION_COOKIE).as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn missing_cookie_is_a_bad_request() {
        let err = extract_session_cookie(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn blank_cookie_is_a_bad_request() {
        let err = extract_session_cookie(&cookie_headers("user=")).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn cookie_value_is_passed_through_verbatim() {
        let user_id = extract_session_cookie(&cookie_headers("user=abc123")).unwrap();
        assert_eq!(user_id.as_str(), "abc123");
    }

    #[test]
    fn a_user_header_is_not_a_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert("user", HeaderValue::from_static("abc123"));
        assert!(read_cookie(&headers, SESSION_COOKIE).is_none());
    }
}
