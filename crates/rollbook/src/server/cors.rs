//! Origin allow-list enforcement.
//!
//! Requests without an `Origin` header pass untouched. Listed origins get the
//! CORS response headers, and their preflight requests are answered here.
//! Every other origin is rejected with 403 before any handler runs.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN, VARY,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::error::Error;

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "content-type";
const PREFLIGHT_MAX_AGE_SECS: &str = "600";

/// The set of origins allowed to call the service from a browser.
#[derive(Debug, Clone, Default)]
pub struct AllowedOrigins(Arc<HashSet<String>>);

impl AllowedOrigins {
    /// Build an allow-list. Trailing slashes are ignored.
    #[must_use]
    pub fn new<I, T>(origins: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self(Arc::new(
            origins
                .into_iter()
                .map(|o| o.as_ref().trim_end_matches('/').to_string())
                .collect(),
        ))
    }

    /// Check a raw `Origin` header value.
    #[must_use]
    pub fn allows(&self, origin: &str) -> bool {
        self.0.contains(origin.trim_end_matches('/'))
    }
}

/// Middleware applying the allow-list to every routed request.
pub async fn enforce(
    State(allowed): State<AllowedOrigins>,
    request: Request,
    next: Next,
) -> Response {
    let Some(origin) = request.headers().get(ORIGIN).cloned() else {
        return next.run(request).await;
    };

    let origin_text = origin.to_str().unwrap_or_default();
    if !allowed.allows(origin_text) {
        warn!("Rejected request from origin {:?}", origin);
        return Error::OriginForbidden {
            origin: String::from_utf8_lossy(origin.as_bytes()).into_owned(),
        }
        .into_response();
    }

    if is_preflight(&request) {
        let mut response = StatusCode::NO_CONTENT.into_response();
        let headers = response.headers_mut();
        allow_origin(headers, origin);
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.insert(
            ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(PREFLIGHT_MAX_AGE_SECS),
        );
        return response;
    }

    let mut response = next.run(request).await;
    allow_origin(response.headers_mut(), origin);
    response
}

fn is_preflight(request: &Request) -> bool {
    request.method() == Method::OPTIONS
        && request.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD)
}

fn allow_origin(headers: &mut HeaderMap, origin: HeaderValue) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.append(VARY, HeaderValue::from_static("origin"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_listed_origin() {
        let allowed = AllowedOrigins::new(["http://localhost:5173"]);
        assert!(allowed.allows("http://localhost:5173"));
        assert!(allowed.allows("http://localhost:5173/"));
    }

    #[test]
    fn test_rejects_unlisted_origin() {
        let allowed = AllowedOrigins::new(["http://localhost:5173"]);
        assert!(!allowed.allows("http://localhost:5174"));
        assert!(!allowed.allows("https://localhost:5173"));
        assert!(!allowed.allows(""));
    }

    #[test]
    fn test_empty_list_rejects_everything() {
        let allowed = AllowedOrigins::default();
        assert!(!allowed.allows("http://localhost:5173"));
    }
}
