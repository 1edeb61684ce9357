//! Fully buffered status/header/body response.

use std::fmt;

use axum::body::Body;
use axum::http::header::{self, IntoHeaderName};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// A response prepared in advance and written out as-is.
///
/// Used for every intermediate page of an authorization flow (login,
/// consent, MFA prompts) and for errors that must not be redirected.
pub struct ResponseCache {
    /// Status code to write.
    pub status: StatusCode,
    /// Headers to write. Multiple values per name are all written.
    pub headers: HeaderMap,
    /// Body to write, if any.
    pub body: Option<Body>,
}

impl ResponseCache {
    /// Creates an empty response with the given status.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// A response whose body is the canonical reason phrase of `status`,
    /// e.g. `Internal Server Error`.
    #[must_use]
    pub fn status_text(status: StatusCode) -> Self {
        Self::new(status).with_body(status.canonical_reason().unwrap_or_default())
    }

    /// A `text/html` response.
    #[must_use]
    pub fn html(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            )
            .with_body(body.into())
    }

    /// A `text/plain` response.
    #[must_use]
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            )
            .with_body(body.into())
    }

    /// Appends a header value. Existing values of the same name are kept.
    #[must_use]
    pub fn with_header(mut self, name: impl IntoHeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCache")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

impl IntoResponse for ResponseCache {
    fn into_response(self) -> Response {
        let mut response = Response::new(self.body.unwrap_or_else(Body::empty));
        copy_headers(&self.headers, response.headers_mut());
        *response.status_mut() = self.status;
        response
    }
}

/// Appends every value of `from` to `to`.
pub(crate) fn copy_headers(from: &HeaderMap, to: &mut HeaderMap) {
    for (name, value) in from {
        to.append(name.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::HeaderName;

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_cached_response_renders_status_headers_and_body() {
        let cache = ResponseCache::new(StatusCode::INTERNAL_SERVER_ERROR)
            .with_header(
                HeaderName::from_static("x-hello-world"),
                HeaderValue::from_static("silly hello"),
            )
            .with_body("hello world");

        let response = cache.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["x-hello-world"], "silly hello");
        assert_eq!(body_string(response).await, "hello world");
    }

    #[tokio::test]
    async fn test_multi_value_headers_are_all_written() {
        let response = ResponseCache::new(StatusCode::OK)
            .with_header(header::SET_COOKIE, HeaderValue::from_static("a=1"))
            .with_header(header::SET_COOKIE, HeaderValue::from_static("b=2"))
            .into_response();

        let cookies: Vec<_> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
    }

    #[tokio::test]
    async fn test_no_body_renders_empty() {
        let response = ResponseCache::new(StatusCode::NO_CONTENT).into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn test_status_text() {
        let response =
            ResponseCache::status_text(StatusCode::INTERNAL_SERVER_ERROR).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().is_empty());
        assert_eq!(body_string(response).await, "Internal Server Error");
    }

    #[tokio::test]
    async fn test_html_sets_content_type() {
        let response = ResponseCache::html(StatusCode::OK, "<p>hi</p>").into_response();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        assert_eq!(body_string(response).await, "<p>hi</p>");
    }
}
