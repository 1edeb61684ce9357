//! Writing responders out as HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::{ResponseCache, Responder};

/// Turns the outcome of an authorize handler into the HTTP response.
pub trait ResponseEncoder: Send + Sync {
    /// Encodes `responder`. `None` means the handler produced nothing.
    fn encode_response(&self, responder: Option<Responder>) -> Response;
}

/// Default [`ResponseEncoder`].
///
/// - a responder that renders is written as-is
/// - a redirect that fails to render becomes a `text/plain` page with the
///   error's [status](crate::AuthError::status_code) and
///   [message](crate::AuthError::message)
/// - a missing responder becomes a 500 status-text page
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResponseEncoder;

impl ResponseEncoder for DefaultResponseEncoder {
    fn encode_response(&self, responder: Option<Responder>) -> Response {
        let Some(responder) = responder else {
            tracing::warn!("authorize handler produced no response");
            return ResponseCache::status_text(StatusCode::INTERNAL_SERVER_ERROR).into_response();
        };

        let kind = responder.kind();
        match responder.respond() {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(
                    responder = kind,
                    category = %err.category(),
                    error = %err,
                    "Failed to render authorize response"
                );
                ResponseCache::text(err.status_code(), err.message()).into_response()
            }
        }
    }
}
