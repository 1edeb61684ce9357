//! Authorization endpoint handler.
//!
//! # Flow
//!
//! ```text
//! GET /oauth/authorize?response_type=...&client_id=...
//!     └─► decoder  → (AuthorizeRequest, decode error?)
//!         └─► handler for request.stage (decode error passed along)
//!             └─► encoder → HTTP response
//! ```
//!
//! Decoding errors never short-circuit: the stage handler always runs and
//! decides how the error is shown.

use std::fmt;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::response::Response;
use axum::routing::get;

use crate::context::AuthorizeContext;
use crate::oauth::{AuthorizeDecoder, AuthorizeHandler};
use crate::response::ResponseEncoder;

/// The authorization endpoint: decoder, stage handler and encoder composed
/// into one request handler.
#[derive(Clone)]
pub struct AuthorizeEndpoint {
    /// Collaborators passed to every handler invocation.
    context: AuthorizeContext,
    /// Decodes incoming requests.
    decoder: Arc<dyn AuthorizeDecoder>,
    /// Produces the response, usually an
    /// [`AuthorizeHandlerMux`](crate::oauth::AuthorizeHandlerMux).
    handler: Arc<dyn AuthorizeHandler>,
    /// Writes the response out.
    encoder: Arc<dyn ResponseEncoder>,
}

impl AuthorizeEndpoint {
    /// Composes an endpoint. The handler must be fully built: it is shared
    /// read-only between requests from here on.
    pub fn new(
        context: AuthorizeContext,
        decoder: impl AuthorizeDecoder + 'static,
        handler: impl AuthorizeHandler + 'static,
        encoder: impl ResponseEncoder + 'static,
    ) -> Self {
        Self {
            context,
            decoder: Arc::new(decoder),
            handler: Arc::new(handler),
            encoder: Arc::new(encoder),
        }
    }

    /// Handles one request: decode, dispatch, encode.
    pub fn handle(&self, parts: &Parts) -> Response {
        let (request, decode_err) = self.decoder.decode_authorize(parts);
        let responder = self
            .handler
            .handle_authorize_request(&self.context, request, decode_err);
        self.encoder.encode_response(responder)
    }

    /// Router serving the endpoint for `GET` and `POST` on `path`.
    pub fn into_router(self, path: &str) -> Router {
        Router::new()
            .route(path, get(authorize_handler).post(authorize_handler))
            .with_state(self)
    }
}

impl fmt::Debug for AuthorizeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizeEndpoint")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// `GET|POST /oauth/authorize` handler.
///
/// Only the request head is read; parameters come from the query string.
pub async fn authorize_handler(
    State(endpoint): State<AuthorizeEndpoint>,
    request: Request,
) -> Response {
    let (parts, _body) = request.into_parts();
    endpoint.handle(&parts)
}
