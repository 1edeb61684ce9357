//! Stage-keyed dispatch of authorization requests.
//!
//! An authorization server usually shows several pages before it can send
//! the final redirect: a login form, an MFA prompt, a scope review. Each of
//! those is a stage; [`AuthorizeHandlerMux`] routes a request to the handler
//! registered for its [`AuthorizeStage`].
//!
//! The mux is filled while the endpoint is being built and shared read-only
//! afterwards:
//!
//! ```ignore
//! let mux = AuthorizeHandlerMux::new()
//!     .with_fn(AuthorizeStage::INITIALIZE, |_ctx, request, decode_err| {
//!         Some(login_page(&request, decode_err).into())
//!     })
//!     .with_fn(AuthorizeStage::TO_AUTHORIZE, |ctx, request, _| {
//!         Some(issue_code(ctx, request).into())
//!     });
//! let handler: Arc<dyn AuthorizeHandler> = Arc::new(mux);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;

use super::authorize::{AuthorizeRequest, AuthorizeStage};
use crate::context::AuthorizeContext;
use crate::error::AuthError;
use crate::response::{ResponseCache, Responder};

/// Handles an authorization request.
///
/// The final answer to an authorization request is always a redirect
/// ([`RedirectResponse`](crate::response::RedirectResponse)): an
/// Authorization Response, a Token Response or an Error Response.
/// Intermediate pages (login, MFA, scope review, asking for a missing
/// client) are [`ResponseCache`]s.
///
/// `decode_err` is the outcome of decoding; the handler decides how to
/// present it. Returning `None` means no response was produced.
pub trait AuthorizeHandler: Send + Sync {
    /// Produces the response for `request`.
    fn handle_authorize_request(
        &self,
        ctx: &AuthorizeContext,
        request: AuthorizeRequest,
        decode_err: Option<AuthError>,
    ) -> Option<Responder>;
}

/// Adapts a plain function or closure into an [`AuthorizeHandler`].
pub struct AuthorizeHandlerFn<F>(pub F);

impl<F> AuthorizeHandler for AuthorizeHandlerFn<F>
where
    F: Fn(&AuthorizeContext, AuthorizeRequest, Option<AuthError>) -> Option<Responder>
        + Send
        + Sync,
{
    fn handle_authorize_request(
        &self,
        ctx: &AuthorizeContext,
        request: AuthorizeRequest,
        decode_err: Option<AuthError>,
    ) -> Option<Responder> {
        (self.0)(ctx, request, decode_err)
    }
}

impl<H: AuthorizeHandler + ?Sized> AuthorizeHandler for Arc<H> {
    fn handle_authorize_request(
        &self,
        ctx: &AuthorizeContext,
        request: AuthorizeRequest,
        decode_err: Option<AuthError>,
    ) -> Option<Responder> {
        (**self).handle_authorize_request(ctx, request, decode_err)
    }
}

impl<H: AuthorizeHandler + ?Sized> AuthorizeHandler for Box<H> {
    fn handle_authorize_request(
        &self,
        ctx: &AuthorizeContext,
        request: AuthorizeRequest,
        decode_err: Option<AuthError>,
    ) -> Option<Responder> {
        (**self).handle_authorize_request(ctx, request, decode_err)
    }
}

/// Routes each request to the handler registered for its stage.
///
/// Requests in a stage nobody registered get a 500 status-text response.
/// The mux is itself an [`AuthorizeHandler`], so muxes can be nested.
#[derive(Default)]
pub struct AuthorizeHandlerMux {
    handlers: HashMap<AuthorizeStage, Arc<dyn AuthorizeHandler>>,
}

impl AuthorizeHandlerMux {
    /// Returns an empty mux.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for `stage`.
    ///
    /// If two handlers are added to the same stage, the later one replaces
    /// the former.
    pub fn add(&mut self, stage: AuthorizeStage, handler: impl AuthorizeHandler + 'static) {
        if self.handlers.insert(stage, Arc::new(handler)).is_some() {
            tracing::debug!(%stage, "Replaced authorize handler");
        }
    }

    /// Registers a function as the handler for `stage`.
    ///
    /// If two handlers are added to the same stage, the later one replaces
    /// the former.
    pub fn add_fn<F>(&mut self, stage: AuthorizeStage, handler: F)
    where
        F: Fn(&AuthorizeContext, AuthorizeRequest, Option<AuthError>) -> Option<Responder>
            + Send
            + Sync
            + 'static,
    {
        self.add(stage, AuthorizeHandlerFn(handler));
    }

    /// Builder form of [`Self::add`].
    #[must_use]
    pub fn with(mut self, stage: AuthorizeStage, handler: impl AuthorizeHandler + 'static) -> Self {
        self.add(stage, handler);
        self
    }

    /// Builder form of [`Self::add_fn`].
    #[must_use]
    pub fn with_fn<F>(mut self, stage: AuthorizeStage, handler: F) -> Self
    where
        F: Fn(&AuthorizeContext, AuthorizeRequest, Option<AuthError>) -> Option<Responder>
            + Send
            + Sync
            + 'static,
    {
        self.add_fn(stage, handler);
        self
    }

    /// Returns `true` if a handler is registered for `stage`.
    #[must_use]
    pub fn contains(&self, stage: AuthorizeStage) -> bool {
        self.handlers.contains_key(&stage)
    }

    /// Registered stages, in ascending order.
    #[must_use]
    pub fn stages(&self) -> Vec<AuthorizeStage> {
        let mut stages: Vec<_> = self.handlers.keys().copied().collect();
        stages.sort_unstable();
        stages
    }
}

impl AuthorizeHandler for AuthorizeHandlerMux {
    fn handle_authorize_request(
        &self,
        ctx: &AuthorizeContext,
        request: AuthorizeRequest,
        decode_err: Option<AuthError>,
    ) -> Option<Responder> {
        let stage = request.stage;
        match self.handlers.get(&stage) {
            Some(handler) => {
                tracing::debug!(
                    %stage,
                    client_id = %request.client_id,
                    "Dispatching authorize request"
                );
                handler.handle_authorize_request(ctx, request, decode_err)
            }
            None => {
                tracing::warn!(%stage, "No authorize handler registered for stage");
                Some(ResponseCache::status_text(StatusCode::INTERNAL_SERVER_ERROR).into())
            }
        }
    }
}

impl fmt::Debug for AuthorizeHandlerMux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizeHandlerMux")
            .field("stages", &self.stages())
            .finish()
    }
}
