//! # oasis-auth
//!
//! Request/response core of an OAuth 2.0 authorization endpoint
//! (RFC 6749 §4.1.1 and §4.2.1).
//!
//! This crate provides:
//! - Decoding and validation of authorization requests
//! - Stage-keyed dispatch of requests through a multi-step flow
//!   (login → intermediate prompts → authorization)
//! - Cached and redirect responses, including redirect URI construction
//! - Axum wiring of the whole pipeline
//!
//! Token formats, token persistence and client registration are left to
//! the integrator, who supplies them through [`AuthorizeContext`].
//!
//! ## Modules
//!
//! - [`config`] - Authorization endpoint configuration
//! - [`context`] - Integrator-supplied token collaborators
//! - [`error`] - Error types
//! - [`oauth`] - Request model, decoder and stage dispatcher
//! - [`response`] - Cached and redirect responses, response encoding
//! - [`http`] - Axum handler for the authorization endpoint

pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod oauth;
pub mod response;

pub use config::AuthorizeConfig;
pub use context::{AuthorizeContext, TokenFactory, TokenKind, TokenStorage};
pub use error::{AuthError, ErrorCategory};
pub use http::{AuthorizeEndpoint, authorize_handler};
pub use oauth::{
    AuthorizationError, AuthorizationErrorCode, AuthorizationResponse, AuthorizeDecoder,
    AuthorizeHandler, AuthorizeHandlerFn, AuthorizeHandlerMux, AuthorizeRequest, AuthorizeStage,
    DefaultAuthorizeDecoder, ImplicitTokenResponse, RequestHead, ResponseMode,
};
pub use response::{
    DefaultResponseEncoder, FormValues, RedirectResponse, ResponseCache, ResponseEncoder,
    Responder,
};

/// Type alias for authorization endpoint results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use oasis_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::config::AuthorizeConfig;
    pub use crate::context::{AuthorizeContext, TokenFactory, TokenKind, TokenStorage};
    pub use crate::error::{AuthError, ErrorCategory};
    pub use crate::http::AuthorizeEndpoint;
    pub use crate::oauth::{
        AuthorizationError, AuthorizationErrorCode, AuthorizationResponse, AuthorizeDecoder,
        AuthorizeHandler, AuthorizeHandlerMux, AuthorizeRequest, AuthorizeStage,
        DefaultAuthorizeDecoder, ImplicitTokenResponse, ResponseMode,
    };
    pub use crate::response::{
        DefaultResponseEncoder, FormValues, RedirectResponse, ResponseCache, ResponseEncoder,
        Responder,
    };
}
