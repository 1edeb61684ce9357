//! OAuth 2.0 authorization endpoint core.
//!
//! - [`authorize`] - the request model, stages and RFC 6749 response payloads
//! - [`decoder`] - turning HTTP requests into validated [`AuthorizeRequest`]s
//! - [`mux`] - routing a request to the handler for its stage
//!
//! # Example
//!
//! ```ignore
//! use oasis_auth::oauth::{AuthorizeDecoder, DefaultAuthorizeDecoder};
//!
//! let decoder = DefaultAuthorizeDecoder::new(["code"]);
//! let (request, decode_err) = decoder.decode_query("response_type=code&client_id=my-app");
//! assert!(decode_err.is_none());
//! ```

pub mod authorize;
pub mod decoder;
pub mod mux;

// Request model and response payloads
pub use authorize::{
    AuthorizationError, AuthorizationErrorCode, AuthorizationResponse, AuthorizeRequest,
    AuthorizeStage, ImplicitTokenResponse, RequestHead, ResponseMode,
};

// Decoding
pub use decoder::{AuthorizeDecoder, DefaultAuthorizeDecoder};

// Stage dispatch
pub use mux::{AuthorizeHandler, AuthorizeHandlerFn, AuthorizeHandlerMux};
