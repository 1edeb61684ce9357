//! HTTP handlers for the authorization endpoint.
//!
//! - [`authorize`] - decoder → stage handler → encoder wiring

pub mod authorize;

pub use authorize::{AuthorizeEndpoint, authorize_handler};
