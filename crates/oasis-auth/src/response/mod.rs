//! Responses produced by authorize handlers.
//!
//! A handler answers with a [`Responder`], one of:
//!
//! - [`ResponseCache`] - a prepared status/header/body response for
//!   intermediate pages (login, consent) and non-redirectable errors
//! - [`RedirectResponse`] - the final Authorization, Token or Error
//!   Response, delivered as a 307 redirect
//!
//! A [`ResponseEncoder`] turns the responder into the HTTP response written
//! to the user agent.

mod cache;
mod encoder;
mod redirect;
mod values;

pub use cache::ResponseCache;
pub use encoder::{DefaultResponseEncoder, ResponseEncoder};
pub use redirect::RedirectResponse;
pub use values::FormValues;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::AuthResult;

/// Response produced by an authorize handler. Consumed once when written.
#[derive(Debug)]
pub enum Responder {
    /// Prepared status/header/body response.
    Cache(ResponseCache),
    /// Redirect to the client's redirect URI.
    Redirect(RedirectResponse),
}

impl Responder {
    /// Renders the HTTP response.
    ///
    /// # Errors
    ///
    /// Only redirects can fail, when their redirect URI is missing or not
    /// an absolute URI. No response is produced in that case.
    pub fn respond(self) -> AuthResult<Response> {
        match self {
            Self::Cache(cache) => Ok(cache.into_response()),
            Self::Redirect(redirect) => redirect.respond(),
        }
    }

    /// Short name of the variant, for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cache(_) => "cache",
            Self::Redirect(_) => "redirect",
        }
    }

    /// Status the rendered response will carry, if it renders.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Cache(cache) => cache.status,
            Self::Redirect(_) => StatusCode::TEMPORARY_REDIRECT,
        }
    }
}

impl From<ResponseCache> for Responder {
    fn from(cache: ResponseCache) -> Self {
        Self::Cache(cache)
    }
}

impl From<RedirectResponse> for Responder {
    fn from(redirect: RedirectResponse) -> Self {
        Self::Redirect(redirect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_responder_from_variants() {
        let cache: Responder = ResponseCache::new(StatusCode::OK).into();
        assert_eq!(cache.kind(), "cache");
        assert_eq!(cache.status(), StatusCode::OK);

        let redirect: Responder = RedirectResponse::new("https://a.example/cb").into();
        assert_eq!(redirect.kind(), "redirect");
        assert_eq!(redirect.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[test]
    fn test_responder_respond() {
        let response = Responder::from(RedirectResponse::new("https://a.example/cb"))
            .respond()
            .unwrap();
        assert_eq!(response.headers()[header::LOCATION], "https://a.example/cb");

        let response = Responder::from(ResponseCache::new(StatusCode::ACCEPTED))
            .respond()
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        assert!(
            Responder::from(RedirectResponse::new("/cb"))
                .respond()
                .is_err()
        );
    }
}
