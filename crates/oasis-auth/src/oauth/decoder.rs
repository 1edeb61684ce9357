//! Decoding HTTP requests into [`AuthorizeRequest`]s.

use std::collections::HashSet;
use std::sync::Arc;

use axum::http::request::Parts;

use super::authorize::{AuthorizeRequest, RequestHead};
use crate::config::AuthorizeConfig;
use crate::error::AuthError;
use crate::response::FormValues;

/// Characters stripped from both ends of every decoded parameter.
const TRIMMED: &[char] = &['\r', '\n', '\t', ' '];

/// Decodes an HTTP request into an [`AuthorizeRequest`].
///
/// A request is always returned, even when validation fails: the error is
/// handed to the stage handler as data, and the handler decides what the
/// user sees.
pub trait AuthorizeDecoder: Send + Sync {
    /// Decodes the request head.
    fn decode_authorize(&self, parts: &Parts) -> (AuthorizeRequest, Option<AuthError>);
}

/// Default decoder.
///
/// Reads `response_type`, `client_id`, `redirect_uri`, `scope` and `state`
/// from the query string and checks `response_type` against a fixed
/// allow-set. Immutable once built, so one instance serves every request.
#[derive(Debug, Clone, Default)]
pub struct DefaultAuthorizeDecoder {
    allowed_response_types: HashSet<String>,
}

impl DefaultAuthorizeDecoder {
    /// Creates a decoder accepting the given response types.
    ///
    /// With no response types every request is rejected.
    pub fn new<I, S>(allowed_response_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_response_types: allowed_response_types.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a decoder from configuration.
    #[must_use]
    pub fn from_config(config: &AuthorizeConfig) -> Self {
        Self::new(config.allowed_response_types.iter().cloned())
    }

    /// Returns `true` if `response_type` is in the allow-set.
    #[must_use]
    pub fn allows(&self, response_type: &str) -> bool {
        self.allowed_response_types.contains(response_type)
    }

    /// Decodes and validates a raw query string.
    ///
    /// Validation stops at the first failure:
    ///
    /// 1. `response_type` must be non-empty ([`AuthError::MissingResponseType`])
    /// 2. `response_type` must be allowed ([`AuthError::ResponseTypeNotAllowed`])
    pub fn decode_query(&self, query: &str) -> (AuthorizeRequest, Option<AuthError>) {
        let values = FormValues::parse(query);
        let param = |key: &str| {
            values
                .get(key)
                .unwrap_or_default()
                .trim_matches(TRIMMED)
                .to_string()
        };

        let request = AuthorizeRequest {
            response_type: param("response_type"),
            client_id: param("client_id"),
            redirect_uri: param("redirect_uri"),
            scope: param("scope"),
            state: param("state"),
            ..Default::default()
        };

        let error = self.validate(&request);
        if let Some(ref err) = error {
            tracing::debug!(
                client_id = %request.client_id,
                error = %err,
                "Authorization request failed validation"
            );
        }
        (request, error)
    }

    fn validate(&self, request: &AuthorizeRequest) -> Option<AuthError> {
        if request.response_type.is_empty() {
            return Some(AuthError::MissingResponseType);
        }
        if !self.allows(&request.response_type) {
            return Some(AuthError::response_type_not_allowed(
                request.response_type.as_str(),
            ));
        }
        None
    }
}

impl AuthorizeDecoder for DefaultAuthorizeDecoder {
    fn decode_authorize(&self, parts: &Parts) -> (AuthorizeRequest, Option<AuthError>) {
        let (mut request, error) = self.decode_query(parts.uri.query().unwrap_or_default());
        request.http_request = Some(Arc::new(RequestHead::from_parts(parts)));
        (request, error)
    }
}
