//! Redirect response carrying the final result of an authorization flow.

use axum::body::Body;
use axum::http::header::{self, IntoHeaderName};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use url::Url;

use super::cache::copy_headers;
use super::values::FormValues;
use crate::AuthResult;
use crate::error::AuthError;

/// Final response to an authorization request.
///
/// Per RFC 6749 the Authorization Response, the implicit grant Token
/// Response and the Error Response are all URL redirections. Errors that
/// need to be shown to the resource owner instead (§4.1.2.1, §4.2.2.1) use
/// a [`ResponseCache`](super::ResponseCache).
#[derive(Debug, Clone, Default)]
pub struct RedirectResponse {
    /// Headers written alongside the redirect.
    pub headers: HeaderMap,

    /// Base redirect URI, as given by the request or the client's default.
    pub redirect_uri: String,

    /// Parameters appended to the redirect URI's existing query.
    pub query: FormValues,

    /// Parameters form-encoded into the fragment component.
    pub fragment: FormValues,
}

impl RedirectResponse {
    /// Creates a redirect to `redirect_uri` with no extra parameters.
    #[must_use]
    pub fn new(redirect_uri: impl Into<String>) -> Self {
        Self {
            redirect_uri: redirect_uri.into(),
            ..Default::default()
        }
    }

    /// Appends a header value.
    #[must_use]
    pub fn with_header(mut self, name: impl IntoHeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Appends query parameters.
    #[must_use]
    pub fn with_query(mut self, values: FormValues) -> Self {
        self.query.merge(&values);
        self
    }

    /// Appends one query parameter.
    #[must_use]
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.add(key, value);
        self
    }

    /// Appends fragment parameters.
    #[must_use]
    pub fn with_fragment(mut self, values: FormValues) -> Self {
        self.fragment.merge(&values);
        self
    }

    /// Appends one fragment parameter.
    #[must_use]
    pub fn with_fragment_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.fragment.add(key, value);
        self
    }

    /// Builds the final `Location` value.
    ///
    /// The base URI's own query parameters are kept and [`Self::query`] is
    /// appended to them; the merged query is re-encoded with keys in
    /// lexicographic order. The fragment is replaced by [`Self::fragment`].
    ///
    /// # Errors
    ///
    /// - [`AuthError::RedirectUriMissing`] if the base URI is empty
    /// - [`AuthError::RedirectUriNotAbsolute`] if it lacks a scheme or host
    /// - [`AuthError::RedirectUriMalformed`] if it cannot be parsed
    pub fn location(&self) -> AuthResult<String> {
        if self.redirect_uri.is_empty() {
            return Err(AuthError::RedirectUriMissing);
        }

        let mut url = match Url::parse(&self.redirect_uri) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase | url::ParseError::EmptyHost) => {
                return Err(AuthError::redirect_uri_not_absolute(&self.redirect_uri));
            }
            Err(e) => return Err(AuthError::redirect_uri_malformed(e.to_string())),
        };
        // the parser repairs `https:host`, `https:///host` and `https:\\host`;
        // only a host the client actually wrote counts
        if !has_authority(&self.redirect_uri)
            || !matches!(url.host_str(), Some(host) if !host.is_empty())
        {
            return Err(AuthError::redirect_uri_not_absolute(&self.redirect_uri));
        }

        let mut query = FormValues::parse(url.query().unwrap_or_default());
        query.merge(&self.query);
        let query = query.encode();
        url.set_query((!query.is_empty()).then_some(query.as_str()));

        let fragment = self.fragment.encode();
        url.set_fragment((!fragment.is_empty()).then_some(fragment.as_str()));

        Ok(url.into())
    }

    /// Renders the redirect: stored headers, `Location`, status 307 and no
    /// body.
    ///
    /// # Errors
    ///
    /// Fails as [`Self::location`] does; nothing is rendered in that case
    /// and the caller decides what to show instead.
    pub fn respond(self) -> AuthResult<Response> {
        let location = self.location()?;
        let location = HeaderValue::from_str(&location)
            .map_err(|e| AuthError::redirect_uri_malformed(e.to_string()))?;

        let mut response = Response::new(Body::empty());
        copy_headers(&self.headers, response.headers_mut());
        response.headers_mut().insert(header::LOCATION, location);
        *response.status_mut() = StatusCode::TEMPORARY_REDIRECT;
        Ok(response)
    }
}

/// Returns `true` if `uri` is `scheme://` followed by a non-empty host.
fn has_authority(uri: &str) -> bool {
    let Some((_, rest)) = uri.split_once(':') else {
        return false;
    };
    let Some(rest) = rest.strip_prefix("//") else {
        return false;
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    !host.is_empty()
}
