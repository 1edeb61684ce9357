//! Authorization request model and RFC 6749 response payloads.
//!
//! An [`AuthorizeRequest`] carries the state of one authorization attempt as
//! it moves through the [`AuthorizeStage`]s of a flow. The payload types at
//! the bottom of this module ([`AuthorizationResponse`],
//! [`ImplicitTokenResponse`], [`AuthorizationError`]) build the final
//! redirect a handler returns once the flow is done.
//!
//! # Flow
//!
//! ```text
//! GET /authorize?response_type=code&client_id=...      stage = INITIALIZE
//!     └─► login prompt (cached response)
//! login form submitted                                 stage = TO_AUTHENTICATE
//!     └─► consent prompt (cached response)             stage = INTERMEDIATE
//! consent submitted                                    stage = TO_AUTHORIZE
//!     └─► redirect with code / token / error
//! ```

use std::fmt;
use std::sync::Arc;

use axum::http::request::Parts;
use axum::http::{HeaderMap, Method, Uri};
use serde::{Deserialize, Serialize};

use crate::response::{FormValues, RedirectResponse};

/// Stage of processing an [`AuthorizeRequest`] is in.
///
/// Values 0-99 are reserved for the preset stages. Integrators should use
/// [`AuthorizeStage::custom`] (values from 100) for their own stages.
///
/// Stages are dispatch keys only; the order a flow walks through them is
/// decided by the handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizeStage(u32);

impl AuthorizeStage {
    /// The request has just arrived. The user is about to enter their
    /// login information.
    pub const INITIALIZE: Self = Self(0);

    /// The request came back with login information (a submitted login
    /// form). On success the flow moves on to [`Self::TO_AUTHORIZE`].
    pub const TO_AUTHENTICATE: Self = Self(1);

    /// Any step between authentication and authorization: the user is
    /// logged in but has not yet approved the requested scope.
    pub const INTERMEDIATE: Self = Self(2);

    /// The request came back with the user's confirmation of the requested
    /// scope.
    pub const TO_AUTHORIZE: Self = Self(3);

    /// Boundary marker for preset custom stages.
    pub const CUSTOM: Self = Self(4);

    /// First value available to integrator-defined stages.
    pub const CUSTOM_BASE: u32 = 100;

    /// Returns the integrator-defined stage `CUSTOM_BASE + offset`.
    ///
    /// Offsets past `u32::MAX - CUSTOM_BASE` saturate to `u32::MAX`.
    #[must_use]
    pub const fn custom(offset: u32) -> Self {
        Self(Self::CUSTOM_BASE.saturating_add(offset))
    }

    /// Builds a stage from its raw value.
    #[must_use]
    pub const fn from_value(value: u32) -> Self {
        Self(value)
    }

    /// Raw integer value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns `true` for [`Self::INITIALIZE`].
    #[must_use]
    pub fn is_initial(&self) -> bool {
        *self == Self::INITIALIZE
    }

    /// Returns `true` for values in the reserved 0-99 range.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        self.0 < Self::CUSTOM_BASE
    }
}

impl fmt::Display for AuthorizeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::INITIALIZE => write!(f, "initialize"),
            Self::TO_AUTHENTICATE => write!(f, "to_authenticate"),
            Self::INTERMEDIATE => write!(f, "intermediate"),
            Self::TO_AUTHORIZE => write!(f, "to_authorize"),
            Self::CUSTOM => write!(f, "custom"),
            Self(value) => write!(f, "{value}"),
        }
    }
}

/// Head of the HTTP request an [`AuthorizeRequest`] was decoded from.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestHead {
    /// Request method.
    pub method: Method,
    /// Request URI, including the query string.
    pub uri: Uri,
    /// Request headers.
    pub headers: HeaderMap,
}

impl RequestHead {
    /// Copies the head out of request parts.
    #[must_use]
    pub fn from_parts(parts: &Parts) -> Self {
        Self {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
        }
    }

    /// Parsed query string of the request URI.
    #[must_use]
    pub fn query(&self) -> FormValues {
        FormValues::parse(self.uri.query().unwrap_or_default())
    }

    /// First value of a query parameter.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.query().get(key).map(str::to_string)
    }
}

/// An Authorization Request for either the Authorization Code Grant
/// (RFC 6749 §4.1.1) or the Implicit Grant (RFC 6749 §4.2.1).
///
/// # Example
///
/// ```ignore
/// GET /authorize?
///   response_type=code
///   &client_id=my-app
///   &redirect_uri=https://app.example.com/callback
///   &scope=profile email
///   &state=abc123xyz
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizeRequest {
    /// REQUIRED. `code` or `token`.
    pub response_type: String,

    /// REQUIRED. Client identifier (RFC 6749 §2.2). The decoder does not
    /// validate it; handlers do.
    pub client_id: String,

    /// OPTIONAL. Absolute URI the final response is redirected to
    /// (RFC 6749 §3.1.2).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub redirect_uri: String,

    /// OPTIONAL. Space-delimited scope of the access request (RFC 6749 §3.3).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scope: String,

    /// RECOMMENDED. Opaque value echoed back to the client, used to prevent
    /// cross-site request forgery (RFC 6749 §10.12).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,

    /// Where this request stands in the authorization flow.
    #[serde(default, skip_serializing_if = "AuthorizeStage::is_initial")]
    pub stage: AuthorizeStage,

    /// Id of the authenticated user. Set by handlers, never by decoders.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_id: String,

    /// The raw request this was decoded from, if any.
    #[serde(skip)]
    pub http_request: Option<Arc<RequestHead>>,
}

impl AuthorizeRequest {
    /// Creates an empty request in the initial stage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw request this was decoded from, if any.
    #[must_use]
    pub fn http_request(&self) -> Option<&RequestHead> {
        self.http_request.as_deref()
    }

    /// Requested scopes, split on whitespace.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope.split_whitespace()
    }

    /// Returns `true` once a handler has recorded the authenticated user.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.user_id.is_empty()
    }
}

/// Where response parameters are placed on the redirect URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseMode {
    /// Query component (Authorization Code Grant, RFC 6749 §4.1.2).
    Query,
    /// Fragment component (Implicit Grant, RFC 6749 §4.2.2).
    Fragment,
}

impl ResponseMode {
    /// The mode RFC 6749 uses for a response type: `token` answers in the
    /// fragment, everything else in the query.
    #[must_use]
    pub fn for_response_type(response_type: &str) -> Self {
        if response_type == "token" {
            Self::Fragment
        } else {
            Self::Query
        }
    }

    fn redirect(self, redirect_uri: &str, values: FormValues) -> RedirectResponse {
        let response = RedirectResponse::new(redirect_uri);
        match self {
            Self::Query => response.with_query(values),
            Self::Fragment => response.with_fragment(values),
        }
    }
}

/// Authorization Response of the Authorization Code Grant (RFC 6749 §4.1.2).
///
/// ```ignore
/// HTTP/1.1 307 Temporary Redirect
/// Location: https://app.example.com/callback?code=SplxlOBeZQQYbYS6WxSbIA&state=xyz
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationResponse {
    /// Authorization code to be exchanged for tokens.
    pub code: String,

    /// Echoed state parameter.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
}

impl AuthorizationResponse {
    /// Creates a new authorization response.
    #[must_use]
    pub fn new(code: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            state: state.into(),
        }
    }

    /// Builds the redirect carrying the code in the query component.
    #[must_use]
    pub fn into_redirect(self, redirect_uri: &str) -> RedirectResponse {
        let mut values = FormValues::new();
        values.add("code", self.code);
        if !self.state.is_empty() {
            values.add("state", self.state);
        }
        ResponseMode::Query.redirect(redirect_uri, values)
    }
}

/// Access Token Response of the Implicit Grant (RFC 6749 §4.2.2).
///
/// Delivered in the fragment component so it never reaches the client's
/// server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImplicitTokenResponse {
    /// The issued access token.
    pub access_token: String,

    /// Token type, usually `Bearer`.
    pub token_type: String,

    /// Lifetime in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,

    /// Granted scope, if it differs from the requested one.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub scope: String,

    /// Echoed state parameter.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
}

impl ImplicitTokenResponse {
    /// Creates a bearer token response.
    #[must_use]
    pub fn bearer(access_token: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "Bearer".to_string(),
            expires_in: None,
            scope: String::new(),
            state: state.into(),
        }
    }

    /// Sets `expires_in`.
    #[must_use]
    pub fn with_expires_in(mut self, seconds: u64) -> Self {
        self.expires_in = Some(seconds);
        self
    }

    /// Sets the granted scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Builds the redirect carrying the token in the fragment component.
    #[must_use]
    pub fn into_redirect(self, redirect_uri: &str) -> RedirectResponse {
        let mut values = FormValues::new();
        values.add("access_token", self.access_token);
        values.add("token_type", self.token_type);
        if let Some(expires_in) = self.expires_in {
            values.add("expires_in", expires_in.to_string());
        }
        if !self.scope.is_empty() {
            values.add("scope", self.scope);
        }
        if !self.state.is_empty() {
            values.add("state", self.state);
        }
        ResponseMode::Fragment.redirect(redirect_uri, values)
    }
}

/// Error Response (RFC 6749 §4.1.2.1 and §4.2.2.1).
///
/// Only sent by redirect when the redirect URI itself is trustworthy; a bad
/// client or redirect URI has to be reported to the resource owner directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationError {
    /// OAuth 2.0 error code.
    pub error: AuthorizationErrorCode,

    /// Human-readable error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,

    /// Echoed state parameter.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
}

impl AuthorizationError {
    /// Creates a new authorization error.
    #[must_use]
    pub fn new(error: AuthorizationErrorCode, state: impl Into<String>) -> Self {
        Self {
            error,
            error_description: None,
            state: state.into(),
        }
    }

    /// Creates a new authorization error with description.
    #[must_use]
    pub fn with_description(
        error: AuthorizationErrorCode,
        description: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            error,
            error_description: Some(description.into()),
            state: state.into(),
        }
    }

    /// Builds the error redirect, placing parameters per `mode`.
    #[must_use]
    pub fn into_redirect(self, redirect_uri: &str, mode: ResponseMode) -> RedirectResponse {
        let mut values = FormValues::new();
        values.add("error", self.error.as_str());
        if let Some(description) = self.error_description {
            values.add("error_description", description);
        }
        if !self.state.is_empty() {
            values.add("state", self.state);
        }
        mode.redirect(redirect_uri, values)
    }
}

/// OAuth 2.0 authorization error codes (RFC 6749 §4.1.2.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationErrorCode {
    /// The request is missing a required parameter, includes an invalid
    /// parameter value, includes a parameter more than once, or is
    /// otherwise malformed.
    InvalidRequest,

    /// The client is not authorized to request an authorization code
    /// using this method.
    UnauthorizedClient,

    /// The resource owner or authorization server denied the request.
    AccessDenied,

    /// The authorization server does not support obtaining an authorization
    /// code using this method.
    UnsupportedResponseType,

    /// The requested scope is invalid, unknown, or malformed.
    InvalidScope,

    /// The authorization server encountered an unexpected condition.
    ServerError,

    /// The authorization server is temporarily unable to handle the request.
    TemporarilyUnavailable,
}

impl AuthorizationErrorCode {
    /// Returns the string representation of the error code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::UnauthorizedClient => "unauthorized_client",
            Self::AccessDenied => "access_denied",
            Self::UnsupportedResponseType => "unsupported_response_type",
            Self::InvalidScope => "invalid_scope",
            Self::ServerError => "server_error",
            Self::TemporarilyUnavailable => "temporarily_unavailable",
        }
    }
}

impl fmt::Display for AuthorizationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{StatusCode, header};

    #[test]
    fn test_empty_request_serializes_required_fields_only() {
        let json = serde_json::to_string(&AuthorizeRequest::new()).unwrap();
        assert_eq!(json, r#"{"response_type":"","client_id":""}"#);
    }

    #[test]
    fn test_non_initial_stage_is_serialized() {
        let request = AuthorizeRequest {
            stage: AuthorizeStage::TO_AUTHENTICATE,
            ..Default::default()
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"response_type":"","client_id":"","stage":1}"#);
    }

    #[test]
    fn test_full_request_serialization_skips_raw_request() {
        let request = AuthorizeRequest {
            response_type: "code".into(),
            client_id: "my-app".into(),
            redirect_uri: "https://app.example.com/cb".into(),
            scope: "profile".into(),
            state: "xyz".into(),
            stage: AuthorizeStage::custom(1),
            user_id: "alice".into(),
            http_request: Some(Arc::new(RequestHead {
                method: Method::GET,
                uri: Uri::from_static("/authorize"),
                headers: HeaderMap::new(),
            })),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"response_type":"code","client_id":"my-app","redirect_uri":"https://app.example.com/cb","scope":"profile","state":"xyz","stage":101,"user_id":"alice"}"#
        );
    }

    #[test]
    fn test_request_deserialize_defaults() {
        let request: AuthorizeRequest =
            serde_json::from_str(r#"{"response_type":"token","client_id":"c"}"#).unwrap();
        assert_eq!(request.stage, AuthorizeStage::INITIALIZE);
        assert!(request.http_request.is_none());
        assert!(!request.is_authenticated());
    }

    #[test]
    fn test_stage_values() {
        assert_eq!(AuthorizeStage::default(), AuthorizeStage::INITIALIZE);
        assert_eq!(AuthorizeStage::INITIALIZE.value(), 0);
        assert_eq!(AuthorizeStage::TO_AUTHENTICATE.value(), 1);
        assert_eq!(AuthorizeStage::INTERMEDIATE.value(), 2);
        assert_eq!(AuthorizeStage::TO_AUTHORIZE.value(), 3);
        assert_eq!(AuthorizeStage::CUSTOM.value(), 4);
        assert_eq!(AuthorizeStage::custom(7).value(), 107);
        assert_eq!(AuthorizeStage::custom(u32::MAX).value(), u32::MAX);
        assert_eq!(AuthorizeStage::custom(u32::MAX - 100).value(), u32::MAX);
        assert!(AuthorizeStage::CUSTOM.is_reserved());
        assert!(!AuthorizeStage::custom(0).is_reserved());
        assert_eq!(AuthorizeStage::TO_AUTHORIZE.to_string(), "to_authorize");
        assert_eq!(AuthorizeStage::custom(2).to_string(), "102");
    }

    #[test]
    fn test_scopes_split() {
        let request = AuthorizeRequest {
            scope: "openid  profile\temail".into(),
            ..Default::default()
        };
        assert_eq!(
            request.scopes().collect::<Vec<_>>(),
            vec!["openid", "profile", "email"]
        );
    }

    #[test]
    fn test_request_head_query_param() {
        let head = RequestHead {
            method: Method::GET,
            uri: Uri::from_static("/authorize?username=alice&username=bob&x=a+b"),
            headers: HeaderMap::new(),
        };
        assert_eq!(head.query_param("username").as_deref(), Some("alice"));
        assert_eq!(head.query_param("x").as_deref(), Some("a b"));
        assert_eq!(head.query_param("missing"), None);
    }

    #[test]
    fn test_response_mode_for_response_type() {
        assert_eq!(ResponseMode::for_response_type("code"), ResponseMode::Query);
        assert_eq!(
            ResponseMode::for_response_type("token"),
            ResponseMode::Fragment
        );
    }

    #[test]
    fn test_authorization_response_redirect() {
        let response = AuthorizationResponse::new("code123", "state456")
            .into_redirect("https://app.example.com/callback")
            .respond()
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://app.example.com/callback?code=code123&state=state456"
        );
    }

    #[test]
    fn test_implicit_token_response_uses_fragment() {
        let response = ImplicitTokenResponse::bearer("tok", "s1")
            .with_expires_in(3600)
            .into_redirect("https://app.example.com/callback")
            .respond()
            .unwrap();

        assert_eq!(
            response.headers()[header::LOCATION],
            "https://app.example.com/callback#access_token=tok&expires_in=3600&state=s1&token_type=Bearer"
        );
    }

    #[test]
    fn test_authorization_error_redirect() {
        let error = AuthorizationError::with_description(
            AuthorizationErrorCode::InvalidScope,
            "Unknown scope",
            "state123",
        );
        let response = error
            .into_redirect("https://app.example.com/callback", ResponseMode::Query)
            .respond()
            .unwrap();

        assert_eq!(
            response.headers()[header::LOCATION],
            "https://app.example.com/callback?error=invalid_scope&error_description=Unknown+scope&state=state123"
        );
    }

    #[test]
    fn test_authorization_error_without_state() {
        let response = AuthorizationError::new(AuthorizationErrorCode::AccessDenied, "")
            .into_redirect("https://app.example.com/cb", ResponseMode::Fragment)
            .respond()
            .unwrap();

        assert_eq!(
            response.headers()[header::LOCATION],
            "https://app.example.com/cb#error=access_denied"
        );
    }

    #[test]
    fn test_authorization_error_serialize() {
        let error = AuthorizationError::new(AuthorizationErrorCode::AccessDenied, "xyz");
        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, r#"{"error":"access_denied","state":"xyz"}"#);
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(
            AuthorizationErrorCode::InvalidRequest.as_str(),
            "invalid_request"
        );
        assert_eq!(
            AuthorizationErrorCode::UnauthorizedClient.as_str(),
            "unauthorized_client"
        );
        assert_eq!(
            AuthorizationErrorCode::UnsupportedResponseType.to_string(),
            "unsupported_response_type"
        );
        assert_eq!(
            AuthorizationErrorCode::TemporarilyUnavailable.as_str(),
            "temporarily_unavailable"
        );
    }
}
