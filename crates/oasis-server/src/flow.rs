//! Demo authorization flow.
//!
//! ```text
//! INITIALIZE       login page
//! TO_AUTHENTICATE  username check, consent page
//! TO_AUTHORIZE     approve → code / token redirect, deny → access_denied
//! ```
//!
//! Any username is accepted and there is no session: every page carries
//! the request forward in hidden fields. This shows how the stages fit
//! together; a real deployment authenticates users and registers clients.

use std::time::Duration;

use axum::http::StatusCode;
use axum::http::request::Parts;
use oasis_auth::prelude::*;

use crate::templates::{render_consent_form, render_error_page, render_login_form};

/// Decoder that also reads the flow position from the `stage` query
/// parameter.
///
/// A missing or unparsable `stage` leaves the request in
/// [`AuthorizeStage::INITIALIZE`].
#[derive(Debug, Clone, Default)]
pub struct StagedDecoder<D = DefaultAuthorizeDecoder> {
    inner: D,
}

impl<D: AuthorizeDecoder> StagedDecoder<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }
}

impl<D: AuthorizeDecoder> AuthorizeDecoder for StagedDecoder<D> {
    fn decode_authorize(&self, parts: &Parts) -> (AuthorizeRequest, Option<AuthError>) {
        let (mut request, decode_err) = self.inner.decode_authorize(parts);
        let query = FormValues::parse(parts.uri.query().unwrap_or_default());
        if let Some(stage) = query.get("stage").and_then(|s| s.trim().parse::<u32>().ok()) {
            request.stage = AuthorizeStage::from_value(stage);
        }
        (request, decode_err)
    }
}

/// Builds the stage mux for the demo flow.
pub fn build_mux(config: &AuthorizeConfig) -> AuthorizeHandlerMux {
    AuthorizeHandlerMux::new()
        .with_fn(AuthorizeStage::INITIALIZE, login_page)
        .with_fn(AuthorizeStage::TO_AUTHENTICATE, authenticate)
        .with(
            AuthorizeStage::TO_AUTHORIZE,
            GrantIssuer::new(config.access_token_lifetime),
        )
}

fn error_page(status: StatusCode, error_code: &str, description: &str) -> Responder {
    ResponseCache::html(status, render_error_page(error_code, description)).into()
}

/// Presents a decode error.
///
/// Only an unsupported response type goes back to the client, and only when
/// the redirect URI renders; everything else is shown to the resource owner.
fn decode_failure(request: &AuthorizeRequest, err: &AuthError) -> Responder {
    if matches!(err, AuthError::ResponseTypeNotAllowed { .. }) && !request.redirect_uri.is_empty()
    {
        let redirect = AuthorizationError::with_description(
            AuthorizationErrorCode::UnsupportedResponseType,
            err.to_string(),
            request.state.as_str(),
        )
        .into_redirect(&request.redirect_uri, ResponseMode::Query);
        if redirect.location().is_ok() {
            return redirect.into();
        }
    }
    error_page(err.status_code(), err.oauth_error_code(), &err.message())
}

/// Checks the parameters every stage relies on.
fn check_client(request: &AuthorizeRequest) -> Option<Responder> {
    if request.client_id.is_empty() {
        return Some(error_page(
            StatusCode::BAD_REQUEST,
            AuthorizationErrorCode::InvalidRequest.as_str(),
            "client_id is required but not set",
        ));
    }
    if let Err(err) = RedirectResponse::new(request.redirect_uri.as_str()).location() {
        return Some(error_page(
            err.status_code(),
            err.oauth_error_code(),
            &err.message(),
        ));
    }
    None
}

fn query_param(request: &AuthorizeRequest, key: &str) -> String {
    request
        .http_request()
        .and_then(|head| head.query_param(key))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

fn login_page(
    _ctx: &AuthorizeContext,
    request: AuthorizeRequest,
    decode_err: Option<AuthError>,
) -> Option<Responder> {
    if let Some(err) = decode_err {
        return Some(decode_failure(&request, &err));
    }
    if let Some(rejected) = check_client(&request) {
        return Some(rejected);
    }
    Some(ResponseCache::html(StatusCode::OK, render_login_form(&request, None)).into())
}

fn authenticate(
    _ctx: &AuthorizeContext,
    mut request: AuthorizeRequest,
    decode_err: Option<AuthError>,
) -> Option<Responder> {
    if let Some(err) = decode_err {
        return Some(decode_failure(&request, &err));
    }
    if let Some(rejected) = check_client(&request) {
        return Some(rejected);
    }

    let username = query_param(&request, "username");
    if username.is_empty() {
        return Some(
            ResponseCache::html(
                StatusCode::OK,
                render_login_form(&request, Some("Username is required")),
            )
            .into(),
        );
    }

    tracing::info!(client_id = %request.client_id, user_id = %username, "User authenticated");
    request.user_id = username;
    Some(ResponseCache::html(StatusCode::OK, render_consent_form(&request)).into())
}

/// Final stage: turns the user's decision into the redirect back to the
/// client.
#[derive(Debug, Clone, Copy)]
pub struct GrantIssuer {
    access_token_lifetime: Duration,
}

impl GrantIssuer {
    pub fn new(access_token_lifetime: Duration) -> Self {
        Self {
            access_token_lifetime,
        }
    }

    fn issue(
        &self,
        ctx: &AuthorizeContext,
        request: &AuthorizeRequest,
    ) -> AuthResult<RedirectResponse> {
        if request.response_type == "token" {
            let token = ctx.issue_token(TokenKind::AccessToken, request)?;
            Ok(ImplicitTokenResponse::bearer(token, request.state.as_str())
                .with_expires_in(self.access_token_lifetime.as_secs())
                .with_scope(request.scope.as_str())
                .into_redirect(&request.redirect_uri))
        } else {
            let code = ctx.issue_token(TokenKind::AuthorizationCode, request)?;
            Ok(AuthorizationResponse::new(code, request.state.as_str())
                .into_redirect(&request.redirect_uri))
        }
    }
}

impl AuthorizeHandler for GrantIssuer {
    fn handle_authorize_request(
        &self,
        ctx: &AuthorizeContext,
        mut request: AuthorizeRequest,
        decode_err: Option<AuthError>,
    ) -> Option<Responder> {
        if let Some(err) = decode_err {
            return Some(decode_failure(&request, &err));
        }
        if let Some(rejected) = check_client(&request) {
            return Some(rejected);
        }

        request.user_id = query_param(&request, "username");
        if !request.is_authenticated() {
            return Some(
                ResponseCache::html(
                    StatusCode::OK,
                    render_login_form(&request, Some("Please sign in first")),
                )
                .into(),
            );
        }

        let mode = ResponseMode::for_response_type(&request.response_type);
        match query_param(&request, "decision").as_str() {
            "approve" => {}
            "deny" => {
                tracing::info!(
                    client_id = %request.client_id,
                    user_id = %request.user_id,
                    "Authorization denied"
                );
                return Some(
                    AuthorizationError::new(
                        AuthorizationErrorCode::AccessDenied,
                        request.state.as_str(),
                    )
                    .into_redirect(&request.redirect_uri, mode)
                    .into(),
                );
            }
            _ => {
                return Some(error_page(
                    StatusCode::BAD_REQUEST,
                    AuthorizationErrorCode::InvalidRequest.as_str(),
                    "decision must be \"approve\" or \"deny\"",
                ));
            }
        }

        match self.issue(ctx, &request) {
            Ok(redirect) => {
                tracing::info!(
                    client_id = %request.client_id,
                    user_id = %request.user_id,
                    response_type = %request.response_type,
                    "Authorization granted"
                );
                Some(redirect.into())
            }
            Err(err) => {
                tracing::error!(
                    client_id = %request.client_id,
                    category = %err.category(),
                    error = %err,
                    "Failed to issue grant"
                );
                Some(
                    AuthorizationError::new(
                        AuthorizationErrorCode::ServerError,
                        request.state.as_str(),
                    )
                    .into_redirect(&request.redirect_uri, mode)
                    .into(),
                )
            }
        }
    }
}
