//! Authorization endpoint error types.
//!
//! Errors fall in two groups. Decode errors (`MissingResponseType`,
//! `ResponseTypeNotAllowed`) are produced by the decoder and handed to the
//! stage handler as data; they never abort the pipeline. Redirect errors
//! (`RedirectUri*`) are produced while rendering a [`RedirectResponse`] and
//! are returned to whoever asked for the rendering.
//!
//! [`RedirectResponse`]: crate::response::RedirectResponse

use std::fmt;

use axum::http::StatusCode;

/// Errors that can occur while decoding, dispatching or rendering an
/// authorization request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The `response_type` parameter is absent or blank.
    #[error("response_type is required but not set")]
    MissingResponseType,

    /// The `response_type` parameter is not in the decoder's allow-set.
    #[error("response_type \"{response_type}\" is not allowed")]
    ResponseTypeNotAllowed {
        /// The rejected response type, verbatim.
        response_type: String,
    },

    /// A redirect response was rendered without a base redirect URI.
    #[error("redirect_uri not set")]
    RedirectUriMissing,

    /// The base redirect URI could not be parsed.
    #[error("redirect_uri is misformed. {message}")]
    RedirectUriMalformed {
        /// The URI parser's message.
        message: String,
    },

    /// The base redirect URI is not an absolute URI.
    #[error("redirect_uri is misformed. expected a full URI but got \"{redirect_uri}\"")]
    RedirectUriNotAbsolute {
        /// The redirect URI as it was given.
        redirect_uri: String,
    },

    /// A token collaborator failed to store or look up a token.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The endpoint or one of its collaborators is misconfigured.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `ResponseTypeNotAllowed` error.
    #[must_use]
    pub fn response_type_not_allowed(response_type: impl Into<String>) -> Self {
        Self::ResponseTypeNotAllowed {
            response_type: response_type.into(),
        }
    }

    /// Creates a new `RedirectUriMalformed` error.
    #[must_use]
    pub fn redirect_uri_malformed(message: impl Into<String>) -> Self {
        Self::RedirectUriMalformed {
            message: message.into(),
        }
    }

    /// Creates a new `RedirectUriNotAbsolute` error.
    #[must_use]
    pub fn redirect_uri_not_absolute(redirect_uri: impl Into<String>) -> Self {
        Self::RedirectUriNotAbsolute {
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if the error was caused by the incoming request.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingResponseType
                | Self::ResponseTypeNotAllowed { .. }
                | Self::RedirectUriMissing
                | Self::RedirectUriMalformed { .. }
                | Self::RedirectUriNotAbsolute { .. }
        )
    }

    /// Returns `true` if the error was caused by the server or its collaborators.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Returns `true` if this error came out of request decoding.
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::MissingResponseType | Self::ResponseTypeNotAllowed { .. }
        )
    }

    /// Returns the error category for logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingResponseType | Self::ResponseTypeNotAllowed { .. } => {
                ErrorCategory::Validation
            }
            Self::RedirectUriMissing
            | Self::RedirectUriMalformed { .. }
            | Self::RedirectUriNotAbsolute { .. } => ErrorCategory::Redirect,
            Self::Storage { .. } => ErrorCategory::Collaborator,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the RFC 6749 §4.1.2.1 error code for this error.
    #[must_use]
    pub fn oauth_error_code(&self) -> &'static str {
        match self {
            Self::MissingResponseType => "invalid_request",
            Self::ResponseTypeNotAllowed { .. } => "unsupported_response_type",
            Self::RedirectUriMissing
            | Self::RedirectUriMalformed { .. }
            | Self::RedirectUriNotAbsolute { .. } => "invalid_request",
            Self::Storage { .. } | Self::Configuration { .. } | Self::Internal { .. } => {
                "server_error"
            }
        }
    }

    /// HTTP status of the page that should be shown to the resource owner
    /// when this error cannot be delivered by redirect.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Message that is safe to show to the resource owner.
    ///
    /// Client errors are shown verbatim; server errors are reduced to the
    /// status text so collaborator details do not leak.
    #[must_use]
    pub fn message(&self) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            self.status_code()
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_string()
        }
    }
}

/// Categories of authorization endpoint errors for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Request validation errors.
    Validation,
    /// Redirect URI construction errors.
    Redirect,
    /// Token factory or token storage errors.
    Collaborator,
    /// Configuration errors.
    Configuration,
    /// Internal server errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Redirect => write!(f, "redirect"),
            Self::Collaborator => write!(f, "collaborator"),
            Self::Configuration => write!(f, "configuration"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
