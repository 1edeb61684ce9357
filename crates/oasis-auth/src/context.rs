//! Collaborators handed to authorize handlers.
//!
//! Token issuance and token storage are supplied by the integrator. The
//! endpoint never calls them itself; it passes an [`AuthorizeContext`] to
//! every handler, and handlers use whatever they need from it.

use std::fmt;
use std::sync::Arc;

use crate::AuthResult;
use crate::error::AuthError;
use crate::oauth::AuthorizeRequest;

/// Kinds of token an authorization server hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Authorization code of the Authorization Code Grant.
    AuthorizationCode,
    /// Access token, issued directly by the Implicit Grant.
    AccessToken,
    /// Refresh token.
    RefreshToken,
}

impl TokenKind {
    /// Returns the string representation of the token kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::AccessToken => "access_token",
            Self::RefreshToken => "refresh_token",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Produces token strings. The token format is up to the implementation.
pub trait TokenFactory: Send + Sync {
    /// Generates a new token of `kind` for the authorized request.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be produced.
    fn generate(&self, kind: TokenKind, request: &AuthorizeRequest) -> AuthResult<String>;
}

/// Stores issued tokens together with the request they were issued for.
///
/// Covers authorization codes (looked up again by the token endpoint),
/// access tokens and refresh tokens.
pub trait TokenStorage: Send + Sync {
    /// Stores a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend rejects the token.
    fn store(&self, kind: TokenKind, token: &str, request: &AuthorizeRequest) -> AuthResult<()>;

    /// Looks up the request a token was issued for.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend is unavailable.
    fn find(&self, kind: TokenKind, token: &str) -> AuthResult<Option<AuthorizeRequest>>;
}

/// Explicit bundle of integrator-supplied capabilities, passed to every
/// handler invocation.
#[derive(Clone, Default)]
pub struct AuthorizeContext {
    token_factory: Option<Arc<dyn TokenFactory>>,
    token_storage: Option<Arc<dyn TokenStorage>>,
}

impl AuthorizeContext {
    /// Creates a context without collaborators.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the token factory.
    #[must_use]
    pub fn with_token_factory(mut self, factory: Arc<dyn TokenFactory>) -> Self {
        self.token_factory = Some(factory);
        self
    }

    /// Sets the token storage.
    #[must_use]
    pub fn with_token_storage(mut self, storage: Arc<dyn TokenStorage>) -> Self {
        self.token_storage = Some(storage);
        self
    }

    /// The token factory.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if none was supplied.
    pub fn token_factory(&self) -> AuthResult<&dyn TokenFactory> {
        self.token_factory
            .as_deref()
            .ok_or_else(|| AuthError::configuration("no token factory configured"))
    }

    /// The token storage.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if none was supplied.
    pub fn token_storage(&self) -> AuthResult<&dyn TokenStorage> {
        self.token_storage
            .as_deref()
            .ok_or_else(|| AuthError::configuration("no token storage configured"))
    }

    /// Generates a token and stores it in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if a collaborator is missing or fails.
    pub fn issue_token(&self, kind: TokenKind, request: &AuthorizeRequest) -> AuthResult<String> {
        let token = self.token_factory()?.generate(kind, request)?;
        self.token_storage()?.store(kind, &token, request)?;
        Ok(token)
    }
}

impl fmt::Debug for AuthorizeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizeContext")
            .field("token_factory", &self.token_factory.is_some())
            .field("token_storage", &self.token_storage.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct CountingFactory(Mutex<u32>);

    impl TokenFactory for CountingFactory {
        fn generate(&self, kind: TokenKind, _request: &AuthorizeRequest) -> AuthResult<String> {
            let mut n = self.0.lock().unwrap();
            *n += 1;
            Ok(format!("{kind}-{n}"))
        }
    }

    #[derive(Default)]
    struct MapStorage(Mutex<HashMap<(TokenKind, String), AuthorizeRequest>>);

    impl TokenStorage for MapStorage {
        fn store(
            &self,
            kind: TokenKind,
            token: &str,
            request: &AuthorizeRequest,
        ) -> AuthResult<()> {
            self.0
                .lock()
                .unwrap()
                .insert((kind, token.to_string()), request.clone());
            Ok(())
        }

        fn find(&self, kind: TokenKind, token: &str) -> AuthResult<Option<AuthorizeRequest>> {
            Ok(self.0.lock().unwrap().get(&(kind, token.to_string())).cloned())
        }
    }

    #[test]
    fn test_missing_collaborators() {
        let ctx = AuthorizeContext::new();
        assert!(matches!(
            ctx.token_factory(),
            Err(AuthError::Configuration { .. })
        ));
        assert!(matches!(
            ctx.token_storage(),
            Err(AuthError::Configuration { .. })
        ));
        assert!(
            ctx.issue_token(TokenKind::AccessToken, &AuthorizeRequest::new())
                .is_err()
        );
    }

    #[test]
    fn test_issue_token_generates_and_stores() {
        let storage = Arc::new(MapStorage::default());
        let ctx = AuthorizeContext::new()
            .with_token_factory(Arc::new(CountingFactory(Mutex::new(0))))
            .with_token_storage(storage.clone());

        let request = AuthorizeRequest {
            client_id: "my-app".into(),
            user_id: "alice".into(),
            ..Default::default()
        };
        let code = ctx
            .issue_token(TokenKind::AuthorizationCode, &request)
            .unwrap();
        assert_eq!(code, "authorization_code-1");

        let found = storage
            .find(TokenKind::AuthorizationCode, &code)
            .unwrap()
            .unwrap();
        assert_eq!(found.user_id, "alice");
        assert!(storage.find(TokenKind::AccessToken, &code).unwrap().is_none());
    }

    #[test]
    fn test_debug_hides_collaborators() {
        let ctx = AuthorizeContext::new().with_token_storage(Arc::new(MapStorage::default()));
        assert_eq!(
            format!("{ctx:?}"),
            "AuthorizeContext { token_factory: false, token_storage: true }"
        );
    }
}
