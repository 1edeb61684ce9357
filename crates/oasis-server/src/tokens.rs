//! In-process token collaborators for the reference server.
//!
//! Tokens live in memory only and are lost on restart.

use dashmap::DashMap;
use oasis_auth::{AuthResult, AuthorizeRequest, TokenFactory, TokenKind, TokenStorage};
use uuid::Uuid;

/// Generates opaque tokens from random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokenFactory;

impl TokenFactory for UuidTokenFactory {
    fn generate(&self, _kind: TokenKind, _request: &AuthorizeRequest) -> AuthResult<String> {
        Ok(Uuid::new_v4().simple().to_string())
    }
}

/// Concurrent in-memory token store keyed by token kind and value.
#[derive(Debug, Default)]
pub struct InMemoryTokenStorage {
    tokens: DashMap<(TokenKind, String), AuthorizeRequest>,
}

impl InMemoryTokenStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tokens of every kind.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl TokenStorage for InMemoryTokenStorage {
    fn store(&self, kind: TokenKind, token: &str, request: &AuthorizeRequest) -> AuthResult<()> {
        let mut snapshot = request.clone();
        // the HTTP head is only meaningful for the request that issued the token
        snapshot.http_request = None;
        self.tokens.insert((kind, token.to_string()), snapshot);
        tracing::debug!(kind = %kind, client_id = %request.client_id, "Stored token");
        Ok(())
    }

    fn find(&self, kind: TokenKind, token: &str) -> AuthResult<Option<AuthorizeRequest>> {
        Ok(self
            .tokens
            .get(&(kind, token.to_string()))
            .map(|entry| entry.value().clone()))
    }
}
