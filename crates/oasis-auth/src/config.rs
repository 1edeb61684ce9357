//! Authorization endpoint configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::AuthError;

/// Response types this crate knows how to answer (RFC 6749 §4.1.1, §4.2.1).
pub const SUPPORTED_RESPONSE_TYPES: &[&str] = &["code", "token"];

/// Authorization endpoint configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [auth]
/// allowed_response_types = ["code", "token"]
/// access_token_lifetime = "1h"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthorizeConfig {
    /// Response types accepted by the decoder.
    /// An empty list rejects every request.
    pub allowed_response_types: Vec<String>,

    /// Lifetime advertised as `expires_in` in implicit grant responses.
    #[serde(with = "humantime_serde")]
    pub access_token_lifetime: Duration,
}

impl Default for AuthorizeConfig {
    fn default() -> Self {
        Self {
            allowed_response_types: vec!["code".to_string()],
            access_token_lifetime: Duration::from_secs(3600), // 1 hour
        }
    }
}

impl AuthorizeConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if a response type is not one of
    /// [`SUPPORTED_RESPONSE_TYPES`] or the token lifetime is zero.
    pub fn validate(&self) -> Result<(), AuthError> {
        if let Some(unknown) = self
            .allowed_response_types
            .iter()
            .find(|rt| !SUPPORTED_RESPONSE_TYPES.contains(&rt.as_str()))
        {
            return Err(AuthError::configuration(format!(
                "auth.allowed_response_types contains unsupported value \"{unknown}\""
            )));
        }
        if self.access_token_lifetime.is_zero() {
            return Err(AuthError::configuration(
                "auth.access_token_lifetime must be > 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AuthorizeConfig::default();
        assert_eq!(config.allowed_response_types, vec!["code"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_with_humantime() {
        let json = r#"{"allowed_response_types":["code","token"],"access_token_lifetime":"15m"}"#;
        let config: AuthorizeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.allowed_response_types, vec!["code", "token"]);
        assert_eq!(config.access_token_lifetime, Duration::from_secs(900));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AuthorizeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AuthorizeConfig::default());
    }

    #[test]
    fn test_validate_rejects_unknown_response_type() {
        let config = AuthorizeConfig {
            allowed_response_types: vec!["code".into(), "id_token".into()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("\"id_token\""));
    }

    #[test]
    fn test_validate_rejects_zero_lifetime() {
        let config = AuthorizeConfig {
            access_token_lifetime: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_allow_list_is_valid() {
        let config = AuthorizeConfig {
            allowed_response_types: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
