use async_trait::async_trait;
use feepay_core::{Identity, IdentityError, IdentityResolver};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;

/// Claims issued by the session provider. `sub` is the user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Verifies HS256 access tokens signed with the session provider's secret.
pub struct JwtIdentityResolver {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityResolver {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience.as_str()]),
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl IdentityResolver for JwtIdentityResolver {
    async fn resolve(&self, bearer_token: &str) -> Result<Identity, IdentityError> {
        let token = bearer_token.trim();
        if token.is_empty() {
            return Err(IdentityError::MissingToken);
        }

        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|err| IdentityError::InvalidToken(err.to_string()))?;

        let id = Uuid::parse_str(&data.claims.sub)
            .map_err(|err| IdentityError::InvalidToken(format!("sub is not a user id: {err}")))?;

        Ok(Identity {
            id,
            email: data.claims.email,
        })
    }
}
