use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::IdentityError;

/// The authenticated principal behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Resolves a bearer credential to an identity.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, bearer_token: &str) -> Result<Identity, IdentityError>;
}
