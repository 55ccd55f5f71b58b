use async_trait::async_trait;

use crate::error::Result;
use crate::models::UserId;

/// Port for verifying bearer credentials
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Verify a raw credential and return the identity it belongs to.
    ///
    /// Fails with `SatnexusError::Unauthorized` when the credential is invalid.
    async fn verify(&self, credential: &str) -> Result<UserId>;
}
