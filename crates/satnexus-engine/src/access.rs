//! Bearer token access control

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use satnexus_core::error::{Result, SatnexusError};
use satnexus_core::models::UserId;
use satnexus_core::ports::CredentialVerifier;
use satnexus_store::ports::UserStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// JWT claims carried by SatNexus tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    /// Expiry as seconds since the epoch
    pub exp: i64,
}

/// Verifies HS256 tokens signed with a shared secret
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        Self { key: DecodingKey::from_secret(secret.as_bytes()), validation }
    }
}

#[async_trait]
impl CredentialVerifier for JwtVerifier {
    async fn verify(&self, credential: &str) -> Result<UserId> {
        let data = decode::<Claims>(credential, &self.key, &self.validation)
            .map_err(|e| SatnexusError::unauthorized(format!("Token is not valid: {}", e)))?;

        let user_id = data.claims.user_id.trim();
        if user_id.is_empty() {
            return Err(SatnexusError::unauthorized("Token is not valid: empty userId claim"));
        }

        Ok(UserId::new(user_id))
    }
}

/// Mint a signed token for `user` that expires after `ttl`
pub fn issue_token(secret: &str, user: &UserId, ttl: Duration) -> Result<String> {
    let claims = Claims { user_id: user.to_string(), exp: (Utc::now() + ttl).timestamp() };

    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| SatnexusError::Serialization(format!("Failed to sign token: {}", e)))
}

/// Resolves request identities from `Authorization` header values.
///
/// A credential only identifies a user while that account exists.
#[derive(Clone)]
pub struct AccessControl {
    verifier: Arc<dyn CredentialVerifier>,
    users: Arc<dyn UserStore>,
}

impl AccessControl {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, users: Arc<dyn UserStore>) -> Self {
        Self { verifier, users }
    }

    /// Access control backed by a [`JwtVerifier`]
    pub fn jwt(secret: &str, users: Arc<dyn UserStore>) -> Self {
        Self::new(Arc::new(JwtVerifier::new(secret)), users)
    }

    /// Extract the token from a `Bearer <token>` header value
    pub fn bearer_token(header: Option<&str>) -> Option<&str> {
        let header = header?.trim();
        let (scheme, token) = header.split_once(' ')?;
        let token = token.trim();
        (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
    }

    /// Optional authentication: missing or invalid credentials are anonymous
    pub async fn resolve(&self, header: Option<&str>) -> Option<UserId> {
        let token = Self::bearer_token(header)?;
        match self.identify(token).await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid credentials on optional auth");
                None
            }
        }
    }

    /// Required authentication
    pub async fn require(&self, header: Option<&str>) -> Result<UserId> {
        let token = Self::bearer_token(header)
            .ok_or_else(|| SatnexusError::unauthorized("Access denied. No token provided."))?;
        self.identify(token).await
    }

    async fn identify(&self, token: &str) -> Result<UserId> {
        let user = self.verifier.verify(token).await?;
        match self.users.get_user(&user).await? {
            Some(account) => Ok(account.id),
            None => {
                tracing::debug!(user_id = %user, "Token names an unknown user");
                Err(SatnexusError::unauthorized("Token is not valid: unknown user"))
            }
        }
    }
}
