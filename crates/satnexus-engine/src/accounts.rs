//! User accounts: registration, password login and profiles

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use rand::Rng;
use satnexus_core::error::{Result, SatnexusError};
use satnexus_core::models::{Credentials, Registration, Role, User, UserId, UserSummary};
use satnexus_store::ports::UserStore;
use serde::Serialize;
use std::sync::Arc;

use crate::access::issue_token;

/// A signed token together with the account it was issued for
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Hash a password into a PHC string with a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt_bytes: [u8; 16] = rand::thread_rng().gen();
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| SatnexusError::Serialization(format!("Failed to encode salt: {}", e)))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SatnexusError::Serialization(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}

/// Account use cases on top of a [`UserStore`]
#[derive(Clone)]
pub struct Accounts {
    users: Arc<dyn UserStore>,
    secret: String,
    token_ttl: Duration,
}

impl Accounts {
    pub fn new(users: Arc<dyn UserStore>, secret: impl Into<String>, token_ttl: Duration) -> Self {
        Self { users, secret: secret.into(), token_ttl }
    }

    /// Create a regular account and sign a token for it
    pub async fn register(&self, registration: Registration) -> Result<Session> {
        let registration = registration.validate()?;

        if self.users.find_user_by_email(&registration.email).await?.is_some() {
            return Err(SatnexusError::conflict("Email is already registered"));
        }

        let user = User {
            id: UserId::generate(),
            username: registration.username,
            email: registration.email,
            password_hash: hash_password(&registration.password)?,
            role: Role::User,
            created_at: Utc::now(),
        };
        self.users.insert_user(&user).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        self.session(user)
    }

    /// Exchange email and password for a token
    pub async fn login(&self, credentials: Credentials) -> Result<Session> {
        let (email, password) = credentials.validate()?;

        let user = match self.users.find_user_by_email(&email).await? {
            Some(user) if verify_password(&password, &user.password_hash) => user,
            _ => {
                tracing::info!("Rejected login attempt");
                return Err(SatnexusError::unauthorized("Invalid credentials"));
            }
        };

        tracing::info!(user_id = %user.id, "User logged in");
        self.session(user)
    }

    /// The account behind an authenticated request
    pub async fn profile(&self, id: &UserId) -> Result<User> {
        self.users.get_user(id).await?.ok_or_else(|| SatnexusError::not_found("User", id))
    }

    fn session(&self, user: User) -> Result<Session> {
        let token = issue_token(&self.secret, &user.id, self.token_ttl)?;
        Ok(Session { token, user })
    }
}

/// Resolves owner ids to public user details for read models
#[derive(Clone, Default)]
pub struct OwnerDirectory {
    users: Option<Arc<dyn UserStore>>,
}

impl OwnerDirectory {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users: Some(users) }
    }

    /// Summary of the account, or None when it does not exist or no user
    /// store is attached
    pub async fn summary(&self, id: &UserId) -> Result<Option<UserSummary>> {
        match &self.users {
            Some(users) => Ok(users.get_user(id).await?.map(|user| user.summary())),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satnexus_core::error::ErrorKind;
    use satnexus_store::memory::MemoryUserStore;

    const SECRET: &str = "test-secret";

    fn accounts() -> Accounts {
        Accounts::new(Arc::new(MemoryUserStore::new()), SECRET, Duration::hours(1))
    }

    fn registration(username: &str, email: &str, password: &str) -> Registration {
        Registration {
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials { email: Some(email.to_string()), password: Some(password.to_string()) }
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("password123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("password123", &hash));
        assert!(!verify_password("password124", &hash));
        assert!(!verify_password("password123", "not-a-phc-string"));

        // Salted
        assert_ne!(hash, hash_password("password123").unwrap());
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let accounts = accounts();

        let registered = accounts
            .register(registration("researcher", "Researcher@Example.com", "password123"))
            .await
            .unwrap();
        assert_eq!(registered.user.email, "researcher@example.com");
        assert_eq!(registered.user.role, Role::User);
        assert_eq!(registered.token.split('.').count(), 3);

        let session = accounts.login(credentials("researcher@example.com", "password123")).await.unwrap();
        assert_eq!(session.user.id, registered.user.id);

        let profile = accounts.profile(&registered.user.id).await.unwrap();
        assert_eq!(profile.username, "researcher");
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let accounts = accounts();
        accounts.register(registration("admin", "admin@example.com", "password123")).await.unwrap();

        let err = accounts
            .register(registration("admin2", "ADMIN@example.com", "password123"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err = accounts
            .register(registration("Admin", "other@example.com", "password123"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let accounts = accounts();
        accounts.register(registration("admin", "admin@example.com", "password123")).await.unwrap();

        let wrong_password =
            accounts.login(credentials("admin@example.com", "nope-nope")).await.unwrap_err();
        let unknown = accounts.login(credentials("ghost@example.com", "password123")).await.unwrap_err();

        assert_eq!(wrong_password.kind(), ErrorKind::Unauthorized);
        assert_eq!(wrong_password.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_owner_directory() {
        let store = Arc::new(MemoryUserStore::new());
        let accounts = Accounts::new(store.clone(), SECRET, Duration::hours(1));
        let session =
            accounts.register(registration("admin", "admin@example.com", "password123")).await.unwrap();

        let directory = OwnerDirectory::new(store);
        let summary = directory.summary(&session.user.id).await.unwrap().unwrap();
        assert_eq!(summary.username, "admin");
        assert!(directory.summary(&UserId::new("ghost")).await.unwrap().is_none());

        assert!(OwnerDirectory::default().summary(&session.user.id).await.unwrap().is_none());
    }
}
