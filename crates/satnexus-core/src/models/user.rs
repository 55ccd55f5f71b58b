use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{Result, SatnexusError};

/// Identity of a registered user
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh identifier for a new account
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Account role. Carried on the profile, grants no extra permissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(SatnexusError::validation(format!("Unknown role '{}'", other))),
        }
    }
}

/// A registered account. The password hash never leaves the process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary { id: self.id.clone(), username: self.username.clone(), email: self.email.clone() }
    }
}

/// Public owner details attached to images and analyses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=30;
const MIN_PASSWORD_LEN: usize = 6;

/// Body of a registration request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Registration that passed validation. Email is lowercased.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn validate(self) -> Result<ValidRegistration> {
        let username = required("username", self.username)?;
        let email = normalize_email(&required("email", self.email)?);
        let password = self.password.unwrap_or_default();

        if !USERNAME_LEN.contains(&username.chars().count()) {
            return Err(SatnexusError::validation(format!(
                "Field 'username' must be {} to {} characters",
                USERNAME_LEN.start(),
                USERNAME_LEN.end()
            )));
        }
        if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
            return Err(SatnexusError::validation(
                "Field 'username' may only contain letters, digits, '_' and '-'",
            ));
        }
        if !is_plausible_email(&email) {
            return Err(SatnexusError::validation(format!("Invalid email address: {}", email)));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SatnexusError::validation(format!(
                "Field 'password' must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        Ok(ValidRegistration { username, email, password })
    }
}

/// Body of a login request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Credentials {
    /// Normalized email and the raw password
    pub fn validate(self) -> Result<(String, String)> {
        let email = normalize_email(&required("email", self.email)?);
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| SatnexusError::validation("Field 'password' is required"))?;
        Ok((email, password))
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SatnexusError::validation(format!("Field '{}' is required", field)))
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}
