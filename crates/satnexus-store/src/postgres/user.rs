use async_trait::async_trait;
use chrono::{DateTime, Utc};
use satnexus_core::error::{Result, SatnexusError};
use satnexus_core::models::{Role, User, UserId};
use sqlx::postgres::PgRow;
use sqlx::Row;

use super::PostgresStore;
use crate::ports::UserStore;

const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at";

#[async_trait]
impl UserStore for PostgresStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.as_str())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(self.pool())
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                conflict_for(db.constraint())
            }
            _ => SatnexusError::storage(format!("Failed to insert user: {}", e)),
        })?;

        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id.as_str())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| SatnexusError::storage(format!("Failed to get user: {}", e)))?;

        row.map(|row| decode_user(&row)).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| SatnexusError::storage(format!("Failed to find user: {}", e)))?;

        row.map(|row| decode_user(&row)).transpose()
    }
}

fn conflict_for(constraint: Option<&str>) -> SatnexusError {
    match constraint {
        Some("idx_users_username") => SatnexusError::conflict("Username is already taken"),
        Some("idx_users_email") => SatnexusError::conflict("Email is already registered"),
        _ => SatnexusError::conflict("User already exists"),
    }
}

fn decode_user(row: &PgRow) -> Result<User> {
    let invalid = |e: sqlx::Error| SatnexusError::Serialization(format!("Invalid user row: {}", e));

    let id: String = row.try_get("id").map_err(invalid)?;
    let role: String = row.try_get("role").map_err(invalid)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(invalid)?;

    Ok(User {
        id: UserId::new(id),
        username: row.try_get("username").map_err(invalid)?,
        email: row.try_get("email").map_err(invalid)?,
        password_hash: row.try_get("password_hash").map_err(invalid)?,
        role: Role::parse(&role)?,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use satnexus_core::error::ErrorKind;

    #[test]
    fn test_unique_violations_name_the_field() {
        let err = conflict_for(Some("idx_users_email"));
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.to_string(), "Email is already registered");

        assert_eq!(conflict_for(Some("idx_users_username")).to_string(), "Username is already taken");
        assert_eq!(conflict_for(None).kind(), ErrorKind::Conflict);
    }
}
