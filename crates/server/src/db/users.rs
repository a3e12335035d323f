//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use tangelo_core::{Role, UserId, Username};

use super::RepositoryError;
use crate::models::user::User;

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

/// Raw row shape; `username` and `roles` still need validation.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    password_hash: String,
    roles: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let username = Username::parse(&self.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let roles: Vec<Role> = serde_json::from_str(&self.roles).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid roles in database: {e}"))
        })?;

        Ok(User {
            id: self.id,
            username,
            password_hash: self.password_hash,
            roles,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by username (exact, case-sensitive match).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored username or
    /// roles are invalid.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username, password_hash, roles, created_at, updated_at
            FROM users
            WHERE username = ?1
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Create a new user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &Username,
        password_hash: &str,
        roles: &[Role],
    ) -> Result<User, RepositoryError> {
        let id = UserId::new();
        let now = Utc::now();
        let roles_json = serde_json::to_string(roles).map_err(|e| {
            RepositoryError::DataCorruption(format!("failed to serialize roles: {e}"))
        })?;

        sqlx::query(
            r"
            INSERT INTO users (id, username, password_hash, roles, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(id)
        .bind(username.as_str())
        .bind(password_hash)
        .bind(&roles_json)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(User {
            id,
            username: username.clone(),
            password_hash: password_hash.to_owned(),
            roles: roles.to_vec(),
            created_at: now,
            updated_at: now,
        })
    }
}
