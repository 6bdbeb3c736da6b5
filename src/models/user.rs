use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Account role.
/// Corresponds to the `user_role` SQL enum; checkpoints match exhaustively
/// instead of comparing strings.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account.
    User,
    /// Moderation rights over users, recipes and comments.
    Admin,
}

/// A user as exposed to clients. The password hash never leaves the
/// repository layer through this type.
#[derive(Debug, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Internal row used during credential checks; carries the stored hash and
/// the active flag.
#[derive(Debug, FromRow)]
pub struct UserAuth {
    pub id: i32,
    pub email: String,
    pub pwd: String,
    pub name: Option<String>,
    pub role: Role,
    pub active: bool,
}

impl UserAuth {
    /// Display identity: the chosen name when present, the email otherwise.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// Data access for the `users` table. Holds a clone of the shared pool;
/// constructed per request by the handlers.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a regular active account and returns its id.
    pub async fn create(
        &self,
        email: &str,
        pwd_hash: &str,
        name: Option<&str>,
    ) -> sqlx::Result<i32> {
        let row: (i32,) = sqlx::query_as(
            "INSERT INTO users (email, pwd, name) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(email)
        .bind(pwd_hash)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    pub async fn find_by_email(&self, email: &str) -> sqlx::Result<Option<UserAuth>> {
        sqlx::query_as::<_, UserAuth>(
            "SELECT id, email, pwd, name, role, active FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn find_by_id(&self, id: i32) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, name, role, active, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// All accounts, newest first.
    pub async fn all(&self) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, name, role, active, created_at FROM users \
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Everyone except the given user; candidates for a new conversation.
    pub async fn all_except(&self, user_id: i32) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, name, role, active, created_at FROM users \
             WHERE id <> $1 \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Admin edit: email, display name, role and active flag in one statement.
    pub async fn update(
        &self,
        id: i32,
        email: &str,
        name: Option<&str>,
        role: Role,
        active: bool,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            "UPDATE users SET email = $1, name = $2, role = $3, active = $4 WHERE id = $5",
        )
        .bind(email)
        .bind(name)
        .bind(role)
        .bind(active)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(&self, id: i32) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Seeds an administrator account. Returns `false` without touching the
    /// table when the email is already taken.
    pub async fn create_admin(
        &self,
        email: &str,
        pwd_hash: &str,
        name: Option<&str>,
    ) -> sqlx::Result<bool> {
        if self.find_by_email(email).await?.is_some() {
            return Ok(false);
        }
        sqlx::query("INSERT INTO users (email, pwd, name, role) VALUES ($1, $2, $3, 'admin')")
            .bind(email)
            .bind(pwd_hash)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(true)
    }
}
