use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// Grant every new account starts with.
pub const STARTING_BALANCE: f64 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
    pub balance: f64,
    pub role: Role,
}

impl User {
    /// Create a new customer account with the starting grant. The username
    /// UNIQUE constraint surfaces as a database error the caller maps.
    pub async fn create(
        db: &SqlitePool,
        username: &str,
        email: &str,
        password_hash: &str,
        phone: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, phone, balance, role)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id, username, email, password_hash, phone, balance, role
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(phone)
        .bind(STARTING_BALANCE)
        .bind(Role::Customer)
        .fetch_one(db)
        .await
    }

    /// Find a user by username.
    pub async fn find_by_username(
        db: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, phone, balance, role
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }
}

/// One issued login token. Rows are written for audit purposes and never
/// consulted when a request is authenticated.
#[derive(Debug, Clone, FromRow)]
pub struct SessionToken {
    pub id: i64,
    pub token: String,
    pub user_id: i64,
    pub expires_at: i64,
}

impl SessionToken {
    /// Record an issued token. `expires_at_ms` is a unix timestamp in
    /// milliseconds.
    pub async fn record(
        db: &SqlitePool,
        token: &str,
        user_id: i64,
        expires_at_ms: i64,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO session_tokens (token, user_id, expires_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at_ms)
        .execute(db)
        .await?;
        Ok(result.last_insert_rowid())
    }
}
