/// User model and database operations
///
/// Users are the credential store: a unique username plus an Argon2id
/// password hash. Accounts are created by registration and never mutated
/// or deleted afterwards.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id            INTEGER PRIMARY KEY AUTOINCREMENT,
///     username      TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// User account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user id, assigned at creation
    pub id: i64,

    /// Unique username; lookup is case-sensitive exact match
    pub username: String,

    /// Argon2id password hash
    pub password_hash: String,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Username (must not already exist)
    pub username: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the username already exists (UNIQUE constraint
    /// violation) or the database is unreachable. The constraint is the
    /// authoritative uniqueness check: two concurrent registrations with
    /// the same username cannot both succeed, whatever the handlers saw.
    pub async fn create(pool: &SqlitePool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES (?1, ?2)
            RETURNING id, username, password_hash
            "#,
        )
        .bind(data.username)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by id
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username (case-sensitive exact match)
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Pool should connect");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Migrations should run");
        pool
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = test_pool().await;

        let user = User::create(
            &pool,
            CreateUser {
                username: "alice".to_string(),
                password_hash: "$argon2id$fake".to_string(),
            },
        )
        .await
        .expect("Create should succeed");

        assert_eq!(user.username, "alice");

        let by_name = User::find_by_username(&pool, "alice")
            .await
            .expect("Query should succeed")
            .expect("User should exist");
        assert_eq!(by_name.id, user.id);

        let by_id = User::find_by_id(&pool, user.id)
            .await
            .expect("Query should succeed")
            .expect("User should exist");
        assert_eq!(by_id.username, "alice");
    }

    #[tokio::test]
    async fn test_username_lookup_is_case_sensitive() {
        let pool = test_pool().await;

        User::create(
            &pool,
            CreateUser {
                username: "Alice".to_string(),
                password_hash: "hash".to_string(),
            },
        )
        .await
        .expect("Create should succeed");

        let found = User::find_by_username(&pool, "alice")
            .await
            .expect("Query should succeed");
        assert!(found.is_none(), "Lookup must be exact match");
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_by_constraint() {
        let pool = test_pool().await;

        let data = CreateUser {
            username: "bob".to_string(),
            password_hash: "hash".to_string(),
        };

        User::create(&pool, data.clone())
            .await
            .expect("First create should succeed");

        let result = User::create(&pool, data).await;
        assert!(result.is_err(), "Duplicate username must be rejected");
    }
}
