/// Task model and database operations
///
/// Every task belongs to exactly one user. All per-task reads and writes
/// are scoped by `owner_id` in the WHERE clause, so a task owned by someone
/// else is indistinguishable from a task that does not exist — callers get
/// `None`, never a "forbidden" signal that would leak existence.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id          INTEGER PRIMARY KEY AUTOINCREMENT,
///     title       TEXT NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     is_done     BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at  TEXT NOT NULL,
///     owner_id    INTEGER NOT NULL REFERENCES users(id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Task record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task id, assigned at creation
    pub id: i64,

    /// Non-empty title
    pub title: String,

    /// Free-form description, may be empty
    pub description: String,

    /// Completion flag; defaults false, set true by mark-done (one-way)
    pub is_done: bool,

    /// Set at creation, immutable
    pub created_at: DateTime<Utc>,

    /// Owning user
    pub owner_id: i64,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Owning user id
    pub owner_id: i64,

    /// Task title (non-empty, validated by the handler)
    pub title: String,

    /// Task description (empty string when omitted)
    pub description: String,
}

/// Partial update for a task
///
/// A field is applied only when present and non-empty; an empty string
/// means "no change", matching the behavior clients already depend on.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    /// New title, if any
    pub title: Option<String>,

    /// New description, if any
    pub description: Option<String>,
}

impl Task {
    /// Creates a new task owned by the given user
    pub async fn create(pool: &SqlitePool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, is_done, created_at, owner_id)
            VALUES (?1, ?2, FALSE, ?3, ?4)
            RETURNING id, title, description, is_done, created_at, owner_id
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(Utc::now())
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks owned by a user, in insertion order
    pub async fn list_by_owner(pool: &SqlitePool, owner_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, is_done, created_at, owner_id
            FROM tasks
            WHERE owner_id = ?1
            ORDER BY id
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Finds a task by id, scoped to its owner
    ///
    /// This is the sole authorization check for per-task operations.
    pub async fn find_by_id_and_owner(
        pool: &SqlitePool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, is_done, created_at, owner_id
            FROM tasks
            WHERE id = ?1 AND owner_id = ?2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Applies a partial update to an owner-scoped task
    ///
    /// Returns the updated task, or `None` if no task with that id is
    /// owned by `owner_id`. Empty-string fields are filtered out before
    /// the query, so they leave the stored value untouched.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        owner_id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let title = data.title.filter(|t| !t.is_empty());
        let description = data.description.filter(|d| !d.is_empty());

        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE(?3, title),
                description = COALESCE(?4, description)
            WHERE id = ?1 AND owner_id = ?2
            RETURNING id, title, description, is_done, created_at, owner_id
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(title)
        .bind(description)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Marks an owner-scoped task as done
    ///
    /// Sets `is_done` unconditionally, so repeating the call is harmless.
    /// There is no way to un-done a task.
    pub async fn mark_done(
        pool: &SqlitePool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET is_done = TRUE
            WHERE id = ?1 AND owner_id = ?2
            RETURNING id, title, description, is_done, created_at, owner_id
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes an owner-scoped task
    ///
    /// Returns true if a task was deleted, false if none matched.
    pub async fn delete(pool: &SqlitePool, id: i64, owner_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{CreateUser, User};
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

    async fn test_user(pool: &SqlitePool, username: &str) -> User {
        User::create(
            pool,
            CreateUser {
                username: username.to_string(),
                password_hash: "hash".to_string(),
            },
        )
        .await
        .expect("User create should succeed")
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let pool = test_pool().await;
        let user = test_user(&pool, "alice").await;

        let task = Task::create(
            &pool,
            CreateTask {
                owner_id: user.id,
                title: "Buy milk".to_string(),
                description: String::new(),
            },
        )
        .await
        .expect("Create should succeed");

        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "");
        assert!(!task.is_done);
        assert_eq!(task.owner_id, user.id);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let pool = test_pool().await;
        let user = test_user(&pool, "alice").await;

        for title in ["first", "second", "third"] {
            Task::create(
                &pool,
                CreateTask {
                    owner_id: user.id,
                    title: title.to_string(),
                    description: String::new(),
                },
            )
            .await
            .expect("Create should succeed");
        }

        let tasks = Task::list_by_owner(&pool, user.id)
            .await
            .expect("List should succeed");
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();

        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_owner_scoping() {
        let pool = test_pool().await;
        let alice = test_user(&pool, "alice").await;
        let bob = test_user(&pool, "bob").await;

        let task = Task::create(
            &pool,
            CreateTask {
                owner_id: alice.id,
                title: "private".to_string(),
                description: String::new(),
            },
        )
        .await
        .expect("Create should succeed");

        // Bob can neither see nor touch Alice's task
        assert!(Task::find_by_id_and_owner(&pool, task.id, bob.id)
            .await
            .expect("Query should succeed")
            .is_none());
        assert!(Task::mark_done(&pool, task.id, bob.id)
            .await
            .expect("Query should succeed")
            .is_none());
        assert!(!Task::delete(&pool, task.id, bob.id)
            .await
            .expect("Query should succeed"));
        assert!(Task::list_by_owner(&pool, bob.id)
            .await
            .expect("List should succeed")
            .is_empty());

        // Still there for Alice
        assert!(Task::find_by_id_and_owner(&pool, task.id, alice.id)
            .await
            .expect("Query should succeed")
            .is_some());
    }

    #[tokio::test]
    async fn test_update_ignores_empty_fields() {
        let pool = test_pool().await;
        let user = test_user(&pool, "alice").await;

        let task = Task::create(
            &pool,
            CreateTask {
                owner_id: user.id,
                title: "original".to_string(),
                description: "details".to_string(),
            },
        )
        .await
        .expect("Create should succeed");

        let updated = Task::update(
            &pool,
            task.id,
            user.id,
            UpdateTask {
                title: Some(String::new()),
                description: Some("new details".to_string()),
            },
        )
        .await
        .expect("Update should succeed")
        .expect("Task should exist");

        // Empty title means "no change"
        assert_eq!(updated.title, "original");
        assert_eq!(updated.description, "new details");
        assert!(!updated.is_done);
    }

    #[tokio::test]
    async fn test_mark_done_is_idempotent() {
        let pool = test_pool().await;
        let user = test_user(&pool, "alice").await;

        let task = Task::create(
            &pool,
            CreateTask {
                owner_id: user.id,
                title: "todo".to_string(),
                description: String::new(),
            },
        )
        .await
        .expect("Create should succeed");

        let first = Task::mark_done(&pool, task.id, user.id)
            .await
            .expect("Query should succeed")
            .expect("Task should exist");
        assert!(first.is_done);

        let second = Task::mark_done(&pool, task.id, user.id)
            .await
            .expect("Query should succeed")
            .expect("Task should exist");
        assert!(second.is_done);
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = test_pool().await;
        let user = test_user(&pool, "alice").await;

        let task = Task::create(
            &pool,
            CreateTask {
                owner_id: user.id,
                title: "ephemeral".to_string(),
                description: String::new(),
            },
        )
        .await
        .expect("Create should succeed");

        assert!(Task::delete(&pool, task.id, user.id)
            .await
            .expect("Delete should succeed"));
        assert!(!Task::delete(&pool, task.id, user.id)
            .await
            .expect("Delete should succeed"));
        assert!(Task::list_by_owner(&pool, user.id)
            .await
            .expect("List should succeed")
            .is_empty());
    }
}
