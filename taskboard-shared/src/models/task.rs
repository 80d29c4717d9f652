/// Task model and database operations
///
/// Every task is owned by exactly one user and lives in one of three status
/// columns. The `position` column is a loose ordering hint within a column:
/// duplicates and gaps are permitted, the server never renumbers siblings,
/// and a drag-and-drop move is just a partial update of one row.
///
/// All read and write operations are scoped to the owner. A lookup that
/// misses because the task doesn't exist and one that misses because it
/// belongs to someone else are indistinguishable to the caller, so task
/// existence is never disclosed to non-owners.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title TEXT NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'todo',
///     "position" INTEGER NOT NULL DEFAULT 0,
///     owner_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task status column
///
/// Serializes to the wire strings `"todo"`, `"in-progress"`, `"done"`,
/// matching the `task_status` Postgres enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started yet (the default for new tasks)
    #[default]
    Todo,

    /// Currently being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// Gets the status as its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    /// Parses a wire string into a status
    ///
    /// Returns None for anything outside the three column values; callers
    /// turn that into a validation failure.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(TaskStatus::Todo),
            "in-progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task model
///
/// The owner is bound at creation from the authenticated caller and can
/// never be reassigned.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Status column the task lives in
    pub status: TaskStatus,

    /// Ordering hint within the status column
    pub position: i32,

    /// Owner of the task
    pub owner_id: Uuid,

    /// When the task was created
    ///
    /// Doubles as the stable tie-break when two tasks share a position
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// The owner is passed separately to [`Task::create`]; it is never part of
/// client-supplied fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title (required, non-empty)
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Status column (defaults to `todo`)
    pub status: TaskStatus,

    /// Ordering hint (defaults to 0)
    pub position: i32,
}

/// Input for partially updating a task
///
/// Only non-None fields are written; everything else is left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status column
    pub status: Option<TaskStatus>,

    /// New ordering hint
    pub position: Option<i32>,
}

impl Task {
    /// Creates a new task owned by `owner_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, "position", owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, status, "position", owner_id,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.position)
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks owned by `owner_id`
    ///
    /// Ordered by ascending position with ties broken by creation order.
    /// The ordering is global across status columns; clients group rows
    /// into columns themselves.
    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, "position", owner_id,
                   created_at, updated_at
            FROM tasks
            WHERE owner_id = $1
            ORDER BY "position" ASC, created_at ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Partially updates a task owned by `owner_id`
    ///
    /// Only the fields present in `data` are written. An empty update is
    /// legal and returns the row unchanged (apart from `updated_at`).
    ///
    /// # Returns
    ///
    /// The updated task, or None when no task with that id is owned by
    /// `owner_id` — whether it doesn't exist or belongs to someone else
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.position.is_some() {
            bind_count += 1;
            query.push_str(&format!(", \"position\" = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND owner_id = $2 RETURNING id, title, description, status, \"position\", owner_id, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id).bind(owner_id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(position) = data.position {
            q = q.bind(position);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task owned by `owner_id`
    ///
    /// # Returns
    ///
    /// The deleted task's prior state, or None under the same ownership
    /// rule as [`Task::update`]. Deleting the same id twice yields None on
    /// the second call.
    pub async fn delete(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            DELETE FROM tasks
            WHERE id = $1 AND owner_id = $2
            RETURNING id, title, description, status, "position", owner_id,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }
}
