use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};

use crate::domain::{
    repository::TodoRepository,
    todo::{CreateTodo, Todo, TodoId, UpdateTodo},
};

#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        // An in-memory database exists per connection, so the pool must not
        // grow past one or writes and reads land in different databases.
        let max_connections = if database_url.starts_with("sqlite::memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                due_date TEXT,
                completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn create(&self, input: CreateTodo) -> Result<Todo> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO todos (title, description, due_date, completed, created_at, updated_at)
             VALUES (?1, ?2, ?3, 0, ?4, ?5)",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.due_date.map(|d| d.to_rfc3339()))
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&*self.pool)
        .await?;
        Ok(Todo {
            id: TodoId(result.last_insert_rowid()),
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            completed: false,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get(&self, id: TodoId) -> Result<Option<Todo>> {
        let row = sqlx::query(
            "SELECT id, title, description, due_date, completed, created_at, updated_at
             FROM todos WHERE id = ?1",
        )
        .bind(id.0)
        .fetch_optional(&*self.pool)
        .await?;
        Ok(row.map(row_to_todo))
    }

    async fn list(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query(
            "SELECT id, title, description, due_date, completed, created_at, updated_at
             FROM todos ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&*self.pool)
        .await?;
        Ok(rows.into_iter().map(row_to_todo).collect())
    }

    async fn update(&self, id: TodoId, input: UpdateTodo) -> Result<Option<Todo>> {
        let existing = self.get(id).await?;
        let Some(mut todo) = existing else { return Ok(None) };

        todo.title = input.title;
        todo.description = input.description;
        todo.due_date = input.due_date;
        todo.updated_at = Utc::now();

        sqlx::query(
            "UPDATE todos SET title = ?2, description = ?3, due_date = ?4, updated_at = ?5
             WHERE id = ?1",
        )
        .bind(todo.id.0)
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.due_date.map(|d| d.to_rfc3339()))
        .bind(todo.updated_at.to_rfc3339())
        .execute(&*self.pool)
        .await?;

        Ok(Some(todo))
    }

    async fn delete(&self, id: TodoId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.0)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_completed(&self, id: TodoId, completed: bool) -> Result<Option<Todo>> {
        let existing = self.get(id).await?;
        let Some(mut todo) = existing else { return Ok(None) };

        todo.completed = completed;
        todo.updated_at = Utc::now();

        sqlx::query("UPDATE todos SET completed = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(todo.id.0)
            .bind(todo.completed)
            .bind(todo.updated_at.to_rfc3339())
            .execute(&*self.pool)
            .await?;

        Ok(Some(todo))
    }
}

fn row_to_todo(row: SqliteRow) -> Todo {
    let id: i64 = row.get("id");
    let title: String = row.get("title");
    let description: Option<String> = row.get("description");
    let due_date_str: Option<String> = row.get("due_date");
    let completed: bool = row.get("completed");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    Todo {
        id: TodoId(id),
        title,
        description,
        due_date: due_date_str.map(|s| parse_stored(&s)),
        completed,
        created_at: parse_stored(&created_at_str),
        updated_at: parse_stored(&updated_at_str),
    }
}

fn parse_stored(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}
