use async_trait::async_trait;

use super::todo::{CreateTodo, Todo, TodoId, UpdateTodo};

/// Storage contract for todos. Implementations report missing ids as `None`
/// / `false`; mapping those to user-facing errors is the service's job.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    async fn create(&self, input: CreateTodo) -> anyhow::Result<Todo>;
    async fn get(&self, id: TodoId) -> anyhow::Result<Option<Todo>>;
    /// Newest first: ordered by `created_at` descending, id breaking ties.
    async fn list(&self) -> anyhow::Result<Vec<Todo>>;
    async fn update(&self, id: TodoId, input: UpdateTodo) -> anyhow::Result<Option<Todo>>;
    async fn delete(&self, id: TodoId) -> anyhow::Result<bool>;
    async fn set_completed(&self, id: TodoId, completed: bool) -> anyhow::Result<Option<Todo>>;
}
