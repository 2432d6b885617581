use async_trait::async_trait;

use crate::domain::error::TodoError;
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{CreateTodo, Todo, TodoId, UpdateTodo};

/// The seam the HTTP handlers depend on. Validation (non-empty title) and
/// missing-id mapping live here so no handler talks business rules.
#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn create(&self, input: CreateTodo) -> Result<Todo, TodoError>;
    async fn get(&self, id: TodoId) -> Result<Todo, TodoError>;
    async fn list(&self) -> Result<Vec<Todo>, TodoError>;
    async fn update(&self, id: TodoId, input: UpdateTodo) -> Result<Todo, TodoError>;
    async fn delete(&self, id: TodoId) -> Result<(), TodoError>;
    async fn set_completed(&self, id: TodoId, completed: bool) -> Result<Todo, TodoError>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn create(&self, input: CreateTodo) -> Result<Todo, TodoError> {
        if input.title.is_empty() {
            return Err(TodoError::EmptyTitle);
        }
        Ok(self.repo.create(input).await?)
    }

    async fn get(&self, id: TodoId) -> Result<Todo, TodoError> {
        self.repo.get(id).await?.ok_or(TodoError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<Todo>, TodoError> {
        Ok(self.repo.list().await?)
    }

    async fn update(&self, id: TodoId, input: UpdateTodo) -> Result<Todo, TodoError> {
        if input.title.is_empty() {
            return Err(TodoError::EmptyTitle);
        }
        self.repo
            .update(id, input)
            .await?
            .ok_or(TodoError::NotFound(id))
    }

    async fn delete(&self, id: TodoId) -> Result<(), TodoError> {
        if self.repo.delete(id).await? {
            Ok(())
        } else {
            Err(TodoError::NotFound(id))
        }
    }

    async fn set_completed(&self, id: TodoId, completed: bool) -> Result<Todo, TodoError> {
        self.repo
            .set_completed(id, completed)
            .await?
            .ok_or(TodoError::NotFound(id))
    }
}
