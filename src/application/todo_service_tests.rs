use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};

use super::todo_service::{TodoService, TodoServiceImpl};
use crate::domain::error::TodoError;
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{CreateTodo, Todo, TodoId, UpdateTodo};

#[derive(Clone, Default)]
struct InMemoryRepo {
    inner: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    items: HashMap<i64, Todo>,
    next_id: i64,
}

#[async_trait]
impl TodoRepository for InMemoryRepo {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn create(&self, input: CreateTodo) -> Result<Todo> {
        let now = Utc::now();
        let mut state = self.inner.lock().unwrap();
        state.next_id += 1;
        let todo = Todo {
            id: TodoId(state.next_id),
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        state.items.insert(todo.id.0, todo.clone());
        Ok(todo)
    }

    async fn get(&self, id: TodoId) -> Result<Option<Todo>> {
        Ok(self.inner.lock().unwrap().items.get(&id.0).cloned())
    }

    async fn list(&self) -> Result<Vec<Todo>> {
        let mut todos: Vec<Todo> = self.inner.lock().unwrap().items.values().cloned().collect();
        todos.sort_by(|a, b| (b.created_at, b.id.0).cmp(&(a.created_at, a.id.0)));
        Ok(todos)
    }

    async fn update(&self, id: TodoId, input: UpdateTodo) -> Result<Option<Todo>> {
        let mut state = self.inner.lock().unwrap();
        let Some(todo) = state.items.get_mut(&id.0) else {
            return Ok(None);
        };
        todo.title = input.title;
        todo.description = input.description;
        todo.due_date = input.due_date;
        todo.updated_at = Utc::now();
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: TodoId) -> Result<bool> {
        Ok(self.inner.lock().unwrap().items.remove(&id.0).is_some())
    }

    async fn set_completed(&self, id: TodoId, completed: bool) -> Result<Option<Todo>> {
        let mut state = self.inner.lock().unwrap();
        let Some(todo) = state.items.get_mut(&id.0) else {
            return Ok(None);
        };
        todo.completed = completed;
        todo.updated_at = Utc::now();
        Ok(Some(todo.clone()))
    }
}

fn service() -> TodoServiceImpl<InMemoryRepo> {
    TodoServiceImpl::new(InMemoryRepo::default())
}

fn new_todo(title: &str) -> CreateTodo {
    CreateTodo {
        title: title.into(),
        description: None,
        due_date: None,
    }
}

#[tokio::test]
async fn create_then_get_returns_fresh_record() {
    let service = service();
    let created = service
        .create(CreateTodo {
            title: "Buy milk".into(),
            description: Some("2 liters".into()),
            due_date: None,
        })
        .await
        .unwrap();

    let got = service.get(created.id).await.unwrap();
    assert_eq!(got.title, "Buy milk");
    assert_eq!(got.description.as_deref(), Some("2 liters"));
    assert!(!got.completed);
    assert_eq!(got.created_at, got.updated_at);
}

#[tokio::test]
async fn create_with_empty_title_leaves_store_unchanged() {
    let service = service();
    let err = service.create(new_todo("")).await.unwrap_err();
    assert!(matches!(err, TodoError::EmptyTitle));
    assert!(service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_unknown_id_is_not_found() {
    let service = service();
    let err = service.get(TodoId(9999)).await.unwrap_err();
    assert!(matches!(err, TodoError::NotFound(TodoId(9999))));
}

#[tokio::test]
async fn list_is_newest_first() {
    let service = service();
    let first = service.create(new_todo("First")).await.unwrap();
    let second = service.create(new_todo("Second")).await.unwrap();

    let todos = service.list().await.unwrap();
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0].id, second.id);
    assert_eq!(todos[1].id, first.id);
}

#[tokio::test]
async fn update_overwrites_fields_but_not_completed() {
    let service = service();
    let created = service.create(new_todo("Original")).await.unwrap();
    service.set_completed(created.id, true).await.unwrap();

    let updated = service
        .update(
            created.id,
            UpdateTodo {
                title: "Updated".into(),
                description: Some("now with notes".into()),
                due_date: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Updated");
    assert_eq!(updated.description.as_deref(), Some("now with notes"));
    assert!(updated.completed, "edit must not touch the completion flag");
    assert!(updated.created_at <= updated.updated_at);
}

#[tokio::test]
async fn update_with_empty_title_is_rejected() {
    let service = service();
    let created = service.create(new_todo("Keep me")).await.unwrap();

    let err = service
        .update(
            created.id,
            UpdateTodo {
                title: String::new(),
                description: None,
                due_date: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TodoError::EmptyTitle));

    let got = service.get(created.id).await.unwrap();
    assert_eq!(got.title, "Keep me");
}

#[tokio::test]
async fn resolve_and_unresolve_are_idempotent() {
    let service = service();
    let created = service.create(new_todo("Toggle")).await.unwrap();

    let resolved = service.set_completed(created.id, true).await.unwrap();
    assert!(resolved.completed);
    let resolved_again = service.set_completed(created.id, true).await.unwrap();
    assert!(resolved_again.completed);

    let reopened = service.set_completed(created.id, false).await.unwrap();
    assert!(!reopened.completed);
    let reopened_again = service.set_completed(created.id, false).await.unwrap();
    assert!(!reopened_again.completed);
}

#[tokio::test]
async fn delete_removes_record_permanently() {
    let service = service();
    let created = service.create(new_todo("Buy milk")).await.unwrap();
    assert_eq!(service.list().await.unwrap().len(), 1);

    service.delete(created.id).await.unwrap();
    assert!(service.list().await.unwrap().is_empty());

    let err = service.delete(created.id).await.unwrap_err();
    assert!(matches!(err, TodoError::NotFound(_)));
}

#[tokio::test]
async fn resolving_clears_overdue_without_touching_due_date() {
    let service = service();
    let yesterday = Utc::now() - Duration::days(1);
    let created = service
        .create(CreateTodo {
            title: "Late already".into(),
            description: None,
            due_date: Some(yesterday),
        })
        .await
        .unwrap();
    assert!(created.is_overdue(Utc::now()));

    let resolved = service.set_completed(created.id, true).await.unwrap();
    assert!(!resolved.is_overdue(Utc::now()));
    assert_eq!(resolved.due_date, Some(yesterday));
}
