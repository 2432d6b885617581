use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;

use crate::application::todo_service::TodoService;
use crate::domain::todo::{CreateTodo, TodoId, UpdateTodo};
use crate::http::types::PageError;
use crate::http::views::{self, Flash};

#[derive(Clone)]
pub struct AppState<S: TodoService> {
    pub service: S,
}

pub fn router<S: TodoService + Clone>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(todo_list::<S>))
        .route("/create/", get(create_page).post(create_todo::<S>))
        .route("/:id/edit/", get(edit_page::<S>).post(edit_todo::<S>))
        // mutations are POST-only; the method router answers 405 otherwise
        .route("/:id/delete/", post(delete_todo::<S>))
        .route("/:id/resolve/", post(resolve_todo::<S>))
        .route("/:id/unresolve/", post(unresolve_todo::<S>))
        .with_state(state)
}

/// Status banner codes carried on the post-redirect query string.
#[derive(Debug, Default, Deserialize)]
struct FlashParams {
    msg: Option<String>,
    err: Option<String>,
}

impl FlashParams {
    fn flash(&self) -> Option<Flash> {
        if let Some(msg) = self.msg.as_deref() {
            let text = match msg {
                "created" => "Todo created successfully!",
                "updated" => "Todo updated successfully!",
                "deleted" => "Todo deleted successfully!",
                "resolved" => "Todo marked as completed!",
                "unresolved" => "Todo marked as incomplete!",
                _ => return None,
            };
            return Some(Flash::Success(text));
        }
        match self.err.as_deref() {
            Some("title-required") => Some(Flash::Error(TITLE_REQUIRED)),
            _ => None,
        }
    }
}

const TITLE_REQUIRED: &str = "Title is required!";

/// 302 back to the list page with a banner code in the query string.
fn back_to_list(query: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, format!("/?{query}"))]).into_response()
}

/// Raw form payload; presence and emptiness are decided here, before
/// anything typed reaches the service.
#[derive(Debug, Deserialize)]
struct TodoForm {
    title: Option<String>,
    description: Option<String>,
    due_date: Option<String>,
}

async fn todo_list<S: TodoService>(
    State(state): State<AppState<S>>,
    Query(params): Query<FlashParams>,
) -> Result<Html<String>, PageError> {
    let todos = state.service.list().await?;
    Ok(Html(views::home(&todos, Utc::now(), params.flash())))
}

async fn create_page() -> Html<String> {
    Html(views::create_form())
}

async fn create_todo<S: TodoService>(
    State(state): State<AppState<S>>,
    Form(form): Form<TodoForm>,
) -> Result<Response, PageError> {
    let title = form.title.unwrap_or_default();
    if title.is_empty() {
        // same redirect as success, distinguished only by the banner
        return Ok(back_to_list("err=title-required"));
    }
    let todo = state
        .service
        .create(CreateTodo {
            title,
            description: form.description.filter(|d| !d.is_empty()),
            due_date: parse_due_date(form.due_date.as_deref()),
        })
        .await?;
    tracing::info!(id = %todo.id, "todo created");
    Ok(back_to_list("msg=created"))
}

async fn edit_page<S: TodoService>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Html<String>, PageError> {
    let todo = state.service.get(TodoId(id)).await?;
    Ok(Html(views::edit_form(
        todo.id,
        &todo.title,
        todo.description.as_deref().unwrap_or(""),
        todo.due_date,
        None,
    )))
}

async fn edit_todo<S: TodoService>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
    Form(form): Form<TodoForm>,
) -> Result<Response, PageError> {
    let id = TodoId(id);
    // unknown ids are a 404 even when the submitted title is bad
    let _ = state.service.get(id).await?;

    let title = form.title.unwrap_or_default();
    let description = form.description.unwrap_or_default();
    let due_date = parse_due_date(form.due_date.as_deref());

    if title.is_empty() {
        // unlike create, edit re-renders the form with the submitted
        // (unsaved) values instead of redirecting
        let page = views::edit_form(id, &title, &description, due_date, Some(TITLE_REQUIRED));
        return Ok(Html(page).into_response());
    }

    state
        .service
        .update(
            id,
            UpdateTodo {
                title,
                description: Some(description).filter(|d| !d.is_empty()),
                due_date,
            },
        )
        .await?;
    tracing::info!(%id, "todo updated");
    Ok(back_to_list("msg=updated"))
}

async fn delete_todo<S: TodoService>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Response, PageError> {
    let id = TodoId(id);
    state.service.delete(id).await?;
    tracing::info!(%id, "todo deleted");
    Ok(back_to_list("msg=deleted"))
}

async fn resolve_todo<S: TodoService>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Response, PageError> {
    let id = TodoId(id);
    state.service.set_completed(id, true).await?;
    tracing::info!(%id, "todo resolved");
    Ok(back_to_list("msg=resolved"))
}

async fn unresolve_todo<S: TodoService>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Response, PageError> {
    let id = TodoId(id);
    state.service.set_completed(id, false).await?;
    tracing::info!(%id, "todo reopened");
    Ok(back_to_list("msg=unresolved"))
}

/// Accepts RFC 3339, the HTML `datetime-local` shapes, or a bare date
/// (naive values are taken as UTC). Anything else counts as "no deadline".
fn parse_due_date(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    None
}
