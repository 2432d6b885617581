//! Server-rendered pages. Small `format!`-based templates, escaped by hand;
//! the surface is three pages and a banner, not worth a template engine.

use chrono::{DateTime, Utc};

use crate::domain::todo::{Todo, TodoId};

/// One-shot status banner carried across a redirect.
#[derive(Debug, Clone, Copy)]
pub enum Flash {
    Success(&'static str),
    Error(&'static str),
}

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape(title),
        body = body,
    )
}

fn flash_banner(flash: Option<Flash>) -> String {
    match flash {
        Some(Flash::Success(text)) => {
            format!("<p class=\"flash success\">{}</p>\n", escape(text))
        }
        Some(Flash::Error(text)) => {
            format!("<p class=\"flash error\">{}</p>\n", escape(text))
        }
        None => String::new(),
    }
}

/// Value for an `<input type=\"datetime-local\">`.
fn datetime_value(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%dT%H:%M").to_string())
        .unwrap_or_default()
}

pub fn home(todos: &[Todo], now: DateTime<Utc>, flash: Option<Flash>) -> String {
    let mut body = String::new();
    body.push_str("<h1>Todos</h1>\n");
    body.push_str(&flash_banner(flash));
    body.push_str("<p><a href=\"/create/\">Add a todo</a></p>\n");

    if todos.is_empty() {
        body.push_str("<p>No todos yet.</p>\n");
    } else {
        body.push_str("<ul class=\"todos\">\n");
        for todo in todos {
            body.push_str(&todo_row(todo, now));
        }
        body.push_str("</ul>\n");
    }

    layout("Todos", &body)
}

fn todo_row(todo: &Todo, now: DateTime<Utc>) -> String {
    let mut row = String::new();
    let class = if todo.completed { "todo completed" } else { "todo" };
    row.push_str(&format!("<li class=\"{class}\">\n"));
    row.push_str(&format!("<strong>{}</strong>\n", escape(&todo.title)));
    if let Some(description) = &todo.description {
        if !description.is_empty() {
            row.push_str(&format!("<p>{}</p>\n", escape(description)));
        }
    }
    if let Some(due) = todo.due_date {
        row.push_str(&format!(
            "<span class=\"due\">Due {}</span>\n",
            due.format("%Y-%m-%d %H:%M")
        ));
    }
    if todo.is_overdue(now) {
        row.push_str("<span class=\"overdue\">Overdue</span>\n");
    }
    row.push_str(&format!(
        "<a href=\"/{id}/edit/\">Edit</a>\n\
         <form method=\"post\" action=\"/{id}/delete/\"><button>Delete</button></form>\n",
        id = todo.id,
    ));
    if todo.completed {
        row.push_str(&format!(
            "<form method=\"post\" action=\"/{id}/unresolve/\"><button>Reopen</button></form>\n",
            id = todo.id,
        ));
    } else {
        row.push_str(&format!(
            "<form method=\"post\" action=\"/{id}/resolve/\"><button>Complete</button></form>\n",
            id = todo.id,
        ));
    }
    row.push_str("</li>\n");
    row
}

pub fn create_form() -> String {
    let body = format!(
        "<h1>New todo</h1>\n{}",
        todo_fields("/create/", "", "", "", "Create"),
    );
    layout("New todo", &body)
}

/// The edit page takes raw field values rather than a `Todo` so a failed
/// submission can be re-rendered with what the user typed, unsaved.
pub fn edit_form(
    id: TodoId,
    title: &str,
    description: &str,
    due_date: Option<DateTime<Utc>>,
    error: Option<&'static str>,
) -> String {
    let mut body = String::from("<h1>Edit todo</h1>\n");
    body.push_str(&flash_banner(error.map(Flash::Error)));
    body.push_str(&todo_fields(
        &format!("/{id}/edit/"),
        title,
        description,
        &datetime_value(due_date),
        "Save",
    ));
    layout("Edit todo", &body)
}

fn todo_fields(
    action: &str,
    title: &str,
    description: &str,
    due_value: &str,
    submit: &str,
) -> String {
    format!(
        "<form method=\"post\" action=\"{action}\">\n\
         <label>Title <input type=\"text\" name=\"title\" value=\"{title}\"></label>\n\
         <label>Description <textarea name=\"description\">{description}</textarea></label>\n\
         <label>Due date <input type=\"datetime-local\" name=\"due_date\" value=\"{due}\"></label>\n\
         <button type=\"submit\">{submit}</button>\n\
         </form>\n\
         <p><a href=\"/\">Back to list</a></p>\n",
        action = escape(action),
        title = escape(title),
        description = escape(description),
        due = escape(due_value),
        submit = escape(submit),
    )
}

pub fn not_found() -> String {
    layout("Not found", "<h1>Not found</h1>\n<p><a href=\"/\">Back to list</a></p>")
}
