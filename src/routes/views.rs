use std::sync::Arc;

use askama::Template;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Html,
    routing::get,
};
use tower_http::services::ServeDir;

use crate::{
    db::Todo,
    services::todo_service,
    state::AppState,
};

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    todos: Vec<Todo>,
    count: usize,
}

/// A single `<li>` for one todo, swapped in by htmx.
#[derive(Template)]
#[template(path = "todo.html")]
pub(crate) struct TodoTemplate {
    pub todo: Todo,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    message: &'a str,
}

type HtmlError = (StatusCode, Html<String>);

pub fn router(state: Arc<AppState>) -> Router {
    let public_dir = state.config.paths.public_dir.clone();
    Router::new()
        .route("/", get(index))
        .nest_service("/public", ServeDir::new(public_dir))
        .with_state(state)
}

async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, HtmlError> {
    let todos = todo_service::list_todos(&state)
        .await
        .map_err(|err| error_page(err.status, err.message()))?;
    let count = todos.len();
    let rendered = IndexTemplate { todos, count }.render().map_err(|err| {
        tracing::error!(error = %err, "failed to render index");
        error_page(StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page")
    })?;
    Ok(Html(rendered))
}

fn error_page(status: StatusCode, message: &str) -> HtmlError {
    let body = ErrorTemplate { message }
        .render()
        .unwrap_or_else(|_| message.to_string());
    (status, Html(body))
}

#[cfg(test)]
mod tests {
    use askama::Template;

    use super::{IndexTemplate, TodoTemplate};
    use crate::db::Todo;

    fn todo(id: i64, title: &str, complete: bool) -> Todo {
        Todo {
            id,
            created_at: None,
            updated_at: None,
            title: title.to_string(),
            complete,
        }
    }

    #[test]
    fn fragment_escapes_title() {
        let html = TodoTemplate {
            todo: todo(1, "<script>alert(1)</script>", false),
        }
        .render()
        .expect("render fragment");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(r#"hx-put="/todos/1""#));
        assert!(html.contains(r#"name="complete" value="false""#));
    }

    #[test]
    fn completed_fragment_is_marked() {
        let html = TodoTemplate {
            todo: todo(2, "done already", true),
        }
        .render()
        .expect("render fragment");
        assert!(html.contains(r#"class="todo complete""#));
        assert!(html.contains(r#"name="complete" value="true""#));
    }

    #[test]
    fn index_lists_every_todo_with_count() {
        let html = IndexTemplate {
            todos: vec![todo(1, "one", false), todo(2, "two", true)],
            count: 2,
        }
        .render()
        .expect("render index");
        assert!(html.contains("(2)"));
        assert!(html.contains(r#"id="todo-1""#));
        assert!(html.contains(r#"id="todo-2""#));
    }
}
