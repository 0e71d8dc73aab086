use std::{fmt::Display, sync::Arc};

use askama::Template;
use axum::{
    Form, Router,
    extract::{
        Path, State,
        rejection::{FormRejection, PathRejection},
    },
    http::StatusCode,
    response::Html,
    routing::{post, put},
};
use serde::{Deserialize, Deserializer, de::Error as _};

use crate::{
    db::Todo, error::AppError, routes::views::TodoTemplate, services::todo_service,
    state::AppState,
};

/// Fields posted by the htmx forms. Missing fields bind to their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TodoForm {
    pub title: String,
    #[serde(deserialize_with = "flexible_bool")]
    pub complete: bool,
}

/// Accepts `1/0`, `t/f` and `true/false` in lower, upper or title case.
fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.as_str() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        other => Err(D::Error::custom(format!("invalid boolean {other:?}"))),
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todos", post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .with_state(state)
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    form: Result<Form<TodoForm>, FormRejection>,
) -> Result<(StatusCode, Html<String>), AppError> {
    let Form(form) = form.map_err(bind_error)?;
    let todo = todo_service::create_todo(&state, &form.title).await?;
    Ok((StatusCode::CREATED, render_todo(todo)?))
}

async fn update_todo(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    form: Result<Form<TodoForm>, FormRejection>,
) -> Result<Html<String>, AppError> {
    let Path(id) = id.map_err(bind_error)?;
    let Form(form) = form.map_err(bind_error)?;
    let todo = todo_service::toggle_todo(&state, id, form.complete, form.title).await?;
    render_todo(todo)
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id.map_err(bind_error)?;
    todo_service::delete_todo(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn bind_error(rejection: impl Display) -> AppError {
    tracing::warn!(%rejection, "failed to bind todo request");
    AppError::internal("Failed to parse todo data")
}

fn render_todo(todo: Todo) -> Result<Html<String>, AppError> {
    TodoTemplate { todo }.render().map(Html).map_err(|err| {
        tracing::error!(error = %err, "failed to render todo fragment");
        AppError::internal("Failed to render todo")
    })
}

