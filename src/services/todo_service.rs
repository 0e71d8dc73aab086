use sea_orm::DbErr;

use crate::{
    db::{Todo, todo_repo},
    error::AppError,
    state::AppState,
};

fn backend_failure(message: &'static str) -> impl FnOnce(DbErr) -> AppError {
    move |err| {
        tracing::error!(error = %err, "{message}");
        AppError::internal(message)
    }
}

pub async fn list_todos(state: &AppState) -> Result<Vec<Todo>, AppError> {
    todo_repo::list_todos(&state.db, &state.queries)
        .await
        .map_err(backend_failure("Failed to load todos"))
}

pub async fn create_todo(state: &AppState, title: &str) -> Result<Todo, AppError> {
    let todo = todo_repo::create_todo(&state.db, &state.queries, title)
        .await
        .map_err(backend_failure("Failed to create todo"))?;
    tracing::debug!(id = todo.id, "created todo");
    Ok(todo)
}

/// Flips `complete` for `id` and stores `title` alongside it. The returned
/// todo reflects what was written.
pub async fn toggle_todo(
    state: &AppState,
    id: i64,
    complete: bool,
    title: String,
) -> Result<Todo, AppError> {
    let complete = !complete;
    let touched = todo_repo::update_todo(&state.db, &state.queries, id, complete, &title)
        .await
        .map_err(backend_failure("Failed to update todo"))?;
    if touched == 0 {
        return Err(AppError::not_found("Todo not found"));
    }
    tracing::debug!(id, complete, "toggled todo");
    Ok(Todo {
        id,
        created_at: None,
        updated_at: None,
        title,
        complete,
    })
}

/// Deleting an id that is already gone is not an error.
pub async fn delete_todo(state: &AppState, id: i64) -> Result<(), AppError> {
    let touched = todo_repo::delete_todo(&state.db, &state.queries, id)
        .await
        .map_err(backend_failure("Failed to delete todo"))?;
    tracing::debug!(id, touched, "deleted todo");
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    use super::{create_todo, delete_todo, list_todos, toggle_todo};
    use crate::test_helpers::mock_state;

    #[tokio::test]
    async fn insert_failure_is_internal_error() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_errors([DbErr::Custom("disk full".to_string())])
            .into_connection();
        let state = mock_state(db);

        let err = create_todo(&state, "Buy milk").await.expect_err("insert should fail");
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Failed to create todo");
    }

    #[tokio::test]
    async fn list_failure_hides_backend_detail() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_errors([DbErr::Custom("no such table: todos".to_string())])
            .into_connection();
        let state = mock_state(db);

        let err = list_todos(&state).await.expect_err("list should fail");
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message().contains("no such table"));
    }

    #[tokio::test]
    async fn toggle_negates_incoming_flag() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();
        let state = mock_state(db);

        let todo = toggle_todo(&state, 3, false, "Walk dog".to_string())
            .await
            .expect("toggle should succeed");
        assert!(todo.complete);
        assert_eq!(todo.title, "Walk dog");

        let todo = toggle_todo(&state, 3, todo.complete, todo.title)
            .await
            .expect("toggle back should succeed");
        assert!(!todo.complete);
    }

    #[tokio::test]
    async fn toggle_of_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let state = mock_state(db);

        let err = toggle_todo(&state, 99, false, "ghost".to_string())
            .await
            .expect_err("missing row should fail");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_of_missing_row_succeeds() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let state = mock_state(db);

        delete_todo(&state, 99).await.expect("delete should be idempotent");
    }
}
