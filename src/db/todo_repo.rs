use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, FromQueryResult, Statement, Value};

use super::queries::{Query, QueryStore};

/// A row of the `todos` table. Columns are matched by name, so the select
/// list order of `getAllTodos` does not matter.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult)]
pub struct Todo {
    pub id: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub title: String,
    pub complete: bool,
}

fn statement(
    db: &DatabaseConnection,
    queries: &QueryStore,
    name: Query,
    values: impl IntoIterator<Item = Value>,
) -> Statement {
    Statement::from_sql_and_values(db.get_database_backend(), queries.get(name), values)
}

pub async fn create_table(db: &DatabaseConnection, queries: &QueryStore) -> Result<(), DbErr> {
    db.execute_unprepared(queries.get(Query::CreateTable)).await?;
    Ok(())
}

pub async fn list_todos(
    db: &DatabaseConnection,
    queries: &QueryStore,
) -> Result<Vec<Todo>, DbErr> {
    let stmt = statement(db, queries, Query::GetAllTodos, Vec::<Value>::new());
    Todo::find_by_statement(stmt).all(db).await
}

pub async fn create_todo(
    db: &DatabaseConnection,
    queries: &QueryStore,
    title: &str,
) -> Result<Todo, DbErr> {
    let stmt = statement(
        db,
        queries,
        Query::CreateNewTodo,
        [Value::from(false), Value::from(title)],
    );
    let result = db.execute_raw(stmt).await?;
    let id = i64::try_from(result.last_insert_id())
        .map_err(|_| DbErr::Custom("inserted id out of range".to_string()))?;
    Ok(Todo {
        id,
        created_at: None,
        updated_at: None,
        title: title.to_string(),
        complete: false,
    })
}

/// Writes `complete` and `title` for `id`, returning the number of rows touched.
pub async fn update_todo(
    db: &DatabaseConnection,
    queries: &QueryStore,
    id: i64,
    complete: bool,
    title: &str,
) -> Result<u64, DbErr> {
    let stmt = statement(
        db,
        queries,
        Query::UpdateTodoById,
        [Value::from(complete), Value::from(title), Value::from(id)],
    );
    Ok(db.execute_raw(stmt).await?.rows_affected())
}

pub async fn delete_todo(
    db: &DatabaseConnection,
    queries: &QueryStore,
    id: i64,
) -> Result<u64, DbErr> {
    let stmt = statement(db, queries, Query::DeleteTodoById, [Value::from(id)]);
    Ok(db.execute_raw(stmt).await?.rows_affected())
}
