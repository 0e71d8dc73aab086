//! Statement texts shipped as `.sql` files next to the binary.
//!
//! Every statement is read once at startup into a [`QueryStore`]; handlers only
//! ever borrow the preloaded text, so a missing file fails the boot instead of
//! a request.

use std::{
    collections::HashMap,
    fmt, fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    CreateTable,
    CreateNewTodo,
    GetAllTodos,
    UpdateTodoById,
    DeleteTodoById,
}

impl Query {
    pub const ALL: [Query; 5] = [
        Query::CreateTable,
        Query::CreateNewTodo,
        Query::GetAllTodos,
        Query::UpdateTodoById,
        Query::DeleteTodoById,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Query::CreateTable => "createTable",
            Query::CreateNewTodo => "createNewTodo",
            Query::GetAllTodos => "getAllTodos",
            Query::UpdateTodoById => "updateTodoById",
            Query::DeleteTodoById => "deleteTodoById",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.sql", self.name())
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum QueryLoadError {
    #[error("failed to read query {name} from {}: {source}", .path.display())]
    Missing {
        name: Query,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("query {name} at {} is empty", .path.display())]
    Empty { name: Query, path: PathBuf },
}

impl QueryLoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Missing { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Reads a single statement from `dir`.
pub fn load_query(dir: &Path, name: Query) -> Result<String, QueryLoadError> {
    let path = dir.join(name.file_name());
    let text = fs::read_to_string(&path).map_err(|source| QueryLoadError::Missing {
        name,
        path: path.clone(),
        source,
    })?;
    if text.trim().is_empty() {
        return Err(QueryLoadError::Empty { name, path });
    }
    Ok(text)
}

#[derive(Debug, Clone)]
pub struct QueryStore {
    statements: HashMap<Query, String>,
}

impl QueryStore {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, QueryLoadError> {
        let dir = dir.as_ref();
        let statements = Query::ALL
            .into_iter()
            .map(|name| load_query(dir, name).map(|text| (name, text)))
            .collect::<Result<HashMap<_, _>, _>>()?;
        tracing::info!(dir = %dir.display(), count = statements.len(), "loaded sql statements");
        Ok(Self { statements })
    }

    pub fn get(&self, name: Query) -> &str {
        // `load` only succeeds once every `Query` has text.
        self.statements
            .get(&name)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{Query, QueryLoadError, QueryStore, load_query};

    fn sql_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("sql")
    }

    #[test]
    fn loads_every_shipped_statement() {
        let store = QueryStore::load(sql_dir()).expect("shipped sql should load");
        for name in Query::ALL {
            assert!(!store.get(name).trim().is_empty(), "{name} should have text");
        }
    }

    #[test]
    fn list_statement_selects_columns_by_name() {
        let text = load_query(&sql_dir(), Query::GetAllTodos).expect("load getAllTodos");
        for column in ["id", "created_at", "updated_at", "title", "complete"] {
            assert!(text.contains(column), "getAllTodos should select {column}");
        }
    }

    #[test]
    fn missing_directory_reports_not_found() {
        let err = QueryStore::load("/definitely/not/a/sql/dir").expect_err("load should fail");
        assert!(err.is_not_found());
        assert!(matches!(
            err,
            QueryLoadError::Missing {
                name: Query::CreateTable,
                ..
            }
        ));
    }

    #[test]
    fn empty_statement_is_rejected() {
        let dir = std::env::temp_dir().join(format!("htmx_todos_sql_{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        std::fs::write(dir.join("createTable.sql"), "  \n").expect("write empty file");

        let err = load_query(&dir, Query::CreateTable).expect_err("empty file should fail");
        assert!(matches!(err, QueryLoadError::Empty { .. }));
        assert!(!err.is_not_found());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
