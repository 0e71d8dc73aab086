pub mod connection;
pub mod queries;
pub mod todo_repo;

pub use queries::{Query, QueryLoadError, QueryStore};
pub use todo_repo::Todo;
