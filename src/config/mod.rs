pub mod configs;
pub mod defaults;
pub mod validate;

pub use configs::{AppConfig, DatabaseConfig, GeneralConfig, LoggingConfig, PathsConfig};
