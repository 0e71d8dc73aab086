use anyhow::{Result, bail};

use super::AppConfig;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if !cfg
        .database
        .url
        .trim()
        .to_ascii_lowercase()
        .starts_with("sqlite:")
    {
        errors.push(format!(
            "database.url must be a sqlite url, got {:?}",
            cfg.database.url
        ));
    }

    if cfg.paths.sql_dir.as_os_str().is_empty() {
        errors.push("paths.sql_dir must not be empty".to_string());
    }

    if cfg.paths.public_dir.as_os_str().is_empty() {
        errors.push("paths.public_dir must not be empty".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
