use anyhow::Context;
use once_cell::sync::OnceCell;
use sea_orm::{Database, DatabaseConnection};

use super::schema;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

fn sqlite_url(db_file: &str) -> anyhow::Result<String> {
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    Ok(format!("sqlite://{}{}?mode=rwc", prefix, normalized))
}

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/mes.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = sqlite_url(db_file)?;
    let conn = Database::connect(&db_url)
        .await
        .with_context(|| format!("Failed to open database {}", db_url))?;

    schema::bootstrap(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> anyhow::Result<&'static DatabaseConnection> {
    DB_CONN
        .get()
        .ok_or_else(|| anyhow::anyhow!("Database connection has not been initialized"))
}

/// Fresh in-memory database with the schema applied.
///
/// A single pooled connection keeps every query on the same memory database.
#[cfg(test)]
pub async fn memory_connection() -> anyhow::Result<DatabaseConnection> {
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let conn = Database::connect(options).await?;
    schema::bootstrap(&conn).await?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_url_for_absolute_path() {
        assert_eq!(
            sqlite_url("/var/lib/mes.db").unwrap(),
            "sqlite:///var/lib/mes.db?mode=rwc"
        );
    }
}
