use anyhow::Context;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

/// Tables of the MES read model; created on startup when missing.
const TABLES: &[(&str, &str)] = &[
    (
        "mes_mo",
        r#"
        CREATE TABLE IF NOT EXISTS mes_mo (
            mo_number TEXT PRIMARY KEY NOT NULL,
            mo_type TEXT NOT NULL DEFAULT '',
            model_name TEXT NOT NULL,
            target_qty INTEGER NOT NULL DEFAULT 0,
            device_config TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT '2'
        );
        "#,
    ),
    (
        "mes_mo_line",
        r#"
        CREATE TABLE IF NOT EXISTS mes_mo_line (
            mo_number TEXT NOT NULL,
            line_name TEXT NOT NULL,
            target_qty INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (mo_number, line_name)
        );
        "#,
    ),
    (
        "mes_wip_step",
        r#"
        CREATE TABLE IF NOT EXISTS mes_wip_step (
            wip_group TEXT PRIMARY KEY NOT NULL,
            step_sequence INTEGER NOT NULL,
            section_name TEXT NOT NULL DEFAULT ''
        );
        "#,
    ),
    (
        "mes_wip_unit",
        r#"
        CREATE TABLE IF NOT EXISTS mes_wip_unit (
            serial_number TEXT PRIMARY KEY NOT NULL,
            mo_number TEXT NOT NULL,
            line_name TEXT NOT NULL,
            wip_group TEXT NOT NULL,
            station_name TEXT NOT NULL DEFAULT '',
            in_station_time TEXT NOT NULL DEFAULT '',
            is_input INTEGER NOT NULL DEFAULT 0,
            is_linked INTEGER NOT NULL DEFAULT 0,
            transfer_mo_number TEXT
        );
        "#,
    ),
    (
        "mes_users",
        r#"
        CREATE TABLE IF NOT EXISTS mes_users (
            emp_no TEXT PRIMARY KEY NOT NULL,
            emp_name TEXT NOT NULL,
            emp_rank TEXT,
            class_name TEXT,
            station_name TEXT,
            emp_pass TEXT,
            emp_bc TEXT,
            emp_pwd_pass TEXT,
            email TEXT,
            dept_name TEXT,
            owner TEXT,
            quit_date TEXT,
            roles TEXT NOT NULL DEFAULT '[]',
            system_programs TEXT NOT NULL DEFAULT '[]',
            stations TEXT NOT NULL DEFAULT '[]'
        );
        "#,
    ),
    (
        "mes_system_program",
        r#"
        CREATE TABLE IF NOT EXISTS mes_system_program (
            prg_name TEXT NOT NULL,
            permission TEXT NOT NULL,
            PRIMARY KEY (prg_name, permission)
        );
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_mes_wip_unit_mo ON mes_wip_unit (mo_number, line_name);",
    "CREATE INDEX IF NOT EXISTS idx_mes_wip_unit_group ON mes_wip_unit (wip_group);",
];

pub async fn bootstrap<C: ConnectionTrait>(conn: &C) -> anyhow::Result<()> {
    for (name, sql) in TABLES {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await
            .with_context(|| format!("Failed to create table {}", name))?;
    }
    for sql in INDEXES {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await
            .context("Failed to create index")?;
    }
    tracing::info!("Database schema ready ({} tables)", TABLES.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::shared::data::db::memory_connection;
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let conn = memory_connection().await.unwrap();
        super::bootstrap(&conn).await.unwrap();

        let rows = conn
            .query_all(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type='table' AND name LIKE 'mes_%'".to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(rows.len(), super::TABLES.len());
    }
}
