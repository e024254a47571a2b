use anyhow::Result;
use contracts::system::users::SystemProgram;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

/// Every program with its permissions, ordered by program name.
pub async fn list_programs<C: ConnectionTrait>(conn: &C) -> Result<Vec<SystemProgram>> {
    let rows = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT prg_name, permission FROM mes_system_program ORDER BY prg_name, permission"
                .to_string(),
        ))
        .await?;

    let mut programs: Vec<SystemProgram> = Vec::new();
    for row in rows {
        let name: String = row.try_get("", "prg_name")?;
        let permission: String = row.try_get("", "permission")?;
        match programs.last_mut() {
            Some(last) if last.name == name => last.permissions.push(permission),
            _ => programs.push(SystemProgram {
                name,
                permissions: vec![permission],
            }),
        }
    }
    Ok(programs)
}

/// Distinct permission names, optionally limited to one program.
pub async fn list_permissions<C: ConnectionTrait>(
    conn: &C,
    prg_name: Option<&str>,
) -> Result<Vec<String>> {
    let statement = match prg_name {
        Some(name) => Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT DISTINCT permission FROM mes_system_program WHERE prg_name = ? ORDER BY permission",
            [name.into()],
        ),
        None => Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT DISTINCT permission FROM mes_system_program ORDER BY permission".to_string(),
        ),
    };

    let rows = conn.query_all(statement).await?;
    rows.iter()
        .map(|row| row.try_get::<String>("", "permission").map_err(Into::into))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::{db::memory_connection, seed::seed_demo};

    #[tokio::test]
    async fn test_programs_grouped_by_name() {
        let conn = memory_connection().await.unwrap();
        seed_demo(&conn).await.unwrap();

        let programs = list_programs(&conn).await.unwrap();
        let names: Vec<&str> = programs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["AMBIT_WIP", "PMS", "USER_ADMIN"]);
        assert_eq!(programs[0].permissions, vec!["EXPORT".to_string(), "VIEW".to_string()]);
    }

    #[tokio::test]
    async fn test_permissions_filter() {
        let conn = memory_connection().await.unwrap();
        seed_demo(&conn).await.unwrap();

        let all = list_permissions(&conn, None).await.unwrap();
        assert!(all.contains(&"CLOSE_MO".to_string()));
        assert_eq!(all.iter().filter(|p| *p == "VIEW").count(), 1);

        let wip = list_permissions(&conn, Some("AMBIT_WIP")).await.unwrap();
        assert_eq!(wip, vec!["EXPORT".to_string(), "VIEW".to_string()]);
    }
}
