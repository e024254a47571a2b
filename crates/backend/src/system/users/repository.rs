use anyhow::{Context, Result};
use contracts::system::users::{SystemProgram, UserListQuery, UserRecord};
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement, Value};

const USER_COLUMNS: &str = "emp_no, emp_name, emp_rank, class_name, station_name, emp_pass, emp_bc, \
     emp_pwd_pass, email, dept_name, owner, quit_date, roles, system_programs, stations";

fn json_list<T: serde::de::DeserializeOwned>(row: &QueryResult, column: &str) -> Result<Vec<T>> {
    let raw: Option<String> = row.try_get("", column)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text)
            .with_context(|| format!("Invalid JSON in mes_users.{}", column)),
    }
}

fn row_to_user(row: &QueryResult) -> Result<UserRecord> {
    Ok(UserRecord {
        emp_no: row.try_get("", "emp_no")?,
        emp_name: row.try_get("", "emp_name")?,
        emp_rank: row.try_get("", "emp_rank")?,
        class_name: row.try_get("", "class_name")?,
        station_name: row.try_get("", "station_name")?,
        emp_pass: row.try_get("", "emp_pass")?,
        emp_bc: row.try_get("", "emp_bc")?,
        emp_pwd_pass: row.try_get("", "emp_pwd_pass")?,
        email: row.try_get("", "email")?,
        dept_name: row.try_get("", "dept_name")?,
        owner: row.try_get("", "owner")?,
        quit_date: row.try_get("", "quit_date")?,
        roles: json_list(row, "roles")?,
        system_programs: json_list::<SystemProgram>(row, "system_programs")?,
        stations: json_list(row, "stations")?,
    })
}

fn user_values(user: &UserRecord) -> Result<Vec<Value>> {
    Ok(vec![
        user.emp_name.clone().into(),
        user.emp_rank.clone().into(),
        user.class_name.clone().into(),
        user.station_name.clone().into(),
        user.emp_pass.clone().into(),
        user.emp_bc.clone().into(),
        user.emp_pwd_pass.clone().into(),
        user.email.clone().into(),
        user.dept_name.clone().into(),
        user.owner.clone().into(),
        user.quit_date.clone().into(),
        serde_json::to_string(&user.roles)?.into(),
        serde_json::to_string(&user.system_programs)?.into(),
        serde_json::to_string(&user.stations)?.into(),
    ])
}

/// `LIKE` pattern matching `username` literally, wildcards escaped with a backslash.
fn filter_pattern(username: &str) -> String {
    let mut pattern = String::from("%");
    for ch in username.trim().to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Page of users whose number or name contains `query.username`, plus the total match count.
pub async fn list<C: ConnectionTrait>(
    conn: &C,
    query: &UserListQuery,
) -> Result<(Vec<UserRecord>, u64)> {
    let pattern = filter_pattern(&query.username);
    let where_clause =
        "WHERE lower(emp_no) LIKE ? ESCAPE '\\' OR lower(emp_name) LIKE ? ESCAPE '\\'";

    let count_row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &format!("SELECT COUNT(*) AS cnt FROM mes_users {}", where_clause),
            [pattern.clone().into(), pattern.clone().into()],
        ))
        .await?;
    let total: i64 = match count_row {
        Some(row) => row.try_get("", "cnt")?,
        None => 0,
    };

    let rows = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &format!(
                "SELECT {} FROM mes_users {} ORDER BY emp_no LIMIT ? OFFSET ?",
                USER_COLUMNS, where_clause
            ),
            [
                pattern.clone().into(),
                pattern.into(),
                (query.effective_page_size() as i64).into(),
                (query.offset() as i64).into(),
            ],
        ))
        .await
        .context("Failed to list users")?;

    let users = rows.iter().map(row_to_user).collect::<Result<Vec<_>>>()?;
    Ok((users, total.max(0) as u64))
}

pub async fn get_by_emp_no<C: ConnectionTrait>(conn: &C, emp_no: &str) -> Result<Option<UserRecord>> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &format!("SELECT {} FROM mes_users WHERE emp_no = ?", USER_COLUMNS),
            [emp_no.into()],
        ))
        .await?;
    row.as_ref().map(row_to_user).transpose()
}

pub async fn insert<C: ConnectionTrait>(conn: &C, user: &UserRecord) -> Result<()> {
    let mut values: Vec<Value> = vec![user.emp_no.clone().into()];
    values.extend(user_values(user)?);

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        &format!(
            "INSERT INTO mes_users ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            USER_COLUMNS
        ),
        values,
    ))
    .await
    .context("Failed to insert user")?;
    Ok(())
}

/// Returns whether a row was updated.
pub async fn update<C: ConnectionTrait>(conn: &C, user: &UserRecord) -> Result<bool> {
    let mut values = user_values(user)?;
    values.push(user.emp_no.clone().into());

    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE mes_users
             SET emp_name = ?, emp_rank = ?, class_name = ?, station_name = ?, emp_pass = ?,
                 emp_bc = ?, emp_pwd_pass = ?, email = ?, dept_name = ?, owner = ?, quit_date = ?,
                 roles = ?, system_programs = ?, stations = ?
             WHERE emp_no = ?",
            values,
        ))
        .await
        .context("Failed to update user")?;
    Ok(result.rows_affected() > 0)
}

pub async fn set_owner<C: ConnectionTrait>(conn: &C, emp_no: &str, owner: &str) -> Result<bool> {
    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE mes_users SET owner = ? WHERE emp_no = ?",
            [owner.into(), emp_no.into()],
        ))
        .await
        .context("Failed to update owner")?;
    Ok(result.rows_affected() > 0)
}

/// Delete user (hard delete)
pub async fn delete<C: ConnectionTrait>(conn: &C, emp_no: &str) -> Result<bool> {
    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "DELETE FROM mes_users WHERE emp_no = ?",
            [emp_no.into()],
        ))
        .await
        .context("Failed to delete user")?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::memory_connection;

    fn user(emp_no: &str, emp_name: &str) -> UserRecord {
        UserRecord {
            emp_no: emp_no.into(),
            emp_name: emp_name.into(),
            emp_pass: Some("Passw0rd!".into()),
            emp_bc: Some("Barc0de#".into()),
            roles: vec!["Operator".into()],
            system_programs: vec![SystemProgram {
                name: "AMBIT_WIP".into(),
                permissions: vec!["VIEW".into()],
            }],
            ..UserRecord::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let conn = memory_connection().await.unwrap();
        insert(&conn, &user("E001", "Alice")).await.unwrap();

        let loaded = get_by_emp_no(&conn, "E001").await.unwrap().unwrap();
        assert_eq!(loaded, user("E001", "Alice"));
        assert!(get_by_emp_no(&conn, "E404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_and_pages() {
        let conn = memory_connection().await.unwrap();
        for n in 0..20 {
            insert(&conn, &user(&format!("E{:03}", n), &format!("Worker {}", n)))
                .await
                .unwrap();
        }
        insert(&conn, &user("X999", "Bob Smith")).await.unwrap();

        let first = UserListQuery::default();
        let (items, total) = list(&conn, &first).await.unwrap();
        assert_eq!(total, 21);
        assert_eq!(items.len(), 15);
        assert_eq!(items[0].emp_no, "E000");

        let second = UserListQuery {
            page_number: 1,
            ..UserListQuery::default()
        };
        let (items, _) = list(&conn, &second).await.unwrap();
        assert_eq!(items.len(), 6);

        let by_name = UserListQuery {
            username: "SMITH".into(),
            ..UserListQuery::default()
        };
        let (items, total) = list(&conn, &by_name).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].emp_no, "X999");
    }

    #[test]
    fn test_filter_pattern_escapes_wildcards() {
        assert_eq!(filter_pattern(" Smith "), "%smith%");
        assert_eq!(filter_pattern("a_b%"), "%a\\_b\\%%");
        assert_eq!(filter_pattern("a\\b"), "%a\\\\b%");
    }

    #[tokio::test]
    async fn test_list_treats_wildcards_literally() {
        let conn = memory_connection().await.unwrap();
        insert(&conn, &user("E001", "axb")).await.unwrap();
        insert(&conn, &user("E002", "a_b")).await.unwrap();
        insert(&conn, &user("E003", "100% done")).await.unwrap();

        let underscore = UserListQuery {
            username: "a_b".into(),
            ..UserListQuery::default()
        };
        let (items, total) = list(&conn, &underscore).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].emp_no, "E002");

        let percent = UserListQuery {
            username: "0%".into(),
            ..UserListQuery::default()
        };
        let (items, total) = list(&conn, &percent).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].emp_no, "E003");
    }

    #[tokio::test]
    async fn test_list_huge_page_number_is_empty() {
        let conn = memory_connection().await.unwrap();
        for n in 0..3 {
            insert(&conn, &user(&format!("E{:03}", n), "Worker")).await.unwrap();
        }

        let far = UserListQuery {
            page_number: 1_229_782_938_247_303_442,
            ..UserListQuery::default()
        };
        let (items, total) = list(&conn, &far).await.unwrap();
        assert_eq!(total, 3);
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_update_owner_and_delete() {
        let conn = memory_connection().await.unwrap();
        insert(&conn, &user("E001", "Alice")).await.unwrap();

        let mut changed = user("E001", "Alice B.");
        changed.roles.push("Administrator".into());
        assert!(update(&conn, &changed).await.unwrap());
        assert!(set_owner(&conn, "E001", "E900").await.unwrap());
        assert!(!set_owner(&conn, "E404", "E900").await.unwrap());

        let loaded = get_by_emp_no(&conn, "E001").await.unwrap().unwrap();
        assert_eq!(loaded.emp_name, "Alice B.");
        assert_eq!(loaded.roles, vec!["Operator".to_string(), "Administrator".to_string()]);
        assert_eq!(loaded.owner.as_deref(), Some("E900"));

        assert!(delete(&conn, "E001").await.unwrap());
        assert!(!delete(&conn, "E001").await.unwrap());
    }
}
