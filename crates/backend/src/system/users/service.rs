use anyhow::Result;
use contracts::system::users::{
    validate_user, ImportKind, ImportResult, PagedUsers, UserListQuery, UserRecord,
};
use sea_orm::ConnectionTrait;

use super::{import, repository};
use crate::shared::error::ApiError;

fn bad_request(message: impl Into<String>) -> anyhow::Error {
    ApiError::BadRequest(message.into()).into()
}

fn not_found(emp_no: &str) -> anyhow::Error {
    ApiError::NotFound(format!("User {} not found", emp_no)).into()
}

fn normalized(mut user: UserRecord) -> UserRecord {
    user.emp_no = user.emp_no.trim().to_string();
    user.emp_name = user.emp_name.trim().to_string();
    user
}

fn check(user: &UserRecord) -> Result<()> {
    validate_user(user).map_err(|errors| bad_request(errors.join("; ")))
}

pub async fn list<C: ConnectionTrait>(conn: &C, query: &UserListQuery) -> Result<PagedUsers> {
    let (items, total_count) = repository::list(conn, query).await?;
    Ok(PagedUsers { total_count, items })
}

pub async fn get<C: ConnectionTrait>(conn: &C, emp_no: &str) -> Result<UserRecord> {
    repository::get_by_emp_no(conn, emp_no)
        .await?
        .ok_or_else(|| not_found(emp_no))
}

/// Create a new user
pub async fn create<C: ConnectionTrait>(conn: &C, user: UserRecord) -> Result<UserRecord> {
    let user = normalized(user);
    check(&user)?;

    if repository::get_by_emp_no(conn, &user.emp_no).await?.is_some() {
        return Err(bad_request(format!("User {} already exists", user.emp_no)));
    }

    repository::insert(conn, &user).await?;
    tracing::info!("Created user {}", user.emp_no);
    Ok(user)
}

/// Update user
pub async fn update<C: ConnectionTrait>(conn: &C, user: UserRecord) -> Result<UserRecord> {
    let user = normalized(user);
    check(&user)?;

    if !repository::update(conn, &user).await? {
        return Err(not_found(&user.emp_no));
    }
    tracing::info!("Updated user {}", user.emp_no);
    Ok(user)
}

pub async fn delete<C: ConnectionTrait>(conn: &C, emp_no: &str) -> Result<()> {
    if !repository::delete(conn, emp_no).await? {
        return Err(not_found(emp_no));
    }
    tracing::info!("Deleted user {}", emp_no);
    Ok(())
}

/// Apply an uploaded CSV sheet.
///
/// User sheets upsert by `emp_no` and keep roles, programs and stations of
/// existing users; owner sheets only touch `owner` of users that exist.
pub async fn import<C: ConnectionTrait>(
    conn: &C,
    kind: ImportKind,
    csv_text: &str,
) -> Result<ImportResult> {
    let mut result = ImportResult::default();

    match kind {
        ImportKind::User => {
            let rows = import::parse_users(csv_text).map_err(|e| bad_request(e.to_string()))?;
            for (line, parsed) in rows {
                let user = match parsed {
                    Ok(user) => user,
                    Err(e) => {
                        result.skipped += 1;
                        result.errors.push(format!("Row {}: {}", line, e));
                        continue;
                    }
                };
                match repository::get_by_emp_no(conn, &user.emp_no).await? {
                    Some(existing) => {
                        let merged = UserRecord {
                            roles: existing.roles,
                            system_programs: existing.system_programs,
                            stations: existing.stations,
                            emp_pass: user.emp_pass.or(existing.emp_pass),
                            emp_bc: user.emp_bc.or(existing.emp_bc),
                            emp_pwd_pass: user.emp_pwd_pass.or(existing.emp_pwd_pass),
                            owner: user.owner.or(existing.owner),
                            ..user
                        };
                        repository::update(conn, &merged).await?;
                        result.updated += 1;
                    }
                    None => {
                        repository::insert(conn, &user).await?;
                        result.inserted += 1;
                    }
                }
            }
        }
        ImportKind::Owner => {
            let rows = import::parse_owners(csv_text).map_err(|e| bad_request(e.to_string()))?;
            for (line, parsed) in rows {
                match parsed {
                    Ok(row) => {
                        if repository::set_owner(conn, &row.emp_no, &row.owner).await? {
                            result.updated += 1;
                        } else {
                            result.skipped += 1;
                            result
                                .errors
                                .push(format!("Row {}: unknown emp_no {}", line, row.emp_no));
                        }
                    }
                    Err(e) => {
                        result.skipped += 1;
                        result.errors.push(format!("Row {}: {}", line, e));
                    }
                }
            }
        }
    }

    tracing::info!(
        "Import {:?}: {} inserted, {} updated, {} skipped",
        kind,
        result.inserted,
        result.updated,
        result.skipped
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::memory_connection;
    use axum::http::StatusCode;

    fn user(emp_no: &str) -> UserRecord {
        UserRecord {
            emp_no: emp_no.into(),
            emp_name: "Worker".into(),
            emp_pass: Some("Passw0rd!".into()),
            emp_bc: Some("Barc0de#".into()),
            ..UserRecord::default()
        }
    }

    fn status(err: anyhow::Error) -> StatusCode {
        ApiError::from(err).status()
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_and_duplicate() {
        let conn = memory_connection().await.unwrap();

        let weak = UserRecord {
            emp_pass: Some("password".into()),
            ..user("E001")
        };
        let err = create(&conn, weak).await.unwrap_err();
        assert_eq!(status(err), StatusCode::BAD_REQUEST);

        create(&conn, user(" E001 ")).await.unwrap();
        let err = create(&conn, user("E001")).await.unwrap_err();
        assert_eq!(status(err), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let conn = memory_connection().await.unwrap();
        assert_eq!(status(get(&conn, "E404").await.unwrap_err()), StatusCode::NOT_FOUND);
        assert_eq!(status(update(&conn, user("E404")).await.unwrap_err()), StatusCode::NOT_FOUND);
        assert_eq!(status(delete(&conn, "E404").await.unwrap_err()), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_user_import_upserts_and_keeps_roles() {
        let conn = memory_connection().await.unwrap();
        let existing = UserRecord {
            roles: vec!["Administrator".into()],
            ..user("E001")
        };
        create(&conn, existing).await.unwrap();

        let csv = "emp_no,emp_name,dept_name\nE001,Alice,QA\nE002,Bob,PD\n,Nobody,PD\n";
        let result = import(&conn, ImportKind::User, csv).await.unwrap();
        assert_eq!((result.inserted, result.updated, result.skipped), (1, 1, 1));
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("Row 4:"));

        let alice = get(&conn, "E001").await.unwrap();
        assert_eq!(alice.emp_name, "Alice");
        assert_eq!(alice.dept_name.as_deref(), Some("QA"));
        assert_eq!(alice.roles, vec!["Administrator".to_string()]);
        assert_eq!(alice.emp_pass.as_deref(), Some("Passw0rd!"));
    }

    #[tokio::test]
    async fn test_owner_import_reports_unknown_users() {
        let conn = memory_connection().await.unwrap();
        create(&conn, user("E001")).await.unwrap();

        let csv = "emp_no,owner\nE001,E900\nE404,E900\n";
        let result = import(&conn, ImportKind::Owner, csv).await.unwrap();
        assert_eq!(result.updated, 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.errors, vec!["Row 3: unknown emp_no E404".to_string()]);

        let owned = get(&conn, "E001").await.unwrap();
        assert_eq!(owned.owner.as_deref(), Some("E900"));
    }

    #[tokio::test]
    async fn test_import_with_bad_header_is_bad_request() {
        let conn = memory_connection().await.unwrap();
        let err = import(&conn, ImportKind::Owner, "emp_no\nE001\n").await.unwrap_err();
        assert_eq!(status(err), StatusCode::BAD_REQUEST);
    }
}
