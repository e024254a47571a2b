use axum::extract::{Multipart, Path, Query};
use axum::Json;
use contracts::system::users::{ImportKind, ImportResult, PagedUsers, UserListQuery, UserRecord};

use crate::shared::data::db::get_connection;
use crate::shared::error::{ApiError, ApiResult};
use crate::system::users::service;

/// GET /api/users?pageSize&pageNumber&username
pub async fn list(Query(query): Query<UserListQuery>) -> ApiResult<Json<PagedUsers>> {
    Ok(Json(service::list(get_connection()?, &query).await?))
}

/// GET /api/users/get-user-by-username/:emp_no
pub async fn get_by_emp_no(Path(emp_no): Path<String>) -> ApiResult<Json<UserRecord>> {
    Ok(Json(service::get(get_connection()?, &emp_no).await?))
}

/// POST /api/users
pub async fn create(Json(user): Json<UserRecord>) -> ApiResult<Json<UserRecord>> {
    Ok(Json(service::create(get_connection()?, user).await?))
}

/// PUT /api/users
pub async fn update(Json(user): Json<UserRecord>) -> ApiResult<Json<UserRecord>> {
    Ok(Json(service::update(get_connection()?, user).await?))
}

/// DELETE /api/users/:emp_no
pub async fn delete(Path(emp_no): Path<String>) -> ApiResult<Json<()>> {
    service::delete(get_connection()?, &emp_no).await?;
    Ok(Json(()))
}

async fn read_file_field(multipart: &mut Multipart) -> ApiResult<String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
        return String::from_utf8(bytes.to_vec())
            .map_err(|_| ApiError::BadRequest("Uploaded file is not UTF-8 CSV".to_string()));
    }
    Err(ApiError::BadRequest("Multipart field 'file' is missing".to_string()))
}

async fn import(kind: ImportKind, mut multipart: Multipart) -> ApiResult<Json<ImportResult>> {
    let text = read_file_field(&mut multipart).await?;
    Ok(Json(service::import(get_connection()?, kind, &text).await?))
}

/// POST /api/users/import/user
pub async fn import_users(multipart: Multipart) -> ApiResult<Json<ImportResult>> {
    import(ImportKind::User, multipart).await
}

/// POST /api/users/import/owner
pub async fn import_owners(multipart: Multipart) -> ApiResult<Json<ImportResult>> {
    import(ImportKind::Owner, multipart).await
}
