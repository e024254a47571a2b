use axum::extract::Query;
use axum::Json;
use contracts::system::users::SystemProgram;
use serde::Deserialize;

use crate::shared::data::db::get_connection;
use crate::shared::error::ApiResult;
use crate::system::system_programs::repository;

#[derive(Debug, Deserialize)]
pub struct PermissionFilter {
    #[serde(default)]
    pub prg_name: String,
}

/// GET /api/system-programs
pub async fn list() -> ApiResult<Json<Vec<SystemProgram>>> {
    Ok(Json(repository::list_programs(get_connection()?).await?))
}

/// GET /api/system-programs/permissions
pub async fn permissions() -> ApiResult<Json<Vec<String>>> {
    Ok(Json(repository::list_permissions(get_connection()?, None).await?))
}

/// GET /api/system-programs/permissions-filter?prg_name=
pub async fn permissions_filter(
    Query(filter): Query<PermissionFilter>,
) -> ApiResult<Json<Vec<String>>> {
    let name = filter.prg_name.trim();
    let prg_name = (!name.is_empty()).then_some(name);
    Ok(Json(repository::list_permissions(get_connection()?, prg_name).await?))
}
