use axum::extract::Path;
use axum::Json;
use contracts::projections::p100_ambit_wip::{
    LinkQty, MoQtyRequest, MoRow, NotInputQty, NotLinkQty, TransferMoQty, WipCount,
    WipCountsRequest, WipDetailRequest, WipGroupDef, WipQuery, WipUnit,
};

use crate::projections::p100_ambit_wip::{repository, service};
use crate::shared::data::db::get_connection;
use crate::shared::error::ApiResult;

/// GET /api/pms/motype-distinct
pub async fn mo_types() -> ApiResult<Json<Vec<String>>> {
    Ok(Json(repository::distinct_mo_types(get_connection()?).await?))
}

/// GET /api/products/distinct
pub async fn products() -> ApiResult<Json<Vec<String>>> {
    Ok(Json(repository::distinct_models(get_connection()?).await?))
}

/// GET /api/pms/mo-online-by-model-name-distinct/:model_name
pub async fn online_mos(Path(model_name): Path<String>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(
        repository::online_mos_by_model(get_connection()?, &model_name).await?,
    ))
}

/// GET /api/lines/distinct
pub async fn lines() -> ApiResult<Json<Vec<String>>> {
    Ok(Json(repository::distinct_lines(get_connection()?).await?))
}

/// GET /api/sections/distinct
pub async fn sections() -> ApiResult<Json<Vec<String>>> {
    Ok(Json(repository::distinct_sections(get_connection()?).await?))
}

/// POST /api/ambitwip/query-mos
pub async fn query_mos(Json(query): Json<WipQuery>) -> ApiResult<Json<Vec<MoRow>>> {
    Ok(Json(service::query_mos(get_connection()?, &query).await?))
}

/// POST /api/ambitwip/query-wips
pub async fn query_wips(Json(query): Json<WipQuery>) -> ApiResult<Json<Vec<WipGroupDef>>> {
    Ok(Json(service::query_wips(get_connection()?, &query).await?))
}

/// POST /api/ambitwip/query-mo-notinput-qty
pub async fn not_input_qty(Json(req): Json<MoQtyRequest>) -> ApiResult<Json<Vec<NotInputQty>>> {
    Ok(Json(service::not_input_qty(get_connection()?, &req).await?))
}

/// POST /api/ambitwip/query-transfer-mo-qty
pub async fn transfer_qty(Json(req): Json<MoQtyRequest>) -> ApiResult<Json<Vec<TransferMoQty>>> {
    Ok(Json(service::transfer_qty(get_connection()?, &req).await?))
}

/// POST /api/ambitwip/query-mo-link-qty
pub async fn link_qty(Json(req): Json<MoQtyRequest>) -> ApiResult<Json<Vec<LinkQty>>> {
    Ok(Json(service::link_qty(get_connection()?, &req).await?))
}

/// POST /api/ambitwip/query-mo-notlink-qty
pub async fn not_link_qty(Json(req): Json<MoQtyRequest>) -> ApiResult<Json<Vec<NotLinkQty>>> {
    Ok(Json(service::not_link_qty(get_connection()?, &req).await?))
}

/// POST /api/ambitwip/query-wips-by-mos
pub async fn wip_counts(Json(req): Json<WipCountsRequest>) -> ApiResult<Json<Vec<WipCount>>> {
    Ok(Json(service::wip_counts(get_connection()?, &req).await?))
}

/// POST /api/ambitwip/query-wip-detail
pub async fn wip_detail(Json(req): Json<WipDetailRequest>) -> ApiResult<Json<Vec<WipUnit>>> {
    Ok(Json(service::wip_detail(get_connection()?, &req).await?))
}
