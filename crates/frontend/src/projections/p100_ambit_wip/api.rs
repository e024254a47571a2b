use contracts::projections::p100_ambit_wip::{
    LinkQty, MoQtyRequest, MoRow, NotInputQty, NotLinkQty, TransferMoQty, WipCount,
    WipCountsRequest, WipDetailRequest, WipGroupDef, WipQuery, WipUnit,
};
use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::shared::api_utils::{api_url, send_json};

async fn get_list(path: &str, action: &str) -> Result<Vec<String>, String> {
    let request = Request::get(&api_url(path))
        .build()
        .map_err(|e| format!("Failed to build request: {}", e))?;
    send_json(request, action).await
}

async fn post<B: Serialize, T: DeserializeOwned>(
    path: &str,
    body: &B,
    action: &str,
) -> Result<T, String> {
    let request = Request::post(&api_url(path))
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?;
    send_json(request, action).await
}

// Distinct-value lookups for the filter bar

pub async fn fetch_mo_types() -> Result<Vec<String>, String> {
    get_list("/api/pms/motype-distinct", "fetch MO types").await
}

pub async fn fetch_model_names() -> Result<Vec<String>, String> {
    get_list("/api/products/distinct", "fetch model names").await
}

/// Online MOs of a model; `ALL` returns every online MO.
pub async fn fetch_online_mos(model_name: &str) -> Result<Vec<String>, String> {
    let path = format!(
        "/api/pms/mo-online-by-model-name-distinct/{}",
        String::from(js_sys::encode_uri_component(model_name))
    );
    get_list(&path, "fetch MO numbers").await
}

pub async fn fetch_lines() -> Result<Vec<String>, String> {
    get_list("/api/lines/distinct", "fetch lines").await
}

pub async fn fetch_sections() -> Result<Vec<String>, String> {
    get_list("/api/sections/distinct", "fetch sections").await
}

// Query chain

pub async fn query_mos(query: &WipQuery) -> Result<Vec<MoRow>, String> {
    post("/api/ambitwip/query-mos", query, "query MOs").await
}

pub async fn query_wips(query: &WipQuery) -> Result<Vec<WipGroupDef>, String> {
    post("/api/ambitwip/query-wips", query, "query WIP groups").await
}

pub async fn query_not_input_qty(req: &MoQtyRequest) -> Result<Vec<NotInputQty>, String> {
    post("/api/ambitwip/query-mo-notinput-qty", req, "query not-input qty").await
}

pub async fn query_link_qty(req: &MoQtyRequest) -> Result<Vec<LinkQty>, String> {
    post("/api/ambitwip/query-mo-link-qty", req, "query link qty").await
}

pub async fn query_not_link_qty(req: &MoQtyRequest) -> Result<Vec<NotLinkQty>, String> {
    post("/api/ambitwip/query-mo-notlink-qty", req, "query not-link qty").await
}

pub async fn query_transfer_qty(req: &MoQtyRequest) -> Result<Vec<TransferMoQty>, String> {
    post("/api/ambitwip/query-transfer-mo-qty", req, "query transfer MO qty").await
}

pub async fn query_wip_counts(req: &WipCountsRequest) -> Result<Vec<WipCount>, String> {
    post("/api/ambitwip/query-wips-by-mos", req, "query WIP counts").await
}

pub async fn query_wip_detail(req: &WipDetailRequest) -> Result<Vec<WipUnit>, String> {
    post("/api/ambitwip/query-wip-detail", req, "query WIP detail").await
}
