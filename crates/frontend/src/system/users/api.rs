use contracts::system::users::{
    ImportKind, ImportResult, PagedUsers, SystemProgram, UserListQuery, UserRecord,
};
use gloo_net::http::Request;

use crate::shared::api_utils::{api_url, error_message, send_json};

fn encode(value: &str) -> String {
    String::from(js_sys::encode_uri_component(value))
}

/// Fetch one page of users
pub async fn fetch_users(query: &UserListQuery) -> Result<PagedUsers, String> {
    let qs = serde_qs::to_string(query).map_err(|e| format!("Failed to encode query: {}", e))?;
    let request = Request::get(&api_url(&format!("/api/users?{}", qs)))
        .build()
        .map_err(|e| format!("Failed to build request: {}", e))?;
    send_json(request, "fetch users").await
}

pub async fn fetch_user(emp_no: &str) -> Result<UserRecord, String> {
    let path = format!("/api/users/get-user-by-username/{}", encode(emp_no));
    let request = Request::get(&api_url(&path))
        .build()
        .map_err(|e| format!("Failed to build request: {}", e))?;
    send_json(request, "fetch user").await
}

pub async fn create_user(user: &UserRecord) -> Result<UserRecord, String> {
    let request = Request::post(&api_url("/api/users"))
        .json(user)
        .map_err(|e| format!("Failed to serialize request: {}", e))?;
    send_json(request, "create user").await
}

pub async fn update_user(user: &UserRecord) -> Result<UserRecord, String> {
    let request = Request::put(&api_url("/api/users"))
        .json(user)
        .map_err(|e| format!("Failed to serialize request: {}", e))?;
    send_json(request, "update user").await
}

pub async fn delete_user(emp_no: &str) -> Result<(), String> {
    let response = Request::delete(&api_url(&format!("/api/users/{}", encode(emp_no))))
        .send()
        .await
        .map_err(|e| format!("Failed to delete user: {}", e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }
    Ok(())
}

/// Upload a CSV file as the multipart field `file`
pub async fn import_file(kind: ImportKind, file: web_sys::File) -> Result<ImportResult, String> {
    let form_data = web_sys::FormData::new().map_err(|e| format!("{e:?}"))?;
    form_data
        .append_with_blob("file", &file)
        .map_err(|e| format!("{e:?}"))?;

    let path = format!("/api/users/import/{}", kind.path_segment());
    let request = Request::post(&api_url(&path))
        .body(form_data)
        .map_err(|e| format!("Failed to build request: {}", e))?;
    send_json(request, "import file").await
}

/// Every system program with its permissions
pub async fn fetch_system_programs() -> Result<Vec<SystemProgram>, String> {
    let request = Request::get(&api_url("/api/system-programs"))
        .build()
        .map_err(|e| format!("Failed to build request: {}", e))?;
    send_json(request, "fetch system programs").await
}
