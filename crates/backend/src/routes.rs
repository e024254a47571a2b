use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::api::handlers::p100_ambit_wip;
use crate::system::handlers::{system_programs, users};

/// All application routes
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // LOOKUPS
        // ========================================
        .route("/api/pms/motype-distinct", get(p100_ambit_wip::mo_types))
        .route("/api/products/distinct", get(p100_ambit_wip::products))
        .route(
            "/api/pms/mo-online-by-model-name-distinct/:model_name",
            get(p100_ambit_wip::online_mos),
        )
        .route("/api/lines/distinct", get(p100_ambit_wip::lines))
        .route("/api/sections/distinct", get(p100_ambit_wip::sections))
        // ========================================
        // P100 AMBIT WIP
        // ========================================
        .route("/api/ambitwip/query-mos", post(p100_ambit_wip::query_mos))
        .route("/api/ambitwip/query-wips", post(p100_ambit_wip::query_wips))
        .route(
            "/api/ambitwip/query-mo-notinput-qty",
            post(p100_ambit_wip::not_input_qty),
        )
        .route(
            "/api/ambitwip/query-transfer-mo-qty",
            post(p100_ambit_wip::transfer_qty),
        )
        .route(
            "/api/ambitwip/query-mo-link-qty",
            post(p100_ambit_wip::link_qty),
        )
        .route(
            "/api/ambitwip/query-mo-notlink-qty",
            post(p100_ambit_wip::not_link_qty),
        )
        .route(
            "/api/ambitwip/query-wips-by-mos",
            post(p100_ambit_wip::wip_counts),
        )
        .route(
            "/api/ambitwip/query-wip-detail",
            post(p100_ambit_wip::wip_detail),
        )
        // ========================================
        // USERS
        // ========================================
        .route(
            "/api/users",
            get(users::list).post(users::create).put(users::update),
        )
        .route(
            "/api/users/get-user-by-username/:emp_no",
            get(users::get_by_emp_no),
        )
        .route("/api/users/:emp_no", delete(users::delete))
        .route("/api/users/import/user", post(users::import_users))
        .route("/api/users/import/owner", post(users::import_owners))
        // ========================================
        // SYSTEM PROGRAMS
        // ========================================
        .route("/api/system-programs", get(system_programs::list))
        .route(
            "/api/system-programs/permissions",
            get(system_programs::permissions),
        )
        .route(
            "/api/system-programs/permissions-filter",
            get(system_programs::permissions_filter),
        )
}
