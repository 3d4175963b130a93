//! 查询代理服务
//!
//! 浏览器与 PostgreSQL 之间的无状态代理：
//! - 连接测试
//! - 列出用户表
//! - 原样执行任意 SQL
//!
//! 每个请求独立建立并关闭一个数据库连接，不使用连接池。

pub mod connector;
pub mod handlers;
pub mod routes;
pub mod rows;
pub mod service;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

use axum::{middleware, routing::get, Json, Router};
use common::middleware::request_id::request_id_middleware;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub use state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "查询代理 API",
        version = "0.1.0",
        description = "数据库浏览器的查询代理微服务"
    ),
    paths(
        handlers::test_connection,
        handlers::list_tables,
        handlers::execute_query,
        handlers::health_check,
    ),
    components(schemas(
        common::models::ConnectionParameters,
        common::models::QueryRequest,
        common::models::QueryResult,
        common::models::TableDescriptor,
        common::models::TablesPayload,
        common::response::SuccessBody,
        common::response::FailureBody,
        handlers::HealthResponse,
    )),
    tags(
        (name = "proxy", description = "连接测试、表列表与查询端点"),
        (name = "health", description = "健康检查端点")
    )
)]
pub struct ApiDoc;

/// 组装完整的应用路由
///
/// CORS 对任意来源开放，浏览器页面通常与服务不同源。
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::router())
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
