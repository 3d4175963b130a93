//! Handler模块
//!
//! 每个请求都携带完整的连接参数，服务端不保存任何会话。

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use common::errors::AppError;
use common::models::{ConnectionParameters, QueryRequest, QueryResult, TablesPayload};
use common::response::ApiResponse;
use crate::state::AppState;

/// 测试数据库连接
#[utoipa::path(
    post,
    path = "/api/test-connection",
    tag = "proxy",
    request_body = ConnectionParameters,
    responses(
        (status = 200, description = "连接成功", body = common::response::SuccessBody),
        (status = 400, description = "连接失败，error 为驱动原文", body = common::response::FailureBody)
    )
)]
pub async fn test_connection(
    State(state): State<AppState>,
    payload: Result<Json<ConnectionParameters>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let Json(params) = payload?;
    state.service.test_connection(&params).await?;
    Ok(Json(ApiResponse::success()))
}

/// 列出用户表
#[utoipa::path(
    post,
    path = "/api/list-tables",
    tag = "proxy",
    request_body = ConnectionParameters,
    responses(
        (status = 200, description = "表列表，按 schema、表名排序", body = TablesPayload),
        (status = 400, description = "连接或查询失败", body = common::response::FailureBody)
    )
)]
pub async fn list_tables(
    State(state): State<AppState>,
    payload: Result<Json<ConnectionParameters>, JsonRejection>,
) -> Result<Json<ApiResponse<TablesPayload>>, AppError> {
    let Json(params) = payload?;
    let tables = state.service.list_tables(&params).await?;
    Ok(Json(ApiResponse::ok(TablesPayload { tables })))
}

/// 执行任意 SQL
#[utoipa::path(
    post,
    path = "/api/query",
    tag = "proxy",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "查询执行成功", body = QueryResult),
        (status = 400, description = "连接或执行失败", body = common::response::FailureBody)
    )
)]
pub async fn execute_query(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<QueryResult>>, AppError> {
    let Json(req) = payload?;
    let result = state.service.execute_query(&req.params, &req.query).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// 健康检查端点
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "服务运行正常", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// 健康检查响应
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// 服务状态
    pub status: String,
    /// 服务名称
    pub service: String,
    /// 服务版本
    pub version: String,
    /// 当前时间戳
    pub timestamp: DateTime<Utc>,
}
