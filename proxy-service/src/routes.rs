//! 代理服务路由模块

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{execute_query, health_check, list_tables, test_connection};
use crate::state::AppState;

/// 创建代理路由
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/test-connection", post(test_connection))
        .route("/api/list-tables", post(list_tables))
        .route("/api/query", post(execute_query))
        .route("/api/health", get(health_check))
}
