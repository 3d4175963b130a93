//! 数据库浏览器公共模块
//!
//! 代理服务与浏览器客户端共享的部分：
//! - 请求/响应模型（连接参数、表描述、查询结果）
//! - 统一的 `{success, error}` 响应信封
//! - 错误类型与配置加载
//! - 请求 ID 中间件与日志初始化

pub mod config;
pub mod errors;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod response;

pub use errors::{AppError, AppResult};
