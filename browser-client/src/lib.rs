//! 数据库浏览器客户端
//!
//! 与查询代理服务对话的有状态客户端：
//! - 连接表单或连接字符串
//! - 表列表与表数据视图
//! - 任意 SQL 控制台
//!
//! 状态机与 HTTP 调用和终端界面分离，`Browser` 可以挂在任意 `ProxyApi` 上。

pub mod api;
pub mod browser;
pub mod command;
pub mod conn_string;
pub mod form;
pub mod render;
pub mod state;

pub use api::{HttpProxyClient, ProxyApi};
pub use browser::{table_view_query, Browser};
pub use state::{BrowserState, Phase};
