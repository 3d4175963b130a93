//! 查询代理服务模块
//!
//! 三个操作共用同一个模式：打开连接、执行一个动作、无论成败都关闭连接。

use std::sync::Arc;

use common::errors::AppResult;
use common::models::{ConnectionParameters, QueryResult, TableDescriptor};

use crate::connector::{Connector, Session};

/// Request-scoped database proxy.
#[derive(Clone)]
pub struct ProxyService {
    connector: Arc<dyn Connector>,
}

impl ProxyService {
    /// 创建新的代理服务实例
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    /// 打开并立即关闭一个连接
    pub async fn test_connection(&self, params: &ConnectionParameters) -> AppResult<()> {
        let session = self.connector.connect(params).await?;
        release(session).await;
        tracing::debug!(host = %params.host, database = %params.database, "connection test passed");
        Ok(())
    }

    /// 列出非系统 schema 下的基础表
    pub async fn list_tables(
        &self,
        params: &ConnectionParameters,
    ) -> AppResult<Vec<TableDescriptor>> {
        let mut session = self.connector.connect(params).await?;
        let outcome = session.list_tables().await;
        release(session).await;

        let tables = outcome?;
        tracing::debug!(count = tables.len(), "tables listed");
        Ok(tables)
    }

    /// 原样执行任意 SQL
    pub async fn execute_query(
        &self,
        params: &ConnectionParameters,
        sql: &str,
    ) -> AppResult<QueryResult> {
        let mut session = self.connector.connect(params).await?;
        let outcome = session.execute(sql).await;
        release(session).await;

        let result = outcome?;
        tracing::debug!(
            columns = result.columns.len(),
            rows = result.row_count(),
            "query executed"
        );
        Ok(result)
    }
}

/// Closes a session whatever happened before.
///
/// A close failure is logged only: the operation's own outcome is what the
/// caller gets.
async fn release(session: Box<dyn Session>) {
    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "failed to close connection cleanly");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockConnector, MockBehavior};
    use common::errors::AppError;

    fn params() -> ConnectionParameters {
        ConnectionParameters::new("localhost", "u", "p", "db")
    }

    #[tokio::test]
    async fn test_repeated_calls_release_every_connection() {
        let connector = MockConnector::new(MockBehavior::default());
        let service = ProxyService::new(connector.clone());

        for _ in 0..25 {
            service.test_connection(&params()).await.unwrap();
            service.list_tables(&params()).await.unwrap();
            service.execute_query(&params(), "SELECT 1 AS x").await.unwrap();
        }

        assert_eq!(connector.opened(), 75);
        assert_eq!(connector.closed(), 75);
        assert_eq!(connector.open_now(), 0);
    }

    #[tokio::test]
    async fn test_failed_query_still_releases() {
        let connector = MockConnector::new(MockBehavior {
            query_error: Some(r#"syntax error at or near "SELEC""#.into()),
            ..Default::default()
        });
        let service = ProxyService::new(connector.clone());

        let err = service
            .execute_query(&params(), "SELEC 1")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DatabaseQuery(_)));
        assert_eq!(err.to_string(), r#"syntax error at or near "SELEC""#);
        assert_eq!(connector.open_now(), 0);
    }

    #[tokio::test]
    async fn test_failed_listing_still_releases() {
        let connector = MockConnector::new(MockBehavior {
            query_error: Some("permission denied for schema secret".into()),
            ..Default::default()
        });
        let service = ProxyService::new(connector.clone());

        assert!(service.list_tables(&params()).await.is_err());
        assert_eq!(connector.opened(), 1);
        assert_eq!(connector.closed(), 1);
    }

    #[tokio::test]
    async fn test_connect_failure_opens_nothing() {
        let connector = MockConnector::new(MockBehavior {
            connect_error: Some("password authentication failed for user \"u\"".into()),
            ..Default::default()
        });
        let service = ProxyService::new(connector.clone());

        let err = service.test_connection(&params()).await.unwrap_err();
        assert!(matches!(err, AppError::DatabaseConnection(_)));
        assert!(!err.to_string().is_empty());
        assert_eq!(connector.opened(), 0);
        assert_eq!(connector.open_now(), 0);
    }

    #[tokio::test]
    async fn test_close_failure_does_not_mask_result() {
        let connector = MockConnector::new(MockBehavior {
            close_error: Some("connection reset".into()),
            ..Default::default()
        });
        let service = ProxyService::new(connector.clone());

        let result = service.execute_query(&params(), "SELECT 1 AS x").await.unwrap();
        assert_eq!(result.columns, vec!["x"]);
        assert_eq!(connector.open_now(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_requests_are_independent() {
        let connector = MockConnector::new(MockBehavior::default());
        let service = ProxyService::new(connector.clone());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.execute_query(&params(), "SELECT 1 AS x").await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(connector.opened(), 16);
        assert_eq!(connector.open_now(), 0);
    }
}
