//! SQL query models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::connection::ConnectionParameters;

/// Request body for executing arbitrary SQL.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QueryRequest {
    /// Target database.
    #[serde(flatten)]
    pub params: ConnectionParameters,

    /// SQL text, executed verbatim.
    #[serde(default)]
    pub query: String,
}

impl QueryRequest {
    /// Creates a query request.
    pub fn new(params: ConnectionParameters, query: impl Into<String>) -> Self {
        Self {
            params,
            query: query.into(),
        }
    }
}

/// Result of a SQL execution: column names plus one map per row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QueryResult {
    /// Column names in result order.
    pub columns: Vec<String>,

    /// Rows keyed by column name.
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<Map<String, Value>>,
}

impl QueryResult {
    /// Creates an empty query result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result has neither columns nor rows.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_request_flattens_params() {
        let req: QueryRequest = serde_json::from_value(json!({
            "host": "db.local",
            "port": "5433",
            "user": "u",
            "password": "p",
            "database": "app",
            "query": "SELECT 1 AS x"
        }))
        .unwrap();
        assert_eq!(req.params.host, "db.local");
        assert_eq!(req.params.port, 5433);
        assert_eq!(req.query, "SELECT 1 AS x");
    }

    #[test]
    fn test_empty_result() {
        let result = QueryResult::empty();
        assert!(result.is_empty());
        assert_eq!(result.row_count(), 0);
    }
}
