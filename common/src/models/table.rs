//! Catalog table models.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A (schema, table) pair discovered through catalog introspection.
///
/// Field order matters: the derived ordering is by schema, then name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub struct TableDescriptor {
    /// Schema the table lives in.
    pub table_schema: String,
    /// Table name.
    pub table_name: String,
}

impl TableDescriptor {
    /// Creates a new table descriptor.
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table_schema: schema.into(),
            table_name: name.into(),
        }
    }

    /// Returns `schema.name`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.table_schema, self.table_name)
    }
}

impl fmt::Display for TableDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table_schema, self.table_name)
    }
}

/// Success payload of the table-listing operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TablesPayload {
    /// Base tables outside system schemas, ordered by (schema, name).
    pub tables: Vec<TableDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_schema_then_name() {
        let mut tables = vec![
            TableDescriptor::new("sales", "a"),
            TableDescriptor::new("public", "orders"),
            TableDescriptor::new("public", "customers"),
        ];
        tables.sort();
        let names: Vec<String> = tables.iter().map(|t| t.qualified_name()).collect();
        assert_eq!(names, ["public.customers", "public.orders", "sales.a"]);
    }

    #[test]
    fn test_wire_field_names() {
        let value = serde_json::to_value(TableDescriptor::new("public", "orders")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "table_schema": "public", "table_name": "orders" })
        );
    }
}
