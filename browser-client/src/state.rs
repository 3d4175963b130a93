//! Browser state.
//!
//! The view moves one way only: `Form` → `Connected` → `TableSelected`.
//! Selecting another table stays in `TableSelected` with the new table.

use common::models::{ConnectionParameters, QueryResult, TableDescriptor};

use crate::form::ConnectInput;

/// Current view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    /// Collecting connection parameters.
    #[default]
    Form,
    /// Connected, table list shown, nothing selected.
    Connected,
    /// A table is selected and its first rows are shown.
    TableSelected(TableDescriptor),
}

impl Phase {
    /// Whether the connection form has been left.
    pub fn is_connected(&self) -> bool {
        !matches!(self, Phase::Form)
    }

    /// The selected table, if any.
    pub fn selected_table(&self) -> Option<&TableDescriptor> {
        match self {
            Phase::TableSelected(table) => Some(table),
            _ => None,
        }
    }
}

/// Everything the browser displays.
#[derive(Debug, Clone, Default)]
pub struct BrowserState {
    /// Form fields or connection string.
    pub input: ConnectInput,
    pub phase: Phase,
    /// Parameters captured by the successful connect; reused by every later call.
    pub params: Option<ConnectionParameters>,
    pub tables: Vec<TableDescriptor>,
    /// Rows of the selected table.
    pub table_view: QueryResult,
    /// Result of the last console statement.
    pub console: QueryResult,
    /// Error shown on the form or above the table view.
    pub error: Option<String>,
    /// Error shown under the console.
    pub console_error: Option<String>,
}

impl BrowserState {
    /// Clears everything a new connect attempt replaces.
    pub(crate) fn reset_connection(&mut self) {
        self.error = None;
        self.params = None;
        self.tables.clear();
        self.table_view = QueryResult::empty();
        self.phase = Phase::Form;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_accessors() {
        assert!(!Phase::Form.is_connected());
        assert!(Phase::Connected.is_connected());

        let table = TableDescriptor::new("public", "orders");
        let phase = Phase::TableSelected(table.clone());
        assert!(phase.is_connected());
        assert_eq!(phase.selected_table(), Some(&table));
        assert_eq!(Phase::Connected.selected_table(), None);
    }
}
