//! Browser state machine.
//!
//! Each action updates [`BrowserState`] the way the screen should look
//! afterwards and also returns the outcome, so callers can either render the
//! state or react to the result directly.

use common::errors::{AppError, AppResult};
use common::models::{ConnectionParameters, TableDescriptor};

use crate::api::ProxyApi;
use crate::form::{ConnectInput, ConnectionForm};
use crate::state::{BrowserState, Phase};

/// Rows fetched when a table is opened.
pub const TABLE_VIEW_LIMIT: usize = 100;

/// Query that fills the table view.
///
/// ```
/// use browser_client::table_view_query;
/// use common::models::TableDescriptor;
///
/// let sql = table_view_query(&TableDescriptor::new("public", "orders"));
/// assert_eq!(sql, r#"SELECT * FROM "public"."orders" LIMIT 100;"#);
/// ```
pub fn table_view_query(table: &TableDescriptor) -> String {
    format!(
        "SELECT * FROM {}.{} LIMIT {};",
        quote_ident(&table.table_schema),
        quote_ident(&table.table_name),
        TABLE_VIEW_LIMIT
    )
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Drives the browser through its phases against a [`ProxyApi`].
pub struct Browser<A> {
    api: A,
    state: BrowserState,
}

impl<A: ProxyApi> Browser<A> {
    /// Creates a browser showing an empty form.
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: BrowserState::default(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    /// The API in use.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Form fields, for editing.
    pub fn form_mut(&mut self) -> &mut ConnectionForm {
        &mut self.state.input.form
    }

    /// Switches to connection-string input.
    pub fn use_connection_string(&mut self, connection_string: impl Into<String>) {
        self.state.input.connection_string = connection_string.into();
        self.state.input.use_connection_string = true;
    }

    /// Switches back to the discrete form fields.
    pub fn use_form(&mut self) {
        self.state.input.use_connection_string = false;
    }

    /// Replaces the whole input.
    pub fn set_input(&mut self, input: ConnectInput) {
        self.state.input = input;
    }

    /// Submits the form: tests the connection, then loads the table list.
    ///
    /// Any failure leaves the browser on the form with the message set and
    /// without calling the service again.
    pub async fn connect(&mut self) -> AppResult<()> {
        if self.state.phase.is_connected() {
            return Err(AppError::Validation("Already connected".to_string()));
        }
        self.state.reset_connection();

        let params = match self.state.input.resolve() {
            Ok(params) => params,
            Err(e) => return Err(self.fail(e)),
        };

        if let Err(e) = self.api.test_connection(&params).await {
            return Err(self.fail(e));
        }
        let tables = match self.api.list_tables(&params).await {
            Ok(tables) => tables,
            Err(e) => return Err(self.fail(e)),
        };

        tracing::info!(host = %params.host, database = %params.database, tables = tables.len(), "connected");
        self.state.tables = tables;
        self.state.params = Some(params);
        self.state.phase = Phase::Connected;
        Ok(())
    }

    /// Opens `table`: replaces the table view with its first rows.
    ///
    /// On failure the view stays empty, the error is set and the table list
    /// is kept.
    pub async fn select_table(&mut self, table: TableDescriptor) -> AppResult<()> {
        let params = self.connected_params()?;

        self.state.phase = Phase::TableSelected(table.clone());
        self.state.table_view = Default::default();

        match self.api.execute_query(&params, &table_view_query(&table)).await {
            Ok(result) => {
                tracing::debug!(table = %table, rows = result.row_count(), "table view loaded");
                self.state.error = None;
                self.state.table_view = result;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Runs console SQL.
    ///
    /// When the text mentions the selected table's name (case-insensitive),
    /// the table view is reloaded afterwards. A failed reload only touches
    /// the table-view error.
    pub async fn run_sql(&mut self, sql: &str) -> AppResult<()> {
        let params = self.connected_params()?;

        self.state.console = Default::default();
        self.state.console_error = None;

        match self.api.execute_query(&params, sql).await {
            Ok(result) => self.state.console = result,
            Err(e) => {
                self.state.console_error = Some(e.to_string());
                return Err(e);
            }
        }

        if let Some(table) = self.state.phase.selected_table().cloned() {
            if mentions_table(sql, &table) {
                tracing::debug!(table = %table, "refreshing table view");
                if let Err(e) = self.select_table(table).await {
                    tracing::warn!(error = %e, "table view refresh failed");
                }
            }
        }
        Ok(())
    }

    fn connected_params(&self) -> AppResult<ConnectionParameters> {
        self.state
            .params
            .clone()
            .ok_or_else(|| AppError::Validation("Not connected".to_string()))
    }

    fn fail(&mut self, err: AppError) -> AppError {
        self.state.error = Some(err.to_string());
        err
    }
}

fn mentions_table(sql: &str, table: &TableDescriptor) -> bool {
    sql.to_lowercase()
        .contains(&table.table_name.to_lowercase())
}
