//! Database connector.
//!
//! Opens one dedicated PostgreSQL connection per request. There is no pool:
//! a `Session` lives exactly as long as the operation that opened it.

use std::time::Duration;

use async_trait::async_trait;
use common::config::TlsMode;
use common::errors::{AppError, AppResult};
use common::models::{ConnectionParameters, QueryResult, TableDescriptor};
use futures::TryStreamExt;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};
use sqlx::{Connection, Column, Either, Executor};

use crate::rows;

/// Catalog query for user tables.
const LIST_TABLES_SQL: &str = r#"
    SELECT table_schema::text, table_name::text
    FROM information_schema.tables
    WHERE table_type = 'BASE TABLE' AND table_schema NOT IN ('pg_catalog', 'information_schema')
    ORDER BY table_schema::text COLLATE "C", table_name::text COLLATE "C""#;

/// Opens sessions against a target database.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Establishes a new session using `params`.
    async fn connect(&self, params: &ConnectionParameters) -> AppResult<Box<dyn Session>>;
}

/// One open connection.
#[async_trait]
pub trait Session: Send {
    /// Lists base tables outside system schemas, ordered by (schema, name).
    async fn list_tables(&mut self) -> AppResult<Vec<TableDescriptor>>;

    /// Executes `sql` verbatim and captures the returned rows.
    async fn execute(&mut self, sql: &str) -> AppResult<QueryResult>;

    /// Closes the connection.
    async fn close(self: Box<Self>) -> AppResult<()>;
}

/// Extracts the message text of a driver error.
///
/// Server-side errors are reduced to the server's own message so callers see
/// exactly what PostgreSQL said; everything else keeps the driver's wording.
pub fn driver_message(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        other => other.to_string(),
    }
}

/// PostgreSQL connector backed by sqlx.
#[derive(Debug, Clone, Default)]
pub struct PgConnector {
    tls_mode: TlsMode,
    connect_timeout: Option<Duration>,
}

impl PgConnector {
    /// Creates a connector.
    pub fn new(tls_mode: TlsMode, connect_timeout: Option<Duration>) -> Self {
        Self {
            tls_mode,
            connect_timeout,
        }
    }

    /// Builds driver options for one request.
    ///
    /// Empty fields are left to the driver defaults (`PG*` environment
    /// variables, then localhost / current user).
    pub fn connect_options(&self, params: &ConnectionParameters) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .port(params.port)
            .ssl_mode(ssl_mode(self.tls_mode.for_request(params.ssl)));

        if !params.host.is_empty() {
            options = options.host(&params.host);
        }
        if !params.user.is_empty() {
            options = options.username(&params.user);
        }
        if !params.password.is_empty() {
            options = options.password(&params.password);
        }
        if !params.database.is_empty() {
            options = options.database(&params.database);
        }

        options
    }
}

fn ssl_mode(mode: TlsMode) -> PgSslMode {
    match mode {
        TlsMode::Disable => PgSslMode::Disable,
        TlsMode::Prefer => PgSslMode::Prefer,
        TlsMode::Insecure => PgSslMode::Require,
        TlsMode::VerifyFull => PgSslMode::VerifyFull,
    }
}

#[async_trait]
impl Connector for PgConnector {
    async fn connect(&self, params: &ConnectionParameters) -> AppResult<Box<dyn Session>> {
        let options = self.connect_options(params);
        let connecting = PgConnection::connect_with(&options);

        let conn = match self.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, connecting).await.map_err(|_| {
                AppError::DatabaseConnection(format!(
                    "connection timed out after {}s",
                    limit.as_secs()
                ))
            })?,
            None => connecting.await,
        }
        .map_err(|e| AppError::DatabaseConnection(driver_message(&e)))?;

        tracing::debug!(host = %params.host, port = params.port, database = %params.database, "connection opened");
        Ok(Box::new(PgSession { conn }))
    }
}

/// Session over a single `PgConnection`.
///
/// Dropping it without `close` still tears down the socket.
pub struct PgSession {
    conn: PgConnection,
}

#[async_trait]
impl Session for PgSession {
    async fn list_tables(&mut self) -> AppResult<Vec<TableDescriptor>> {
        let rows: Vec<(String, String)> = sqlx::query_as(LIST_TABLES_SQL)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| AppError::DatabaseQuery(driver_message(&e)))?;

        Ok(rows
            .into_iter()
            .map(|(schema, name)| TableDescriptor::new(schema, name))
            .collect())
    }

    async fn execute(&mut self, sql: &str) -> AppResult<QueryResult> {
        // Simple-query protocol: the text goes to the server untouched, may
        // hold several statements, and every value comes back as text.
        let mut stream = sqlx::raw_sql(sql).fetch_many(&mut self.conn);

        let mut current = QueryResult::empty();
        let mut last_with_rows: Option<QueryResult> = None;

        while let Some(item) = stream
            .try_next()
            .await
            .map_err(|e| AppError::DatabaseQuery(driver_message(&e)))?
        {
            match item {
                Either::Left(_done) => {
                    if !current.rows.is_empty() {
                        last_with_rows = Some(std::mem::take(&mut current));
                    }
                }
                Either::Right(row) => {
                    if current.rows.is_empty() {
                        current.columns = rows::column_names(&row);
                    }
                    current.rows.push(rows::convert_row(&row));
                }
            }
        }
        drop(stream);

        if !current.rows.is_empty() {
            last_with_rows = Some(current);
        }

        match last_with_rows {
            Some(result) => Ok(result),
            None => Ok(QueryResult {
                columns: self.describe_columns(sql).await,
                rows: Vec::new(),
            }),
        }
    }

    async fn close(self: Box<Self>) -> AppResult<()> {
        let session = *self;
        session
            .conn
            .close()
            .await
            .map_err(|e| AppError::DatabaseConnection(driver_message(&e)))
    }
}

impl PgSession {
    /// Column names of a statement that produced no rows.
    ///
    /// Best effort: multi-statement text and utility commands cannot be
    /// described and yield no columns.
    async fn describe_columns(&mut self, sql: &str) -> Vec<String> {
        match (&mut self.conn).describe(sql).await {
            Ok(describe) => describe
                .columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
            Err(e) => {
                tracing::debug!(error = %e, "statement not describable, returning no columns");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ConnectionParameters {
        ConnectionParameters::new("db.example.com", "alice", "secret", "shop").with_port(6543)
    }

    #[test]
    fn test_connect_options_carry_params() {
        let options = PgConnector::default().connect_options(&params());
        assert_eq!(options.get_host(), "db.example.com");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "alice");
        assert_eq!(options.get_database(), Some("shop"));
    }

    #[test]
    fn test_default_tls_is_mandatory_without_validation() {
        let options = PgConnector::default().connect_options(&params());
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Require));

        let requested = PgConnector::default().connect_options(&params().with_ssl(true));
        assert!(matches!(requested.get_ssl_mode(), PgSslMode::Require));
    }

    #[test]
    fn test_prefer_is_opt_in_and_upgraded_by_request() {
        let connector = PgConnector::new(TlsMode::Prefer, None);
        let plain = connector.connect_options(&params());
        assert!(matches!(plain.get_ssl_mode(), PgSslMode::Prefer));

        let requested = connector.connect_options(&params().with_ssl(true));
        assert!(matches!(requested.get_ssl_mode(), PgSslMode::Require));
    }

    #[test]
    fn test_verify_full_is_respected() {
        let connector = PgConnector::new(TlsMode::VerifyFull, None);
        let options = connector.connect_options(&params().with_ssl(true));
        assert!(matches!(options.get_ssl_mode(), PgSslMode::VerifyFull));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        let connector = PgConnector::new(TlsMode::Disable, Some(Duration::from_secs(5)));
        let params = ConnectionParameters::new("127.0.0.1", "u", "p", "db").with_port(1);
        let err = match connector.connect(&params).await {
            Ok(_) => panic!("port 1 should refuse connections"),
            Err(e) => e,
        };
        assert!(matches!(err, AppError::DatabaseConnection(_)));
        assert!(!err.to_string().is_empty());
    }
}
