//! In-memory connector for tests.
//!
//! Counts opened and closed sessions so connection release can be checked
//! without a live database.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::errors::{AppError, AppResult};
use common::models::{ConnectionParameters, QueryResult, TableDescriptor};
use serde_json::{json, Map, Value};

use crate::connector::{Connector, Session};

/// Scripted outcomes for the mock.
#[derive(Debug, Clone, Default)]
pub struct MockBehavior {
    /// Fail `connect` with this message.
    pub connect_error: Option<String>,
    /// Fail `list_tables` and `execute` with this message.
    pub query_error: Option<String>,
    /// Fail `close` with this message (the session still counts as closed).
    pub close_error: Option<String>,
    /// Tables returned by `list_tables`.
    pub tables: Vec<TableDescriptor>,
}

/// Connector that never touches the network.
#[derive(Debug, Default)]
pub struct MockConnector {
    behavior: MockBehavior,
    opened: AtomicUsize,
    closed: Arc<AtomicUsize>,
    statements: Arc<Mutex<Vec<String>>>,
}

impl MockConnector {
    /// Creates a shared mock connector.
    pub fn new(behavior: MockBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            ..Default::default()
        })
    }

    /// Sessions opened so far.
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Sessions closed so far.
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Sessions currently open.
    pub fn open_now(&self) -> usize {
        self.opened() - self.closed()
    }

    /// Statements passed to `execute`, in order.
    pub fn statements(&self) -> Vec<String> {
        self.statements
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, _params: &ConnectionParameters) -> AppResult<Box<dyn Session>> {
        if let Some(message) = &self.behavior.connect_error {
            return Err(AppError::DatabaseConnection(message.clone()));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            behavior: self.behavior.clone(),
            closed: Arc::clone(&self.closed),
            statements: Arc::clone(&self.statements),
        }))
    }
}

struct MockSession {
    behavior: MockBehavior,
    closed: Arc<AtomicUsize>,
    statements: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Session for MockSession {
    async fn list_tables(&mut self) -> AppResult<Vec<TableDescriptor>> {
        if let Some(message) = &self.behavior.query_error {
            return Err(AppError::DatabaseQuery(message.clone()));
        }
        let mut tables = self.behavior.tables.clone();
        tables.sort();
        Ok(tables)
    }

    async fn execute(&mut self, sql: &str) -> AppResult<QueryResult> {
        if let Ok(mut statements) = self.statements.lock() {
            statements.push(sql.to_string());
        }
        if let Some(message) = &self.behavior.query_error {
            return Err(AppError::DatabaseQuery(message.clone()));
        }
        let mut row = Map::new();
        row.insert("x".to_string(), json!(1));
        Ok(QueryResult {
            columns: vec!["x".to_string()],
            rows: vec![row],
        })
    }

    async fn close(self: Box<Self>) -> AppResult<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        match &self.behavior.close_error {
            Some(message) => Err(AppError::DatabaseConnection(message.clone())),
            None => Ok(()),
        }
    }
}

/// Shorthand for a row map in assertions.
pub fn row(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
