//! Shared data models for the proxy service and the browser client.

pub mod connection;
pub mod query;
pub mod table;

// Re-export commonly used types
pub use connection::{ConnectionParameters, DEFAULT_PORT};
pub use query::{QueryRequest, QueryResult};
pub use table::{TableDescriptor, TablesPayload};
