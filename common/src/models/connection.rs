//! Connection parameter models.
//!
//! Parameters travel with every request; the service never stores them.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Default PostgreSQL port.
pub const DEFAULT_PORT: u16 = 5432;

/// Parameters identifying a target database instance.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConnectionParameters {
    /// Database host. Empty means the driver default.
    #[serde(default)]
    pub host: String,
    /// Database port, as a number or numeric string (default: 5432).
    #[serde(default = "default_port", deserialize_with = "deserialize_port")]
    pub port: u16,
    /// Database username.
    #[serde(default)]
    pub user: String,
    /// Database password.
    #[serde(default)]
    pub password: String,
    /// Database name.
    #[serde(default)]
    pub database: String,
    /// Whether TLS without certificate validation was explicitly requested.
    #[serde(default)]
    pub ssl: bool,
}

impl ConnectionParameters {
    /// Creates parameters with the default port and no TLS flag.
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            user: user.into(),
            password: password.into(),
            database: database.into(),
            ssl: false,
        }
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the TLS flag.
    pub fn with_ssl(mut self, ssl: bool) -> Self {
        self.ssl = ssl;
        self
    }
}

impl Default for ConnectionParameters {
    fn default() -> Self {
        Self::new("", "", "", "")
    }
}

impl fmt::Debug for ConnectionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParameters")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("ssl", &self.ssl)
            .finish()
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortValue {
    Number(u64),
    Text(String),
}

/// Accepts `5432`, `"5432"`, `""`, or `null`.
fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<PortValue>::deserialize(deserializer)? {
        None => Ok(DEFAULT_PORT),
        Some(PortValue::Number(n)) => {
            u16::try_from(n).map_err(|_| D::Error::custom(format!("invalid port: {}", n)))
        }
        Some(PortValue::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(DEFAULT_PORT);
            }
            s.parse::<u16>()
                .map_err(|_| D::Error::custom(format!("invalid port: {}", s)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_port_from_number_or_string() {
        let a: ConnectionParameters =
            serde_json::from_value(json!({ "host": "h", "port": 6543 })).unwrap();
        let b: ConnectionParameters =
            serde_json::from_value(json!({ "host": "h", "port": "6543" })).unwrap();
        assert_eq!(a.port, 6543);
        assert_eq!(b.port, 6543);
    }

    #[test]
    fn test_port_defaults_to_5432() {
        let missing: ConnectionParameters =
            serde_json::from_value(json!({ "host": "h" })).unwrap();
        let empty: ConnectionParameters =
            serde_json::from_value(json!({ "host": "h", "port": "" })).unwrap();
        assert_eq!(missing.port, DEFAULT_PORT);
        assert_eq!(empty.port, DEFAULT_PORT);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let text = serde_json::from_value::<ConnectionParameters>(json!({ "port": "abc" }));
        let range = serde_json::from_value::<ConnectionParameters>(json!({ "port": 70000 }));
        assert!(text.is_err());
        assert!(range.is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let params = ConnectionParameters::new("h", "u", "hunter2", "db");
        let debug = format!("{:?}", params);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn test_serializes_port_as_number() {
        let params = ConnectionParameters::new("h", "u", "p", "db").with_ssl(true);
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(
            value,
            json!({
                "host": "h",
                "port": 5432,
                "user": "u",
                "password": "p",
                "database": "db",
                "ssl": true
            })
        );
    }
}
