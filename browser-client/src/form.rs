//! Connection form.
//!
//! Only presence checks are made here: whether the credentials work is for
//! the database to decide.

use common::errors::{AppError, AppResult};
use common::models::{ConnectionParameters, DEFAULT_PORT};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::conn_string::parse_connection_string;

/// Field order used when reporting several missing fields.
const FIELD_ORDER: [&str; 4] = ["host", "port", "user", "database"];

/// Discrete connection fields as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ConnectionForm {
    /// Database host.
    #[validate(custom(function = "not_blank", message = "Host is required"))]
    pub host: String,
    /// Port as text.
    #[validate(custom(function = "valid_port", message = "Port must be a number between 1 and 65535"))]
    pub port: String,
    /// Database username.
    #[validate(custom(function = "not_blank", message = "User is required"))]
    pub user: String,
    /// Password (may be empty).
    pub password: String,
    /// Database name.
    #[validate(custom(function = "not_blank", message = "Database is required"))]
    pub database: String,
}

impl Default for ConnectionForm {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT.to_string(),
            user: String::new(),
            password: String::new(),
            database: String::new(),
        }
    }
}

impl ConnectionForm {
    /// Checks the fields and converts them into request parameters.
    pub fn to_params(&self) -> AppResult<ConnectionParameters> {
        self.validate()
            .map_err(|errors| AppError::Validation(describe(&errors)))?;

        let port = self.port.trim().parse::<u16>().map_err(|_| {
            AppError::Validation("Port must be a number between 1 and 65535".to_string())
        })?;

        Ok(ConnectionParameters::new(
            self.host.trim(),
            self.user.trim(),
            self.password.as_str(),
            self.database.trim(),
        )
        .with_port(port))
    }
}

/// What the user submits: form fields or a connection string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectInput {
    pub form: ConnectionForm,
    pub connection_string: String,
    pub use_connection_string: bool,
}

impl ConnectInput {
    /// Resolves the active input into parameters.
    ///
    /// An unparsable connection string is reported as
    /// `InvalidConnectionString("Invalid connection string")`.
    pub fn resolve(&self) -> AppResult<ConnectionParameters> {
        if self.use_connection_string {
            parse_connection_string(&self.connection_string).ok_or_else(|| {
                AppError::InvalidConnectionString("Invalid connection string".to_string())
            })
        } else {
            self.form.to_params()
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn valid_port(value: &str) -> Result<(), ValidationError> {
    match value.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(()),
        _ => Err(ValidationError::new("port")),
    }
}

fn describe(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    FIELD_ORDER
        .iter()
        .filter_map(|name| fields.get(*name))
        .flat_map(|errs| errs.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .collect::<Vec<_>>()
        .join("; ")
}
