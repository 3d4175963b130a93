//! Row conversion.
//!
//! Rows arrive in PostgreSQL's text format. Each cell is coerced to a JSON
//! value according to its column type; anything without a natural JSON
//! counterpart stays a string.

use serde_json::{Map, Number, Value};
use sqlx::postgres::{PgRow, Postgres};
use sqlx::{Column, Decode, Row, TypeInfo, ValueRef};

/// Column names of a row, in order.
pub fn column_names(row: &PgRow) -> Vec<String> {
    row.columns().iter().map(|c| c.name().to_string()).collect()
}

/// Converts a row into a column-name → value map.
///
/// Duplicate column names keep the last value.
pub fn convert_row(row: &PgRow) -> Map<String, Value> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let value = convert_cell(row, index, column.type_info().name());
            (column.name().to_string(), value)
        })
        .collect()
}

fn convert_cell(row: &PgRow, index: usize, type_name: &str) -> Value {
    let Ok(raw) = row.try_get_raw(index) else {
        return Value::Null;
    };
    if raw.is_null() {
        return Value::Null;
    }
    match <&str as Decode<Postgres>>::decode(raw) {
        Ok(text) => coerce_text(type_name, text),
        Err(e) => {
            tracing::warn!(index, type_name, error = %e, "undecodable cell, returning null");
            Value::Null
        }
    }
}

/// Coerces the text form of a value of type `type_name` to JSON.
pub fn coerce_text(type_name: &str, text: &str) -> Value {
    match type_name.to_ascii_uppercase().as_str() {
        "BOOL" | "BOOLEAN" => match text {
            "t" | "true" => Value::Bool(true),
            "f" | "false" => Value::Bool(false),
            _ => Value::String(text.to_string()),
        },

        "INT2" | "INT4" | "INT8" | "SMALLINT" | "INT" | "INTEGER" | "BIGINT" | "OID" => text
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(text.to_string())),

        "FLOAT4" | "FLOAT8" | "REAL" | "DOUBLE PRECISION" => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(text.to_string())),

        "JSON" | "JSONB" => {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        }

        // numeric, text, varchar, dates, times, uuid, arrays, ...
        _ => Value::String(text.to_string()),
    }
}
