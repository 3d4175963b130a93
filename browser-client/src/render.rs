//! Terminal rendering.

use common::models::{QueryResult, TableDescriptor};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

/// Display text of a cell value.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Renders a result as an ASCII grid followed by a row count.
///
/// Column widths use terminal display width, so CJK text lines up.
pub fn render_table(result: &QueryResult) -> String {
    if result.columns.is_empty() {
        return "(no columns)\n".to_string();
    }

    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| {
            result
                .columns
                .iter()
                .map(|col| row.get(col).map(format_value).unwrap_or_else(|| "NULL".to_string()))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = result.columns.iter().map(|c| c.width()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let separator: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(w + 2)))
        .collect::<String>()
        + "+\n";

    let mut output = String::new();
    output.push_str(&separator);
    output.push_str(&render_line(&result.columns, &widths));
    output.push_str(&separator);
    for row in &cells {
        output.push_str(&render_line(row, &widths));
    }
    output.push_str(&separator);

    let count = result.row_count();
    output.push_str(&format!("{} {}\n", count, if count == 1 { "row" } else { "rows" }));
    output
}

fn render_line<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| {
            let cell = cell.as_ref();
            let pad = w.saturating_sub(cell.width());
            format!("| {}{} ", cell, " ".repeat(pad))
        })
        .collect::<String>()
        + "|\n"
}

/// Numbered table list, for picking with `\open <n>`.
pub fn render_tables(tables: &[TableDescriptor]) -> String {
    if tables.is_empty() {
        return "(no tables)\n".to_string();
    }
    tables
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{:>3}  {}\n", i + 1, t.qualified_name()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn result(columns: &[&str], rows: Vec<Value>) -> QueryResult {
        QueryResult {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .into_iter()
                .map(|r| match r {
                    Value::Object(map) => map,
                    _ => Map::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_grid() {
        let rendered = render_table(&result(
            &["id", "name"],
            vec![json!({ "id": 1, "name": "ann" }), json!({ "id": 22, "name": null })],
        ));
        assert_eq!(
            rendered,
            "+----+------+\n\
             | id | name |\n\
             +----+------+\n\
             | 1  | ann  |\n\
             | 22 | NULL |\n\
             +----+------+\n\
             2 rows\n"
        );
    }

    #[test]
    fn test_wide_characters_align() {
        let rendered = render_table(&result(&["名"], vec![json!({ "名": "数据库" })]));
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "+--------+");
        assert_eq!(lines[1], "| 名     |");
        assert_eq!(lines[3], "| 数据库 |");
        assert_eq!(lines[5], "1 row");
    }

    #[test]
    fn test_no_columns() {
        assert_eq!(render_table(&QueryResult::empty()), "(no columns)\n");
    }

    #[test]
    fn test_values() {
        assert_eq!(format_value(&json!(true)), "true");
        assert_eq!(format_value(&json!({ "a": 1 })), r#"{"a":1}"#);
        assert_eq!(format_value(&json!("x")), "x");
    }

    #[test]
    fn test_table_list() {
        let tables = vec![
            TableDescriptor::new("public", "customers"),
            TableDescriptor::new("public", "orders"),
        ];
        assert_eq!(
            render_tables(&tables),
            "  1  public.customers\n  2  public.orders\n"
        );
    }
}
