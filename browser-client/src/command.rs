//! Console input parsing.
//!
//! Lines starting with a backslash are client commands; anything else is SQL.
//! SQL may span several lines and is sent once a line ends with `;`.

use common::models::TableDescriptor;

pub const HELP: &str = "\
Commands:
  \\tables                 list tables
  \\open <schema>.<table>  show the first 100 rows of a table
  \\open <n>               same, by number from \\tables
  \\help                   show this help
  \\q                      quit
Any other input is SQL; it may span lines and runs once a line ends with ';'.
";

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tables,
    Open(String),
    Help,
    Quit,
    Sql(String),
    Empty,
    Unknown(String),
}

impl Command {
    /// Parses one input line.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        if !line.starts_with('\\') {
            return Command::Sql(line.to_string());
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };
        match name {
            "\\tables" | "\\dt" => Command::Tables,
            "\\open" | "\\o" if !arg.is_empty() => Command::Open(arg.to_string()),
            "\\help" | "\\h" | "\\?" => Command::Help,
            "\\q" | "\\quit" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

/// Accumulates console lines into commands.
///
/// Backslash commands act immediately when no statement is pending. SQL lines
/// are collected until one ends with `;`.
#[derive(Debug, Default)]
pub struct InputBuffer {
    pending: Vec<String>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no statement is being continued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Feeds one line; returns a command once one is complete.
    pub fn push(&mut self, line: &str) -> Option<Command> {
        let trimmed = line.trim();
        if self.pending.is_empty() {
            if trimmed.is_empty() || trimmed.starts_with('\\') {
                return Some(Command::parse(trimmed));
            }
        } else if trimmed.is_empty() {
            return None;
        }

        self.pending.push(line.trim_end().to_string());
        if trimmed.ends_with(';') {
            self.take()
        } else {
            None
        }
    }

    /// Flushes a statement left without `;`, e.g. at end of input.
    pub fn finish(&mut self) -> Option<Command> {
        self.take()
    }

    fn take(&mut self) -> Option<Command> {
        if self.pending.is_empty() {
            return None;
        }
        let sql = std::mem::take(&mut self.pending).join("\n");
        Some(Command::Sql(sql.trim().to_string()))
    }
}

/// Resolves an `\open` argument against the listed tables.
///
/// Accepts a 1-based index or `schema.table`. A qualified name that is not in
/// the list is still returned so tables created after connecting can be
/// opened; a bare name must match exactly one listed table.
pub fn resolve_table(target: &str, tables: &[TableDescriptor]) -> Option<TableDescriptor> {
    if let Ok(index) = target.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| tables.get(i)).cloned();
    }

    if let Some((schema, name)) = target.split_once('.') {
        if schema.is_empty() || name.is_empty() {
            return None;
        }
        return Some(TableDescriptor::new(schema, name));
    }

    let mut matches = tables.iter().filter(|t| t.table_name == target);
    match (matches.next(), matches.next()) {
        (Some(table), None) => Some(table.clone()),
        _ => None,
    }
}
