//! Rendering of command results as tables or JSON.

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use together_core::result::AppResult;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    /// Render a result set. An empty table renders as a notice.
    pub fn rows<T: Serialize + Tabled>(self, rows: &[T]) -> AppResult<String> {
        match self {
            Self::Table if rows.is_empty() => Ok("No results found.".to_string()),
            Self::Table => Ok(Table::new(rows).with(Style::rounded()).to_string()),
            Self::Json => to_json(&rows),
        }
    }

    /// Render one record.
    pub fn row<T: Serialize + Tabled>(self, row: &T) -> AppResult<String> {
        match self {
            Self::Table => Ok(Table::new([row]).with(Style::rounded()).to_string()),
            Self::Json => to_json(row),
        }
    }
}

/// Serialize any value as pretty JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Print a success line
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning line
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error line to stderr
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print an aligned `key: value` line
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<40} {value}", format!("{key}:"));
}
