//! Output formatting for the console. Renderers return strings so the console
//! can write them to whatever sink it was given.

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use std::{fmt, str::FromStr};

pub const FORMAT_VALUES: [&str; 2] = ["table", "json"];

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(format!("invalid format '{other}', expected table or json")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => f.write_str("table"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

impl<T: TableDisplay> TableDisplay for &T {
    fn headers() -> Vec<&'static str> {
        T::headers()
    }

    fn row(&self) -> Vec<String> {
        T::row(*self)
    }
}

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Render a single item
#[must_use]
pub fn render_item<T: Serialize + TableDisplay>(item: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            let mut table = table();
            table.set_header(T::headers());
            table.add_row(item.row());
            table.to_string()
        }
        OutputFormat::Json => serde_json::to_string_pretty(item).unwrap_or_default(),
    }
}

/// Render a list of items
#[must_use]
pub fn render_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(items).unwrap_or_default(),
        OutputFormat::Table if items.is_empty() => "No items found.".to_string(),
        OutputFormat::Table => {
            let mut table = table();
            table.set_header(T::headers());
            for item in items {
                table.add_row(item.row());
            }
            table.to_string()
        }
    }
}

#[must_use]
pub fn success(message: &str) -> String {
    format!("✅ {message}")
}

#[must_use]
pub fn error(message: &str) -> String {
    format!("❌ {message}")
}

#[must_use]
pub fn warning(message: &str) -> String {
    format!("⚠️  {message}")
}

#[must_use]
pub fn info(message: &str) -> String {
    format!("ℹ️  {message}")
}

#[cfg(test)]
mod tests {
    use super::{OutputFormat, TableDisplay, render_item, render_list};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Row {
        id: &'static str,
        name: &'static str,
    }

    impl TableDisplay for Row {
        fn headers() -> Vec<&'static str> {
            vec!["ID", "Name"]
        }

        fn row(&self) -> Vec<String> {
            vec![self.id.to_string(), self.name.to_string()]
        }
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("table".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn table_contains_headers_and_cells() {
        let rendered = render_item(&Row { id: "r-1", name: "ADMIN" }, OutputFormat::Table);
        assert!(rendered.contains("Name"));
        assert!(rendered.contains("ADMIN"));
    }

    #[test]
    fn empty_list_renders_placeholder_or_empty_json() {
        let rows: Vec<Row> = Vec::new();
        assert_eq!(render_list(&rows, OutputFormat::Table), "No items found.");
        assert_eq!(render_list(&rows, OutputFormat::Json), "[]");
    }
}
