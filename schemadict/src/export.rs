//! Rendering a [`TableModel`] with a chosen column set.
//!
//! Renderers never look at the source documents again: every cell is derived
//! from the row's own schema map, so a free keyword column is just a lookup
//! of that keyword.

use std::{fmt, io::Write, str::FromStr};

use serde::Serialize;
use serde_json::Value;

use crate::{
    data::{PropertyRow, TableModel},
    error::Result,
    keyword::{KeywordClass, constraints_summary, display_value},
    stats::KeywordUsageStat,
};

/// One output column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Column {
    Category,
    Name,
    Description,
    Type,
    Enum,
    Constraints,
    Required,
    /// Free keyword looked up in the row schema.
    Keyword(String),
}

impl Column {
    /// Columns shown when nothing else is configured.
    pub fn defaults() -> Vec<Column> {
        vec![
            Column::Name,
            Column::Description,
            Column::Type,
            Column::Enum,
            Column::Constraints,
        ]
    }

    /// The `n` most used free keywords as columns.
    pub fn suggested(stats: &[KeywordUsageStat], n: usize) -> Vec<Column> {
        stats
            .iter()
            .take(n)
            .map(|s| Column::Keyword(s.keyword.clone()))
            .collect()
    }

    /// Parse a comma separated column list, ignoring blanks.
    pub fn parse_list(list: &str) -> Vec<Column> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse().ok())
            .collect()
    }

    /// Header label.
    pub fn label(&self) -> &str {
        match self {
            Column::Category => "Category",
            Column::Name => "Name",
            Column::Description => "Description",
            Column::Type => "Type",
            Column::Enum => "Allowed values",
            Column::Constraints => "Constraints",
            Column::Required => "Required",
            Column::Keyword(k) => k.as_str(),
        }
    }

    /// Cell text for `row`.
    pub fn cell(&self, row: &PropertyRow<'_>) -> String {
        let schema = row.schema;
        match self {
            Column::Category => row.category.clone().unwrap_or_default(),
            Column::Name => row.name.clone(),
            Column::Description => schema
                .get("description")
                .map(display_value)
                .unwrap_or_default(),
            Column::Type => type_label(schema),
            Column::Enum => enum_label(schema),
            Column::Constraints => constraints_summary(schema, row.required),
            Column::Required => (if row.required { "yes" } else { "no" }).to_string(),
            Column::Keyword(k) => schema.get(k).map(display_value).unwrap_or_default(),
        }
    }
}

impl FromStr for Column {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "category" => Column::Category,
            "name" => Column::Name,
            "description" => Column::Description,
            "type" => Column::Type,
            "enum" => Column::Enum,
            "constraints" => Column::Constraints,
            "required" => Column::Required,
            other => Column::Keyword(other.to_string()),
        })
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self {
            Column::Category => "category",
            Column::Name => "name",
            Column::Description => "description",
            Column::Type => "type",
            Column::Enum => "enum",
            Column::Constraints => "constraints",
            Column::Required => "required",
            Column::Keyword(k) => k.as_str(),
        };
        f.write_str(id)
    }
}

/// Drop keyword columns that duplicate a fixed column or are hidden keywords.
pub fn normalize_columns(columns: Vec<Column>) -> Vec<Column> {
    let mut out: Vec<Column> = Vec::with_capacity(columns.len());
    for column in columns {
        if let Column::Keyword(k) = &column
            && KeywordClass::of(k) != KeywordClass::Free
        {
            debug!("column `{k}` is not a free keyword, skipped");
            continue;
        }
        if !out.contains(&column) {
            out.push(column);
        }
    }
    out
}

fn type_label(schema: &Value) -> String {
    match schema.get("type") {
        Some(Value::String(ty)) if ty == "array" => {
            match schema
                .get("items")
                .and_then(|items| items.get("type"))
                .and_then(Value::as_str)
            {
                Some(item_ty) => format!("array<{item_ty}>"),
                None => ty.clone(),
            }
        }
        Some(Value::String(ty)) => ty.clone(),
        Some(Value::Array(types)) => types
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(" | "),
        Some(other) => display_value(other),
        None => schema
            .get("$ref")
            .and_then(Value::as_str)
            .map(|r| format!("$ref: {r}"))
            .unwrap_or_default(),
    }
}

fn enum_label(schema: &Value) -> String {
    let Some(values) = schema.get("enum").and_then(Value::as_array) else {
        return String::new();
    };
    let descriptions = schema
        .get("enumDescriptions")
        .and_then(Value::as_array)
        .filter(|d| d.len() == values.len());

    values
        .iter()
        .enumerate()
        .map(|(i, v)| match descriptions {
            Some(d) => format!("{}: {}", display_value(v), display_value(&d[i])),
            None => display_value(v),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Write the table as CSV, one record per row.
pub fn write_csv<W: Write>(table: &TableModel<'_>, columns: &[Column], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(columns.iter().map(Column::label))?;
    for row in &table.properties {
        writer.write_record(columns.iter().map(|c| c.cell(row)))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the table as GitHub flavored Markdown with a heading per section.
pub fn write_markdown<W: Write>(
    table: &TableModel<'_>,
    columns: &[Column],
    mut out: W,
) -> Result<()> {
    writeln!(out, "# {}", table.title)?;
    if !table.description.is_empty() {
        writeln!(out, "\n{}", table.description)?;
    }

    let header = columns
        .iter()
        .map(|c| escape_md(c.label()))
        .collect::<Vec<_>>()
        .join(" | ");
    let rule = vec!["---"; columns.len()].join(" | ");

    let mut current: Option<Option<&str>> = None;
    for row in &table.properties {
        let category = row.category.as_deref();
        if current != Some(category) {
            writeln!(out)?;
            if let Some(name) = category {
                writeln!(out, "### {name}\n")?;
            }
            writeln!(out, "| {header} |")?;
            writeln!(out, "| {rule} |")?;
            current = Some(category);
        }
        let cells = columns
            .iter()
            .map(|c| escape_md(&c.cell(row)))
            .collect::<Vec<_>>()
            .join(" | ");
        writeln!(out, "| {cells} |")?;
    }
    Ok(())
}

fn escape_md(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', "<br>")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'t, 'a> {
    #[serde(flatten)]
    table: &'t TableModel<'a>,
    keyword_stats: &'t [KeywordUsageStat],
}

/// Write the table model and keyword stats as pretty JSON.
pub fn write_json<W: Write>(
    table: &TableModel<'_>,
    stats: &[KeywordUsageStat],
    out: W,
) -> Result<()> {
    let export = JsonExport {
        table,
        keyword_stats: stats,
    };
    serde_json::to_writer_pretty(out, &export)?;
    Ok(())
}

/// Render an aligned plain-text table, one block per section.
pub fn render_text(table: &TableModel<'_>, columns: &[Column]) -> String {
    let cells: Vec<Vec<String>> = table
        .properties
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| c.cell(row).replace('\n', " "))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain([c.label().chars().count()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<&str>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, &w)| format!("{v:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    let mut current: Option<Option<&str>> = None;
    for (row, row_cells) in table.properties.iter().zip(&cells) {
        let category = row.category.as_deref();
        if current != Some(category) {
            if current.is_some() {
                out.push('\n');
            }
            if let Some(name) = category {
                out.push_str(&format!("[{name}]\n"));
            }
            out.push_str(&line(columns.iter().map(Column::label).collect()));
            out.push('\n');
            current = Some(category);
        }
        out.push_str(&line(row_cells.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}
