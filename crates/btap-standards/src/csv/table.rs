#![deny(unsafe_code)]

use std::path::Path;

use btap_model::{ReferenceTable, Row, Value};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StandardsError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Columns that are parsed to typed values; every other column stays text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTypes {
    #[serde(default)]
    pub numeric: Vec<String>,
    #[serde(default)]
    pub dates: Vec<String>,
}

impl ColumnTypes {
    pub fn numeric<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            numeric: columns.into_iter().map(Into::into).collect(),
            dates: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_dates<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dates.extend(columns.into_iter().map(Into::into));
        self
    }

    fn kind_of(&self, column: &str) -> ColumnKind {
        if self.numeric.iter().any(|c| c == column) {
            ColumnKind::Number
        } else if self.dates.iter().any(|c| c == column) {
            ColumnKind::Date
        } else {
            ColumnKind::Text
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Text,
    Number,
    Date,
}

/// Load a CSV file with a header row into a [`ReferenceTable`].
pub fn load_table(path: &Path, name: &str, types: &ColumnTypes) -> Result<ReferenceTable> {
    let bytes = std::fs::read(path).map_err(|e| StandardsError::io(path, e))?;
    parse_table(&bytes, name, types, path)
}

/// Parse CSV bytes into a [`ReferenceTable`]. `origin` is only used in errors.
pub fn parse_table(
    bytes: &[u8],
    name: &str,
    types: &ColumnTypes,
    origin: &Path,
) -> Result<ReferenceTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);
    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| StandardsError::Csv {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').trim().to_string())
        .collect();

    for declared in types.numeric.iter().chain(types.dates.iter()) {
        if !columns.contains(declared) {
            return Err(StandardsError::MalformedTable {
                table: name.to_string(),
                line: 1,
                column: declared.clone(),
                value: String::new(),
                message: "declared typed column is not in the header".to_string(),
            });
        }
    }
    let kinds: Vec<ColumnKind> = columns.iter().map(|c| types.kind_of(c)).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| StandardsError::Csv {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
        let line = record.position().map_or(0, csv::Position::line);

        let mut row = Row::new();
        for ((column, kind), raw) in columns.iter().zip(&kinds).zip(record.iter()) {
            let value = parse_cell(raw.trim(), *kind).map_err(|message| {
                StandardsError::MalformedTable {
                    table: name.to_string(),
                    line,
                    column: column.clone(),
                    value: raw.to_string(),
                    message,
                }
            })?;
            row.insert(column.clone(), value);
        }
        rows.push(row);
    }

    Ok(ReferenceTable::new(name, columns, rows))
}

fn parse_cell(raw: &str, kind: ColumnKind) -> std::result::Result<Value, String> {
    if raw.is_empty() {
        return Ok(Value::Null);
    }
    match kind {
        ColumnKind::Text => Ok(Value::Text(raw.to_string())),
        ColumnKind::Number => match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Value::Number(n)),
            Ok(_) => Err("is not a finite number".to_string()),
            Err(e) => Err(format!("is not a number ({e})")),
        },
        ColumnKind::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Value::Date)
            .map_err(|e| format!("is not a YYYY-MM-DD date ({e})")),
    }
}
