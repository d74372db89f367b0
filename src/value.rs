// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Checkpoint input values
//!
//! The producer API accepts "anything": a file path, prose, raw bytes, a
//! structured record, a table, or a dataset that can archive itself. Rather
//! than probing dynamic types at each stage, the accepted shapes are a
//! closed tagged variant and the classifier matches on it.

use crate::archive::SelfSerializingArchive;
use std::fmt;

/// A value submitted for checkpointing.
///
/// `From` conversions cover the common cases so call sites can pass
/// strings, byte vectors, JSON values, and tables directly.
pub enum CheckpointValue {
    /// Text; may turn out to be a file path, JSON, delimited data, or prose
    Text(String),

    /// Raw binary
    Bytes(Vec<u8>),

    /// Structured record, serialized to canonical JSON for transport
    Record(serde_json::Value),

    /// Tabular frame, converted to CSV text and re-classified
    Table(Table),

    /// Dataset that writes itself to a self-contained archive file
    Archive(Box<dyn SelfSerializingArchive>),

    /// A value outside every category the classifier understands. The
    /// envelope is still delivered so metadata and identifier reach the
    /// consumer; the payload fields stay null.
    Unknown,
}

impl fmt::Debug for CheckpointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckpointValue::Text(s) => f.debug_tuple("Text").field(&s.len()).finish(),
            CheckpointValue::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            CheckpointValue::Record(v) => f.debug_tuple("Record").field(v).finish(),
            CheckpointValue::Table(t) => f
                .debug_struct("Table")
                .field("columns", &t.columns().len())
                .field("rows", &t.row_count())
                .finish(),
            CheckpointValue::Archive(_) => f.write_str("Archive(..)"),
            CheckpointValue::Unknown => f.write_str("Unknown"),
        }
    }
}

impl From<&str> for CheckpointValue {
    fn from(value: &str) -> Self {
        CheckpointValue::Text(value.to_string())
    }
}

impl From<String> for CheckpointValue {
    fn from(value: String) -> Self {
        CheckpointValue::Text(value)
    }
}

impl From<Vec<u8>> for CheckpointValue {
    fn from(value: Vec<u8>) -> Self {
        CheckpointValue::Bytes(value)
    }
}

impl From<&[u8]> for CheckpointValue {
    fn from(value: &[u8]) -> Self {
        CheckpointValue::Bytes(value.to_vec())
    }
}

impl From<serde_json::Value> for CheckpointValue {
    fn from(value: serde_json::Value) -> Self {
        CheckpointValue::Record(value)
    }
}

impl From<Table> for CheckpointValue {
    fn from(value: Table) -> Self {
        CheckpointValue::Table(value)
    }
}

impl From<Box<dyn SelfSerializingArchive>> for CheckpointValue {
    fn from(value: Box<dyn SelfSerializingArchive>) -> Self {
        CheckpointValue::Archive(value)
    }
}

/// Minimal tabular frame: ordered column names plus rows of cell text
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Render as CSV text: header line plus one line per row, RFC 4180
    /// quoting (quote when a cell contains the delimiter, a quote, or a
    /// line break; embedded quotes are doubled).
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        write_csv_line(&mut out, &self.columns);
        for row in &self.rows {
            write_csv_line(&mut out, row);
        }
        out
    }
}

fn write_csv_line(out: &mut String, cells: &[String]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if cell.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(cell);
        }
    }
    out.push('\n');
}
