//! Reading statement files into rows of the recognized columns.
//!
//! Every statement starts with a banner line that is not part of the table.
//! Two strategies decide how the remaining lines map onto the schema:
//!
//! - [`HeaderStrategy::Projection`]: the line after the banner is the header,
//!   columns are picked by name and every schema column must be present.
//! - [`HeaderStrategy::Positional`]: the file's header is ignored and schema
//!   names are assigned by position, so the header line is read as data.

use crate::schema::Schema;
use csv::{ReaderBuilder, StringRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStrategy {
    Projection,
    Positional,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// A row with one cell per schema column, in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// Physical line the row starts on, counting the banner as line 1
    pub line: u64,
    pub cells: [Option<String>; Schema::WIDTH],
}

impl RawRow {
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub rows: Vec<RawRow>,
}

pub fn load(
    contents: &[u8],
    schema: &Schema,
    strategy: HeaderStrategy,
) -> Result<RawTable, LoadError> {
    let body = skip_banner(contents);
    match strategy {
        HeaderStrategy::Projection => project(body, schema),
        HeaderStrategy::Positional => positional(body),
    }
}

/// Everything after the first physical line.
fn skip_banner(contents: &[u8]) -> &[u8] {
    match contents.iter().position(|b| *b == b'\n') {
        Some(end) => &contents[end + 1..],
        None => &[],
    }
}

fn project(body: &[u8], schema: &Schema) -> Result<RawTable, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body);
    let headers = rdr.headers()?.clone();

    let mut indices = [0usize; Schema::WIDTH];
    let mut missing = Vec::new();
    for (slot, name) in indices.iter_mut().zip(schema.columns()) {
        match headers.iter().position(|h| h.trim() == name) {
            Some(index) => *slot = index,
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let cells = indices.map(|index| cell(&record, index));
        rows.push(RawRow {
            line: line_of(&record),
            cells,
        });
    }
    log::debug!("Read {} rows by header name", rows.len());
    Ok(RawTable { rows })
}

fn positional(body: &[u8]) -> Result<RawTable, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let cells = std::array::from_fn(|index| cell(&record, index));
        rows.push(RawRow {
            line: line_of(&record),
            cells,
        });
    }
    log::debug!("Read {} rows by position", rows.len());
    Ok(RawTable { rows })
}

/// Trimmed cell text, `None` for blank or absent cells.
fn cell(record: &StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, |pos| pos.line() + 1)
}
