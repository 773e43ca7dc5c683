//! Merging AIS capital gains statements into a single table.
//!
//! Each file is projected onto the [`Schema`], coerced, tagged and filtered
//! to active rows, then the per-file results are concatenated in input order.
//! A schema mismatch or an unreadable cost of acquisition in any file aborts
//! the whole merge, so a partial table is never returned. Missing files only
//! produce a diagnostic.

use crate::diagnostics::{Diagnostic, DiagnosticSink, LogSink};
use crate::load::{self, HeaderStrategy, LoadError, RawRow};
use crate::record::{self, CutoffTag, NormalizedRecord};
use crate::schema::{Column, Schema};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("{file}: missing required column(s): {}", .missing.join(", "))]
    SchemaMismatch { file: String, missing: Vec<String> },
    #[error("{file}, line {line}: '{value}' in column '{column}' is not a number")]
    DataCoercion {
        file: String,
        line: u64,
        column: String,
        value: String,
    },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },
}

/// Rows of every merged statement, in file order then row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MergedTable {
    rows: Vec<NormalizedRecord>,
}

impl MergedTable {
    pub fn columns(&self) -> &'static [&'static str] {
        NormalizedRecord::csv_columns()
    }

    pub fn rows(&self) -> &[NormalizedRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows that came from the statement with the given file name.
    #[cfg(test)]
    pub fn from_file<'a>(&'a self, file: &'a str) -> impl Iterator<Item = &'a NormalizedRecord> {
        self.rows.iter().filter(move |row| row.data_from == file)
    }
}

pub struct TableMerger {
    schema: Schema,
}

impl Default for TableMerger {
    fn default() -> Self {
        TableMerger::new(Schema::default())
    }
}

impl TableMerger {
    pub fn new(schema: Schema) -> Self {
        TableMerger { schema }
    }

    /// Merge the files, reporting progress through `log`.
    pub fn merge<P: AsRef<Path>>(&self, paths: &[P]) -> Result<MergedTable, MergeError> {
        self.merge_with(paths, &mut LogSink)
    }

    pub fn merge_with<P: AsRef<Path>>(
        &self,
        paths: &[P],
        sink: &mut dyn DiagnosticSink,
    ) -> Result<MergedTable, MergeError> {
        let mut per_file = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                sink.report(Diagnostic::MissingFile {
                    path: path.to_path_buf(),
                });
                continue;
            }
            let file = base_name(path);
            let rows = self.normalize_file(path, &file, sink)?;
            sink.report(Diagnostic::FileProcessed {
                file,
                rows: rows.len(),
            });
            per_file.push(rows);
        }

        if per_file.iter().all(Vec::is_empty) {
            sink.report(Diagnostic::NoValidFiles);
            return Ok(MergedTable::default());
        }

        let mut rows: Vec<NormalizedRecord> = per_file.into_iter().flatten().collect();
        rows.retain(|row| !row.is_empty());
        let table = MergedTable { rows };
        sink.report(Diagnostic::Totals {
            rows: table.len(),
            columns: table.columns().len(),
        });
        Ok(table)
    }

    fn normalize_file(
        &self,
        path: &Path,
        file: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vec<NormalizedRecord>, MergeError> {
        let contents = fs::read(path).map_err(|source| MergeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw = load::load(&contents, &self.schema, HeaderStrategy::Projection).map_err(
            |err| match err {
                LoadError::MissingColumns(missing) => MergeError::SchemaMismatch {
                    file: file.to_string(),
                    missing,
                },
                LoadError::Csv(source) => MergeError::Csv {
                    file: file.to_string(),
                    source,
                },
            },
        )?;

        // Coerce every row before filtering so a bad cost anywhere in the file aborts
        let records = raw
            .rows
            .into_iter()
            .map(|row| self.normalize_row(file, row, sink))
            .collect::<Result<Vec<_>, _>>()?;

        let active = &self.schema.active_status;
        Ok(records
            .into_iter()
            .filter(|record| record.status.as_ref() == Some(active))
            .filter(|record| !record.is_empty())
            .collect())
    }

    fn normalize_row(
        &self,
        file: &str,
        row: RawRow,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<NormalizedRecord, MergeError> {
        let line = row.line;
        let [security, date, asset_type, quantity, sales, cost, status] = row.cells;

        let cost_of_acquisition = match cost {
            Some(raw) => match record::parse_amount(&raw) {
                Ok(amount) => amount,
                Err(_) => {
                    return Err(MergeError::DataCoercion {
                        file: file.to_string(),
                        line,
                        column: self.schema.name(Column::CostOfAcquisition).to_string(),
                        value: raw,
                    })
                }
            },
            None => None,
        };

        let sales_consideration = match sales {
            Some(raw) => match record::parse_amount(&raw) {
                Ok(amount) => amount,
                Err(_) => {
                    self.lenient_miss(file, line, Column::SalesConsideration, raw, sink);
                    None
                }
            },
            None => None,
        };

        let date_of_sale = match date {
            Some(raw) => {
                let parsed = record::parse_sale_date(&raw);
                if parsed.is_none() {
                    self.lenient_miss(file, line, Column::DateOfSale, raw, sink);
                }
                parsed
            }
            None => None,
        };

        Ok(NormalizedRecord {
            security,
            date_of_sale,
            asset_type,
            quantity,
            sales_consideration,
            cost_of_acquisition,
            status,
            data_from: file.to_string(),
            sell_minus_cost: record::difference(sales_consideration, cost_of_acquisition),
            cutoff: CutoffTag::for_date(date_of_sale),
        })
    }

    fn lenient_miss(
        &self,
        file: &str,
        line: u64,
        column: Column,
        value: String,
        sink: &mut dyn DiagnosticSink,
    ) {
        sink.report(Diagnostic::CoercionMiss {
            file: file.to_string(),
            line,
            column: self.schema.name(column).to_string(),
            value,
        });
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
