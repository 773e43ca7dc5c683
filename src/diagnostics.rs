//! Progress and warning messages raised while merging statements.
//!
//! Diagnostics never change the merge result; they go to a [`DiagnosticSink`],
//! which by default forwards them to the `log` facade.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Input path does not exist, the file was skipped.
    MissingFile { path: PathBuf },
    /// A value was turned into a missing value instead of failing the merge.
    CoercionMiss {
        file: String,
        line: u64,
        column: String,
        value: String,
    },
    FileProcessed { file: String, rows: usize },
    NoValidFiles,
    Totals { rows: usize, columns: usize },
}

impl Diagnostic {
    pub fn level(&self) -> log::Level {
        match self {
            Diagnostic::MissingFile { .. } => log::Level::Warn,
            Diagnostic::CoercionMiss { .. } => log::Level::Debug,
            Diagnostic::FileProcessed { .. }
            | Diagnostic::NoValidFiles
            | Diagnostic::Totals { .. } => log::Level::Info,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingFile { path } => {
                write!(f, "File {} does not exist, skipping", path.display())
            }
            Diagnostic::CoercionMiss {
                file,
                line,
                column,
                value,
            } => write!(
                f,
                "{}, line {}: '{}' in column '{}' left empty",
                file, line, value, column
            ),
            Diagnostic::FileProcessed { file, rows } => {
                write!(f, "Processed {}: {} data rows", file, rows)
            }
            Diagnostic::NoValidFiles => write!(f, "No valid CSV files found to combine"),
            Diagnostic::Totals { rows, columns } => {
                write!(f, "Total data rows: {}, total columns: {}", rows, columns)
            }
        }
    }
}

pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Writes each diagnostic through `log` at its own level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::log!(diagnostic.level(), "{}", diagnostic);
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
