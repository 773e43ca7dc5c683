//! Quick look at a single statement without merging it.

use crate::load::{self, HeaderStrategy};
use crate::schema::Schema;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub file: String,
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    pub file_size: u64,
    /// Hex SHA-256 of the file contents
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{path}: {error}")]
pub struct InspectFailure {
    pub path: String,
    pub error: String,
}

/// Counts rows of a statement using positional column names.
///
/// Unlike the merger this ignores the header line entirely, so it also counts
/// that line as a row and never checks the column names.
pub struct TableInspector {
    schema: Schema,
}

impl Default for TableInspector {
    fn default() -> Self {
        TableInspector::new(Schema::default())
    }
}

impl TableInspector {
    pub fn new(schema: Schema) -> Self {
        TableInspector { schema }
    }

    pub fn inspect(&self, path: &Path) -> Result<FileInfo, InspectFailure> {
        let failure = |error: String| InspectFailure {
            path: path.display().to_string(),
            error,
        };

        let contents = fs::read(path).map_err(|e| failure(e.to_string()))?;
        let table = load::load(&contents, &self.schema, HeaderStrategy::Positional)
            .map_err(|e| failure(e.to_string()))?;
        let rows = table.rows.iter().filter(|row| !row.is_empty()).count();
        let column_names: Vec<String> = self
            .schema
            .columns()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let info = FileInfo {
            file: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            rows,
            columns: column_names.len(),
            column_names,
            file_size: contents.len() as u64,
            sha256: hex::encode(Sha256::digest(&contents)),
        };
        log::debug!("Inspected {}: {:?}", path.display(), info);
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn counts_header_line_as_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("statement.csv");
        let contents = "Capital Gains\nName,Date,Type,Qty,Sale,Cost,Status\nX,02-Jan-2024,Short term,1,10,5,Active\n,,,,,,\nY,03-Jan-2024,Short term,1,10,5,Inactive\n";
        fs::write(&path, contents).unwrap();

        let info = TableInspector::default().inspect(&path).unwrap();

        assert_eq!(info.file, "statement.csv");
        assert_eq!(info.rows, 3);
        assert_eq!(info.columns, 7);
        assert_eq!(info.column_names[0], "Security Name (Security Code)");
        assert_eq!(info.column_names[6], "Status");
        assert_eq!(info.file_size, contents.len() as u64);
        assert_eq!(info.sha256.len(), 64);
    }

    #[test]
    fn same_contents_same_fingerprint() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        fs::write(&a, "banner\nx,y\n").unwrap();
        fs::write(&b, "banner\nx,y\n").unwrap();

        let inspector = TableInspector::default();
        assert_eq!(
            inspector.inspect(&a).unwrap().sha256,
            inspector.inspect(&b).unwrap().sha256
        );
    }

    #[test]
    fn unreadable_file_is_a_failure_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.csv");

        let failure = TableInspector::default().inspect(&path).unwrap_err();
        assert_eq!(failure.path, path.display().to_string());
        assert!(!failure.error.is_empty());
    }

    #[test]
    fn invalid_utf8_is_a_failure_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.csv");
        fs::write(&path, b"banner\n\xff\xfe,abc\n").unwrap();

        assert!(TableInspector::default().inspect(&path).is_err());
    }
}
