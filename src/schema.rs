//! Recognized input layout of an AIS capital gains statement.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Description of one output column, generated by `#[derive(CsvSchema)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvField {
    pub name: &'static str,
    /// The column can never hold a missing value
    pub always_present: bool,
    pub description: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaConfigError {
    #[error("failed to read schema file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid schema file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("schema column names must be unique, '{0}' appears twice")]
    DuplicateColumn(String),
}

/// Header names of the recognized columns in a source file.
///
/// Field order is the declared column order, which the positional loader
/// relies on. Each header maps onto the canonical output column of the same
/// role, so a variant layout only needs different names here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Schema {
    pub security: String,
    pub date_of_sale: String,
    pub asset_type: String,
    pub quantity: String,
    pub sales_consideration: String,
    pub cost_of_acquisition: String,
    pub status: String,
    /// `Status` value a row must carry to be kept
    pub active_status: String,
}

impl Default for Schema {
    fn default() -> Self {
        Schema {
            security: "Security Name (Security Code)".to_string(),
            date_of_sale: "Date of Sale/Transfer".to_string(),
            asset_type: "Asset Type".to_string(),
            quantity: "Quantity".to_string(),
            sales_consideration: "Sales Consideration - Reported by Source".to_string(),
            cost_of_acquisition: "Cost of Acquisition".to_string(),
            status: "Status".to_string(),
            active_status: "Active".to_string(),
        }
    }
}

/// Role of each recognized column, in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Security,
    DateOfSale,
    AssetType,
    Quantity,
    SalesConsideration,
    CostOfAcquisition,
    Status,
}

impl Column {
    pub const ALL: [Column; Schema::WIDTH] = [
        Column::Security,
        Column::DateOfSale,
        Column::AssetType,
        Column::Quantity,
        Column::SalesConsideration,
        Column::CostOfAcquisition,
        Column::Status,
    ];
}

impl Schema {
    pub const WIDTH: usize = 7;

    /// Load a schema override from JSON, keys left out keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Schema, SchemaConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| SchemaConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let schema: Schema =
            serde_json::from_str(&contents).map_err(|source| SchemaConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        schema.validate()?;
        log::debug!("Loaded schema from {}: {:?}", path.display(), schema);
        Ok(schema)
    }

    /// Default layout unless a schema file is given.
    pub fn load(path: Option<&Path>) -> Result<Schema, SchemaConfigError> {
        match path {
            Some(path) => Schema::from_json_file(path),
            None => Ok(Schema::default()),
        }
    }

    pub fn validate(&self) -> Result<(), SchemaConfigError> {
        let columns = self.columns();
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(SchemaConfigError::DuplicateColumn(column.to_string()));
            }
        }
        Ok(())
    }

    /// Recognized header names in declared order.
    pub fn columns(&self) -> [&str; Schema::WIDTH] {
        Column::ALL.map(|column| self.name(column))
    }

    pub fn name(&self, column: Column) -> &str {
        match column {
            Column::Security => &self.security,
            Column::DateOfSale => &self.date_of_sale,
            Column::AssetType => &self.asset_type,
            Column::Quantity => &self.quantity,
            Column::SalesConsideration => &self.sales_consideration,
            Column::CostOfAcquisition => &self.cost_of_acquisition,
            Column::Status => &self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_columns_in_declared_order() {
        let schema = Schema::default();
        assert_eq!(
            schema.columns(),
            [
                "Security Name (Security Code)",
                "Date of Sale/Transfer",
                "Asset Type",
                "Quantity",
                "Sales Consideration - Reported by Source",
                "Cost of Acquisition",
                "Status",
            ]
        );
        assert_eq!(schema.name(Column::CostOfAcquisition), "Cost of Acquisition");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"status": "State", "active_status": "Open"}}"#).unwrap();

        let schema = Schema::from_json_file(file.path()).unwrap();
        assert_eq!(schema.status, "State");
        assert_eq!(schema.active_status, "Open");
        assert_eq!(schema.quantity, "Quantity");
    }

    #[test]
    fn duplicate_column_rejected() {
        let schema = Schema {
            quantity: "Status".to_string(),
            ..Schema::default()
        };
        assert!(matches!(
            schema.validate(),
            Err(SchemaConfigError::DuplicateColumn(c)) if c == "Status"
        ));
    }

    #[test]
    fn misspelled_key_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"cost_of_aquisition": "Cost"}}"#).unwrap();

        let err = Schema::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, SchemaConfigError::Parse { .. }));
    }

    #[test]
    fn missing_schema_file_is_read_error() {
        let err = Schema::load(Some(Path::new("does/not/exist.json"))).unwrap_err();
        assert!(matches!(err, SchemaConfigError::Read { .. }));
    }
}
