//! Inspect command - row/column counts of one statement

use crate::inspect::{FileInfo, TableInspector};
use crate::schema::Schema;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InspectCommand {
    /// Statement CSV file
    file: PathBuf,

    /// JSON file overriding the expected column names
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl InspectCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let inspector = TableInspector::new(Schema::load(self.schema.as_deref())?);

        match inspector.inspect(&self.file) {
            Ok(info) if self.json => println!("{}", serde_json::to_string_pretty(&info)?),
            Ok(info) => print_text(&info),
            Err(failure) => {
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&failure)?);
                } else {
                    log::error!("{}", failure);
                }
                std::process::exit(1);
            }
        }
        Ok(())
    }
}

fn print_text(info: &FileInfo) {
    println!();
    println!("FILE {}", info.file);
    println!();
    println!("  Rows: {} | Columns: {}", info.rows, info.columns);
    println!("  Size: {} bytes", info.file_size);
    println!("  SHA-256: {}", info.sha256);
    println!();
    println!("  Columns by position:");
    for (i, name) in info.column_names.iter().enumerate() {
        println!("    {}. {}", i + 1, name);
    }
}
