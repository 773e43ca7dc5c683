pub mod inspect;
pub mod merge;
pub mod schema;
pub mod summary;

use crate::schema::Schema;
use clap::Args;
use glob::{glob, Pattern};
use std::path::{Path, PathBuf};

/// Statement files to merge, shared by `merge` and `summary`
#[derive(Args, Debug)]
pub struct InputArgs {
    /// AIS capital gains CSV files, merged in the given order
    files: Vec<PathBuf>,

    /// Also merge every *.csv file in this directory (sorted by name)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// JSON file overriding the expected column names
    #[arg(short, long)]
    schema: Option<PathBuf>,
}

impl InputArgs {
    pub fn schema(&self) -> anyhow::Result<Schema> {
        Ok(Schema::load(self.schema.as_deref())?)
    }

    /// Explicit files first, then the directory listing.
    pub fn paths(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut paths = self.files.clone();
        if let Some(dir) = &self.dir {
            let found = csv_files(dir)?;
            log::info!("Found {} csv files in {}", found.len(), dir.display());
            paths.extend(found);
        }
        if paths.is_empty() {
            anyhow::bail!("Please select CSV files to merge (pass FILES or --dir)");
        }
        Ok(paths)
    }
}

/// `*.csv` entries of `dir`, sorted by name; unreadable entries are skipped.
fn csv_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = format!("{}/*.csv", Pattern::escape(&dir.to_string_lossy()));
    let mut found = Vec::new();
    for entry in glob(&pattern)? {
        match entry {
            Ok(path) => found.push(path),
            Err(err) => log::warn!("Skipping {}: {}", err.path().display(), err.error()),
        }
    }
    Ok(found)
}
