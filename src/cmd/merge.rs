//! Merge command - combine statements and hand the table to the exporter

use crate::cmd::InputArgs;
use crate::export::{export, ExportFormat};
use crate::merge::TableMerger;
use anyhow::Context;
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct MergeCommand {
    #[command(flatten)]
    input: InputArgs,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,

    /// Open the written file with the default application
    #[arg(long)]
    open: bool,
}

impl MergeCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let paths = self.input.paths()?;
        let merger = TableMerger::new(self.input.schema()?);
        let table = merger
            .merge(&paths)
            .context("Error combining CSV files")?;

        let output = match (&self.output, self.open) {
            (Some(path), _) => Some(path.clone()),
            // Nothing to open on stdout, so write next to other temp files
            (None, true) => Some(
                std::env::temp_dir().join(format!("cgc-merged.{}", self.format.extension())),
            ),
            (None, false) => None,
        };

        match output {
            Some(path) => {
                let file = File::create(&path)
                    .with_context(|| format!("Cannot create {}", path.display()))?;
                let mut writer = BufWriter::new(file);
                export(&table, &mut writer, self.format)?;
                writer.flush()?;
                println!("Merged {} rows into {}", table.len(), path.display());
                if self.open {
                    opener::open(&path)?;
                }
            }
            None => {
                let stdout = io::stdout();
                export(&table, stdout.lock(), self.format)?;
            }
        }
        Ok(())
    }
}
