//! Rendering a merged table for the spreadsheet step.

use crate::merge::MergedTable;
use crate::record::NormalizedRecord;
use rust_decimal::Decimal;
use std::io::Write;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    /// Comma separated values with a header row
    #[default]
    Csv,
    /// JSON array of row objects keyed by column name
    Json,
    /// Formatted table for the terminal
    Table,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Table => "txt",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

pub fn export<W: Write>(
    table: &MergedTable,
    mut writer: W,
    format: ExportFormat,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => write_csv(table, writer),
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, table)?;
            writeln!(writer)?;
            Ok(())
        }
        ExportFormat::Table => {
            if table.is_empty() {
                writeln!(writer, "No rows to display")?;
            } else {
                writeln!(writer, "{}", render_table(table))?;
            }
            Ok(())
        }
    }
}

/// The header is written even when there are no rows.
fn write_csv<W: Write>(table: &MergedTable, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Clone, Tabled)]
struct TableRow {
    #[tabled(rename = "Security")]
    security: String,
    #[tabled(rename = "Sold On")]
    date_of_sale: String,
    #[tabled(rename = "Asset Type")]
    asset_type: String,
    #[tabled(rename = "Qty")]
    quantity: String,
    #[tabled(rename = "Sale")]
    sales_consideration: String,
    #[tabled(rename = "Cost")]
    cost_of_acquisition: String,
    #[tabled(rename = "Sell - Cost")]
    sell_minus_cost: String,
    #[tabled(rename = "31 July 2024")]
    cutoff: String,
    #[tabled(rename = "Data From")]
    data_from: String,
}

impl From<&NormalizedRecord> for TableRow {
    fn from(record: &NormalizedRecord) -> Self {
        TableRow {
            security: record.security.clone().unwrap_or_default(),
            date_of_sale: record
                .date_of_sale
                .map(|d| d.format("%d-%b-%Y").to_string())
                .unwrap_or_default(),
            asset_type: record.asset_type.clone().unwrap_or_default(),
            quantity: record.quantity.clone().unwrap_or_default(),
            sales_consideration: format_amount(record.sales_consideration),
            cost_of_acquisition: format_amount(record.cost_of_acquisition),
            sell_minus_cost: format_amount(record.sell_minus_cost),
            cutoff: record.cutoff.to_string(),
            data_from: record.data_from.clone(),
        }
    }
}

pub fn format_amount(amount: Option<Decimal>) -> String {
    amount.map(|a| format!("{:.2}", a)).unwrap_or_default()
}

fn render_table(table: &MergedTable) -> String {
    let rows: Vec<TableRow> = table.rows().iter().map(TableRow::from).collect();
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..7)).with(Alignment::right()))
        .to_string()
}
