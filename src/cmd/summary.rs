//! Summary command - gains totals around the 31 July 2024 cutoff

use crate::cmd::InputArgs;
use crate::export::format_amount;
use crate::merge::TableMerger;
use crate::summary::{summarize, Summary};
use anyhow::Context;
use clap::Args;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct SummaryCommand {
    #[command(flatten)]
    input: InputArgs,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Asset Type")]
    asset_type: String,
    #[tabled(rename = "Disposals")]
    rows: usize,
    #[tabled(rename = "Sale")]
    sales_consideration: String,
    #[tabled(rename = "Cost")]
    cost_of_acquisition: String,
    #[tabled(rename = "Gain/Loss")]
    gain: String,
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let paths = self.input.paths()?;
        let table = TableMerger::new(self.input.schema()?)
            .merge(&paths)
            .context("Error combining CSV files")?;
        let summary = summarize(&table)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&summary);
        }
        Ok(())
    }
}

fn print_summary(summary: &Summary) {
    println!();
    println!("CAPITAL GAINS SUMMARY");
    println!();

    if summary.groups.is_empty() {
        println!("No active disposals found");
        return;
    }

    let mut rows: Vec<SummaryRow> = summary
        .groups
        .iter()
        .map(|g| SummaryRow {
            period: g.period.to_string(),
            asset_type: g.asset_type.clone(),
            rows: g.rows,
            sales_consideration: format_amount(Some(g.sales_consideration)),
            cost_of_acquisition: format_amount(Some(g.cost_of_acquisition)),
            gain: format_amount(Some(g.gain)),
        })
        .collect();
    rows.push(SummaryRow {
        period: "Total".to_string(),
        asset_type: String::new(),
        rows: summary.rows,
        sales_consideration: format_amount(Some(summary.sales_consideration)),
        cost_of_acquisition: format_amount(Some(summary.cost_of_acquisition)),
        gain: format_amount(Some(summary.gain)),
    });

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}
