use crate::merge::MergedTable;
use crate::record::CutoffTag;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{column} total overflows for {period}, {asset_type}")]
pub struct SummaryError {
    pub period: String,
    pub asset_type: String,
    pub column: &'static str,
}

/// Totals for one (cutoff tag, asset type) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryGroup {
    pub period: CutoffTag,
    pub asset_type: String,
    pub rows: usize,
    pub sales_consideration: Decimal,
    pub cost_of_acquisition: Decimal,
    pub gain: Decimal,
}

impl SummaryGroup {
    fn new(period: CutoffTag, asset_type: String) -> Self {
        SummaryGroup {
            period,
            asset_type,
            rows: 0,
            sales_consideration: Decimal::ZERO,
            cost_of_acquisition: Decimal::ZERO,
            gain: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub groups: Vec<SummaryGroup>,
    pub rows: usize,
    pub sales_consideration: Decimal,
    pub cost_of_acquisition: Decimal,
    pub gain: Decimal,
}

/// Group rows by cutoff tag and asset type, in the order groups first appear.
/// Missing amounts add nothing to a total.
pub fn summarize(table: &MergedTable) -> Result<Summary, SummaryError> {
    let mut groups: Vec<SummaryGroup> = Vec::new();
    for row in table.rows() {
        let asset_type = row.asset_type.as_deref().unwrap_or("Unknown");
        let index = match groups
            .iter()
            .position(|g| g.period == row.cutoff && g.asset_type == asset_type)
        {
            Some(index) => index,
            None => {
                groups.push(SummaryGroup::new(row.cutoff, asset_type.to_string()));
                groups.len() - 1
            }
        };
        let group = &mut groups[index];
        group.rows += 1;
        let overflow = |column| SummaryError {
            period: group.period.to_string(),
            asset_type: group.asset_type.clone(),
            column,
        };
        let sales = add(group.sales_consideration, row.sales_consideration)
            .ok_or_else(|| overflow("Sales Consideration"))?;
        let cost = add(group.cost_of_acquisition, row.cost_of_acquisition)
            .ok_or_else(|| overflow("Cost of Acquisition"))?;
        let gain = add(group.gain, row.sell_minus_cost).ok_or_else(|| overflow("Sell - Cost"))?;
        group.rows += 1;
        group.sales_consideration = sales;
        group.cost_of_acquisition = cost;
        group.gain = gain;
    }

    let mut summary = Summary {
        groups: Vec::new(),
        rows: 0,
        sales_consideration: Decimal::ZERO,
        cost_of_acquisition: Decimal::ZERO,
        gain: Decimal::ZERO,
    };
    for group in &groups {
        let overflow = |column| SummaryError {
            period: "Total".to_string(),
            asset_type: String::new(),
            column,
        };
        summary.rows += group.rows;
        summary.sales_consideration = summary
            .sales_consideration
            .checked_add(group.sales_consideration)
            .ok_or_else(|| overflow("Sales Consideration"))?;
        summary.cost_of_acquisition = summary
            .cost_of_acquisition
            .checked_add(group.cost_of_acquisition)
            .ok_or_else(|| overflow("Cost of Acquisition"))?;
        summary.gain = summary
            .gain
            .checked_add(group.gain)
            .ok_or_else(|| overflow("Sell - Cost"))?;
    }
    summary.groups = groups;
    Ok(summary)
}

fn add(total: Decimal, amount: Option<Decimal>) -> Option<Decimal> {
    total.checked_add(amount.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostic;
    use crate::merge::TableMerger;
    use rust_decimal_macros::dec;
    use std::fs;
    use tempfile::TempDir;

    fn merged(rows: &[&str]) -> MergedTable {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("s.csv");
        let mut contents = "banner\nSecurity Name (Security Code),Date of Sale/Transfer,Asset Type,Quantity,Sales Consideration - Reported by Source,Cost of Acquisition,Status\n".to_string();
        for row in rows {
            contents.push_str(row);
            contents.push('\n');
        }
        fs::write(&path, contents).unwrap();
        TableMerger::default()
            .merge_with(&[path], &mut Vec::<Diagnostic>::new())
            .unwrap()
    }

    #[test]
    fn groups_by_period_and_asset_type() {
        let table = merged(&[
            "A (A),01-Jul-2024,Short term,1,1000,800,Active",
            "B (B),15-Aug-2024,Short term,1,500,700,Active",
            "C (C),02-Jul-2024,Short term,1,300,100,Active",
            "D (D),20-Aug-2024,Long term,1,n/a,100,Active",
        ]);

        let summary = summarize(&table).unwrap();

        assert_eq!(summary.groups.len(), 3);
        let before = &summary.groups[0];
        assert_eq!(before.period, CutoffTag::Before);
        assert_eq!(before.asset_type, "Short term");
        assert_eq!(before.rows, 2);
        assert_eq!(before.gain, dec!(400));

        let after = &summary.groups[1];
        assert_eq!(after.period, CutoffTag::After);
        assert_eq!(after.gain, dec!(-200));

        let long = &summary.groups[2];
        assert_eq!(long.sales_consideration, dec!(0));
        assert_eq!(long.cost_of_acquisition, dec!(100));
        assert_eq!(long.gain, dec!(0));

        assert_eq!(summary.rows, 4);
        assert_eq!(summary.sales_consideration, dec!(1800));
        assert_eq!(summary.cost_of_acquisition, dec!(1700));
        assert_eq!(summary.gain, dec!(200));
    }

    #[test]
    fn empty_table_has_zero_totals() {
        let summary = summarize(&MergedTable::default()).unwrap();
        assert!(summary.groups.is_empty());
        assert_eq!(summary.gain, Decimal::ZERO);
    }

    #[test]
    fn overflowing_total_is_an_error() {
        let table = merged(&[
            "A (A),01-Jul-2024,Short term,1,50000000000000000000000000000,1,Active",
            "B (B),02-Jul-2024,Short term,1,50000000000000000000000000000,1,Active",
        ]);
        assert_eq!(table.len(), 2);

        let err = summarize(&table).unwrap_err();
        assert_eq!(err.column, "Sales Consideration");
        assert_eq!(err.asset_type, "Short term");
    }

    #[test]
    fn overflowing_grand_total_is_an_error() {
        let table = merged(&[
            "A (A),01-Jul-2024,Short term,1,1,-50000000000000000000000000000,Active",
            "B (B),02-Aug-2024,Short term,1,1,-50000000000000000000000000000,Active",
        ]);

        let err = summarize(&table).unwrap_err();
        assert_eq!(err.period, "Total");
        assert_eq!(err.column, "Cost of Acquisition");
    }
}
