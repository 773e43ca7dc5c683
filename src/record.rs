use cgc_derive::CsvSchema;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification of a disposal against 31 July 2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum CutoffTag {
    #[serde(rename = "Before 31 July 2024")]
    Before,
    #[serde(rename = "After 31 July 2024")]
    After,
    /// Sale date was missing or could not be parsed
    #[serde(rename = "Unknown Date")]
    UnknownDate,
}

impl CutoffTag {
    pub fn cutoff_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 31).unwrap()
    }

    /// The cutoff day itself counts as before.
    pub fn for_date(date: Option<NaiveDate>) -> CutoffTag {
        match date {
            Some(date) if date <= Self::cutoff_date() => CutoffTag::Before,
            Some(_) => CutoffTag::After,
            None => CutoffTag::UnknownDate,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CutoffTag::Before => "Before 31 July 2024",
            CutoffTag::After => "After 31 July 2024",
            CutoffTag::UnknownDate => "Unknown Date",
        }
    }
}

impl fmt::Display for CutoffTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the merged capital gains table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, CsvSchema)]
pub struct NormalizedRecord {
    /// Security name followed by its code in brackets
    #[serde(rename = "Security Name (Security Code)")]
    pub security: Option<String>,
    /// Sale date, DD-Mon-YYYY in the source and YYYY-MM-DD once merged
    #[serde(rename = "Date of Sale/Transfer")]
    pub date_of_sale: Option<NaiveDate>,
    /// Holding period class reported by the source, e.g. Short term
    #[serde(rename = "Asset Type")]
    pub asset_type: Option<String>,
    /// Units sold, as reported
    #[serde(rename = "Quantity")]
    pub quantity: Option<String>,
    /// Sale proceeds, empty when the source value is not a number
    #[serde(rename = "Sales Consideration - Reported by Source")]
    #[schemars(with = "Option<String>")]
    pub sales_consideration: Option<Decimal>,
    /// Purchase cost of the units sold
    #[serde(rename = "Cost of Acquisition")]
    #[schemars(with = "Option<String>")]
    pub cost_of_acquisition: Option<Decimal>,
    /// Statement row status, always Active once merged
    #[serde(rename = "Status")]
    pub status: Option<String>,
    /// File name of the statement the row came from
    #[serde(rename = "Data From")]
    pub data_from: String,
    /// Sales consideration minus cost of acquisition, empty if either is
    #[serde(rename = "Sell - Cost")]
    #[schemars(with = "Option<String>")]
    pub sell_minus_cost: Option<Decimal>,
    /// Whether the sale happened on or before 31 July 2024
    #[serde(rename = "31 July 2024")]
    pub cutoff: CutoffTag,
}

impl NormalizedRecord {
    /// True when none of the statement's own columns hold a value.
    pub fn is_empty(&self) -> bool {
        self.security.is_none()
            && self.date_of_sale.is_none()
            && self.asset_type.is_none()
            && self.quantity.is_none()
            && self.sales_consideration.is_none()
            && self.cost_of_acquisition.is_none()
            && self.status.is_none()
    }
}

/// Parse an amount such as `1,23,456.50`, `Ok(None)` when nothing is left
/// after removing thousands separators. Only digits, a sign, a decimal point
/// and an exponent are accepted.
pub fn parse_amount(raw: &str) -> Result<Option<Decimal>, rust_decimal::Error> {
    let stripped: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if stripped.is_empty() {
        return Ok(None);
    }
    let numeric = stripped
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'));
    if !numeric {
        return Err(rust_decimal::Error::ErrorString(format!(
            "invalid amount '{}'",
            raw
        )));
    }
    Decimal::from_str(&stripped)
        .or_else(|_| Decimal::from_scientific(&stripped))
        .map(Some)
}

/// Day-first `DD-Mon-YYYY`, e.g. `15-Aug-2024`.
pub fn parse_sale_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%d-%b-%Y").ok()
}

pub fn difference(sales: Option<Decimal>, cost: Option<Decimal>) -> Option<Decimal> {
    match (sales, cost) {
        (Some(sales), Some(cost)) => sales.checked_sub(cost),
        _ => None,
    }
}
