use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::chart::ChartData;

/// Filter payload sent by the dashboard on every interaction.
///
/// Fields are kept as raw JSON because the dropdown may send a single value,
/// a list, or numeric customer identifiers. The backend coerces them into a
/// typed filter before any aggregation runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    /// Selected customers; empty or missing means "all customers"
    #[serde(default)]
    pub customers: Value,
    /// Inclusive `[min_year, max_year]`, missing means "all years"
    #[serde(default)]
    pub year_range: Value,
}

/// Values for populating the customer dropdown and the year slider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub customers: Vec<String>,
    pub years: Vec<i32>,
    pub categories: Vec<String>,
}

/// Every chart of the dashboard computed against one filtered view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    /// Number of order lines that passed the filter
    pub row_count: usize,
    pub total_sales: ChartData,
    pub choropleth: ChartData,
    pub scatter: ChartData,
    pub scatter_animated: ChartData,
    pub pie: ChartData,
}
