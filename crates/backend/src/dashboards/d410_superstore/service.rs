use contracts::dashboards::d410_superstore::{
    ChartData, DashboardResponse, FilterOptions, FilterRequest,
};
use std::path::Path;

use super::assembler::{empty_chart, ChartKind};
use super::dataset::Dataset;
use super::error::DashboardResult;
use super::filter::{apply, FilterSpec, FilteredView};
use super::{loader, projections};

/// Dataset loaded once at startup and shared by every request
pub struct DashboardContext {
    dataset: Dataset,
}

impl DashboardContext {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn load(orders_path: &Path, region_codes_path: &Path) -> DashboardResult<Self> {
        loader::load(orders_path, region_codes_path).map(Self::new)
    }

    /// Values for the customer dropdown and the year slider
    pub fn options(&self) -> FilterOptions {
        FilterOptions {
            customers: self.dataset.unique_customers().to_vec(),
            years: self.dataset.years().to_vec(),
            categories: self.dataset.categories().to_vec(),
        }
    }

    pub fn filter(&self, request: &FilterRequest) -> FilteredView<'_> {
        let spec = FilterSpec::from_request(request);
        apply(&self.dataset, &spec)
    }

    /// One chart for one filter change
    pub fn chart(&self, kind: ChartKind, request: &FilterRequest) -> ChartData {
        let view = self.filter(request);
        render(kind, &view)
    }

    /// Every chart computed against the same filtered view
    pub fn dashboard(&self, request: &FilterRequest) -> DashboardResponse {
        let view = self.filter(request);
        tracing::debug!("Dashboard filter kept {} of {} rows", view.len(), self.dataset.len());

        DashboardResponse {
            row_count: view.len(),
            total_sales: render(ChartKind::TotalSales, &view),
            choropleth: render(ChartKind::Choropleth, &view),
            scatter: render(ChartKind::Scatter, &view),
            scatter_animated: render(ChartKind::ScatterAnimated, &view),
            pie: render(ChartKind::Pie, &view),
        }
    }
}

/// Projection failures never reach the client: the chart is returned empty
fn render(kind: ChartKind, view: &FilteredView) -> ChartData {
    match projections::project(kind, view) {
        Ok(chart) => chart,
        Err(e) => {
            tracing::warn!("chart {} compute error: {e:#}", kind.slug());
            empty_chart(kind)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d410_superstore::dataset::fixtures::*;
    use contracts::dashboards::d410_superstore::Trace;
    use serde_json::json;

    #[test]
    fn test_options_come_from_full_dataset() {
        let ctx = DashboardContext::new(superstore());
        let options = ctx.options();
        assert_eq!(options.years, vec![2017, 2018, 2019]);
        assert_eq!(options.customers.len(), 7);
        assert_eq!(options.categories.len(), 3);
    }

    #[test]
    fn test_dashboard_uses_one_view_for_all_charts() {
        let ctx = DashboardContext::new(two_customers());
        let request = FilterRequest {
            customers: json!("Alice"),
            year_range: json!(null),
        };
        let response = ctx.dashboard(&request);
        assert_eq!(response.row_count, 1);
        match &response.total_sales.data[..] {
            [Trace::Bar(bar)] => assert_eq!(bar.y, vec![100.0]),
            other => panic!("unexpected traces {other:?}"),
        }
        assert_eq!(response.scatter_animated.frames.len(), 1);
    }

    #[test]
    fn test_malformed_filter_falls_back_to_all_rows() {
        let ctx = DashboardContext::new(two_customers());
        let request = FilterRequest {
            customers: json!({"id": 1}),
            year_range: json!("last year"),
        };
        assert_eq!(ctx.filter(&request).len(), 2);
        assert_eq!(ctx.dashboard(&request).row_count, 2);
    }

    #[test]
    fn test_projection_failure_yields_empty_chart() {
        let ctx = DashboardContext::new(Dataset::new(vec![record(
            "A", "Tech", "Phones", "Texas", Some("TX"), "2020-01-01", f64::NAN, 0.0,
        )]));
        let chart = ctx.chart(ChartKind::Pie, &FilterRequest::default());
        assert_eq!(chart, empty_chart(ChartKind::Pie));
        assert!(chart.data.is_empty());
        assert_eq!(chart.layout.title.as_deref(), Some("Share of Sales by Category"));
    }
}
