use contracts::dashboards::d410_superstore::ChartData;

use super::aggregation::{group_sum, Totals};
use super::assembler::{assemble, ChartKind, FrameSeries, LayoutOverrides, Series};
use super::dataset::Record;
use super::error::DashboardResult;
use super::filter::FilteredView;
use crate::shared::format::format_amount;

/// Share of the span added on each side of the animated scatter axes
const RANGE_PADDING: f64 = 0.15;

/// Dispatch to the projection behind `kind`
pub fn project(kind: ChartKind, view: &FilteredView) -> DashboardResult<ChartData> {
    match kind {
        ChartKind::TotalSales => total_sales_by_category(view),
        ChartKind::Choropleth => sales_profit_by_region(view),
        ChartKind::Scatter => sales_vs_profit_by_subcategory(view),
        ChartKind::ScatterAnimated => sales_vs_profit_animated(view),
        ChartKind::Pie => share_of_sales_by_category(view),
    }
}

/// Bar chart: summed sales per category
pub fn total_sales_by_category(view: &FilteredView) -> DashboardResult<ChartData> {
    let groups = group_sum(view.iter(), |r| Some(r.category.as_str()), Totals::of);

    let mut labels = Vec::with_capacity(groups.len());
    let mut values = Vec::with_capacity(groups.len());
    for (category, totals) in groups {
        totals.ensure_finite(category)?;
        labels.push(category.to_string());
        values.push(totals.sales);
    }

    Ok(assemble(
        ChartKind::TotalSales,
        vec![Series::Bar { labels, values }],
        LayoutOverrides::default(),
    ))
}

/// State heatmap: summed sales per region code, profit in the hover text.
/// Rows without a region code are left out.
pub fn sales_profit_by_region(view: &FilteredView) -> DashboardResult<ChartData> {
    let groups = group_sum(view.iter(), |r| r.region_code.as_deref(), Totals::of);

    let mut locations = Vec::with_capacity(groups.len());
    let mut values = Vec::with_capacity(groups.len());
    let mut text = Vec::with_capacity(groups.len());
    for (code, totals) in groups {
        totals.ensure_finite(code)?;
        text.push(format!(
            "{}<br>Sales: {}<br>Profit: {}",
            code,
            format_amount(totals.sales),
            format_amount(totals.profit)
        ));
        locations.push(code.to_string());
        values.push(totals.sales);
    }

    Ok(assemble(
        ChartKind::Choropleth,
        vec![Series::Choropleth {
            locations,
            values,
            text,
        }],
        LayoutOverrides::default(),
    ))
}

/// Scatter: one marker series per category, one point per sub-category
pub fn sales_vs_profit_by_subcategory(view: &FilteredView) -> DashboardResult<ChartData> {
    let series = subcategory_series(view.iter())?;
    Ok(assemble(ChartKind::Scatter, series, LayoutOverrides::default()))
}

/// Scatter animated by order year.
///
/// Each frame groups only the rows of its year. Axis ranges are computed
/// once over the points of every frame, so they do not move while playing.
pub fn sales_vs_profit_animated(view: &FilteredView) -> DashboardResult<ChartData> {
    let mut frames = Vec::new();
    let mut xs = Vec::new();
    let mut ys = Vec::new();

    for year in view.years() {
        let series = subcategory_series(view.iter().filter(|r| r.year == year))?;
        for s in &series {
            if let Series::Markers { x, y, .. } = s {
                xs.extend_from_slice(x);
                ys.extend_from_slice(y);
            }
        }
        frames.push(FrameSeries {
            name: year.to_string(),
            series,
        });
    }

    let initial = frames
        .first()
        .map(|f| f.series.clone())
        .unwrap_or_default();

    Ok(assemble(
        ChartKind::ScatterAnimated,
        initial,
        LayoutOverrides {
            x_range: padded_range(&xs),
            y_range: padded_range(&ys),
            frames,
        },
    ))
}

/// Pie: share of summed sales per category; zero-sales categories are omitted
pub fn share_of_sales_by_category(view: &FilteredView) -> DashboardResult<ChartData> {
    let groups = group_sum(view.iter(), |r| Some(r.category.as_str()), Totals::of);

    let mut labels = Vec::new();
    let mut values = Vec::new();
    for (category, totals) in groups {
        totals.ensure_finite(category)?;
        if totals.rows == 0 || totals.sales == 0.0 {
            continue;
        }
        labels.push(category.to_string());
        values.push(totals.sales);
    }

    Ok(assemble(
        ChartKind::Pie,
        vec![Series::Pie { labels, values }],
        LayoutOverrides::default(),
    ))
}

fn subcategory_series<'r, I>(rows: I) -> DashboardResult<Vec<Series>>
where
    I: IntoIterator<Item = &'r Record>,
{
    let groups = group_sum(
        rows,
        |r| Some((r.category.as_str(), r.sub_category.as_str())),
        Totals::of,
    );

    let mut series: Vec<Series> = Vec::new();
    for ((category, sub_category), totals) in groups {
        totals.ensure_finite(sub_category)?;

        // keys arrive sorted, so a new category always starts a new series
        let starts_new = !matches!(series.last(), Some(Series::Markers { name, .. }) if name == category);
        if starts_new {
            series.push(Series::Markers {
                name: category.to_string(),
                x: Vec::new(),
                y: Vec::new(),
                text: Vec::new(),
            });
        }
        if let Some(Series::Markers { x, y, text, .. }) = series.last_mut() {
            x.push(totals.sales);
            y.push(totals.profit);
            text.push(sub_category.to_string());
        }
    }

    Ok(series)
}

/// `[min, max]` widened by `RANGE_PADDING` of the span on both sides
fn padded_range(values: &[f64]) -> Option<[f64; 2]> {
    let (first, rest) = values.split_first()?;
    let (min, max) = rest
        .iter()
        .fold((*first, *first), |(lo, hi), v| (lo.min(*v), hi.max(*v)));

    let span = max - min;
    let pad = if span > 0.0 {
        span * RANGE_PADDING
    } else if min != 0.0 {
        min.abs() * RANGE_PADDING
    } else {
        1.0
    };
    Some([min - pad, max + pad])
}
