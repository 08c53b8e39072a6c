use contracts::dashboards::d410_superstore::FilterRequest;
use serde_json::Value;
use std::collections::BTreeSet;

use super::dataset::{Dataset, Record};
use super::error::{DashboardError, DashboardResult};

// ---------------------------------------------------------------------------
// Filter specification
// ---------------------------------------------------------------------------

/// Inclusive range of order years
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    /// Bounds are reordered if given in reverse
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

/// Typed filter for one dashboard update.
///
/// An empty customer set means "all customers", not "no customers".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    customers: BTreeSet<String>,
    year_range: Option<YearRange>,
}

impl FilterSpec {
    pub fn new<I, S>(customers: I, year_range: Option<YearRange>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            customers: customers.into_iter().map(Into::into).collect(),
            year_range,
        }
    }

    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn customers(&self) -> &BTreeSet<String> {
        &self.customers
    }

    pub fn year_range(&self) -> Option<YearRange> {
        self.year_range
    }

    /// Strict construction: any malformed field is an error
    pub fn try_from_request(request: &FilterRequest) -> DashboardResult<Self> {
        Ok(Self {
            customers: coerce_customers(&request.customers)?,
            year_range: coerce_year_range(&request.year_range)?,
        })
    }

    /// Lenient construction used by the dashboard: a malformed field is
    /// logged and dropped, i.e. treated as "no restriction".
    pub fn from_request(request: &FilterRequest) -> Self {
        let customers = coerce_customers(&request.customers).unwrap_or_else(|e| {
            tracing::warn!("Ignoring customer filter: {}", e);
            BTreeSet::new()
        });
        let year_range = coerce_year_range(&request.year_range).unwrap_or_else(|e| {
            tracing::warn!("Ignoring year filter: {}", e);
            None
        });
        Self {
            customers,
            year_range,
        }
    }

    /// Row passes every active predicate
    pub fn matches(&self, record: &Record) -> bool {
        let customer_ok =
            self.customers.is_empty() || self.customers.contains(&record.customer_name);
        let year_ok = self
            .year_range
            .map_or(true, |range| range.contains(record.year));
        customer_ok && year_ok
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn coerce_customers(value: &Value) -> DashboardResult<BTreeSet<String>> {
    match value {
        Value::Null => Ok(BTreeSet::new()),
        Value::Array(items) => {
            let mut customers = BTreeSet::new();
            for item in items {
                if item.is_null() {
                    continue;
                }
                let name = scalar_to_string(item).ok_or_else(|| {
                    DashboardError::FilterValue(format!("customer must be a scalar, got {}", item))
                })?;
                customers.insert(name);
            }
            Ok(customers)
        }
        Value::Object(_) => Err(DashboardError::FilterValue(format!(
            "customers must be a value or a list, got {}",
            value
        ))),
        scalar => Ok(scalar_to_string(scalar).into_iter().collect()),
    }
}

fn coerce_year(value: &Value) -> DashboardResult<i32> {
    let year = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    year.and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| DashboardError::FilterValue(format!("year must be an integer, got {}", value)))
}

fn coerce_year_range(value: &Value) -> DashboardResult<Option<YearRange>> {
    match value {
        Value::Null => Ok(None),
        Value::Array(bounds) if bounds.len() == 2 => {
            let a = coerce_year(&bounds[0])?;
            let b = coerce_year(&bounds[1])?;
            Ok(Some(YearRange::new(a, b)))
        }
        other => Err(DashboardError::FilterValue(format!(
            "year range must be [min, max], got {}",
            other
        ))),
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Rows of a dataset that passed a filter, in their original order
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    rows: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    pub fn rows(&self) -> &[&'a Record] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_sales(&self) -> f64 {
        self.iter().map(|r| r.sales).sum()
    }

    /// Distinct years present in the view, ascending
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.iter().map(|r| r.year).collect();
        years.into_iter().collect()
    }

    /// Narrow the view to a single order year
    pub fn for_year(&self, year: i32) -> FilteredView<'a> {
        FilteredView {
            rows: self.iter().filter(|r| r.year == year).collect(),
        }
    }
}

/// Apply a filter to the dataset. Never touches the dataset itself.
pub fn apply<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> FilteredView<'a> {
    FilteredView {
        rows: dataset.records().iter().filter(|r| spec.matches(r)).collect(),
    }
}
