use std::collections::BTreeMap;
use std::ops::AddAssign;

use super::dataset::Record;
use super::error::{DashboardError, DashboardResult};

/// Running sums for one group of rows
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub sales: f64,
    pub profit: f64,
    pub rows: usize,
}

impl Totals {
    pub fn of(record: &Record) -> Self {
        Self {
            sales: record.sales,
            profit: record.profit,
            rows: 1,
        }
    }

    /// Sums overflowed or the source carried non-finite amounts
    pub fn ensure_finite(&self, group: &str) -> DashboardResult<()> {
        if self.sales.is_finite() && self.profit.is_finite() {
            Ok(())
        } else {
            Err(DashboardError::Projection(format!(
                "non-finite totals for group {:?}",
                group
            )))
        }
    }
}

impl AddAssign for Totals {
    fn add_assign(&mut self, other: Self) {
        self.sales += other.sales;
        self.profit += other.profit;
        self.rows += other.rows;
    }
}

/// Group rows by `key` and reduce each group by summing `value`.
///
/// Rows for which `key` returns `None` are skipped. Groups come back ordered
/// by key, so every chart built on top of this is deterministic.
pub fn group_sum<'r, I, K, V, KF, VF>(rows: I, key: KF, value: VF) -> BTreeMap<K, V>
where
    I: IntoIterator<Item = &'r Record>,
    K: Ord,
    V: AddAssign + Default,
    KF: Fn(&'r Record) -> Option<K>,
    VF: Fn(&'r Record) -> V,
{
    let mut groups: BTreeMap<K, V> = BTreeMap::new();
    for record in rows {
        let Some(k) = key(record) else {
            continue;
        };
        *groups.entry(k).or_default() += value(record);
    }
    groups
}
