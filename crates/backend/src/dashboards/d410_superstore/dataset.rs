use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// One order line of the superstore table
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub customer_name: String,
    pub category: String,
    pub sub_category: String,
    /// Full state name as it appears in the source
    pub region: String,
    /// Two-letter code; `None` when the state is not in the lookup table
    pub region_code: Option<String>,
    pub order_date: NaiveDate,
    /// Derived from `order_date`
    pub year: i32,
    pub sales: f64,
    pub profit: f64,
}

impl Record {
    /// Build a record, deriving the order year from the order date
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        customer_name: impl Into<String>,
        category: impl Into<String>,
        sub_category: impl Into<String>,
        region: impl Into<String>,
        region_code: Option<String>,
        order_date: NaiveDate,
        sales: f64,
        profit: f64,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            category: category.into(),
            sub_category: sub_category.into(),
            region: region.into(),
            region_code,
            order_date,
            year: order_date.year(),
            sales,
            profit,
        }
    }
}

/// Immutable, enriched order table plus indexes computed once from all rows
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    customers: Vec<String>,
    years: Vec<i32>,
    categories: Vec<String>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        let customers: BTreeSet<&str> = records.iter().map(|r| r.customer_name.as_str()).collect();
        let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
        let categories: BTreeSet<&str> = records.iter().map(|r| r.category.as_str()).collect();

        let customers = customers.into_iter().map(str::to_string).collect();
        let years = years.into_iter().collect();
        let categories = categories.into_iter().map(str::to_string).collect();

        Self {
            records,
            customers,
            years,
            categories,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct customer names, sorted
    pub fn unique_customers(&self) -> &[String] {
        &self.customers
    }

    /// Distinct order years, ascending
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Rows whose state has no two-letter code
    pub fn unmapped_region_count(&self) -> usize {
        self.records.iter().filter(|r| r.region_code.is_none()).count()
    }
}

/// Shared fixtures for the dashboard unit tests
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn record(
        customer: &str,
        category: &str,
        sub_category: &str,
        state: &str,
        code: Option<&str>,
        order_date: &str,
        sales: f64,
        profit: f64,
    ) -> Record {
        Record::new(
            customer,
            category,
            sub_category,
            state,
            code.map(str::to_string),
            date(order_date),
            sales,
            profit,
        )
    }

    /// Alice/Tech/100/10/2020 and Bob/Tech/50/-5/2021
    pub fn two_customers() -> Dataset {
        Dataset::new(vec![
            record("Alice", "Tech", "Phones", "California", Some("CA"), "2020-03-14", 100.0, 10.0),
            record("Bob", "Tech", "Phones", "Texas", Some("TX"), "2021-07-02", 50.0, -5.0),
        ])
    }

    /// A few customers, three categories, three years, one unmapped state
    pub fn superstore() -> Dataset {
        Dataset::new(vec![
            record("Claire Gute", "Furniture", "Bookcases", "Kentucky", Some("KY"), "2019-11-08", 261.96, 41.91),
            record("Claire Gute", "Furniture", "Chairs", "Kentucky", Some("KY"), "2019-11-08", 731.94, 219.58),
            record("Darrin Van Huff", "Office Supplies", "Labels", "California", Some("CA"), "2019-06-12", 14.62, 6.87),
            record("Sean O'Donnell", "Furniture", "Tables", "Florida", Some("FL"), "2018-10-11", 957.58, -383.03),
            record("Sean O'Donnell", "Office Supplies", "Storage", "Florida", Some("FL"), "2018-10-11", 22.37, 2.52),
            record("Brosina Hoffman", "Technology", "Phones", "California", Some("CA"), "2017-06-09", 907.15, 90.72),
            record("Brosina Hoffman", "Office Supplies", "Binders", "California", Some("CA"), "2017-06-09", 18.50, 5.78),
            record("Andrew Allen", "Office Supplies", "Paper", "North Carolina", Some("NC"), "2017-04-15", 15.55, 5.44),
            record("Irene Maddox", "Technology", "Phones", "Washington", Some("WA"), "2018-12-06", 371.17, 41.96),
            record("Harold Pawlan", "Office Supplies", "Binders", "Puerto Rico", None, "2019-11-22", 22.37, -15.22),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_year_is_derived_from_order_date() {
        let r = record("A", "Tech", "Phones", "Texas", Some("TX"), "2016-02-29", 1.0, 0.0);
        assert_eq!(r.year, 2016);
    }

    #[test]
    fn test_indexes_are_sorted_and_distinct() {
        let ds = superstore();
        assert_eq!(ds.len(), 10);
        assert_eq!(ds.years(), &[2017, 2018, 2019]);
        assert_eq!(
            ds.categories(),
            &["Furniture", "Office Supplies", "Technology"]
        );
        let customers = ds.unique_customers();
        assert_eq!(customers.len(), 7);
        assert!(customers.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ds.unmapped_region_count(), 1);
    }
}
