use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::path::Path;

use super::dataset::{Dataset, Record};
use super::error::{DashboardError, DashboardResult};

/// Full state name -> two-letter code
pub type RegionCodes = HashMap<String, String>;

const COL_CUSTOMER: &str = "Customer Name";
const COL_CATEGORY: &str = "Category";
const COL_SUB_CATEGORY: &str = "Sub-Category";
const COL_STATE: &str = "State";
const COL_ORDER_DATE: &str = "Order Date";
const COL_SALES: &str = "Sales";
const COL_PROFIT: &str = "Profit";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Load the order table and the region code lookup from disk.
///
/// Called once at startup; any error here is fatal for the process.
pub fn load(orders_path: &Path, region_codes_path: &Path) -> DashboardResult<Dataset> {
    let region_codes = load_region_codes(region_codes_path)?;

    let text = std::fs::read_to_string(orders_path).map_err(|e| {
        DashboardError::DataSource(format!("cannot read {}: {}", orders_path.display(), e))
    })?;
    let dataset = Dataset::from_sources(&text, &region_codes)?;

    tracing::info!(
        "Loaded {} order lines ({} customers, years {:?}) from {}",
        dataset.len(),
        dataset.unique_customers().len(),
        dataset.years(),
        orders_path.display()
    );
    let unmapped = dataset.unmapped_region_count();
    if unmapped > 0 {
        tracing::warn!("{} order lines have a state without region code", unmapped);
    }

    Ok(dataset)
}

pub fn load_region_codes(path: &Path) -> DashboardResult<RegionCodes> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        DashboardError::ConfigData(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_region_codes(&text)
}

pub fn parse_region_codes(text: &str) -> DashboardResult<RegionCodes> {
    serde_json::from_str(text)
        .map_err(|e| DashboardError::ConfigData(format!("invalid region code table: {}", e)))
}

impl Dataset {
    /// Build the enriched table from CSV text and an already parsed lookup table
    pub fn from_sources(csv_text: &str, region_codes: &RegionCodes) -> DashboardResult<Self> {
        // Strip UTF-8 BOM if present
        let text = csv_text.trim_start_matches('\u{FEFF}');

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| DashboardError::DataSource(format!("cannot read CSV headers: {}", e)))?
            .clone();
        let columns = Columns::resolve(&headers)?;

        let mut records = Vec::new();
        for (i, result) in reader.records().enumerate() {
            // header occupies line 1
            let line = i + 2;
            let row = result.map_err(|e| {
                DashboardError::DataSource(format!("malformed record at line {}: {}", line, e))
            })?;
            records.push(columns.parse(&row, line, region_codes)?);
        }

        Ok(Dataset::new(records))
    }
}

/// Positions of the required columns in the header row
struct Columns {
    customer: usize,
    category: usize,
    sub_category: usize,
    state: usize,
    order_date: usize,
    sales: usize,
    profit: usize,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> DashboardResult<Self> {
        let mut missing = Vec::new();
        let mut find = |name: &'static str| {
            let pos = headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
            if pos.is_none() {
                missing.push(name);
            }
            pos.unwrap_or(0)
        };

        let columns = Columns {
            customer: find(COL_CUSTOMER),
            category: find(COL_CATEGORY),
            sub_category: find(COL_SUB_CATEGORY),
            state: find(COL_STATE),
            order_date: find(COL_ORDER_DATE),
            sales: find(COL_SALES),
            profit: find(COL_PROFIT),
        };

        if !missing.is_empty() {
            return Err(DashboardError::DataSource(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }
        Ok(columns)
    }

    fn parse(
        &self,
        row: &csv::StringRecord,
        line: usize,
        region_codes: &RegionCodes,
    ) -> DashboardResult<Record> {
        let get = |i: usize| row.get(i).map(str::trim).unwrap_or("");

        let state = get(self.state);
        let raw_date = get(self.order_date);
        let order_date = parse_order_date(raw_date).ok_or_else(|| {
            DashboardError::DataSource(format!(
                "unparseable order date {:?} at line {}",
                raw_date, line
            ))
        })?;

        Ok(Record::new(
            get(self.customer),
            get(self.category),
            get(self.sub_category),
            state,
            region_codes.get(state).cloned(),
            order_date,
            parse_amount(get(self.sales), COL_SALES, line)?,
            parse_amount(get(self.profit), COL_PROFIT, line)?,
        ))
    }
}

fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.date())
        })
}

fn parse_amount(raw: &str, column: &str, line: usize) -> DashboardResult<f64> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(DashboardError::DataSource(format!(
            "invalid {} value {:?} at line {}",
            column, raw, line
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;

    const HEADER: &str = "Row ID,Order Date,Customer Name,State,Category,Sub-Category,Sales,Profit";

    fn codes() -> RegionCodes {
        hashmap! {
            "California".to_string() => "CA".to_string(),
            "Texas".to_string() => "TX".to_string(),
        }
    }

    #[test]
    fn test_loads_and_enriches_rows() {
        let csv = format!(
            "{}\n1,2016-11-08,Claire Gute,California,Furniture,Chairs,731.94,219.58\n\
             2,6/12/2017,Darrin Van Huff,Texas,Office Supplies,Labels,14.62,-6.87\n\
             3,11.10.2015,Sean O'Donnell,Guam,Technology,Phones,22.37,2.52\n",
            HEADER
        );
        let ds = Dataset::from_sources(&csv, &codes()).unwrap();

        assert_eq!(ds.len(), 3);
        let rows = ds.records();
        assert_eq!(rows[0].region_code.as_deref(), Some("CA"));
        assert_eq!(rows[0].year, 2016);
        assert_eq!(rows[1].year, 2017);
        assert_eq!(rows[1].profit, -6.87);
        assert_eq!(rows[2].region_code, None);
        assert_eq!(rows[2].year, 2015);
        assert_eq!(ds.years(), &[2015, 2016, 2017]);
    }

    #[test]
    fn test_bom_and_header_case_are_tolerated() {
        let csv = "\u{FEFF}customer name,category,sub-category,state,order date,sales,profit\n\
                   Alice,Tech,Phones,Texas,2020-01-01 10:30:00,10,1\n";
        let ds = Dataset::from_sources(csv, &codes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].customer_name, "Alice");
        assert_eq!(ds.records()[0].year, 2020);
    }

    #[test]
    fn test_missing_column_is_data_source_error() {
        let csv = "Customer Name,Category,State,Order Date,Sales,Profit\nA,Tech,Texas,2020-01-01,1,1\n";
        let err = Dataset::from_sources(csv, &codes()).unwrap_err();
        match err {
            DashboardError::DataSource(msg) => assert!(msg.contains("Sub-Category")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_date_is_data_source_error() {
        let csv = format!("{}\n1,not-a-date,A,Texas,Tech,Phones,1,1\n", HEADER);
        let err = Dataset::from_sources(&csv, &codes()).unwrap_err();
        match err {
            DashboardError::DataSource(msg) => assert!(msg.contains("line 2")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_amount_is_data_source_error() {
        let csv = format!("{}\n1,2020-01-01,A,Texas,Tech,Phones,NaN,1\n", HEADER);
        assert!(matches!(
            Dataset::from_sources(&csv, &codes()),
            Err(DashboardError::DataSource(_))
        ));
    }

    #[test]
    fn test_region_codes_must_be_valid_json() {
        let codes = parse_region_codes(r#"{"Texas": "TX", "Ohio": "OH"}"#).unwrap();
        assert_eq!(codes.get("Ohio").map(String::as_str), Some("OH"));

        assert!(matches!(
            parse_region_codes("{ not json"),
            Err(DashboardError::ConfigData(_))
        ));
    }

    #[test]
    fn test_missing_files_map_to_their_error_kinds() {
        let missing = Path::new("definitely/not/here.json");
        assert!(matches!(
            load_region_codes(missing),
            Err(DashboardError::ConfigData(_))
        ));

        let dir = std::env::temp_dir().join("d410_loader_missing_orders");
        std::fs::create_dir_all(&dir).unwrap();
        let codes_path = dir.join("states.json");
        std::fs::write(&codes_path, r#"{"Texas": "TX"}"#).unwrap();
        assert!(matches!(
            load(&dir.join("orders.csv"), &codes_path),
            Err(DashboardError::DataSource(_))
        ));
    }
}
