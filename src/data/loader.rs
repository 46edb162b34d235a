use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::{ByteRecord, ReaderBuilder};
use thiserror::Error;

use super::model::{Row, Table};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const COL_SALES: &str = "Sales";
pub const COL_PROFIT: &str = "Profit";
pub const COL_CATEGORY: &str = "Category";
pub const COL_REGION: &str = "Region";
pub const COL_PRODUCT: &str = "Product Name";
pub const COL_STATE: &str = "State";
pub const COL_ORDER_DATE: &str = "Order Date";

// ---------------------------------------------------------------------------
// Errors / options
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: '{column}' value '{value}' is not a number")]
    NotNumeric {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("row {row}: cannot parse order date '{value}'")]
    BadDate { row: usize, value: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LoadOptions {
    /// Fail when the `Order Date` column is absent or a value cannot be parsed.
    pub require_order_date: bool,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a sales table from a CSV file on disk.
pub fn load_path(path: &Path, options: LoadOptions) -> Result<Table, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_bytes(&bytes, options)
}

/// Load a sales table from raw CSV bytes.
///
/// Every field is decoded as Latin-1, so any byte sequence decodes; only
/// structural CSV problems, missing columns and bad values are rejected.
pub fn load_bytes(bytes: &[u8], options: LoadOptions) -> Result<Table, LoadError> {
    let mut reader = ReaderBuilder::new().from_reader(bytes);
    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| latin1(h).trim().to_string())
        .collect();

    let columns = ColumnIndex::locate(&headers, options)?;
    let mut rows = Vec::new();
    let mut record = ByteRecord::new();
    let mut row_no = 0;

    while reader.read_byte_record(&mut record)? {
        row_no += 1;
        rows.push(columns.parse_row(&record, row_no, options)?);
    }

    log::debug!("parsed {} rows ({} columns)", rows.len(), headers.len());
    Ok(Table::new(rows, columns.order_date.is_some()))
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

struct ColumnIndex {
    sales: usize,
    profit: usize,
    category: usize,
    region: usize,
    product: usize,
    state: usize,
    order_date: Option<usize>,
}

impl ColumnIndex {
    fn locate(headers: &[String], options: LoadOptions) -> Result<Self, LoadError> {
        let find = |name: &'static str| headers.iter().position(|h| h == name);
        let require = |name: &'static str| find(name).ok_or(LoadError::MissingColumn(name));

        let order_date = find(COL_ORDER_DATE);
        if options.require_order_date && order_date.is_none() {
            return Err(LoadError::MissingColumn(COL_ORDER_DATE));
        }

        Ok(ColumnIndex {
            sales: require(COL_SALES)?,
            profit: require(COL_PROFIT)?,
            category: require(COL_CATEGORY)?,
            region: require(COL_REGION)?,
            product: require(COL_PRODUCT)?,
            state: require(COL_STATE)?,
            order_date,
        })
    }

    fn parse_row(
        &self,
        record: &ByteRecord,
        row: usize,
        options: LoadOptions,
    ) -> Result<Row, LoadError> {
        let field = |idx: usize| latin1(record.get(idx).unwrap_or_default());

        let order_date = match self.order_date {
            Some(idx) => {
                let raw = field(idx);
                match parse_date(&raw) {
                    Some(d) => Some(d),
                    None if options.require_order_date => {
                        return Err(LoadError::BadDate { row, value: raw });
                    }
                    None => None,
                }
            }
            None => None,
        };

        Ok(Row {
            sale_amount: parse_number(&field(self.sales), row, COL_SALES)?,
            profit: parse_number(&field(self.profit), row, COL_PROFIT)?,
            category: field(self.category),
            region: field(self.region),
            product_name: field(self.product),
            state: field(self.state),
            order_date,
        })
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn parse_number(s: &str, row: usize, column: &'static str) -> Result<f64, LoadError> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LoadError::NotNumeric {
            row,
            column,
            value: s.to_string(),
        })
}

/// Two-digit year forms come before their four-digit twins so `1/2/21`
/// reads as 2021 rather than year 21.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%Y/%m/%d",
    "%d.%m.%Y",
];

/// Tolerant calendar-date parser. Month-first for ambiguous forms; any
/// trailing time component is ignored.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let date_part = s.split([' ', 'T']).next().unwrap_or(s);
    if date_part.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Row ID,Order Date,Region,State,Category,Product Name,Sales,Profit\n";

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn with_dates() -> LoadOptions {
        LoadOptions {
            require_order_date: true,
        }
    }

    #[test]
    fn test_load_basic_table() {
        let csv = format!(
            "{HEADER}\
             1,11/8/2016,South,Kentucky,Furniture,Bookcase,261.96,41.9136\n\
             2,6/12/2016,West,California,Office Supplies,\"Labels, 3 pack\",14.62,-6.87\n"
        );
        let table = load_bytes(csv.as_bytes(), with_dates()).unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.has_order_date());
        let first = &table.rows()[0];
        assert_eq!(first.sale_amount, 261.96);
        assert_eq!(first.profit, 41.9136);
        assert_eq!(first.category, "Furniture");
        assert_eq!(first.region, "South");
        assert_eq!(first.state, "Kentucky");
        assert_eq!(first.product_name, "Bookcase");
        assert_eq!(first.order_date, Some(ymd(2016, 11, 8)));
        let second = &table.rows()[1];
        assert_eq!(second.product_name, "Labels, 3 pack");
        assert_eq!(second.profit, -6.87);
    }

    #[test]
    fn test_preserves_row_order_and_duplicates() {
        let csv = format!(
            "{HEADER}\
             1,1/1/2020,East,Ohio,Technology,Phone,10,1\n\
             1,1/1/2020,East,Ohio,Technology,Phone,10,1\n\
             2,1/1/2020,West,Utah,Furniture,Chair,5,1\n"
        );
        let table = load_bytes(csv.as_bytes(), with_dates()).unwrap();
        let products: Vec<_> = table.rows().iter().map(|r| r.product_name.as_str()).collect();
        assert_eq!(products, vec!["Phone", "Phone", "Chair"]);
    }

    #[test]
    fn test_latin1_product_name_survives() {
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"1,1/1/2020,East,Ohio,Technology,Caf\xe9 Chair \xae,10,1\n");

        let table = load_bytes(&bytes, with_dates()).unwrap();
        assert_eq!(table.rows()[0].product_name, "Café Chair ®");
        let round_trip: Vec<u8> = table.rows()[0]
            .product_name
            .chars()
            .map(|c| c as u32 as u8)
            .collect();
        assert_eq!(round_trip, b"Caf\xe9 Chair \xae");
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Order Date,Region,State,Category,Product Name,Profit\n";
        let err = load_bytes(csv.as_bytes(), with_dates()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("Sales")));
    }

    #[test]
    fn test_missing_date_column_only_fails_when_required() {
        let csv = "Region,State,Category,Product Name,Sales,Profit\nEast,Ohio,A,P,1,2\n";
        let err = load_bytes(csv.as_bytes(), with_dates()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("Order Date")));

        let table = load_bytes(csv.as_bytes(), LoadOptions::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table.has_order_date());
        assert_eq!(table.rows()[0].order_date, None);
    }

    #[test]
    fn test_empty_input_is_missing_columns() {
        let err = load_bytes(b"", LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(_)));
    }

    #[test]
    fn test_non_numeric_sales_is_an_error() {
        let csv = format!(
            "{HEADER}\
             1,1/1/2020,East,Ohio,Technology,Phone,10,1\n\
             2,1/1/2020,East,Ohio,Technology,Phone,ten,1\n"
        );
        let err = load_bytes(csv.as_bytes(), with_dates()).unwrap_err();
        match err {
            LoadError::NotNumeric { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Sales");
                assert_eq!(value, "ten");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_and_non_finite_profit_rejected() {
        for bad in ["", "NaN", "inf"] {
            let csv = format!("{HEADER}1,1/1/2020,East,Ohio,Technology,Phone,10,{bad}\n");
            let err = load_bytes(csv.as_bytes(), with_dates()).unwrap_err();
            assert!(
                matches!(err, LoadError::NotNumeric { column: "Profit", .. }),
                "{bad:?} accepted"
            );
        }
    }

    #[test]
    fn test_bad_date_is_an_error_when_required() {
        let csv = format!("{HEADER}1,someday,East,Ohio,Technology,Phone,10,1\n");
        let err = load_bytes(csv.as_bytes(), with_dates()).unwrap_err();
        assert!(matches!(err, LoadError::BadDate { row: 1, .. }));

        let table = load_bytes(csv.as_bytes(), LoadOptions::default()).unwrap();
        assert_eq!(table.rows()[0].order_date, None);
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let csv = format!("{HEADER}1,1/1/2020,East,Ohio\n");
        let err = load_bytes(csv.as_bytes(), with_dates()).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn test_headers_are_trimmed() {
        let csv = " Sales , Profit ,Category,Region,Product Name,State\n1,2,A,B,C,D\n";
        let table = load_bytes(csv.as_bytes(), LoadOptions::default()).unwrap();
        assert_eq!(table.rows()[0].sale_amount, 1.0);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2016-11-08"), Some(ymd(2016, 11, 8)));
        assert_eq!(parse_date("11/8/2016"), Some(ymd(2016, 11, 8)));
        assert_eq!(parse_date("11/08/16"), Some(ymd(2016, 11, 8)));
        assert_eq!(parse_date("1/2/21"), Some(ymd(2021, 1, 2)));
        assert_eq!(parse_date("11-08-2016"), Some(ymd(2016, 11, 8)));
        assert_eq!(parse_date("2016/11/08"), Some(ymd(2016, 11, 8)));
        assert_eq!(parse_date("31.12.2016"), Some(ymd(2016, 12, 31)));
        assert_eq!(parse_date("11/8/2016 0:00"), Some(ymd(2016, 11, 8)));
        assert_eq!(parse_date("2016-11-08T10:30:00"), Some(ymd(2016, 11, 8)));
        assert_eq!(parse_date(" 2016-11-08 "), Some(ymd(2016, 11, 8)));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("tomorrow"), None);
        assert_eq!(parse_date("13/45/2016"), None);
    }

    #[test]
    fn test_load_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, format!("{HEADER}1,1/1/2020,East,Ohio,A,P,3.5,1\n")).unwrap();

        let table = load_path(&path, with_dates()).unwrap();
        assert_eq!(table.rows()[0].sale_amount, 3.5);

        let err = load_path(&dir.path().join("nope.csv"), with_dates()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
