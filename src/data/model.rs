use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Row – one order line
// ---------------------------------------------------------------------------

/// A single order line (one row of the source CSV).
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// `Sales` column.
    pub sale_amount: f64,
    /// `Profit` column – may be negative.
    pub profit: f64,
    pub category: String,
    pub region: String,
    pub product_name: String,
    pub state: String,
    /// `Order Date` column, when the source carries one.
    pub order_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An immutable, ordered collection of rows sharing one schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
    has_order_date: bool,
}

impl Table {
    pub fn new(rows: Vec<Row>, has_order_date: bool) -> Self {
        Table {
            rows,
            has_order_date,
        }
    }

    /// All rows, in source order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Whether the source had an `Order Date` column.
    pub fn has_order_date(&self) -> bool {
        self.has_order_date
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorted set of distinct regions.
    pub fn regions(&self) -> BTreeSet<String> {
        self.rows.iter().map(|r| r.region.clone()).collect()
    }

    /// Sorted set of distinct categories.
    pub fn categories(&self) -> BTreeSet<String> {
        self.rows.iter().map(|r| r.category.clone()).collect()
    }

    /// Earliest and latest order date, if any row has one.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.rows.iter().filter_map(|r| r.order_date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}

// ---------------------------------------------------------------------------
// Aggregation output
// ---------------------------------------------------------------------------

/// One bar of a ranked grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub key: String,
    pub value: f64,
}

/// Ranked `(key, value)` pairs, sorted by value descending.
pub type Ranking = Vec<RankedEntry>;

/// Everything the dashboard renders for one (table, filter) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationResult {
    pub total_sales: f64,
    pub total_profit: f64,
    pub total_orders: usize,
    pub sales_by_category: Ranking,
    pub profit_by_region: Ranking,
    pub top10_profit_by_product: Ranking,
    pub sales_by_state: Ranking,
}
