use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::model::{Row, Table};

// ---------------------------------------------------------------------------
// Filter predicate: date interval + region / category inclusion sets
// ---------------------------------------------------------------------------

/// Closed date interval; both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Which rows take part in aggregation.
///
/// Every constraint is optional; a `None` constraint lets every row through.
/// A `Some` set that is empty means nothing is selected, so nothing passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Filter {
    pub date_range: Option<DateRange>,
    pub regions: Option<BTreeSet<String>>,
    pub categories: Option<BTreeSet<String>>,
}

impl Filter {
    /// The identity filter.
    pub fn none() -> Self {
        Filter::default()
    }

    /// Whether no constraint is set.
    pub fn is_identity(&self) -> bool {
        self.date_range.is_none() && self.regions.is_none() && self.categories.is_none()
    }

    /// A row passes when it satisfies every constraint that is set.
    ///
    /// Rows without an order date never satisfy a date constraint.
    pub fn matches(&self, row: &Row) -> bool {
        if let Some(range) = &self.date_range {
            match row.order_date {
                Some(d) if range.contains(d) => {}
                _ => return false,
            }
        }
        if let Some(regions) = &self.regions {
            if !regions.contains(&row.region) {
                return false;
            }
        }
        if let Some(categories) = &self.categories {
            if !categories.contains(&row.category) {
                return false;
            }
        }
        true
    }
}

/// Iterate the rows of `table` that pass `filter`, in table order.
pub fn filtered_rows<'a>(table: &'a Table, filter: &'a Filter) -> impl Iterator<Item = &'a Row> {
    table.rows().iter().filter(move |row| filter.matches(row))
}
