use std::collections::HashMap;

use super::filter::{filtered_rows, Filter};
use super::model::{AggregationResult, RankedEntry, Ranking, Row, Table};

// ---------------------------------------------------------------------------
// Grouping parameters
// ---------------------------------------------------------------------------

/// Categorical field a grouping partitions by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Category,
    Region,
    Product,
    State,
}

impl GroupKey {
    fn of(self, row: &Row) -> &str {
        match self {
            GroupKey::Category => &row.category,
            GroupKey::Region => &row.region,
            GroupKey::Product => &row.product_name,
            GroupKey::State => &row.state,
        }
    }
}

/// Numeric field a grouping sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Sales,
    Profit,
}

impl Measure {
    fn of(self, row: &Row) -> f64 {
        match self {
            Measure::Sales => row.sale_amount,
            Measure::Profit => row.profit,
        }
    }
}

/// Top-N cut-offs for the truncated groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankLimits {
    pub products: usize,
    /// `None` keeps every state.
    pub states: Option<usize>,
}

impl Default for RankLimits {
    fn default() -> Self {
        RankLimits {
            products: 10,
            states: Some(15),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Group `rows` by `key`, sum `measure` per group, sort by sum descending
/// (ties by key ascending) and keep at most `limit` entries.
///
/// Groups with no rows never appear.
pub fn rank<'a>(
    rows: impl IntoIterator<Item = &'a Row>,
    key: GroupKey,
    measure: Measure,
    limit: Option<usize>,
) -> Ranking {
    let mut sums: HashMap<&str, f64> = HashMap::new();
    for row in rows {
        *sums.entry(key.of(row)).or_insert(0.0) += measure.of(row);
    }

    let mut ranking: Ranking = sums
        .into_iter()
        .map(|(key, value)| RankedEntry {
            key: key.to_string(),
            value,
        })
        .collect();
    ranking.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.key.cmp(&b.key)));
    if let Some(n) = limit {
        ranking.truncate(n);
    }
    ranking
}

/// Compute totals and all four rankings for the rows of `table` passing `filter`.
///
/// Recomputed from the full table on every call.
pub fn aggregate(table: &Table, filter: &Filter, limits: RankLimits) -> AggregationResult {
    let rows: Vec<&Row> = filtered_rows(table, filter).collect();

    // `Iterator::sum` over no floats yields -0.0; start from +0.0 instead.
    let total_sales = rows.iter().fold(0.0, |acc, r| acc + r.sale_amount);
    let total_profit = rows.iter().fold(0.0, |acc, r| acc + r.profit);

    AggregationResult {
        total_sales,
        total_profit,
        total_orders: rows.len(),
        sales_by_category: rank(rows.iter().copied(), GroupKey::Category, Measure::Sales, None),
        profit_by_region: rank(rows.iter().copied(), GroupKey::Region, Measure::Profit, None),
        top10_profit_by_product: rank(
            rows.iter().copied(),
            GroupKey::Product,
            Measure::Profit,
            Some(limits.products),
        ),
        sales_by_state: rank(rows.iter().copied(), GroupKey::State, Measure::Sales, limits.states),
    }
}

/// [`aggregate`] with the identity filter.
pub fn aggregate_unfiltered(table: &Table, limits: RankLimits) -> AggregationResult {
    aggregate(table, &Filter::none(), limits)
}
