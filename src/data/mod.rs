/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv (Latin-1)
///        │
///        ▼
///   ┌──────────┐      ┌───────┐
///   │  loader   │ ◄──  │ cache │  fixed-path datasets
///   └──────────┘      └───────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  Vec<Row>, immutable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐      ┌───────────┐
///   │  filter   │ ──►  │ aggregate │  totals + ranked groupings
///   └──────────┘      └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
