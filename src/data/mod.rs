/// Data layer: core types, loading/cleaning, and filtering.
///
/// Architecture:
/// ```text
///   uploaded .csv  /  built-in sample
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse → coerce → swap → drop → CenterTable
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ CenterTable  │  Vec<CenterRecord>, column layout, CleanReport
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  distance / time thresholds → filtered indices
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod sample;
