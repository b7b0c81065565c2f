use super::model::{CenterRecord, CenterTable};

// ---------------------------------------------------------------------------
// Threshold filter
// ---------------------------------------------------------------------------

/// Upper bounds a center must satisfy to be shown.
/// A `None` bound is no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActiveFilter {
    pub max_distance_km: Option<f64>,
    pub max_time_min: Option<f64>,
}

impl ActiveFilter {
    /// No constraint at all: every row passes.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn distance(max_km: f64) -> Self {
        Self {
            max_distance_km: Some(max_km),
            max_time_min: None,
        }
    }

    pub fn time(max_min: f64) -> Self {
        Self {
            max_distance_km: None,
            max_time_min: Some(max_min),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.max_distance_km.is_none() && self.max_time_min.is_none()
    }

    /// Whether a single center passes every active bound (inclusive).
    pub fn matches(&self, record: &CenterRecord) -> bool {
        self.max_distance_km.map_or(true, |max| record.distance_km <= max)
            && self.max_time_min.map_or(true, |max| record.time_min <= max)
    }
}

/// Return indices of centers that pass the filter, in table order.
pub fn filtered_indices(table: &CenterTable, filter: &ActiveFilter) -> Vec<usize> {
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.matches(r))
        .map(|(i, _)| i)
        .collect()
}
