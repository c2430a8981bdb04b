//! Chart data extracted from embedded chart parts.

use serde::{Deserialize, Serialize};

/// A chart: optional title plus data series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// Chart title text
    pub title: Option<String>,

    /// Series in plot order
    pub series: Vec<ChartSeries>,
}

impl Chart {
    /// Check if the chart carries no series.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Category labels in display order.
    ///
    /// Taken from the first series that has any; falls back to the union of
    /// point indices when no labels exist.
    pub fn categories(&self) -> Vec<(usize, String)> {
        if let Some(s) = self.series.iter().find(|s| !s.categories.is_empty()) {
            return s.categories.clone();
        }
        let mut idx: Vec<usize> = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.x))
            .collect();
        idx.sort_unstable();
        idx.dedup();
        idx.into_iter().map(|i| (i, (i + 1).to_string())).collect()
    }
}

/// One data series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Series name (column header)
    pub key: String,

    /// Category labels keyed by point index
    pub categories: Vec<(usize, String)>,

    /// Values keyed by point index
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    /// Value at a category index, if present.
    pub fn value_at(&self, x: usize) -> Option<&str> {
        self.points.iter().find(|p| p.x == x).map(|p| p.y.as_str())
    }
}

/// A single value in a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Category index
    pub x: usize,
    /// Cached value text
    pub y: String,
}
