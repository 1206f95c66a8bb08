//! Statistics returned for metric queries

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Aggregated measurements of one metric series
///
/// `columns` names the entries of each row in `statistics`, e.g.
/// `["timestamp", "avg", "max"]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Metric name
    pub name: Option<String>,
    /// Dimensions identifying the series
    pub dimensions: Option<BTreeMap<String, String>>,
    /// Column names
    pub columns: Option<Vec<String>>,
    /// Rows of values
    #[serde(default)]
    pub statistics: Vec<Vec<Value>>,
}

impl Statistics {
    /// Create empty statistics for a metric
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set the dimensions
    pub fn with_dimensions(mut self, dimensions: BTreeMap<String, String>) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Set the column names
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Append a row of values
    pub fn add_values(&mut self, values: Vec<Value>) {
        self.statistics.push(values);
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Statistics [name={}, dimensions={:?},statistics={:?}]",
            self.name.as_deref().unwrap_or("null"),
            self.dimensions,
            self.statistics
        )
    }
}
