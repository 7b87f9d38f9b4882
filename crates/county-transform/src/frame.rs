//! Named table frames.
//!
//! [`TableFrame`] wraps a Polars DataFrame with the configured table name,
//! used in logs and error messages.

use polars::prelude::DataFrame;

/// A named intermediate table.
#[derive(Debug, Clone)]
pub struct TableFrame {
    /// Configured table name (e.g. "any_mental_illness", "income").
    pub name: String,
    /// The table contents.
    pub data: DataFrame,
}

impl TableFrame {
    pub fn new(name: impl Into<String>, data: DataFrame) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.data.column(name).is_ok()
    }
}
