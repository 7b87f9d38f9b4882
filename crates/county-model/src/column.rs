//! Column rename maps.
//!
//! A table's allowlist is a list of [`ColumnSpec`]s: each one names a source
//! column, the semantic name it is renamed to, the type it is coerced to and
//! an optional value transform. Source columns without a spec are dropped.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Target type of a selected column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    #[default]
    Text,
    Float,
    Int,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Text => "text",
            Self::Float => "float",
            Self::Int => "int",
        };
        f.write_str(label)
    }
}

/// Value transform applied after selection and before type coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnTransform {
    /// Left-pad a numeric code with zeros to the given width.
    ZeroPad(usize),
    /// Strip a trailing `%` before numeric parsing.
    Percent,
    /// Trim and collapse interior whitespace.
    Trim,
}

impl fmt::Display for ColumnTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPad(width) => write!(f, "zero_pad({width})"),
            Self::Percent => f.write_str("percent"),
            Self::Trim => f.write_str("trim"),
        }
    }
}

/// One entry of a source-to-semantic rename map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name as it appears in the source header.
    pub source: String,
    /// Semantic name in the output.
    pub target: String,
    #[serde(default)]
    pub kind: ColumnKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<ColumnTransform>,
}

impl ColumnSpec {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            transform: None,
        }
    }

    pub fn text(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(source, target, ColumnKind::Text)
    }

    pub fn float(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(source, target, ColumnKind::Float)
    }

    pub fn int(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(source, target, ColumnKind::Int)
    }

    #[must_use]
    pub fn with_transform(mut self, transform: ColumnTransform) -> Self {
        self.transform = Some(transform);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_builders_set_kind_and_transform() {
        let spec = ColumnSpec::text("ST", "state_fips").with_transform(ColumnTransform::ZeroPad(2));
        assert_eq!(spec.kind, ColumnKind::Text);
        assert_eq!(spec.transform, Some(ColumnTransform::ZeroPad(2)));
        assert_eq!(ColumnSpec::float("A", "a").kind, ColumnKind::Float);
    }

    #[test]
    fn transform_display() {
        assert_eq!(ColumnTransform::ZeroPad(3).to_string(), "zero_pad(3)");
        assert_eq!(ColumnTransform::Percent.to_string(), "percent");
    }
}
