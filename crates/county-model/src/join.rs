use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How unmatched keys are treated at each join step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinMode {
    /// Keep only keys present on both sides.
    #[default]
    Inner,
    /// Keep every row of the left side; unmatched fields stay empty.
    Left,
}

impl JoinMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "inner",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for JoinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "inner" => Ok(Self::Inner),
            "left" => Ok(Self::Left),
            other => Err(format!("unknown join mode '{other}' (expected inner or left)")),
        }
    }
}
