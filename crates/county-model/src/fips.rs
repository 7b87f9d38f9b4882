//! Fixed-width FIPS codes.
//!
//! Every geographic key in the pipeline is a zero-padded digit string so that
//! tables coming from different sources join on identical text. Source files
//! are inconsistent about this: the SAMHSA reference tables store codes as
//! plain integers (`6`, `37`), sometimes even as floats (`6.0`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Width of a state FIPS code.
pub const STATE_FIPS_WIDTH: usize = 2;
/// Width of a county FIPS code (within its state).
pub const COUNTY_FIPS_WIDTH: usize = 3;
/// Width of a census tract code (within its county).
pub const TRACT_CODE_WIDTH: usize = 6;

/// Left-pads a numeric code with zeros to `width` characters.
///
/// Leading zeros already present are normalized away first, so `"006"` pads
/// to `"06"` at width 2. A trailing `.0` left behind by spreadsheet exports
/// is accepted.
///
/// # Examples
///
/// ```
/// use county_model::pad_fips;
///
/// assert_eq!(pad_fips("6", 2).unwrap(), "06");
/// assert_eq!(pad_fips("37", 3).unwrap(), "037");
/// assert_eq!(pad_fips("6.0", 2).unwrap(), "06");
/// assert!(pad_fips("CA", 2).is_err());
/// ```
pub fn pad_fips(raw: &str, width: usize) -> Result<String> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    if number.is_empty() {
        return Err(invalid(raw, "empty value"));
    }
    let digits = number.trim_start_matches('0');
    if !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(invalid(raw, "expected digits only"));
    }
    if digits.len() > width {
        return Err(invalid(raw, &format!("longer than {width} digits")));
    }
    Ok(format!("{digits:0>width$}"))
}

fn invalid(value: &str, reason: &str) -> ModelError {
    ModelError::InvalidFips {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

macro_rules! fips_newtype {
    ($(#[$meta:meta])* $name:ident, $width:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub const WIDTH: usize = $width;

            /// Parses and zero-pads a raw code.
            pub fn parse(raw: &str) -> Result<Self> {
                pad_fips(raw, Self::WIDTH).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ModelError;

            fn try_from(value: String) -> Result<Self> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

fips_newtype!(
    /// Two-digit state FIPS code, e.g. `06` for California.
    StateFips,
    STATE_FIPS_WIDTH
);
fips_newtype!(
    /// Three-digit county FIPS code within a state, e.g. `037`.
    CountyFips,
    COUNTY_FIPS_WIDTH
);
fips_newtype!(
    /// Six-digit census tract code within a county.
    TractCode,
    TRACT_CODE_WIDTH
);

/// Join key of the final county table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CountyKey {
    pub state: StateFips,
    pub county: CountyFips,
}

impl CountyKey {
    pub fn new(state: StateFips, county: CountyFips) -> Self {
        Self { state, county }
    }

    /// Five-digit combined code (`06037`).
    pub fn full_code(&self) -> String {
        format!("{}{}", self.state, self.county)
    }
}

impl fmt::Display for CountyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.state, self.county)
    }
}
