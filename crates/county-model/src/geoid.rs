//! Census geographic identifiers.
//!
//! ACS extracts identify rows with a composite `GEO_ID` such as
//! `0500000US06037`: a seven-character summary-level prefix, the literal
//! `US`, then the state FIPS (two digits) and the county FIPS. Splitting is
//! done at fixed character offsets.

use crate::error::{ModelError, Result};
use crate::fips::{CountyFips, CountyKey, StateFips};

/// Offset of the two-digit state segment.
pub const GEO_ID_STATE_OFFSET: usize = 9;
/// Offset of the county segment (runs to the end of the identifier).
pub const GEO_ID_COUNTY_OFFSET: usize = 11;

const COUNTRY_MARKER: &str = "US";

/// Splits a geographic identifier into its state and county FIPS codes.
///
/// # Examples
///
/// ```
/// use county_model::split_geo_id;
///
/// let key = split_geo_id("0500000US06037").unwrap();
/// assert_eq!(key.state.as_str(), "06");
/// assert_eq!(key.county.as_str(), "037");
/// ```
pub fn split_geo_id(raw: &str) -> Result<CountyKey> {
    let value = raw.trim();
    if !value.is_ascii() {
        return Err(malformed(raw, "non-ASCII characters"));
    }
    if value.len() <= GEO_ID_COUNTY_OFFSET {
        return Err(malformed(
            raw,
            &format!("expected more than {GEO_ID_COUNTY_OFFSET} characters"),
        ));
    }
    if &value[GEO_ID_STATE_OFFSET - COUNTRY_MARKER.len()..GEO_ID_STATE_OFFSET] != COUNTRY_MARKER {
        return Err(malformed(raw, "missing 'US' marker"));
    }
    let state_part = &value[GEO_ID_STATE_OFFSET..GEO_ID_COUNTY_OFFSET];
    let county_part = &value[GEO_ID_COUNTY_OFFSET..];
    let state = StateFips::parse(state_part)
        .map_err(|_| malformed(raw, &format!("invalid state segment '{state_part}'")))?;
    let county = CountyFips::parse(county_part)
        .map_err(|_| malformed(raw, &format!("invalid county segment '{county_part}'")))?;
    Ok(CountyKey::new(state, county))
}

fn malformed(value: &str, reason: &str) -> ModelError {
    ModelError::MalformedGeoId {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_county_identifier() {
        let key = split_geo_id("0500000US06037").unwrap();
        assert_eq!(key.state.as_str(), "06");
        assert_eq!(key.county.as_str(), "037");
    }

    #[test]
    fn short_county_segment_is_padded() {
        let key = split_geo_id("0500000US481").unwrap();
        assert_eq!(key.state.as_str(), "48");
        assert_eq!(key.county.as_str(), "001");
    }

    #[test]
    fn state_level_identifier_is_rejected() {
        let err = split_geo_id("0400000US06").unwrap_err();
        assert!(matches!(err, ModelError::MalformedGeoId { .. }));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(split_geo_id("").is_err());
        assert!(split_geo_id("0500000XX06037").is_err());
        assert!(split_geo_id("0500000USAB037").is_err());
        assert!(split_geo_id("0500000US0603").is_ok());
        assert!(split_geo_id("0500000US061037").is_err());
    }
}
