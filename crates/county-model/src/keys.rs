//! Semantic column names shared by every stage.

pub const STATE_FIPS: &str = "state_fips";
pub const COUNTY_FIPS: &str = "county_fips";
pub const STATE_NAME: &str = "state_name";
pub const SUBSTATE_REGION_ID: &str = "substate_region_id";
pub const SUBSTATE_REGION_NAME: &str = "substate_region_name";
pub const TRACT_CODE: &str = "census_tract_code";
pub const GEO_ID: &str = "geo_id";

/// Join key of SAMHSA indicator tables.
pub const REGION_KEY: [&str; 2] = [STATE_FIPS, SUBSTATE_REGION_NAME];
/// Join key of ACS tables and of the final county table.
pub const COUNTY_KEY: [&str; 2] = [STATE_FIPS, COUNTY_FIPS];
