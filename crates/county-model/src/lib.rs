//! Core types for the county health tables.
//!
//! - **fips**: zero-padded state, county and tract codes
//! - **geoid**: fixed-offset splitting of Census `GEO_ID` values
//! - **states**: static state name to FIPS lookup
//! - **column**: source-to-semantic column rename maps
//! - **keys**: semantic column names used as join keys

pub mod column;
pub mod error;
pub mod fips;
pub mod geoid;
pub mod join;
pub mod keys;
pub mod states;

pub use column::{ColumnKind, ColumnSpec, ColumnTransform};
pub use error::{ModelError, Result};
pub use fips::{
    COUNTY_FIPS_WIDTH, CountyFips, CountyKey, STATE_FIPS_WIDTH, StateFips, TRACT_CODE_WIDTH,
    TractCode, pad_fips,
};
pub use geoid::split_geo_id;
pub use join::JoinMode;
pub use states::state_fips_for_name;
