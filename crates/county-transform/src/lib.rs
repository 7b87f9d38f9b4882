//! Table reshaping for the county health pipeline.
//!
//! Every operation takes a frame by reference and returns a new one:
//!
//! - [`select_columns`]: allowlist, rename, pad and type columns
//! - [`split_geo_id_column`]: derive state/county FIPS from `GEO_ID`
//! - [`map_state_names`]: replace state names with FIPS codes
//! - [`filter_equals`]: keep one report group
//! - [`join_frames`] / [`join_all`]: keyed joins with schema checks

mod error;
mod filter;
mod frame;
mod geoid;
mod join;
mod select;
mod state;

pub use error::{Result, TransformError};
pub use filter::filter_equals;
pub use frame::TableFrame;
pub use geoid::split_geo_id_column;
pub use join::{join_all, join_frames, sort_by_keys};
pub use select::select_columns;
pub use state::{StateMapping, map_state_names};
