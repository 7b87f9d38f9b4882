//! County health pipeline.
//!
//! Joins SAMHSA substate mental health estimates with ACS county subject
//! tables through the substate region geography:
//!
//! - [`load_geography`] / [`county_region_bridge`]: reference tables
//! - [`load_samhsa`]: indicator tables keyed by region
//! - [`load_acs`]: subject tables keyed by county
//! - [`join_county_table`]: one row per county
//! - [`run_pipeline`]: all of the above plus CSV and manifest output
//! - [`check_inputs`]: header verification without running anything

pub mod acs;
pub mod check;
pub mod error;
pub mod geography;
pub mod joiner;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod samhsa;
pub mod sources;

pub use acs::{load_acs, load_acs_table};
pub use check::{CheckStatus, InputCheck, check_inputs};
pub use error::{ErrorKind, PipelineError, Result};
pub use geography::{Geography, county_region_bridge, load_geography};
pub use joiner::{JoinedTables, join_county_table};
pub use output::{
    ManifestInput, ManifestOutput, RunManifest, manifest_path, sha256_file, sha256_hex,
    write_table_csv,
};
pub use pipeline::{RunOptions, run_pipeline};
pub use report::{LoadedTable, PipelineReport, TableReport};
pub use samhsa::{load_samhsa, load_samhsa_table};
pub use sources::{SourceFile, Stage, source_files};
