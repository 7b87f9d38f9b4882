#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod paths;
pub mod pipeline;

pub use crate::error::{ConfigError, Result};
pub use crate::loader::{default_pipeline_config, load_or_default, load_pipeline_config};
pub use crate::paths::{DATA_DIR_ENV_VAR, resolve_data_dir, resolve_input};
pub use crate::pipeline::{
    AcsConfig, AcsTable, GeographyConfig, JoinConfig, PathsConfig, PipelineConfig,
    SamhsaConfig, SamhsaTable, SourceTable,
};
