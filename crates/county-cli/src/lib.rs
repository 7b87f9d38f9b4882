//! CLI library components for the county health pipeline.

pub mod cli;
pub mod logging;
