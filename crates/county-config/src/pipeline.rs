#![deny(unsafe_code)]

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use county_model::keys::{
    COUNTY_FIPS, GEO_ID, STATE_FIPS, STATE_NAME, SUBSTATE_REGION_ID, SUBSTATE_REGION_NAME,
    TRACT_CODE,
};
use county_model::{ColumnSpec, ColumnTransform, JoinMode};

use crate::error::{ConfigError, Result};

/// Complete description of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub join: JoinConfig,
    pub geography: GeographyConfig,
    pub samhsa: SamhsaConfig,
    pub acs: AcsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output: default_output(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinConfig {
    #[serde(default)]
    pub mode: JoinMode,
    /// Abort on SAMHSA state names that have no FIPS code instead of
    /// dropping those rows.
    #[serde(default)]
    pub strict_geography: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeographyConfig {
    pub county: SourceTable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tract: Option<SourceTable>,
}

/// A plain reference table: one header row after `skip_rows` leading rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTable {
    pub file: PathBuf,
    #[serde(default)]
    pub skip_rows: usize,
    pub columns: Vec<ColumnSpec>,
}

/// Shared layout of the SAMHSA substate estimate files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamhsaConfig {
    /// Descriptive rows above the header.
    #[serde(default = "default_samhsa_skip_rows")]
    pub skip_rows: usize,
    pub state_column: String,
    pub region_column: String,
    pub group_column: String,
    pub group_value: String,
    pub estimate_column: String,
    #[serde(default = "default_samhsa_null_values")]
    pub null_values: Vec<String>,
    pub tables: Vec<SamhsaTable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamhsaTable {
    pub name: String,
    pub file: PathBuf,
    /// Output column holding this table's estimate.
    pub indicator: String,
    /// Overrides the shared report group for this table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_value: Option<String>,
}

/// Shared layout of the ACS subject table extracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcsConfig {
    /// Descriptive label rows directly below the header.
    #[serde(default = "default_acs_skip_rows_after_header")]
    pub skip_rows_after_header: usize,
    #[serde(default = "default_geo_id_column")]
    pub geo_id_column: String,
    #[serde(default = "default_acs_null_values")]
    pub null_values: Vec<String>,
    pub tables: Vec<AcsTable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcsTable {
    pub name: String,
    pub file: PathBuf,
    pub columns: Vec<ColumnSpec>,
}

impl SamhsaTable {
    pub fn group_value<'a>(&'a self, shared: &'a SamhsaConfig) -> &'a str {
        self.group_value.as_deref().unwrap_or(&shared.group_value)
    }
}

impl PipelineConfig {
    /// Check structural invariants the pipeline relies on.
    pub fn validate(&self) -> Result<()> {
        validate_source_table(
            "geography.county",
            &self.geography.county,
            &[STATE_FIPS, COUNTY_FIPS, SUBSTATE_REGION_ID, SUBSTATE_REGION_NAME],
        )?;
        if let Some(tract) = &self.geography.tract {
            validate_source_table(
                "geography.tract",
                tract,
                &[STATE_FIPS, COUNTY_FIPS, TRACT_CODE, SUBSTATE_REGION_ID],
            )?;
        }

        if self.samhsa.tables.is_empty() {
            return Err(ConfigError::invalid("at least one SAMHSA table is required"));
        }
        if self.acs.tables.is_empty() {
            return Err(ConfigError::invalid("at least one ACS table is required"));
        }

        let mut table_names = BTreeSet::new();
        for name in self
            .samhsa
            .tables
            .iter()
            .map(|table| &table.name)
            .chain(self.acs.tables.iter().map(|table| &table.name))
        {
            if !table_names.insert(name.as_str()) {
                return Err(ConfigError::invalid(format!("duplicate table name '{name}'")));
            }
        }

        // Final table: keys, region columns, indicators, ACS fields.
        let reserved = [
            STATE_FIPS,
            COUNTY_FIPS,
            SUBSTATE_REGION_ID,
            SUBSTATE_REGION_NAME,
            STATE_NAME,
            GEO_ID,
        ];
        let mut outputs: BTreeSet<&str> = BTreeSet::new();
        for table in &self.samhsa.tables {
            claim_output(&mut outputs, &reserved, &table.indicator, &table.name)?;
        }
        for table in &self.acs.tables {
            if table.columns.is_empty() {
                return Err(ConfigError::invalid(format!(
                    "ACS table '{}' selects no columns",
                    table.name
                )));
            }
            for spec in &table.columns {
                if spec.source == self.acs.geo_id_column {
                    return Err(ConfigError::invalid(format!(
                        "ACS table '{}' lists the identifier column '{}' as a value column",
                        table.name, spec.source
                    )));
                }
                validate_transform(&table.name, spec)?;
                claim_output(&mut outputs, &reserved, &spec.target, &table.name)?;
            }
        }
        Ok(())
    }
}

fn validate_source_table(label: &str, table: &SourceTable, required: &[&str]) -> Result<()> {
    let mut targets = BTreeSet::new();
    for spec in &table.columns {
        validate_transform(label, spec)?;
        if !targets.insert(spec.target.as_str()) {
            return Err(ConfigError::invalid(format!(
                "{label}: duplicate target column '{}'",
                spec.target
            )));
        }
    }
    for name in required {
        if !targets.contains(name) {
            return Err(ConfigError::invalid(format!(
                "{label}: missing a column mapped to '{name}'"
            )));
        }
    }
    Ok(())
}

fn validate_transform(label: &str, spec: &ColumnSpec) -> Result<()> {
    if spec.transform == Some(ColumnTransform::ZeroPad(0)) {
        return Err(ConfigError::invalid(format!(
            "{label}: zero_pad width for '{}' must be positive",
            spec.source
        )));
    }
    Ok(())
}

fn claim_output<'a>(
    outputs: &mut BTreeSet<&'a str>,
    reserved: &[&str],
    name: &'a str,
    table: &str,
) -> Result<()> {
    if reserved.contains(&name) {
        return Err(ConfigError::invalid(format!(
            "table '{table}' uses reserved column name '{name}'"
        )));
    }
    if !outputs.insert(name) {
        return Err(ConfigError::invalid(format!(
            "output column '{name}' (table '{table}') is produced more than once"
        )));
    }
    Ok(())
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/raw")
}

fn default_output() -> PathBuf {
    PathBuf::from("data/processed/county_analytic.csv")
}

fn default_samhsa_skip_rows() -> usize {
    5
}

fn default_samhsa_null_values() -> Vec<String> {
    ["*", "--", "NA"].iter().map(|s| (*s).to_string()).collect()
}

fn default_acs_skip_rows_after_header() -> usize {
    1
}

fn default_geo_id_column() -> String {
    "GEO_ID".to_string()
}

fn default_acs_null_values() -> Vec<String> {
    ["(X)", "-", "N", "null", "**", "***", "*****", "+"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}
