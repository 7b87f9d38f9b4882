#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::pipeline::PipelineConfig;

const DEFAULT_PIPELINE_TOML: &str = include_str!("../config/pipeline.toml");
const EMBEDDED_PATH: &str = "<embedded pipeline.toml>";

/// The built-in configuration for the NSDUH 2014-2016 / ACS 5-year tables.
pub fn default_pipeline_config() -> Result<PipelineConfig> {
    parse_toml(DEFAULT_PIPELINE_TOML, Path::new(EMBEDDED_PATH))
}

/// Load and validate a pipeline config from a `.toml` or `.json` file.
pub fn load_pipeline_config(path: &Path) -> Result<PipelineConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("toml") => parse_toml(&contents, path),
        Some("json") => parse_json(&contents, path),
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Load `path` when given, otherwise the embedded default.
pub fn load_or_default(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => load_pipeline_config(path),
        None => default_pipeline_config(),
    }
}

fn parse_toml(contents: &str, path: &Path) -> Result<PipelineConfig> {
    let config: PipelineConfig = toml::from_str(contents).map_err(|source| ConfigError::Toml {
        path: PathBuf::from(path),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

fn parse_json(contents: &str, path: &Path) -> Result<PipelineConfig> {
    let config: PipelineConfig =
        serde_json::from_str(contents).map_err(|source| ConfigError::Json {
            path: PathBuf::from(path),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use county_model::{ColumnTransform, JoinMode};

    #[test]
    fn embedded_default_parses_and_validates() {
        let config = default_pipeline_config().expect("default config");
        assert_eq!(config.join.mode, JoinMode::Inner);
        assert_eq!(config.samhsa.tables.len(), 4);
        assert_eq!(config.acs.tables.len(), 5);
        assert_eq!(config.acs.geo_id_column, "GEO_ID");
        assert_eq!(
            config.geography.county.columns[0].transform,
            Some(ColumnTransform::ZeroPad(2))
        );
        assert!(config.geography.tract.is_some());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.yaml");
        std::fs::write(&path, "paths: {}").unwrap();
        assert!(matches!(
            load_pipeline_config(&path),
            Err(ConfigError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_pipeline_config(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
