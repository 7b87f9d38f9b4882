//! Data directory and input path resolution.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable overriding the configured data directory.
pub const DATA_DIR_ENV_VAR: &str = "COUNTY_HEALTH_DATA_DIR";

/// Resolve the raw data directory.
///
/// Resolution order:
/// 1. explicit override (the CLI `--data-dir` flag)
/// 2. `COUNTY_HEALTH_DATA_DIR` environment variable
/// 3. `paths.data_dir` from the pipeline config
pub fn resolve_data_dir(explicit: Option<&Path>, configured: &Path) -> PathBuf {
    data_dir_from(explicit, std::env::var_os(DATA_DIR_ENV_VAR), configured)
}

fn data_dir_from(explicit: Option<&Path>, env: Option<OsString>, configured: &Path) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    match env {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => configured.to_path_buf(),
    }
}

/// Resolve a configured input file against the data directory.
///
/// Absolute paths are returned unchanged.
pub fn resolve_input(data_dir: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        data_dir.join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins() {
        let dir = resolve_data_dir(Some(Path::new("/tmp/raw")), Path::new("data/raw"));
        assert_eq!(dir, PathBuf::from("/tmp/raw"));
    }

    #[test]
    fn env_dir_beats_config_but_not_flag() {
        let env = Some(OsString::from("/srv/county"));
        let configured = Path::new("data/raw");
        assert_eq!(
            data_dir_from(None, env.clone(), configured),
            PathBuf::from("/srv/county")
        );
        assert_eq!(
            data_dir_from(Some(Path::new("raw")), env, configured),
            PathBuf::from("raw")
        );
    }

    #[test]
    fn unset_or_empty_env_falls_back_to_config() {
        let configured = Path::new("data/raw");
        assert_eq!(data_dir_from(None, None, configured), configured);
        assert_eq!(
            data_dir_from(None, Some(OsString::new()), configured),
            configured
        );
    }

    #[test]
    fn relative_inputs_join_data_dir() {
        let data_dir = Path::new("data/raw");
        assert_eq!(
            resolve_input(data_dir, Path::new("acs/dp05.csv")),
            PathBuf::from("data/raw/acs/dp05.csv")
        );
        let absolute = std::env::temp_dir().join("dp05.csv");
        assert_eq!(resolve_input(data_dir, &absolute), absolute);
    }
}
