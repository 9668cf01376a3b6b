// src/infra/paths.rs — Config file location
//
// COLLAPSER_HOME overrides everything. Otherwise config lives in ~/.collapser/.

use std::path::PathBuf;

/// Returns the COLLAPSER_HOME override, if set.
fn collapser_home() -> Option<PathBuf> {
    std::env::var_os("COLLAPSER_HOME").map(PathBuf::from)
}

/// Configuration directory: $COLLAPSER_HOME/ or ~/.collapser/
///
/// `None` only when no home directory can be determined.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(home) = collapser_home() {
        return Some(home);
    }
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".collapser"))
}

/// Config file path
pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_is_named_config_toml() {
        if let Some(path) = config_file_path() {
            assert_eq!(path.file_name().unwrap(), "config.toml");
        }
    }
}
