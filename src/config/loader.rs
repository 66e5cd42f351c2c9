use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use super::core::ThreadScoreConfig;
use crate::errors::{Error, Result};

/// File name searched for in the working directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = ".threadscore.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<ThreadScoreConfig> {
    let config = toml::from_str::<ThreadScoreConfig>(contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Check everything that would otherwise fail at stage construction.
pub fn validate_config(config: &ThreadScoreConfig) -> Result<()> {
    for pattern in &config.filter.filter_patterns {
        Regex::new(pattern).map_err(|e| Error::invalid_pattern(pattern, e))?;
    }
    config.scoring.validate()
}

/// Read and validate one config file.
pub fn load_config_from_path(config_path: &Path) -> Result<ThreadScoreConfig> {
    let contents = fs::read_to_string(config_path)?;
    parse_and_validate_config(&contents)
}

/// Pure function to try loading config from a specific path
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<ThreadScoreConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!(
                "Ignoring invalid config {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            None
        }
    }
}

/// Handle file read errors with appropriate logging
fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for a config file.
///
/// The first readable, valid file wins. Invalid files are skipped with a
/// warning; when nothing is found the defaults are returned.
pub fn load_config_from(start: &Path) -> ThreadScoreConfig {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            ThreadScoreConfig::default()
        })
}

/// [`load_config_from`] starting at the current directory.
pub fn load_config() -> ThreadScoreConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(&dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            ThreadScoreConfig::default()
        }
    }
}
