use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::Config;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings file {path} at {}: {source}", source.path())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },
}

/// Loads engine configuration overrides from a JSON file. An absent file
/// means defaults; a present-but-malformed file is a fatal startup
/// diagnostic naming the offending field path.
pub(crate) fn load_settings(path: &Path) -> Result<Config, SettingsError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "settings_file_absent_using_defaults");
            return Ok(Config::default());
        }
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    let config: Config =
        serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
            SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
    info!(path = %path.display(), "settings_file_loaded");
    Ok(config)
}
