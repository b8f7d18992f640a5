use directories::ProjectDirs;
use fusion_dsl_core::config::{self, DslSettings};
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

pub const SETTINGS_ENV: &str = "FUSION_DSL_SETTINGS";
pub const LOCAL_SETTINGS_FILE: &str = "fusion-dsl.json";
const USER_SETTINGS_FILE: &str = "settings.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Settings(#[from] fusion_dsl_core::Error),

    #[error("Settings file {} not found", .0.display())]
    NotFound(PathBuf),

    #[error("Config directory not found")]
    NoConfigDir,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for fusion_dsl_core::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Settings(inner) => inner,
            other => fusion_dsl_core::Error::Settings(other.to_string()),
        }
    }
}

/// Where settings are read from.
/// Supported sources(in order of precedence):
/// - CLI argument or `FUSION_DSL_SETTINGS`(by clap, also from a dot-env file)
/// - `fusion-dsl.json` in the working directory
/// - `settings.json` in the user config directory
/// - Built-in defaults, which register no DSL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    File(PathBuf),
    Defaults,
}

pub fn user_settings_path() -> ConfigResult<PathBuf> {
    let proj_dirs = ProjectDirs::from("io", "packagefactory", "fusion-dsl-explorer")
        .ok_or(ConfigError::NoConfigDir)?;
    Ok(proj_dirs.config_dir().join(USER_SETTINGS_FILE))
}

pub fn locate_settings(explicit: Option<&Path>, working_dir: &Path) -> ConfigResult<SettingsSource> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        return Ok(SettingsSource::File(path.to_path_buf()));
    }

    let local = working_dir.join(LOCAL_SETTINGS_FILE);
    if local.is_file() {
        return Ok(SettingsSource::File(local));
    }

    if let Ok(user) = user_settings_path() {
        if user.is_file() {
            return Ok(SettingsSource::File(user));
        }
    }

    Ok(SettingsSource::Defaults)
}

pub fn load_settings(explicit: Option<&Path>) -> ConfigResult<DslSettings> {
    let working_dir = std::env::current_dir()?;
    let source = locate_settings(explicit, &working_dir)?;
    debug!("settings source: {:?}", source);

    match source {
        SettingsSource::File(path) => Ok(config::from_file(path)?),
        SettingsSource::Defaults => Ok(DslSettings::default()),
    }
}
