use crate::config::schema::{LintConfig, ValidationError, CONFIG_FILE_NAME};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Passed with `--config`
    Explicit(PathBuf),
    /// Found in the working directory or one of its ancestors
    Project(PathBuf),
    /// Found in the home directory
    Home(PathBuf),
    /// Parsed from a string
    Inline,
    /// No file found
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(path) | ConfigSource::Project(path) | ConfigSource::Home(path) => {
                Some(path)
            }
            ConfigSource::Inline | ConfigSource::Defaults => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit(path) => write!(f, "config {}", path.display()),
            ConfigSource::Project(path) => write!(f, "project config {}", path.display()),
            ConfigSource::Home(path) => write!(f, "home config {}", path.display()),
            ConfigSource::Inline => f.write_str("inline config"),
            ConfigSource::Defaults => f.write_str("built-in defaults"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {origin}: {error}")]
    Io {
        origin: ConfigSource,
        #[source]
        error: std::io::Error,
    },

    #[error("failed to parse {origin}: {error}")]
    Toml {
        origin: ConfigSource,
        #[source]
        error: toml_edit::de::Error,
    },

    #[error("invalid {origin}: {error}")]
    Validation {
        origin: ConfigSource,
        #[source]
        error: ValidationError,
    },
}

impl ConfigError {
    pub fn origin(&self) -> &ConfigSource {
        match self {
            ConfigError::Io { origin, .. }
            | ConfigError::Toml { origin, .. }
            | ConfigError::Validation { origin, .. } => origin,
        }
    }
}

/// A validated configuration together with where it was loaded from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: LintConfig,
    pub origin: ConfigSource,
}

fn parse(input: &str, origin: &ConfigSource) -> Result<LintConfig, ConfigError> {
    let config: LintConfig = toml_edit::de::from_str(input).map_err(|error| ConfigError::Toml {
        origin: origin.clone(),
        error,
    })?;
    config.validate().map_err(|error| ConfigError::Validation {
        origin: origin.clone(),
        error,
    })?;
    Ok(config)
}

fn load(origin: ConfigSource) -> Result<LoadedConfig, ConfigError> {
    let Some(path) = origin.path().map(Path::to_path_buf) else {
        return Ok(LoadedConfig {
            config: LintConfig::default(),
            origin,
        });
    };
    debug!(%origin, "loading config");
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(error) => return Err(ConfigError::Io { origin, error }),
    };
    let config = parse(&contents, &origin)?;
    Ok(LoadedConfig { config, origin })
}

pub fn load_from_str(input: &str) -> Result<LintConfig, ConfigError> {
    parse(input, &ConfigSource::Inline)
}

/// Load the config file at `path` as if it had been passed with `--config`.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<LintConfig, ConfigError> {
    load(ConfigSource::Explicit(path.as_ref().to_path_buf())).map(|loaded| loaded.config)
}

/// Find the config file that applies to `cwd`.
///
/// The first `.manifest-whitespace.toml` walking up from `cwd` wins, then the
/// one in `home`.
pub fn find_config(cwd: &Path, home: Option<&Path>) -> Option<ConfigSource> {
    let project = cwd
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file());
    if let Some(path) = project {
        return Some(ConfigSource::Project(path));
    }
    home.map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|candidate| candidate.is_file())
        .map(ConfigSource::Home)
}

/// Load the explicit config if given, else the discovered one, else defaults.
pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<LoadedConfig, ConfigError> {
    let origin = match explicit {
        Some(path) => ConfigSource::Explicit(path.to_path_buf()),
        None => find_config(cwd, home::home_dir().as_deref()).unwrap_or(ConfigSource::Defaults),
    };
    if origin == ConfigSource::Defaults {
        debug!("no config file found, using defaults");
    }
    load(origin)
}
