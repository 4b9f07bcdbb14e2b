pub mod loader;
pub mod schema;

pub use loader::{
    discover, find_config, load_from_path, load_from_str, ConfigError, ConfigSource, LoadedConfig,
};
pub use schema::{
    suggest_check, ClosingBraceAfterSection, LintConfig, LintSection, ValidationError,
    ValidationIssue, CONFIG_FILE_NAME,
};
