//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::StyleConfig;
use std::path::Path;

/// The configuration file name looked up in project directories.
pub const CONFIG_FILE_NAME: &str = "svstyle.toml";

/// The configuration written by `svstyle init`.
pub const DEFAULT_CONFIG: &str = r#"# svstyle configuration

[lint]
# Rule names or codes promoted to errors.
deny = []
# Rule names or codes that are not checked.
allow = []
# Rule names or codes demoted to warnings.
warn = []

[style]
max_line_length = 100
# Report synchronous resets in always_ff blocks.
require_async_reset = false

[files]
extensions = ["sv", "svh", "v", "vh"]
exclude = []
"#;

/// Loads and validates `<project_dir>/svstyle.toml`.
pub fn load_config(project_dir: &Path) -> Result<StyleConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<StyleConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<StyleConfig, ConfigError> {
    let config: StyleConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &StyleConfig) -> Result<(), ConfigError> {
    if config.style.max_line_length == 0 {
        return Err(ConfigError::ValidationError(
            "style.max_line_length must be positive".to_string(),
        ));
    }
    if config.files.extensions.is_empty() {
        return Err(ConfigError::ValidationError(
            "files.extensions must name at least one extension".to_string(),
        ));
    }
    if let Some(rule) = config
        .lint
        .allow
        .iter()
        .find(|r| config.lint.deny.contains(r))
    {
        return Err(ConfigError::ValidationError(format!(
            "rule '{rule}' is both allowed and denied"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.style.max_line_length, 100);
        assert!(config.lint.deny.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let config = load_config_from_str(
            r#"
[lint]
deny = ["W104"]
allow = ["line-length"]
warn = ["comb-default"]

[style]
max_line_length = 120
require_async_reset = true

[files]
extensions = ["sv"]
exclude = ["vendor", "build"]
"#,
        )
        .unwrap();
        assert_eq!(config.lint.deny, vec!["W104"]);
        assert_eq!(config.lint.allow, vec!["line-length"]);
        assert_eq!(config.lint.warn, vec!["comb-default"]);
        assert_eq!(config.style.max_line_length, 120);
        assert!(config.style.require_async_reset);
        assert_eq!(config.files.extensions, vec!["sv"]);
        assert_eq!(config.files.exclude, vec!["vendor", "build"]);
    }

    #[test]
    fn default_config_text_parses() {
        let config = load_config_from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.style.max_line_length, 100);
        assert_eq!(config.files.extensions.len(), 4);
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn unknown_section_errors() {
        let err = load_config_from_str("[project]\nname = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn zero_line_length_rejected() {
        let err = load_config_from_str("[style]\nmax_line_length = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn conflicting_lists_rejected() {
        let err = load_config_from_str("[lint]\nallow = [\"C201\"]\ndeny = [\"C201\"]\n")
            .unwrap_err();
        assert!(err.to_string().contains("C201"));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[style]\nmax_line_length = 80\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.style.max_line_length, 80);
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
