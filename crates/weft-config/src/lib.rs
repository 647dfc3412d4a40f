//! Configuration management for weft.
//!
//! Parses `weft.toml` files with serde and provides auto-discovery of the
//! config file in parent directories.
//!
//! ```toml
//! format = "latex"
//! rules = ["normalize_newlines", "strip_trailing_whitespace"]
//! flags = ["filter_html"]
//!
//! [restrictions]
//! disable_inline = ["image", "span"]
//! no_span_caps = true
//! ```
//!
//! `flags` become flag directives and the `[restrictions]` table one keyed
//! directive, applied in that order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use weft_renderer::{FormatError, Formatter, MarkupDocument};
use weft_restrictions::{Directive, RestrictionSet, RestrictionValue, UnknownRestrictionError};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "weft.toml";

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output format name as written in TOML.
    format: String,
    /// Rules applied, in order, before formatting.
    pub rules: Vec<String>,
    /// Options switched on by flag directives.
    pub flags: Vec<String>,
    /// Keyed directive entries.
    pub restrictions: BTreeMap<String, RestrictionValue>,

    /// Resolved output format (set after loading).
    #[serde(skip)]
    pub formatter: Formatter,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Formatter::default().to_string(),
            rules: Vec::new(),
            flags: Vec::new(),
            restrictions: BTreeMap::new(),
            formatter: Formatter::default(),
            config_path: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// A flag or `[restrictions]` key is not a known restriction.
    #[error("Configuration error: {0}")]
    Restriction(#[from] UnknownRestrictionError),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Rendering with the loaded configuration failed.
    #[error("Render error: {0}")]
    Format(#[from] FormatError),
}

impl Config {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise, searches
    /// for `weft.toml` in the current directory and parents, falling back to
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }

        match Self::discover_config() {
            Some(discovered) => Self::load_from_file(&discovered),
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML, otherwise see
    /// [`validate`](Self::validate).
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.formatter = config
            .format
            .parse()
            .map_err(|e| ConfigError::Validation(format!("format: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Directives described by this configuration: flags first, then the
    /// `[restrictions]` table as one keyed directive.
    #[must_use]
    pub fn directives(&self) -> Vec<Directive> {
        let mut directives: Vec<Directive> = self.flags.iter().map(Directive::flag).collect();
        if !self.restrictions.is_empty() {
            directives.push(Directive::Keyed(self.restrictions.clone()));
        }
        directives
    }

    /// Restriction set built from [`directives`](Self::directives).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Restriction` for an unknown option name.
    pub fn restriction_set(&self) -> Result<RestrictionSet, ConfigError> {
        Ok(RestrictionSet::from_directives(self.directives())?)
    }

    /// Create a document from `text` with the configured restrictions.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Restriction` for an unknown option name.
    pub fn document(&self, text: impl Into<String>) -> Result<MarkupDocument, ConfigError> {
        Ok(MarkupDocument::new(text, self.directives())?)
    }

    /// Render `text` with the configured format, rules and restrictions.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Restriction` for an unknown option name and
    /// `ConfigError::Format` if rendering fails.
    pub fn render(&self, text: impl Into<String>) -> Result<String, ConfigError> {
        let mut document = self.document(text)?;
        Ok(document.render(self.formatter, self.rules.as_slice())?)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Restriction` for unknown option names and
    /// `ConfigError::Validation` for empty rule names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.restriction_set()?;
        if self.rules.iter().any(|rule| rule.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "rules cannot contain empty names".to_owned(),
            ));
        }
        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        discover_from(current)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }
}

/// Search for `weft.toml` in `current` and its parents.
fn discover_from(mut current: PathBuf) -> Option<PathBuf> {
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.formatter, Formatter::Html);
        assert!(config.rules.is_empty());
        assert!(config.directives().is_empty());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.formatter, Formatter::Html);
        assert_eq!(config.restriction_set().unwrap(), RestrictionSet::new());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
format = "LaTeX"
rules = ["normalize_newlines", "hard_breaks"]
flags = ["filter_html", "no_span_caps"]

[restrictions]
disable_inline = "image"
lite_mode = false
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.formatter, Formatter::Latex);
        assert_eq!(config.rules, vec!["normalize_newlines", "hard_breaks"]);

        let set = config.restriction_set().unwrap();
        assert!(set.filter_html());
        assert!(set.no_span_caps());
        assert!(!set.lite_mode());
        assert_eq!(set.disable_inline(), ["image"]);
    }

    #[test]
    fn test_directives_flags_first() {
        let toml = r#"
flags = ["lite_mode"]

[restrictions]
lite_mode = false
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(
            config.directives(),
            vec![
                Directive::flag("lite_mode"),
                Directive::keyed([("lite_mode", RestrictionValue::Bool(false))]),
            ]
        );
        assert!(!config.restriction_set().unwrap().lite_mode());
    }

    #[test]
    fn test_unknown_flag() {
        let err = Config::from_toml(r#"flags = ["not_a_real_flag"]"#).unwrap_err();
        assert!(
            matches!(&err, ConfigError::Restriction(e) if e.name == "not_a_real_flag"),
            "Expected ConfigError::Restriction, got {err:?}"
        );
    }

    #[test]
    fn test_unknown_restriction_key() {
        let err = Config::from_toml("[restrictions]\nshiny = true").unwrap_err();
        assert!(matches!(err, ConfigError::Restriction(_)));
        assert_eq!(err.to_string(), "Configuration error: Unknown restriction: shiny");
    }

    #[test]
    fn test_unknown_format() {
        let err = Config::from_toml(r#"format = "pdf""#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("pdf"));
    }

    #[test]
    fn test_empty_rule_name() {
        let err = Config::from_toml(r#"rules = ["normalize_newlines", " "]"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_unknown_top_level_key() {
        let err = Config::from_toml("colour = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unsupported_value_type() {
        let err = Config::from_toml("[restrictions]\nlite_mode = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_render_with_config() {
        let toml = r#"
rules = ["unknown_rule", "hard_breaks"]

[restrictions]
disable_inline = ["strong"]
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(
            config.render("*a*\nb").unwrap(),
            "<p>*a*<br />\nb</p>"
        );
    }

    #[test]
    fn test_render_format_error() {
        let err = Config::default().render("<notextile>").unwrap_err();
        assert!(matches!(err, ConfigError::Format(_)));
    }

    #[test]
    fn test_discover_from_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(discover_from(nested), Some(dir.path().join(CONFIG_FILENAME)));
    }

    #[test]
    fn test_discover_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("project");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        std::fs::write(nested.join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(discover_from(nested.clone()), Some(nested.join(CONFIG_FILENAME)));
    }
}
