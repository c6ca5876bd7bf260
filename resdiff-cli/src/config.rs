//! resdiff configuration loading from `.resdiffrc.toml`.
//!
//! Configuration is optional. Without a config file resdiff looks for the
//! ReScript grammar in the tree-sitter cache, formats files with
//! `npx rescript format` and prints tables.
//!
//! # Example Configuration
//!
//! ```toml
//! [grammar]
//! path = "vendor/tree-sitter-rescript/rescript.so"
//! symbol = "tree_sitter_rescript"
//!
//! [formatter]
//! enabled = true
//! command = ["npx", "rescript", "format"]
//!
//! [output]
//! format = "json"
//! color = false
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use resdiff_core::formatter::Formatter;
use resdiff_core::parser::language::{library_file_name, DEFAULT_SYMBOL};

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = ".resdiffrc.toml";

/// Environment variable naming the grammar library.
pub const GRAMMAR_ENV: &str = "RESDIFF_GRAMMAR";

/// Root configuration structure loaded from `.resdiffrc.toml`.
///
/// All sections are optional and will use defaults if not specified.
#[derive(Debug, Deserialize, Default)]
pub struct ResdiffConfig {
    /// Where the compiled ReScript grammar lives.
    #[serde(default)]
    pub grammar: GrammarConfig,

    /// Formatter run on files before they are diffed.
    #[serde(default)]
    pub formatter: FormatterConfig,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,
}

/// Grammar library location.
#[derive(Debug, Deserialize, Default)]
pub struct GrammarConfig {
    /// Path to the compiled grammar shared library.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Exported language symbol. Default: `tree_sitter_rescript`.
    #[serde(default)]
    pub symbol: Option<String>,
}

/// Formatter settings.
#[derive(Debug, Deserialize)]
pub struct FormatterConfig {
    /// Whether to format files before diffing. Default: `true`.
    #[serde(default = "default_formatter_enabled")]
    pub enabled: bool,

    /// Command line of the formatter; the file path is appended.
    #[serde(default)]
    pub command: Option<Vec<String>>,
}

fn default_formatter_enabled() -> bool {
    true
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            enabled: default_formatter_enabled(),
            command: None,
        }
    }
}

/// Output formatting preferences.
///
/// Command-line flags (e.g., `--format json`) override these settings.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Default output format: `table` or `json`.
    #[serde(default)]
    pub format: Option<String>,

    /// Whether to use colored output.
    #[serde(default)]
    pub color: Option<bool>,
}

impl ResdiffConfig {
    /// Load configuration from `.resdiffrc.toml` in the given directory.
    ///
    /// If the config file doesn't exist or can't be parsed, returns defaults.
    /// Parse errors are logged as warnings but don't cause failures.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    /// Resolve the grammar library path.
    ///
    /// Order: command-line flag, `RESDIFF_GRAMMAR`, config file, then
    /// `<cache dir>/tree-sitter/lib/rescript.<ext>`. Returns `None` only when
    /// nothing is configured and no cache directory is known.
    pub fn grammar_path(&self, cli: Option<&Path>) -> Option<PathBuf> {
        let env = std::env::var_os(GRAMMAR_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        self.resolve_grammar_path(cli, env)
    }

    fn resolve_grammar_path(&self, cli: Option<&Path>, env: Option<PathBuf>) -> Option<PathBuf> {
        cli.map(Path::to_path_buf)
            .or(env)
            .or_else(|| self.grammar.path.clone())
            .or_else(default_grammar_path)
    }

    /// Exported symbol of the grammar.
    pub fn grammar_symbol(&self) -> &str {
        self.grammar.symbol.as_deref().unwrap_or(DEFAULT_SYMBOL)
    }

    /// Formatter to run, or `None` when disabled here or by `--no-format`.
    pub fn formatter(&self, disabled: bool) -> Option<Formatter> {
        if disabled || !self.formatter.enabled {
            return None;
        }
        match &self.formatter.command {
            Some(command) => Formatter::from_command(command),
            None => Some(Formatter::default()),
        }
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    /// Check if colored output should be used.
    ///
    /// Returns the configured value, or `None` to use auto-detection.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }
}

/// Where the tree-sitter CLI caches compiled grammars.
fn default_grammar_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| {
        dir.join("tree-sitter")
            .join("lib")
            .join(library_file_name("rescript"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResdiffConfig::default();
        assert!(config.grammar.path.is_none());
        assert_eq!(config.grammar_symbol(), "tree_sitter_rescript");
        assert!(config.formatter.enabled);
        assert!(config.output.format.is_none());
        assert_eq!(config.formatter(false), Some(Formatter::default()));
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[grammar]
path = "grammars/rescript.so"
symbol = "tree_sitter_rescript_v2"

[formatter]
enabled = true
command = ["rescript", "format"]

[output]
format = "json"
color = false
"#;

        let config: ResdiffConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(
            config.grammar.path.as_deref(),
            Some(Path::new("grammars/rescript.so"))
        );
        assert_eq!(config.grammar_symbol(), "tree_sitter_rescript_v2");
        assert_eq!(
            config.formatter(false),
            Some(Formatter::new("rescript", vec!["format".to_string()]))
        );
        assert_eq!(config.default_format(), Some("json"));
        assert_eq!(config.use_color(), Some(false));
    }

    #[test]
    fn test_parse_partial_config() {
        let config: ResdiffConfig = toml::from_str("[formatter]\nenabled = false\n").unwrap();
        assert!(config.formatter(false).is_none());
        assert!(config.grammar.symbol.is_none());
    }

    #[test]
    fn test_no_format_flag_wins() {
        let config = ResdiffConfig::default();
        assert!(config.formatter(true).is_none());
    }

    #[test]
    fn test_grammar_path_precedence() {
        let config: ResdiffConfig =
            toml::from_str("[grammar]\npath = \"from-config.so\"\n").unwrap();

        let cli = Path::new("from-cli.so");
        let env = Some(PathBuf::from("from-env.so"));

        assert_eq!(
            config.resolve_grammar_path(Some(cli), env.clone()),
            Some(PathBuf::from("from-cli.so"))
        );
        assert_eq!(
            config.resolve_grammar_path(None, env),
            Some(PathBuf::from("from-env.so"))
        );
        assert_eq!(
            config.resolve_grammar_path(None, None),
            Some(PathBuf::from("from-config.so"))
        );
    }

    #[test]
    fn test_default_grammar_path_in_cache() {
        if let Some(path) = ResdiffConfig::default().resolve_grammar_path(None, None) {
            assert!(path.ends_with(Path::new("tree-sitter/lib").join(library_file_name("rescript"))));
        }
    }

    #[test]
    fn test_load_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[grammar\npath = ").unwrap();

        let config = ResdiffConfig::load(dir.path());
        assert!(config.grammar.path.is_none());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[output]\nformat = \"json\"\n").unwrap();

        let config = ResdiffConfig::load(dir.path());
        assert_eq!(config.default_format(), Some("json"));
    }
}
