//! Configuration.
//!
//! Optional `albummer.toml`, looked up next to the album file (or the template
//! being written), or given explicitly with `--config`. Every key is optional:
//!
//! ```toml
//! [template]
//! columns = 3               # images per row in generated templates
//! order = "asc"             # asc | desc, by file modification time
//! stylesheet = "default.css"
//!
//! [processing]
//! max_threads = 4           # encoding threads (omit for auto = CPU cores)
//!
//! [output]
//! extension = "html"        # generated page extension, no leading dot
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up beside albums.
pub const CONFIG_FILENAME: &str = "albummer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub template: TemplateConfig,
    pub processing: ProcessingConfig,
    pub output: OutputConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.template.columns == 0 {
            return Err(ConfigError::Validation(
                "template.columns must be at least 1".into(),
            ));
        }
        if self.template.stylesheet.trim().is_empty() {
            return Err(ConfigError::Validation(
                "template.stylesheet must not be empty".into(),
            ));
        }
        let ext = &self.output.extension;
        if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "output.extension must be a bare extension like \"html\"".into(),
            ));
        }
        Ok(())
    }
}

/// Modification-time ordering for generated templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `asc` is ascending; any other word means newest first.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "asc" { Self::Asc } else { Self::Desc }
    }
}

/// Settings for `make-template`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    pub columns: usize,
    pub order: SortOrder,
    /// Stylesheet the template's `:use` line points at.
    pub stylesheet: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            order: SortOrder::Asc,
            stylesheet: DEFAULT_STYLESHEET.to_string(),
        }
    }
}

/// Name of the stylesheet shipped with the binary.
pub const DEFAULT_STYLESHEET: &str = "default.css";

/// Parallel encoding settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of encoding threads.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_threads
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: "html".to_string(),
        }
    }
}

/// Parse and validate config text.
pub fn parse_config(text: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Load a config file that must exist.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    parse_config(&fs::read_to_string(path)?)
}

/// Load `albummer.toml` from `dir`, or defaults if there is none.
pub fn load_config(dir: &Path) -> Result<Config, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    if path.exists() {
        load_config_file(&path)
    } else {
        Ok(Config::default())
    }
}

/// A stock `albummer.toml` with every option documented.
pub fn stock_config_toml() -> &'static str {
    r#"# albummer configuration
# Every key is optional; the values below are the defaults.

[template]
# Images per row when make-template lays out a folder.
columns = 3
# Order media by modification time: "asc" (oldest first) or "desc".
order = "asc"
# Stylesheet the template's `:use` line points at. The default stylesheet is
# written next to the template when it does not exist yet.
stylesheet = "default.css"

[processing]
# Maximum encoding threads. Omit to use every CPU core.
# max_threads = 4

[output]
# Extension of the generated page, replacing the album file's extension.
extension = "html"
"#
}
