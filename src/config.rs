//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treestr/treestr.toml`
//! 3. Explicit config file (`--config FILE`)
//! 4. Environment variables: `TREESTR_<SECTION>__<KEY>`, e.g.
//!    `TREESTR_RENDER__FORMAT=notation` or `TREESTR_PARSE__MAX_DEPTH=0`
//!
//! Command-line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{DuplicatePolicy, Format, TreeParser, TreePrinter};

/// Default nesting limit applied by the CLI.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Indentation unit repeated once per nesting level
    pub indent: String,
    /// Output format used when none is given on the command line
    pub format: Format,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent: "\t".into(),
            format: Format::default(),
        }
    }
}

/// Parsing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParseConfig {
    /// Handling of sibling nodes sharing a label
    pub duplicates: DuplicatePolicy,
    /// Maximum nesting below the root; 0 disables the limit
    pub max_depth: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            duplicates: DuplicatePolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Raw config for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderConfig {
    pub indent: Option<String>,
    pub format: Option<Format>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawParseConfig {
    pub duplicates: Option<DuplicatePolicy>,
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub render: RawRenderConfig,
    pub parse: RawParseConfig,
}

/// Unified configuration for treestr.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub render: RenderConfig,
    pub parse: ParseConfig,
}

/// Get the XDG config directory for treestr.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treestr").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treestr.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Turn the two-character escape `\t` into a real tab.
///
/// Tabs are awkward to pass through shells and environment variables.
pub fn unescape_indent(indent: &str) -> String {
    indent.replace("\\t", "\t")
}

impl Settings {
    /// Layered load. An explicit path must exist; the global file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit config file
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            debug!("load: explicit config {}", path.display());
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.render.indent = unescape_indent(&current.render.indent);
        Ok(current)
    }

    /// Overlay every field the raw config specifies.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            render: RenderConfig {
                indent: overlay
                    .render
                    .indent
                    .clone()
                    .unwrap_or_else(|| self.render.indent.clone()),
                format: overlay.render.format.unwrap_or(self.render.format),
            },
            parse: ParseConfig {
                duplicates: overlay.parse.duplicates.unwrap_or(self.parse.duplicates),
                max_depth: overlay.parse.max_depth.unwrap_or(self.parse.max_depth),
            },
        }
    }

    /// Apply TREESTR_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREESTR")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("render.indent") {
            settings.render.indent = val;
        }
        if let Ok(val) = config.get_string("render.format") {
            settings.render.format = Format::from_str(&val, true).map_err(|e| {
                ApplicationError::Config {
                    message: format!("TREESTR_RENDER__FORMAT: {e}"),
                }
            })?;
        }
        if let Ok(val) = config.get_string("parse.duplicates") {
            settings.parse.duplicates = DuplicatePolicy::from_str(&val, true).map_err(|e| {
                ApplicationError::Config {
                    message: format!("TREESTR_PARSE__DUPLICATES: {e}"),
                }
            })?;
        }
        if let Ok(val) = config.get_string("parse.max_depth") {
            settings.parse.max_depth = val.parse().map_err(|_| ApplicationError::Config {
                message: format!("TREESTR_PARSE__MAX_DEPTH: invalid value {val}"),
            })?;
        }

        Ok(settings)
    }

    /// Parser honoring the configured nesting limit.
    pub fn parser(&self) -> TreeParser {
        match self.parse.max_depth {
            0 => TreeParser::new(),
            limit => TreeParser::with_max_depth(limit),
        }
    }

    pub fn printer(&self) -> TreePrinter {
        TreePrinter::with_indent(self.render.indent.clone())
    }

    /// Serialize settings to TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }

    /// Commented template for a new config file.
    pub fn template() -> String {
        r#"# treestr configuration
# Location: ~/.config/treestr/treestr.toml (or pass --config FILE)
# Every key can be overridden from the environment as
# TREESTR_<SECTION>__<KEY>, e.g. TREESTR_RENDER__FORMAT=notation

[render]
# Indentation unit per nesting level ("\t" = tab)
# indent = "\t"

# Default output format: braces, notation, mapping, tree
# format = "braces"

[parse]
# Sibling nodes sharing a label: keep, reject, last-wins
# duplicates = "keep"

# Maximum nesting below the root (0 = unlimited)
# max_depth = 512
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
