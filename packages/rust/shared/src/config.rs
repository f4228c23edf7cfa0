//! Application configuration for menuforge.
//!
//! Config is read from `./menuforge.toml`, falling back to
//! `~/.menuforge/menuforge.toml`. CLI flags override config file values,
//! which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MenuforgeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "menuforge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".menuforge";

/// Largest accepted JSON indent width.
const MAX_INDENT: usize = 16;

// ---------------------------------------------------------------------------
// Config structs (matching menuforge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Directory scanning options.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Output rendering options.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the CSV link lists and article folders.
    #[serde(default = "default_input_dir")]
    pub input_dir: String,

    /// Directory receiving the generated JSON and script files.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Create the output directory when it is missing instead of failing.
    #[serde(default)]
    pub create_output_dir: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            create_output_dir: false,
        }
    }
}

fn default_input_dir() -> String {
    "./data/md/".into()
}
fn default_output_dir() -> String {
    "./data/json/".into()
}

/// Order in which directory entries are visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingOrder {
    /// Whatever order the file system enumerates entries in.
    #[default]
    Filesystem,
    /// Byte-wise ascending by entry name.
    Name,
}

/// `[scan]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Entry ordering for CSV files, subdirectories and articles.
    #[serde(default)]
    pub order: ListingOrder,
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File name of the generated script module.
    #[serde(default = "default_script_name")]
    pub script_name: String,

    /// Name of the exported script binding.
    #[serde(default = "default_variable")]
    pub variable: String,

    /// Indent width of the pretty-printed JSON.
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Also write the menu as a standalone `<variable>.json` document.
    #[serde(default)]
    pub emit_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            script_name: default_script_name(),
            variable: default_variable(),
            indent: default_indent(),
            emit_json: false,
        }
    }
}

fn default_script_name() -> String {
    "menu_items.js".into()
}
fn default_variable() -> String {
    "menu_items".into()
}
fn default_indent() -> usize {
    3
}

impl AppConfig {
    /// Reject values that would produce unusable output.
    pub fn validate(&self) -> Result<()> {
        if !is_script_identifier(&self.output.variable) {
            return Err(MenuforgeError::config(format!(
                "output.variable '{}' is not a valid script identifier",
                self.output.variable
            )));
        }
        if self.output.indent > MAX_INDENT {
            return Err(MenuforgeError::config(format!(
                "output.indent {} exceeds the maximum of {MAX_INDENT}",
                self.output.indent
            )));
        }
        if self.output.script_name.is_empty()
            || self.output.script_name.contains(['/', '\\'])
        {
            return Err(MenuforgeError::config(format!(
                "output.script_name '{}' must be a plain file name",
                self.output.script_name
            )));
        }
        Ok(())
    }
}

fn is_script_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

// ---------------------------------------------------------------------------
// Generate config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime generation settings, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Directory holding CSV files and article folders.
    pub input_dir: PathBuf,
    /// Directory receiving generated files.
    pub output_dir: PathBuf,
    /// Create `output_dir` if it is missing.
    pub create_output_dir: bool,
    /// Listing order for scanned entries.
    pub order: ListingOrder,
    /// Script module file name.
    pub script_name: String,
    /// Exported script binding.
    pub variable: String,
    /// JSON indent width.
    pub indent: usize,
    /// Also emit `<variable>.json`.
    pub emit_json: bool,
}

impl From<&AppConfig> for GenerateConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            input_dir: PathBuf::from(&config.paths.input_dir),
            output_dir: PathBuf::from(&config.paths.output_dir),
            create_output_dir: config.paths.create_output_dir,
            order: config.scan.order,
            script_name: config.output.script_name.clone(),
            variable: config.output.variable.clone(),
            indent: config.output.indent,
            emit_json: config.output.emit_json,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the user config directory (`~/.menuforge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| MenuforgeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the user config file (`~/.menuforge/menuforge.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Path of the project-local config file (`./menuforge.toml`).
pub fn local_config_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Load the application config. Tries the project-local file first, then the
/// user file. Returns defaults if neither exists.
pub fn load_config() -> Result<AppConfig> {
    let local = local_config_path();
    if local.exists() {
        return load_config_from(&local);
    }

    let path = config_file_path()?;
    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| MenuforgeError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        MenuforgeError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;

    tracing::debug!(?path, "loaded config file");
    Ok(config)
}

/// Write a default config file to `path` (or `./menuforge.toml`).
/// Returns the path to the created file.
pub fn init_config(path: Option<&Path>) -> Result<PathBuf> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(local_config_path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| MenuforgeError::io(parent, e))?;
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| MenuforgeError::Serialization(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| MenuforgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("input_dir"));
        assert!(toml_str.contains("menu_items.js"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.output.indent, 3);
        assert_eq!(parsed.paths.output_dir, "./data/json/");
        assert_eq!(parsed.scan.order, ListingOrder::Filesystem);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[paths]
input_dir = "content"

[scan]
order = "name"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.paths.input_dir, "content");
        assert_eq!(config.paths.output_dir, "./data/json/");
        assert_eq!(config.scan.order, ListingOrder::Name);
        assert_eq!(config.output.variable, "menu_items");
    }

    #[test]
    fn generate_config_from_app_config() {
        let app = AppConfig::default();
        let generate = GenerateConfig::from(&app);
        assert_eq!(generate.input_dir, PathBuf::from("./data/md/"));
        assert_eq!(generate.script_name, "menu_items.js");
        assert!(!generate.emit_json);
        assert!(!generate.create_output_dir);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.output.variable = "menu-items".into();
        assert!(config.validate().is_err());

        config.output.variable = "menu_items".into();
        config.output.indent = 40;
        assert!(config.validate().is_err());

        config.output.indent = 3;
        config.output.script_name = "out/menu.js".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menuforge.toml");
        std::fs::write(&path, "[output]\nindent = \"wide\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn init_config_writes_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("menuforge.toml");

        let written = init_config(Some(&path)).unwrap();
        assert_eq!(written, path);

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.output.indent, 3);
    }
}
