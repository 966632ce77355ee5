//! Tool-wide user configuration
//!
//! Manages settings from ~/.config/cp-font-gen/config.yaml (or
//! $XDG_CONFIG_HOME/cp-font-gen/config.yaml). These settings apply to every
//! project and are overridden by the project config.

use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "cp-font-gen";
const CONFIG_FILE: &str = "config.yaml";

/// User configuration from ~/.config/cp-font-gen/config.yaml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolConfig {
    /// Base directory for relative `output.directory` values (e.g., "~/fonts")
    pub output_directory: Option<PathBuf>,
    /// Replacement executables for the external converters
    #[serde(default)]
    pub tools: ToolOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolOverrides {
    pub subsetter: Option<PathBuf>,
    pub rasterizer: Option<PathBuf>,
    pub packer: Option<PathBuf>,
}

impl ToolConfig {
    /// Get the path to the cp-font-gen config directory
    pub fn config_dir() -> PathBuf {
        config_dir_from(std::env::var_os("XDG_CONFIG_HOME"), dirs::home_dir())
    }

    /// Get the path to the user config file
    pub fn config_path() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE)
    }

    /// Load configuration from the user config file
    pub fn load() -> Option<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path
    ///
    /// A missing or unreadable file means "no tool config"; it never fails
    /// the run.
    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        let loaded = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Yaml))
            .build()
            .and_then(|c| c.try_deserialize::<ToolConfig>());

        match loaded {
            Ok(config) => {
                tracing::debug!("Loaded tool config from {:?}", path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse {:?}: {}", path, e);
                None
            }
        }
    }

    /// Default output directory: the configured one, else the working directory
    pub fn default_output_dir(config: Option<&ToolConfig>) -> PathBuf {
        match config.and_then(|c| c.output_directory.as_ref()) {
            Some(dir) => expand_home(dir, dirs::home_dir()),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Resolve a project's `output.directory` against the tool default
    pub fn resolve_output_dir(config: Option<&ToolConfig>, project_dir: &Path) -> PathBuf {
        if project_dir.is_absolute() {
            project_dir.to_path_buf()
        } else {
            Self::default_output_dir(config).join(project_dir)
        }
    }
}

fn config_dir_from(xdg_config_home: Option<OsString>, home: Option<PathBuf>) -> PathBuf {
    match xdg_config_home.filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir).join(APP_DIR),
        None => home
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join(APP_DIR),
    }
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &Path, home: Option<PathBuf>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
