//! Project configuration
//!
//! A generation run is described by a YAML document next to the user's
//! character lists:
//!
//! ```yaml
//! source_font: fonts/DejaVuSans.ttf
//! sizes: [12, 16]
//! characters:
//!   inline: "0123456789:"
//!   file: chars.txt
//!   unicode_ranges: ["U+00B0", "U+0041-005A"]
//! strip_whitespace: true
//! output:
//!   directory: output
//!   formats: [bdf, pcf]
//!   font_family: clock
//! logging:
//!   level: verbose
//! ```

pub mod characters;

use crate::error::{GenError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub use characters::{CharacterSet, chars_to_unicode_list, collect_characters, unicode_range_to_chars};

/// A fully parsed project configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    pub source_font: PathBuf,
    pub sizes: Vec<u32>,
    #[serde(default)]
    pub characters: CharacterSources,
    #[serde(default = "default_true")]
    pub deduplicate_chars: bool,
    #[serde(default)]
    pub strip_whitespace: bool,
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where requested characters come from
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterSources {
    pub inline: Option<String>,
    /// Resolved relative to the config file's directory
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub unicode_ranges: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub formats: Vec<OutputFormat>,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_true")]
    pub metadata: bool,
    /// Resolved relative to the tool-wide default output directory
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

/// Artifact formats a run can keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OutputFormat {
    Bdf,
    Pcf,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Bdf => "bdf",
            OutputFormat::Pcf => "pcf",
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bdf" => Ok(OutputFormat::Bdf),
            "pcf" => Ok(OutputFormat::Pcf),
            other => Err(format!(
                "unknown output format '{other}' (expected 'bdf' or 'pcf')"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// How much the run reports while it works
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Default,
    Verbose,
    Debug,
}

impl Verbosity {
    /// Unknown level names fall back to the default level
    pub fn parse(level: &str) -> Self {
        match level.trim().to_ascii_lowercase().as_str() {
            "debug" => Verbosity::Debug,
            "verbose" => Verbosity::Verbose,
            _ => Verbosity::Default,
        }
    }

    /// CLI flags win over the config file; `--debug` wins over `--verbose`
    pub fn resolve(verbose_flag: bool, debug_flag: bool, config_level: Option<&str>) -> Self {
        if debug_flag {
            Verbosity::Debug
        } else if verbose_flag {
            Verbosity::Verbose
        } else {
            config_level.map(Verbosity::parse).unwrap_or_default()
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::Debug)
    }

    pub fn is_debug(&self) -> bool {
        matches!(self, Verbosity::Debug)
    }
}

fn default_true() -> bool {
    true
}

fn default_font_family() -> String {
    "custom".to_string()
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("output")
}

impl GenerationConfig {
    /// Parse a YAML document that is already in memory
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: GenerationConfig = config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Yaml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn wants(&self, format: OutputFormat) -> bool {
        self.output.formats.contains(&format)
    }

    pub fn verbosity(&self, verbose_flag: bool, debug_flag: bool) -> Verbosity {
        Verbosity::resolve(verbose_flag, debug_flag, self.logging.level.as_deref())
    }

    fn validate(&self) -> Result<()> {
        if self.sizes.is_empty() {
            return Err(GenError::Configuration(
                "'sizes' must list at least one point size".to_string(),
            ));
        }
        if self.sizes.contains(&0) {
            return Err(GenError::Configuration(
                "'sizes' must contain positive point sizes".to_string(),
            ));
        }
        if self.output.font_family.trim().is_empty() {
            return Err(GenError::Configuration(
                "'output.font_family' must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load the project configuration from a YAML file
pub fn load_config(path: &Path) -> Result<GenerationConfig> {
    if !path.exists() {
        return Err(GenError::Configuration(format!(
            "Config file {} not found",
            path.display()
        )));
    }

    let config: GenerationConfig = config::Config::builder()
        .add_source(config::File::from(path).format(config::FileFormat::Yaml))
        .build()?
        .try_deserialize()?;
    config.validate()?;

    tracing::debug!("Loaded project config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
source_font: /fonts/Test.ttf
sizes: [16, 24]
output:
  formats: [bdf, pcf]
"#;

    #[test]
    fn test_defaults_applied() {
        let config = GenerationConfig::from_yaml_str(MINIMAL).unwrap();
        assert_eq!(config.sizes, vec![16, 24]);
        assert_eq!(config.output.font_family, "custom");
        assert!(config.output.metadata);
        assert!(config.deduplicate_chars);
        assert!(!config.strip_whitespace);
        assert_eq!(config.output.directory, PathBuf::from("output"));
        assert!(config.wants(OutputFormat::Bdf));
        assert!(config.wants(OutputFormat::Pcf));
    }

    #[test]
    fn test_missing_source_font_is_configuration_error() {
        let result = GenerationConfig::from_yaml_str("sizes: [16]\noutput:\n  formats: [bdf]\n");
        assert!(matches!(result, Err(GenError::Configuration(_))));
    }

    #[test]
    fn test_missing_formats_is_configuration_error() {
        let result = GenerationConfig::from_yaml_str("source_font: a.ttf\nsizes: [16]\noutput: {}\n");
        assert!(matches!(result, Err(GenError::Configuration(_))));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let yaml = "source_font: a.ttf\nsizes: [16]\noutput:\n  formats: [otf]\n";
        assert!(matches!(
            GenerationConfig::from_yaml_str(yaml),
            Err(GenError::Configuration(_))
        ));
    }

    #[test]
    fn test_zero_size_rejected() {
        let yaml = "source_font: a.ttf\nsizes: [0]\noutput:\n  formats: [bdf]\n";
        assert!(GenerationConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_load_config_reports_missing_file() {
        let err = load_config(Path::new("/nonexistent/cp-font-gen/config.yaml")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_verbosity_priority() {
        assert_eq!(Verbosity::resolve(false, true, Some("default")), Verbosity::Debug);
        assert_eq!(Verbosity::resolve(true, false, Some("debug")), Verbosity::Verbose);
        assert_eq!(Verbosity::resolve(false, false, Some("DEBUG")), Verbosity::Debug);
        assert_eq!(Verbosity::resolve(false, false, Some("loud")), Verbosity::Default);
        assert_eq!(Verbosity::resolve(false, false, None), Verbosity::Default);
        assert!(Verbosity::Debug.is_verbose());
    }
}
