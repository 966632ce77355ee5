//! Run manifest (`<family>-manifest.json`)

use super::coverage::CoverageStats;
use crate::config::{CharacterSet, GenerationConfig, OutputFormat, chars_to_unicode_list};
use crate::error::Result;
use crate::logging::{GenerationLog, LogEntry};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const MANIFEST_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub version: String,
    pub source_font: PathBuf,
    pub character_count: usize,
    /// Sorted characters, concatenated
    pub characters: String,
    pub unicode_ranges: Vec<String>,
    pub sizes: Vec<u32>,
    pub output_directory: PathBuf,
    /// Basenames only
    pub generated_files: Vec<String>,
    pub formats: Vec<OutputFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<DebugInfo>,
}

/// Diagnostics bundle written in debug mode
#[derive(Debug, Clone, Serialize)]
pub struct DebugInfo {
    pub timestamp: String,
    pub tool_version: String,
    pub execution_log: Vec<LogEntry>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_coverage: Option<CoverageStats>,
}

impl DebugInfo {
    pub fn from_log(log: &GenerationLog, character_coverage: Option<CoverageStats>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            execution_log: log.entries().to_vec(),
            warnings: log.warnings().to_vec(),
            errors: log.errors().to_vec(),
            character_coverage,
        }
    }
}

pub fn manifest_file_name(font_family: &str) -> String {
    format!("{font_family}-manifest.json")
}

pub fn generate_metadata(
    config: &GenerationConfig,
    chars: &CharacterSet,
    generated_files: &[String],
    output_directory: &Path,
    debug_info: Option<DebugInfo>,
) -> Manifest {
    Manifest {
        version: MANIFEST_VERSION.to_string(),
        source_font: config.source_font.clone(),
        character_count: chars.len(),
        characters: chars.iter().collect(),
        unicode_ranges: chars_to_unicode_list(chars),
        sizes: config.sizes.clone(),
        output_directory: output_directory.to_path_buf(),
        generated_files: generated_files.to_vec(),
        formats: config.output.formats.clone(),
        debug_info,
    }
}

/// Write the manifest as pretty-printed JSON, returning its path
pub fn write_manifest(manifest: &Manifest, font_output_dir: &Path, font_family: &str) -> Result<PathBuf> {
    let path = font_output_dir.join(manifest_file_name(font_family));
    let json = serde_json::to_string_pretty(manifest).map_err(std::io::Error::from)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Verbosity;
    use crate::logging::{RunLog, Status};

    fn config() -> GenerationConfig {
        GenerationConfig::from_yaml_str(
            "source_font: fonts/Clock.ttf\nsizes: [16]\noutput:\n  formats: [bdf, pcf]\n  font_family: clock\n",
        )
        .unwrap()
    }

    #[test]
    fn test_manifest_fields() {
        let chars: CharacterSet = "9:0".chars().collect();
        let files = vec!["clock-16pt.bdf".to_string(), "clock-16pt.pcf".to_string()];
        let manifest = generate_metadata(&config(), &chars, &files, Path::new("out/clock"), None);

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["source_font"], "fonts/Clock.ttf");
        assert_eq!(json["character_count"], 3);
        assert_eq!(json["characters"], "09:");
        assert_eq!(json["unicode_ranges"], serde_json::json!(["U+0030", "U+0039", "U+003A"]));
        assert_eq!(json["formats"], serde_json::json!(["bdf", "pcf"]));
        assert_eq!(json["generated_files"][1], "clock-16pt.pcf");
        assert!(json.get("debug_info").is_none());
    }

    #[test]
    fn test_debug_info_from_log() {
        let mut log = GenerationLog::new(Verbosity::Debug);
        log.record(LogEntry::new("subset_font", "fontTools.subset", Status::Started));
        log.warn("careful");

        let info = DebugInfo::from_log(&log, Some(CoverageStats::default()));
        assert!(info.timestamp.ends_with('Z'));
        assert_eq!(info.tool_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.execution_log.len(), 1);
        assert_eq!(info.warnings, vec!["careful"]);

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["execution_log"][0]["status"], "started");
        assert_eq!(json["character_coverage"]["missing_count"], 0);
    }

    #[test]
    fn test_write_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let chars: CharacterSet = "A".chars().collect();
        let manifest = generate_metadata(&config(), &chars, &["clock-16pt.pcf".to_string()], dir.path(), None);

        let path = write_manifest(&manifest, dir.path(), "clock").unwrap();
        assert_eq!(path.file_name().unwrap(), "clock-manifest.json");

        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["generated_files"], serde_json::json!(["clock-16pt.pcf"]));
    }
}
