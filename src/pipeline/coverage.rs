//! Source-font character coverage (diagnostics only)

use crate::config::CharacterSet;
use crate::logging::RunLog;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

const SHOWN_MISSING: usize = 10;

/// Coverage summary folded into the manifest's debug bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageStats {
    pub requested: usize,
    pub found_in_source: usize,
    pub missing_count: usize,
    pub missing: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Every code point mapped by any cmap subtable of the font
///
/// Collections are read at index 0.
pub fn available_codepoints(font_path: &Path) -> Result<BTreeSet<u32>, String> {
    let data = std::fs::read(font_path).map_err(|e| e.to_string())?;
    let face = ttf_parser::Face::parse(&data, 0).map_err(|e| e.to_string())?;

    let mut codepoints = BTreeSet::new();
    if let Some(cmap) = face.tables().cmap {
        for subtable in cmap.subtables {
            subtable.codepoints(|cp| {
                codepoints.insert(cp);
            });
        }
    }
    Ok(codepoints)
}

fn unicode_label(c: char) -> String {
    format!("U+{:04X}", c as u32)
}

/// Split the requested characters into those the source font maps and
/// those it lacks
pub fn check_character_coverage(
    source_font: &Path,
    chars: &CharacterSet,
    log: &mut dyn RunLog,
) -> (CharacterSet, CharacterSet, CoverageStats) {
    let available = match available_codepoints(source_font) {
        Ok(codepoints) => codepoints,
        Err(e) => {
            log.error(&format!("Failed to check character coverage: {e}"));
            let stats = CoverageStats {
                requested: chars.len(),
                found_in_source: 0,
                missing_count: chars.len(),
                missing: chars.iter().copied().map(unicode_label).collect(),
                error: Some(e),
            };
            return (CharacterSet::new(), chars.clone(), stats);
        }
    };

    let (found, missing): (CharacterSet, CharacterSet) =
        chars.iter().partition(|c| available.contains(&(**c as u32)));

    let stats = CoverageStats {
        requested: chars.len(),
        found_in_source: found.len(),
        missing_count: missing.len(),
        missing: missing.iter().copied().map(unicode_label).collect(),
        error: None,
    };

    if !missing.is_empty() {
        log.warn(&format!(
            "{} of {} requested characters not found in source font",
            missing.len(),
            chars.len()
        ));

        if log.is_debug() {
            tracing::debug!("Missing characters:");
            for c in missing.iter().take(SHOWN_MISSING) {
                tracing::debug!("  ✗ {} ({c})", unicode_label(*c));
            }
            if missing.len() > SHOWN_MISSING {
                tracing::debug!("  ... and {} more", missing.len() - SHOWN_MISSING);
            }
        }
    } else {
        log.info(&format!("All {} requested characters found in source font", chars.len()));
    }

    (found, missing, stats)
}
