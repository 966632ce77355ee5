//! Character collection
//!
//! Merges inline strings, a character file, and `U+HHHH[-HHHH]` range
//! expressions into one set of Unicode scalar values.

use super::GenerationConfig;
use crate::error::{GenError, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Requested characters, always iterated in code point order
pub type CharacterSet = BTreeSet<char>;

/// Format characters as `U+XXXX` code points in ascending order
pub fn chars_to_unicode_list(chars: &CharacterSet) -> Vec<String> {
    chars.iter().map(|c| format!("U+{:04X}", *c as u32)).collect()
}

/// Expand a range expression like `U+0030-0039` or a single `U+00B0`
///
/// A reversed range (start above end) expands to nothing. Code points that
/// are not Unicode scalar values (surrogates) are skipped inside ranges and
/// rejected when given alone.
pub fn unicode_range_to_chars(expression: &str) -> Result<CharacterSet> {
    let body = expression.trim().replace("U+", "").replace("u+", "");
    let parse = |hex: &str| {
        u32::from_str_radix(hex.trim(), 16).map_err(|_| {
            GenError::Configuration(format!("Invalid unicode range '{expression}'"))
        })
    };

    match body.split_once('-') {
        Some((start, end)) => {
            let (start, end) = (parse(start)?, parse(end)?);
            if start > end {
                tracing::warn!("Unicode range '{}' is reversed and selects nothing", expression);
                return Ok(CharacterSet::new());
            }
            Ok((start..=end).filter_map(char::from_u32).collect())
        }
        None => {
            let code = parse(&body)?;
            let c = char::from_u32(code).ok_or_else(|| {
                GenError::Configuration(format!(
                    "'{expression}' is not a Unicode scalar value"
                ))
            })?;
            Ok(CharacterSet::from([c]))
        }
    }
}

/// Collect every requested character for a configuration
///
/// `config_dir` anchors a relative `characters.file`. A character file that
/// does not exist contributes nothing.
pub fn collect_characters(config: &GenerationConfig, config_dir: Option<&Path>) -> Result<CharacterSet> {
    let sources = &config.characters;
    let mut chars = CharacterSet::new();

    if let Some(inline) = &sources.inline {
        chars.extend(inline.chars());
    }

    if let Some(file) = &sources.file {
        let file_path = match config_dir {
            Some(dir) if file.is_relative() => dir.join(file),
            _ => file.clone(),
        };

        if file_path.exists() {
            let contents = fs::read_to_string(&file_path).map_err(|e| {
                GenError::Configuration(format!(
                    "Failed to read character file {}: {e}",
                    file_path.display()
                ))
            })?;
            chars.extend(contents.chars());
        } else {
            tracing::warn!("Character file {} does not exist, skipping", file_path.display());
        }
    }

    for range in &sources.unicode_ranges {
        chars.extend(unicode_range_to_chars(range)?);
    }

    // `deduplicate_chars` has nothing left to do: a set never holds duplicates

    if config.strip_whitespace {
        chars.retain(|c| !c.is_whitespace());
    }

    Ok(chars)
}
