//! BDF ENCODING repair
//!
//! The subset → otf2bdf combination numbers glyphs with placeholder
//! encodings (1, 2, 3, ...) instead of their Unicode code points. The n-th
//! ENCODING record in document order belongs to the n-th requested
//! character in ascending code point order, so the fix rewrites each record
//! positionally. Records beyond the character count are left untouched.

use super::{file_name, file_size_kb};
use crate::config::CharacterSet;
use crate::error::{GenError, Result};
use crate::logging::{LogEntry, RunLog, Status};
use std::fs;
use std::path::Path;

const ENCODING_KEYWORD: &str = "ENCODING";

/// Text encoding a BDF document was decoded with
///
/// otf2bdf copies font metadata (copyright notices and the like) verbatim,
/// which is frequently Latin-1 rather than UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

impl TextEncoding {
    /// Decode as UTF-8, falling back to Latin-1
    pub fn decode(bytes: Vec<u8>) -> (String, TextEncoding) {
        match String::from_utf8(bytes) {
            Ok(text) => (text, TextEncoding::Utf8),
            Err(e) => {
                let text = e.into_bytes().into_iter().map(char::from).collect();
                (text, TextEncoding::Latin1)
            }
        }
    }

    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(c).unwrap_or(b'?'))
                .collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
        }
    }
}

/// What a repair pass found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairStats {
    /// ENCODING records in the document
    pub records: usize,
    /// Records whose value was rewritten
    pub rewritten: usize,
}

/// Whether a line is an `ENCODING <integer>` record
fn is_encoding_record(line: &str) -> bool {
    let Some(rest) = line.strip_prefix(ENCODING_KEYWORD) else {
        return false;
    };
    if !rest.starts_with([' ', '\t']) {
        return false;
    }
    rest.split_whitespace()
        .next()
        .is_some_and(|value| value.parse::<i64>().is_ok())
}

fn line_ending(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

/// Rewrite ENCODING records of an in-memory document
///
/// Every other line passes through unchanged, including its line ending.
pub fn repair_encodings(text: &str, chars: &CharacterSet) -> (String, RepairStats) {
    let mut code_points = chars.iter().map(|&c| c as u32);
    let mut repaired = String::with_capacity(text.len());
    let mut stats = RepairStats {
        records: 0,
        rewritten: 0,
    };

    for line in text.split_inclusive('\n') {
        if is_encoding_record(line) {
            stats.records += 1;
            if let Some(code_point) = code_points.next() {
                repaired.push_str(ENCODING_KEYWORD);
                repaired.push(' ');
                repaired.push_str(&code_point.to_string());
                repaired.push_str(line_ending(line));
                stats.rewritten += 1;
                continue;
            }
        }
        repaired.push_str(line);
    }

    (repaired, stats)
}

/// Read the encodings of a BDF file in document order
pub fn read_encodings(bdf_path: &Path) -> std::io::Result<Vec<i64>> {
    let (text, _) = TextEncoding::decode(fs::read(bdf_path)?);
    Ok(text
        .lines()
        .filter(|line| is_encoding_record(line))
        .filter_map(|line| line.split_whitespace().nth(1)?.parse().ok())
        .collect())
}

/// Fix the ENCODING records of a BDF file in place
///
/// Fails only when the file cannot be read or written. Documents that do
/// not look like BDF are rewritten unchanged.
pub fn fix_bdf_encodings(bdf_path: &Path, chars: &CharacterSet, log: &mut dyn RunLog) -> Result<RepairStats> {
    let repair_error = |source| GenError::Repair {
        path: bdf_path.to_path_buf(),
        source,
    };
    let file_name = file_name(bdf_path);

    let result = fs::read(bdf_path).map_err(repair_error).and_then(|bytes| {
        let (text, encoding) = TextEncoding::decode(bytes);
        let (repaired, stats) = repair_encodings(&text, chars);
        fs::write(bdf_path, encoding.encode(&repaired)).map_err(repair_error)?;
        Ok((stats, encoding))
    });

    match result {
        Ok((stats, encoding)) => {
            if stats.records != chars.len() {
                log.warn(&format!(
                    "{file_name} has {} ENCODING records for {} requested characters; \
                     glyph order may not match",
                    stats.records,
                    chars.len()
                ));
            }
            log.record(
                LogEntry::new("fix_bdf_encodings", "rewrite ENCODING records", Status::Success)
                    .with("output", file_name)
                    .with_opt("size_kb", file_size_kb(bdf_path))
                    .with("records", stats.records)
                    .with("rewritten", stats.rewritten)
                    .with("text_encoding", encoding.name()),
            );
            Ok(stats)
        }
        Err(e) => {
            log.error(&e.to_string());
            log.record(
                LogEntry::new("fix_bdf_encodings", "rewrite ENCODING records", Status::Failed)
                    .with("error", e.to_string()),
            );
            Err(e)
        }
    }
}
