//! Glyph subsetting with fontTools (`pyftsubset`)

use super::{ToolOutput, file_name, file_size_kb, finish_tool_step, with_streams};
use crate::config::{CharacterSet, chars_to_unicode_list};
use crate::error::{GenError, Result};
use crate::logging::{LogEntry, RunLog, Status};
use crate::tools::{command_line, run_tool};
use std::ffi::OsString;
use std::path::Path;

const STEP: &str = "subset_font";
const COMMAND: &str = "fontTools.subset";

/// Whether a path names a font collection (.ttc / .otc)
pub fn is_collection(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttc") || e.eq_ignore_ascii_case("otc"))
}

/// Arguments for one `pyftsubset` run
///
/// Collections are reduced to their first font.
pub fn subset_args(source_font: &Path, chars: &CharacterSet, output_path: &Path) -> Vec<OsString> {
    let mut unicodes = OsString::from("--unicodes=");
    unicodes.push(chars_to_unicode_list(chars).join(","));
    let mut output = OsString::from("--output-file=");
    output.push(output_path);

    let mut args = vec![source_font.as_os_str().to_os_string(), unicodes, output];
    if is_collection(source_font) {
        args.push(OsString::from("--font-number=0"));
    }
    args
}

/// Count the glyphs in a font's outline (`glyf`) table
///
/// CFF-flavoured fonts have no `glyf` table and count as zero.
pub fn count_glyphs(font_path: &Path) -> Result<usize> {
    let data = std::fs::read(font_path)?;
    let face = ttf_parser::Face::parse(&data, 0)
        .map_err(|e| GenError::Subset(format!("cannot read {}: {e}", file_name(font_path))))?;

    Ok(if face.tables().glyf.is_some() {
        usize::from(face.number_of_glyphs())
    } else {
        0
    })
}

/// Produce a subset font holding only the glyphs for `chars`
///
/// Returns the number of glyphs in the subset. Warns, without failing,
/// when fewer than half of the requested characters produced glyphs.
pub async fn generate_subset_font(
    subsetter: &Path,
    source_font: &Path,
    chars: &CharacterSet,
    output_path: &Path,
    log: &mut dyn RunLog,
) -> Result<usize> {
    let args = subset_args(source_font, chars, output_path);
    let full_command = command_line(subsetter, &args);

    log.record(
        LogEntry::new(STEP, format!("{COMMAND} ({} characters)", chars.len()), Status::Started)
            .with("input", file_name(source_font)),
    );

    let outcome = run_tool(subsetter, &args).await;
    let output = finish_tool_step(STEP, subsetter, &full_command, outcome, log).map_err(|e| match e {
        GenError::Conversion { stderr, .. } => GenError::Subset(stderr),
        other => other,
    })?;

    let num_glyphs = match count_glyphs(output_path) {
        Ok(count) => count,
        Err(e) => {
            log.error(&format!("Font subsetting failed: {e}"));
            log.record(
                LogEntry::new(STEP, COMMAND, Status::Failed)
                    .with("full_command", full_command)
                    .with("error", e.to_string()),
            );
            return Err(e);
        }
    };

    if num_glyphs * 2 < chars.len() {
        log.warn(&format!(
            "Only {num_glyphs} glyphs in subset (expected ~{}). \
             Source font may not contain requested characters.",
            chars.len()
        ));
    }

    let debug = log.is_debug();
    log.record(success_entry(output_path, num_glyphs, &full_command, &output, debug));
    Ok(num_glyphs)
}

fn success_entry(output_path: &Path, num_glyphs: usize, full_command: &str, output: &ToolOutput, debug: bool) -> LogEntry {
    // Long --unicodes lists make the command unreadable in logs
    let shown_command: String = if full_command.chars().count() > 120 {
        format!("{}...", full_command.chars().take(120).collect::<String>())
    } else {
        full_command.to_string()
    };

    let entry = LogEntry::new(STEP, COMMAND, Status::Success)
        .with("output", file_name(output_path))
        .with_opt("size_kb", file_size_kb(output_path))
        .with("glyphs_produced", num_glyphs)
        .with("full_command", shown_command);
    with_streams(entry, output, debug)
}
