//! Outline-to-bitmap conversion with `otf2bdf`

use super::{file_name, file_size_kb, finish_tool_step, with_streams};
use crate::error::Result;
use crate::logging::{LogEntry, RunLog, Status};
use crate::tools::{command_line, run_tool};
use std::ffi::OsString;
use std::path::Path;

const STEP: &str = "convert_to_bdf";

pub fn rasterize_args(ttf_path: &Path, bdf_path: &Path, size: u32) -> Vec<OsString> {
    vec![
        OsString::from("-p"),
        OsString::from(size.to_string()),
        ttf_path.as_os_str().to_os_string(),
        OsString::from("-o"),
        bdf_path.as_os_str().to_os_string(),
    ]
}

/// Rasterize `ttf_path` at `size` points into a BDF document
///
/// On failure the BDF path must not be trusted; it may hold partial output.
pub async fn convert_to_bdf(
    rasterizer: &Path,
    ttf_path: &Path,
    bdf_path: &Path,
    size: u32,
    log: &mut dyn RunLog,
) -> Result<()> {
    let args = rasterize_args(ttf_path, bdf_path, size);
    let command = command_line(rasterizer, &args);

    log.record(LogEntry::new(STEP, command.clone(), Status::Started).with("size", size));

    let outcome = run_tool(rasterizer, &args).await;
    let output = finish_tool_step(STEP, rasterizer, &command, outcome, log)?;

    let debug = log.is_debug();
    let entry = LogEntry::new(STEP, command.clone(), Status::Success)
        .with("output", file_name(bdf_path))
        .with_opt("size_kb", file_size_kb(bdf_path))
        .with("full_command", command);
    log.record(with_streams(entry, &output, debug));
    Ok(())
}
