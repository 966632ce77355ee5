//! BDF to PCF packing with `bdftopcf`

use super::{file_name, file_size_kb, finish_tool_step, with_streams};
use crate::error::Result;
use crate::logging::{LogEntry, RunLog, Status};
use crate::tools::{command_line, run_tool_to};
use std::path::Path;

const STEP: &str = "convert_to_pcf";

/// Pack a repaired BDF document into a PCF file
///
/// The packer writes to stdout, which is redirected into `pcf_path`. The
/// destination is created up front, so a failed run leaves a partial or
/// empty file for the caller to deal with.
pub async fn convert_to_pcf(packer: &Path, bdf_path: &Path, pcf_path: &Path, log: &mut dyn RunLog) -> Result<()> {
    let args = [bdf_path.as_os_str()];
    let command = command_line(packer, &args);

    log.record(LogEntry::new(STEP, command.clone(), Status::Started));

    let destination = match std::fs::File::create(pcf_path) {
        Ok(file) => file,
        Err(e) => {
            log.error(&format!("Cannot create {}: {e}", file_name(pcf_path)));
            log.record(
                LogEntry::new(STEP, command.clone(), Status::Failed)
                    .with("full_command", command)
                    .with("error", e.to_string()),
            );
            return Err(e.into());
        }
    };

    let outcome = run_tool_to(packer, &args, destination).await;
    let output = finish_tool_step(STEP, packer, &command, outcome, log)?;

    let debug = log.is_debug();
    let entry = LogEntry::new(STEP, command.clone(), Status::Success)
        .with("output", file_name(pcf_path))
        .with_opt("size_kb", file_size_kb(pcf_path))
        .with("full_command", command);
    log.record(with_streams(entry, &output, debug));
    Ok(())
}
