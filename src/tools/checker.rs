//! Tool presence and version checking

use super::{ToolOutcome, Toolchain, install_hint, run_tool, tool_name};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound for a `--version` probe; some tools ignore the flag and wait
const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// One external dependency and how to install it
#[derive(Debug, Clone)]
pub struct Requirement {
    pub program: PathBuf,
    pub install: &'static str,
}

/// Result of probing one requirement
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub name: String,
    pub exists: bool,
    pub version: Option<String>,
    pub install: &'static str,
}

/// Required tools grouped by category
pub fn tool_requirements(toolchain: &Toolchain) -> Vec<(&'static str, Vec<Requirement>)> {
    let requirement = |program: &Path| Requirement {
        program: program.to_path_buf(),
        install: install_hint(&tool_name(program)),
    };

    vec![(
        "System Commands",
        vec![
            requirement(&toolchain.rasterizer),
            requirement(&toolchain.packer),
            requirement(&toolchain.subsetter),
        ],
    )]
}

/// Check whether a command exists and read its version line
pub async fn check_command_exists(program: &Path) -> (bool, Option<String>) {
    match run_tool(Path::new("which"), &[program.as_os_str()]).await {
        Ok(outcome) if outcome.is_success() => {}
        _ => return (false, None),
    }

    let probe = tokio::time::timeout(VERSION_PROBE_TIMEOUT, run_tool(program, &["--version"])).await;
    let version = match probe {
        Ok(Ok(ToolOutcome::Success { stdout, .. })) | Ok(Ok(ToolOutcome::Failed { stdout, .. })) => {
            stdout.lines().next().map(str::to_string).filter(|l| !l.is_empty())
        }
        _ => None,
    };

    (true, version)
}

/// Probe every requirement in order
pub async fn check_all(toolchain: &Toolchain) -> Vec<(&'static str, Vec<ToolStatus>)> {
    let mut report = Vec::new();
    for (category, requirements) in tool_requirements(toolchain) {
        let mut statuses = Vec::new();
        for requirement in requirements {
            let (exists, version) = check_command_exists(&requirement.program).await;
            tracing::debug!(
                "{}: exists={} version={:?}",
                requirement.program.display(),
                exists,
                version
            );
            statuses.push(ToolStatus {
                name: tool_name(&requirement.program),
                exists,
                version,
                install: requirement.install,
            });
        }
        report.push((category, statuses));
    }
    report
}
