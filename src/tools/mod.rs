//! External tool invocation
//!
//! Every converter in the pipeline is an external executable. A run of one
//! ends in exactly one of three ways, and callers need to tell them apart:
//! a missing tool calls for an install hint, a failing one for its stderr.

pub mod checker;

use crate::core::config_file::ToolConfig;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Result of running an external tool to completion
#[derive(Debug)]
pub enum ToolOutcome {
    Success { stdout: String, stderr: String },
    NotFound,
    Failed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }
}

/// Executables used by the pipeline
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub subsetter: PathBuf,
    pub rasterizer: PathBuf,
    pub packer: PathBuf,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            subsetter: PathBuf::from(SUBSETTER),
            rasterizer: PathBuf::from(RASTERIZER),
            packer: PathBuf::from(PACKER),
        }
    }
}

impl Toolchain {
    /// Default tools, with any overrides from the user config applied
    pub fn from_config(config: Option<&ToolConfig>) -> Self {
        let mut toolchain = Self::default();
        if let Some(overrides) = config.map(|c| &c.tools) {
            if let Some(path) = &overrides.subsetter {
                toolchain.subsetter = path.clone();
            }
            if let Some(path) = &overrides.rasterizer {
                toolchain.rasterizer = path.clone();
            }
            if let Some(path) = &overrides.packer {
                toolchain.packer = path.clone();
            }
        }
        toolchain
    }
}

pub const SUBSETTER: &str = "pyftsubset";
pub const RASTERIZER: &str = "otf2bdf";
pub const PACKER: &str = "bdftopcf";

/// Install hint shown when a tool cannot be found
pub fn install_hint(tool: &str) -> &'static str {
    match tool {
        RASTERIZER => "brew install otf2bdf or apt-get install otf2bdf",
        PACKER => "brew install bdftopcf",
        SUBSETTER => "pip install fonttools",
        _ => "see the tool's documentation",
    }
}

/// Short name of a tool for messages (the executable's file name)
pub fn tool_name(program: &std::path::Path) -> String {
    program
        .file_name()
        .unwrap_or(program.as_os_str())
        .to_string_lossy()
        .into_owned()
}

/// Render a command line for logs
pub fn command_line<S: AsRef<OsStr>>(program: &std::path::Path, args: &[S]) -> String {
    std::iter::once(program.as_os_str())
        .chain(args.iter().map(|a| a.as_ref()))
        .map(|a| a.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a tool and capture both output streams
pub async fn run_tool<S: AsRef<OsStr>>(program: &std::path::Path, args: &[S]) -> std::io::Result<ToolOutcome> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    run_command(cmd).await
}

/// Run a tool with stdout redirected into `stdout`, capturing only stderr
pub async fn run_tool_to<S: AsRef<OsStr>>(
    program: &std::path::Path,
    args: &[S],
    stdout: std::fs::File,
) -> std::io::Result<ToolOutcome> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::piped());
    run_command(cmd).await
}

/// Spawn with the stdio the caller configured; `output()` would replace
/// a redirected stdout with a pipe
async fn run_command(mut cmd: Command) -> std::io::Result<ToolOutcome> {
    // A timed-out version check drops this future; the child must not outlive it
    cmd.kill_on_drop(true);
    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ToolOutcome::NotFound),
        Err(e) => return Err(e),
    };
    let output = child.wait_with_output().await?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if output.status.success() {
        Ok(ToolOutcome::Success { stdout, stderr })
    } else {
        Ok(ToolOutcome::Failed {
            code: output.status.code(),
            stdout,
            stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config_file::ToolOverrides;
    use std::path::Path;

    #[test]
    fn test_default_toolchain() {
        let toolchain = Toolchain::default();
        assert_eq!(toolchain.subsetter, PathBuf::from("pyftsubset"));
        assert_eq!(toolchain.rasterizer, PathBuf::from("otf2bdf"));
        assert_eq!(toolchain.packer, PathBuf::from("bdftopcf"));
    }

    #[test]
    fn test_overrides_applied() {
        let config = ToolConfig {
            output_directory: None,
            tools: ToolOverrides {
                packer: Some(PathBuf::from("/opt/x11/bin/bdftopcf")),
                ..Default::default()
            },
        };
        let toolchain = Toolchain::from_config(Some(&config));
        assert_eq!(toolchain.packer, PathBuf::from("/opt/x11/bin/bdftopcf"));
        assert_eq!(toolchain.rasterizer, PathBuf::from("otf2bdf"));
    }

    #[test]
    fn test_command_line_and_name() {
        let program = Path::new("/usr/bin/otf2bdf");
        assert_eq!(
            command_line(program, &["-p", "16", "a.ttf"]),
            "/usr/bin/otf2bdf -p 16 a.ttf"
        );
        assert_eq!(tool_name(program), "otf2bdf");
    }

    #[tokio::test]
    async fn test_missing_tool_is_not_found() {
        let outcome = run_tool(Path::new("/nonexistent/cp-font-gen-tool"), &["--version"])
            .await
            .unwrap();
        assert!(matches!(outcome, ToolOutcome::NotFound));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_status_distinguishes_failure() {
        let ok = run_tool(Path::new("sh"), &["-c", "echo hello"]).await.unwrap();
        match ok {
            ToolOutcome::Success { stdout, .. } => assert_eq!(stdout, "hello"),
            other => panic!("expected success, got {other:?}"),
        }

        let failed = run_tool(Path::new("sh"), &["-c", "echo broken >&2; exit 3"])
            .await
            .unwrap();
        match failed {
            ToolOutcome::Failed { code, stderr, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "broken");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_redirected_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let file = std::fs::File::create(&path).unwrap();

        let outcome = run_tool_to(Path::new("sh"), &["-c", "printf packed"], file)
            .await
            .unwrap();
        assert!(outcome.is_success());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "packed");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_redirected_run_still_captures_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pcf");
        let file = std::fs::File::create(&path).unwrap();

        let outcome = run_tool_to(Path::new("sh"), &["-c", "printf data; echo warning >&2; exit 1"], file)
            .await
            .unwrap();
        match outcome {
            ToolOutcome::Failed { code, stdout, stderr } => {
                assert_eq!(code, Some(1));
                assert!(stdout.is_empty());
                assert_eq!(stderr, "warning");
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "data");
    }
}
