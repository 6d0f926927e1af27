use camino::{Utf8Path, Utf8PathBuf};
use std::process::Stdio;
use thiserror::Error;

pub mod platform;

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("Build configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Build command template could not be parsed")]
    ParseError,
}

/// Runs the external build tool described by a command template.
///
/// Supported placeholders: `$SOLUTION` (solution file path), `$MODE` (build
/// configuration) and `$TARGETS` (expanded to `-t:<a>;<b>`, or removed when
/// the target list is empty).
pub struct ProcessBuildInvoker {
    solution: Utf8PathBuf,
    template: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedBuildCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: std::path::PathBuf,
}

const SOLUTION_PLACEHOLDER: &str = "__HOTBUILD_SOLUTION__";
const MODE_PLACEHOLDER: &str = "__HOTBUILD_MODE__";
const TARGETS_PLACEHOLDER: &str = "__HOTBUILD_TARGETS__";

fn targets_arg(targets: &[String]) -> Option<String> {
    if targets.is_empty() {
        None
    } else {
        Some(format!("-t:{}", targets.join(";")))
    }
}

impl ProcessBuildInvoker {
    pub fn new(solution: Utf8PathBuf, template: String) -> Self {
        Self { solution, template }
    }

    pub fn solution(&self) -> &Utf8Path {
        &self.solution
    }

    pub(crate) fn resolve_command(
        &self,
        mode: &str,
        targets: &[String],
    ) -> Result<ResolvedBuildCommand, InvokeError> {
        if mode.trim().is_empty() {
            return Err(InvokeError::Config("Build mode cannot be empty".into()));
        }

        // Values go in after splitting so `My Projects/` or a mode with spaces stays one argument.
        let cmd_str = self
            .template
            .replace("$SOLUTION", SOLUTION_PLACEHOLDER)
            .replace("$MODE", MODE_PLACEHOLDER)
            .replace("$TARGETS", TARGETS_PLACEHOLDER);

        #[cfg(target_os = "windows")]
        let mut parts = platform::split_command_windows(&cmd_str).ok_or(InvokeError::ParseError)?;
        #[cfg(not(target_os = "windows"))]
        let mut parts = shlex::split(&cmd_str).ok_or(InvokeError::ParseError)?;

        match targets_arg(targets) {
            None => parts.retain(|p| p != TARGETS_PLACEHOLDER),
            Some(arg) => {
                for p in &mut parts {
                    if p.contains(TARGETS_PLACEHOLDER) {
                        *p = p.replace(TARGETS_PLACEHOLDER, &arg);
                    }
                }
            }
        }

        for p in &mut parts {
            if p.contains(SOLUTION_PLACEHOLDER) {
                *p = p.replace(SOLUTION_PLACEHOLDER, self.solution.as_str());
            }
            if p.contains(MODE_PLACEHOLDER) {
                *p = p.replace(MODE_PLACEHOLDER, mode);
            }
        }

        if parts.is_empty() {
            return Err(InvokeError::Config(
                "Build template produced empty command".into(),
            ));
        }

        let program = parts.remove(0);

        let working_dir = self
            .solution
            .parent()
            .filter(|p| !p.as_str().is_empty())
            .map(|p| p.as_std_path().to_path_buf())
            .unwrap_or_else(|| std::path::PathBuf::from("."));

        Ok(ResolvedBuildCommand {
            program,
            args: parts,
            working_dir,
        })
    }

    /// Runs the build to completion. `Ok(false)` means the tool ran and reported failure.
    pub fn run(&self, mode: &str, targets: &[String]) -> Result<bool, InvokeError> {
        let cmd = self.resolve_command(mode, targets)?;

        tracing::info!(
            program = %cmd.program,
            args = ?cmd.args,
            cwd = %cmd.working_dir.display(),
            "Running build tool"
        );

        let status = std::process::Command::new(&cmd.program)
            .args(&cmd.args)
            .current_dir(&cmd.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;

        if !status.success() {
            tracing::warn!("Build tool exited with {status}");
        }
        Ok(status.success())
    }
}
