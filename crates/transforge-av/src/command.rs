//! Builder for executing external tool commands.
//!
//! Commands are launched directly with an argument list. Nothing is ever
//! handed to a shell, so paths with spaces or quotes reach the tool intact.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::{Error, Result};

/// A builder for constructing and executing external tool invocations.
///
/// Execution blocks the calling thread until the process exits. There is no
/// timeout: a tool that never exits blocks its caller forever.
///
/// # Example
///
/// ```no_run
/// use transforge_av::ToolCommand;
/// use std::path::PathBuf;
///
/// # fn example() -> transforge_av::Result<()> {
/// let status = ToolCommand::new(PathBuf::from("ffmpeg"))
///     .arg("-y")
///     .arg("-i").arg("/media/in.mov")
///     .arg("/tmp/out/in.mp4")
///     .status()?;
/// println!("{status}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    show_output: bool,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            show_output: false,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<OsString>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<OsString>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Let the tool write to the inherited stdout/stderr instead of
    /// discarding its output.
    pub fn show_output(&mut self, show: bool) -> &mut Self {
        self.show_output = show;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Run the command to completion and return its exit status.
    ///
    /// A non-zero status is not an error here; callers decide what it means.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolFailed`] if the process cannot be spawned or
    /// waited on.
    pub fn status(&self) -> Result<ExitStatus> {
        let (stdout, stderr) = if self.show_output {
            (Stdio::inherit(), Stdio::inherit())
        } else {
            (Stdio::null(), Stdio::null())
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
            .map_err(|e| Error::tool_failed(self.program_name(), format!("failed to spawn: {e}")))?;

        child.wait().map_err(|e| {
            Error::tool_failed(
                self.program_name(),
                format!("I/O error waiting for process: {e}"),
            )
        })
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}
