//! Running one conversion job through the external tool.

use std::path::PathBuf;
use std::time::Instant;

use transforge_common::{JobDescriptor, JobOutcome, WorkerId};

use crate::command::ToolCommand;
use crate::tools::DEFAULT_TOOL;

/// Runs a single job to completion and reports what happened.
///
/// Implementations block the calling thread for the whole conversion and
/// never retry. Failures are reported in the returned outcome, not as
/// errors, so a failed job can never unwind the worker that ran it.
pub trait Transcoder: Send + Sync {
    fn run(&self, worker_id: WorkerId, job: &JobDescriptor) -> JobOutcome;
}

/// Settings shared by every conversion in a run.
#[derive(Debug, Clone)]
pub struct TranscodeSettings {
    /// Program to launch.
    pub tool: PathBuf,
    /// Extra arguments placed between the input and the output path.
    pub options: Vec<String>,
    /// Pass the tool's stdout/stderr through instead of discarding it.
    pub show_output: bool,
}

impl Default for TranscodeSettings {
    fn default() -> Self {
        Self {
            tool: PathBuf::from(DEFAULT_TOOL),
            options: Vec::new(),
            show_output: false,
        }
    }
}

/// [`Transcoder`] that shells out to ffmpeg (or any tool with the same
/// `-y -i <input> [options] <output>` calling convention).
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    settings: TranscodeSettings,
}

impl FfmpegTranscoder {
    pub fn new(settings: TranscodeSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TranscodeSettings {
        &self.settings
    }

    /// Build the command for `job`: `<tool> -y -i <source> [options] <output>`.
    pub fn command_for(&self, job: &JobDescriptor) -> ToolCommand {
        let mut cmd = ToolCommand::new(self.settings.tool.clone());
        cmd.arg("-y")
            .arg("-i")
            .arg(job.source_path())
            .args(self.settings.options.iter().map(String::as_str))
            .arg(job.output_path())
            .show_output(self.settings.show_output);
        cmd
    }
}

impl Transcoder for FfmpegTranscoder {
    fn run(&self, worker_id: WorkerId, job: &JobDescriptor) -> JobOutcome {
        let output_path = job.output_path();
        let cmd = self.command_for(job);

        #[cfg(feature = "tracing")]
        tracing::debug!(worker = worker_id, command = %cmd, "Launching conversion");

        let started = Instant::now();
        let exit_code = match cmd.status() {
            Ok(status) => {
                if status.success() {
                    Some(0)
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        worker = worker_id,
                        %status,
                        "Conversion tool exited abnormally"
                    );
                    // None when terminated by a signal.
                    status.code()
                }
            }
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(worker = worker_id, "{}", _e);
                None
            }
        };

        JobOutcome {
            job: job.clone(),
            worker_id,
            success: exit_code == Some(0),
            exit_code,
            output_path,
            elapsed: started.elapsed(),
        }
    }
}
