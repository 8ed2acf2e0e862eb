//! Job descriptors and outcomes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths::output_path_for;

/// Identity of a worker inside a pool, counted from 1.
pub type WorkerId = usize;

/// Exit code reported for a job whose process produced none (killed by a
/// signal, or never launched).
pub const NO_EXIT_CODE: i32 = -1;

/// One source-file-to-destination-file conversion request.
///
/// Descriptors are built once at startup and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    source_path: PathBuf,
    output_dir: PathBuf,
    output_ext: String,
}

impl JobDescriptor {
    pub fn new(
        source_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        output_ext: impl Into<String>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            output_dir: output_dir.into(),
            output_ext: output_ext.into(),
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn output_ext(&self) -> &str {
        &self.output_ext
    }

    /// Destination path: `<output_dir>/<source stem>.<output_ext>`.
    pub fn output_path(&self) -> PathBuf {
        output_path_for(&self.source_path, &self.output_dir, &self.output_ext)
    }
}

/// Build one descriptor per source, all sharing a destination directory and
/// extension. Input order is preserved.
pub fn jobs_from_sources<I, P>(
    sources: I,
    output_dir: &Path,
    output_ext: &str,
) -> Vec<JobDescriptor>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    sources
        .into_iter()
        .map(|source| JobDescriptor::new(source, output_dir, output_ext))
        .collect()
}

/// Result of running one job. Produced by a transcoder and consumed right
/// away by the job log.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub job: JobDescriptor,
    pub worker_id: WorkerId,
    pub success: bool,
    /// `None` when the process was killed by a signal or could not start.
    pub exit_code: Option<i32>,
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

impl JobOutcome {
    /// Exit code as written to the job log.
    pub fn reported_code(&self) -> i32 {
        self.exit_code.unwrap_or(NO_EXIT_CODE)
    }
}
