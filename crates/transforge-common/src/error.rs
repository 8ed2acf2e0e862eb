//! Common error types used throughout transforge.
//!
//! Every failure that can end a run funnels into [`Error`], which carries
//! enough context for the binary to pick a process exit status via
//! [`Error::exit_code`].

use crate::job::WorkerId;

/// The run completed; per-job failures were not surfaced.
pub const EXIT_OK: u8 = 0;
/// The run completed but at least one job failed and the caller asked to know.
pub const EXIT_JOB_FAILURES: u8 = 1;
/// Missing or invalid arguments. Matches the status clap uses for usage errors.
pub const EXIT_USAGE: u8 = 2;
/// A resource could not be set up (I/O, config, output directory).
pub const EXIT_SETUP: u8 = 3;
/// A worker thread could not be created.
pub const EXIT_THREAD_SPAWN: u8 = 4;
/// A worker thread could not be joined.
pub const EXIT_WORKER_JOIN: u8 = 5;

/// Common error type for transforge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be used.
    #[error("Config error: {0}")]
    Config(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The OS refused to create a worker thread.
    #[error("Failed to spawn worker {worker}: {source}")]
    ThreadSpawn {
        /// Identity the worker would have had.
        worker: WorkerId,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// A worker thread terminated abnormally and could not be joined.
    #[error("Worker {0} panicked")]
    WorkerPanicked(WorkerId),

    /// The run completed, but some jobs failed.
    #[error("{failed} of {total} jobs failed")]
    JobsFailed {
        /// Number of failed jobs.
        failed: usize,
        /// Number of jobs in the run.
        total: usize,
    },
}

impl Error {
    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Map this error to the process exit status.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::InvalidInput(_) => EXIT_USAGE,
            Error::Config(_) => EXIT_SETUP,
            Error::Io(_) => EXIT_SETUP,
            Error::ThreadSpawn { .. } => EXIT_THREAD_SPAWN,
            Error::WorkerPanicked(_) => EXIT_WORKER_JOIN,
            Error::JobsFailed { .. } => EXIT_JOB_FAILURES,
        }
    }

    /// Whether this error means the run itself broke, as opposed to jobs
    /// inside a completed run failing.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::ThreadSpawn { .. } | Error::WorkerPanicked(_)
        )
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
