//! Job dispatch: the shared queue and the worker pool that drains it.
//!
//! The queue cursor and the job log are the only state shared between
//! workers, and each has its own lock. Neither lock is ever held while an
//! external conversion runs.

pub mod pool;
pub mod queue;

pub use pool::{PoolSummary, WorkerPool};
pub use queue::JobQueue;
