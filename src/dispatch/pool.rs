use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info};
use transforge_av::Transcoder;
use transforge_common::{Error, JobDescriptor, Result, WorkerId, NO_EXIT_CODE};

use super::queue::JobQueue;
use crate::joblog::Logger;

/// Aggregate result of a pool run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolSummary {
    /// Jobs in the queue.
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Workers that were spawned and joined.
    pub workers: usize,
}

impl PoolSummary {
    /// Jobs that reached a terminal state.
    pub fn completed(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Turn per-job failures into an error, for callers that want a run with
    /// failed jobs to count as failed.
    pub fn ensure_no_failures(&self) -> Result<()> {
        if self.failed > 0 {
            return Err(Error::JobsFailed {
                failed: self.failed,
                total: self.total,
            });
        }
        Ok(())
    }
}

/// Body of one worker thread.
type WorkerBody = Box<dyn FnOnce() -> WorkerTally + Send + 'static>;

#[derive(Debug, Default)]
struct WorkerTally {
    succeeded: usize,
    failed: usize,
}

/// Fixed number of OS threads draining one [`JobQueue`].
#[derive(Debug, Clone)]
pub struct WorkerPool {
    worker_count: usize,
}

impl WorkerPool {
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when `worker_count` is zero.
    pub fn new(worker_count: usize) -> Result<Self> {
        if worker_count == 0 {
            return Err(Error::invalid_input("worker count must be at least 1"));
        }
        Ok(Self { worker_count })
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Spawn the workers, wait for every one of them, and aggregate.
    ///
    /// Each worker claims jobs until the queue is exhausted. A failed job is
    /// logged and skipped; it never stops the pool. The call returns only
    /// after all workers have been joined.
    ///
    /// # Errors
    ///
    /// - [`Error::ThreadSpawn`] if a worker thread cannot be created. The
    ///   queue is closed first, so workers already running finish the job in
    ///   hand and stop; they are joined before returning.
    /// - [`Error::WorkerPanicked`] if a worker thread panicked.
    pub fn run(
        &self,
        queue: Arc<JobQueue>,
        transcoder: Arc<dyn Transcoder>,
        logger: Arc<Logger>,
    ) -> Result<PoolSummary> {
        self.run_with(queue, transcoder, logger, |worker_id, body| {
            thread::Builder::new()
                .name(format!("transforge-worker-{worker_id}"))
                .spawn(body)
        })
    }

    /// [`run`](Self::run) with thread creation supplied by `spawn`.
    fn run_with<S>(
        &self,
        queue: Arc<JobQueue>,
        transcoder: Arc<dyn Transcoder>,
        logger: Arc<Logger>,
        mut spawn: S,
    ) -> Result<PoolSummary>
    where
        S: FnMut(WorkerId, WorkerBody) -> io::Result<JoinHandle<WorkerTally>>,
    {
        info!(
            jobs = queue.len(),
            workers = self.worker_count,
            "Starting worker pool"
        );

        let mut handles = Vec::with_capacity(self.worker_count);
        for worker_id in 1..=self.worker_count {
            let queue_ref = Arc::clone(&queue);
            let transcoder = Arc::clone(&transcoder);
            let logger = Arc::clone(&logger);

            let spawned = spawn(
                worker_id,
                Box::new(move || work(worker_id, &queue_ref, transcoder.as_ref(), &logger)),
            );

            match spawned {
                Ok(handle) => handles.push((worker_id, handle)),
                Err(source) => {
                    error!(worker = worker_id, "Failed to spawn worker: {}", source);
                    queue.close();
                    for (id, handle) in handles {
                        if handle.join().is_err() {
                            error!(worker = id, "Worker panicked while pool was aborting");
                        }
                    }
                    return Err(Error::ThreadSpawn {
                        worker: worker_id,
                        source,
                    });
                }
            }
        }

        let mut summary = PoolSummary {
            total: queue.len(),
            workers: handles.len(),
            ..PoolSummary::default()
        };
        let mut panicked = None;
        for (worker_id, handle) in handles {
            match handle.join() {
                Ok(tally) => {
                    summary.succeeded += tally.succeeded;
                    summary.failed += tally.failed;
                }
                Err(_) => {
                    error!(worker = worker_id, "Worker panicked");
                    panicked.get_or_insert(worker_id);
                }
            }
        }

        if let Some(worker_id) = panicked {
            return Err(Error::WorkerPanicked(worker_id));
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Worker pool finished"
        );
        Ok(summary)
    }
}

/// Claim → invoke → log until the queue is exhausted.
fn work(
    worker_id: WorkerId,
    queue: &JobQueue,
    transcoder: &dyn Transcoder,
    logger: &Logger,
) -> WorkerTally {
    let mut tally = WorkerTally::default();

    while let Some((job, index)) = queue.claim() {
        debug!(worker = worker_id, index, "Claimed job");
        logger.info(&starting_message(job));

        let run = AssertUnwindSafe(|| transcoder.run(worker_id, job));
        let outcome = match panic::catch_unwind(run) {
            Ok(outcome) => outcome,
            Err(payload) => {
                // Close the job's record before the worker dies.
                logger.error(&format!(
                    "failure: {}, code={}",
                    job.source_path().display(),
                    NO_EXIT_CODE
                ));
                panic::resume_unwind(payload);
            }
        };
        let source = job.source_path().display();
        if outcome.success {
            tally.succeeded += 1;
            logger.info(&format!(
                "success: {} → {}",
                source,
                outcome.output_path.display()
            ));
        } else {
            tally.failed += 1;
            logger.error(&format!(
                "failure: {}, code={}",
                source,
                outcome.reported_code()
            ));
        }
        debug!(
            worker = worker_id,
            index,
            success = outcome.success,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "Job finished"
        );
    }

    debug!(worker = worker_id, "Queue exhausted, worker exiting");
    tally
}

fn starting_message(job: &JobDescriptor) -> String {
    format!(
        "starting: {} → {}",
        job.source_path().display(),
        job.output_path().display()
    )
}
