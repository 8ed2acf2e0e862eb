use parking_lot::Mutex;
use transforge_common::JobDescriptor;

/// Fixed, ordered list of jobs with a shared claim cursor.
///
/// Items never change after construction; the only mutable state is the
/// cursor, which only moves forward. Every index is handed out at most once.
#[derive(Debug)]
pub struct JobQueue {
    items: Vec<JobDescriptor>,
    cursor: Mutex<usize>,
}

impl JobQueue {
    pub fn new(items: Vec<JobDescriptor>) -> Self {
        Self {
            items,
            cursor: Mutex::new(0),
        }
    }

    /// Claim the next unprocessed job, or `None` once the queue is exhausted.
    ///
    /// The lock covers only the compare-read-increment of the cursor.
    pub fn claim(&self) -> Option<(&JobDescriptor, usize)> {
        let index = {
            let mut cursor = self.cursor.lock();
            if *cursor >= self.items.len() {
                return None;
            }
            let index = *cursor;
            *cursor += 1;
            index
        };
        Some((&self.items[index], index))
    }

    /// Make every later claim return `None`. Jobs already claimed are
    /// unaffected.
    pub fn close(&self) {
        *self.cursor.lock() = self.items.len();
    }

    /// Number of indices handed out (or skipped by [`close`](Self::close)).
    pub fn claimed(&self) -> usize {
        *self.cursor.lock()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn jobs(&self) -> &[JobDescriptor] {
        &self.items
    }
}

impl FromIterator<JobDescriptor> for JobQueue {
    fn from_iter<I: IntoIterator<Item = JobDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
