//! # Worker Jobs
//!
//! A fixed pool of named worker threads fed through a crossbeam channel.
//! Submitting returns a [`JobHandle`]; the coordinating thread polls it
//! once per tick and only blocks when a [`BudgetedJob`] runs out of ticks.
//!
//! ```text
//! coordinator ──spawn──> [ job channel ] ──> worker 0..n
//!      │                                        │
//!      └──── poll / join <── JobHandle slot <───┘
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Sender};
use parking_lot::{Condvar, Mutex};

use crate::error::{WorldError, WorldResult};

type Job = Box<dyn FnOnce() + Send + 'static>;

// =============================================================================
// HANDLE
// =============================================================================

enum Slot<T> {
    Running,
    Done(T),
    Panicked,
    Taken,
}

struct Shared<T> {
    slot: Mutex<Slot<T>>,
    ready: Condvar,
}

/// Completion handle of one submitted job.
pub struct JobHandle<T> {
    shared: Arc<Shared<T>>,
}

impl<T> JobHandle<T> {
    /// Returns true once the job has stopped running.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !matches!(*self.shared.slot.lock(), Slot::Running)
    }

    /// Takes the result if the job has finished.
    ///
    /// `Some(None)` means the job panicked.
    pub fn try_take(&self) -> Option<Option<T>> {
        let mut slot = self.shared.slot.lock();
        match std::mem::replace(&mut *slot, Slot::Taken) {
            Slot::Running => {
                *slot = Slot::Running;
                None
            }
            Slot::Done(value) => Some(Some(value)),
            Slot::Panicked | Slot::Taken => Some(None),
        }
    }

    /// Blocks until the job finishes. `None` means it panicked.
    pub fn join(&self) -> Option<T> {
        let mut slot = self.shared.slot.lock();
        while matches!(*slot, Slot::Running) {
            self.shared.ready.wait(&mut slot);
        }
        match std::mem::replace(&mut *slot, Slot::Taken) {
            Slot::Done(value) => Some(value),
            _ => None,
        }
    }
}

// =============================================================================
// BUDGETED JOB
// =============================================================================

/// Outcome of polling a [`BudgetedJob`].
#[derive(Debug, PartialEq, Eq)]
pub enum JobPoll<T> {
    /// Still running, budget not exhausted.
    Pending,
    /// Finished.
    Ready {
        /// Job output.
        value: T,
        /// True if this poll had to block.
        forced: bool,
    },
    /// The job panicked.
    Failed,
}

/// A job polled once per tick and force-joined after `budget` ticks.
pub struct BudgetedJob<T> {
    handle: JobHandle<T>,
    ticks: u32,
    budget: u32,
}

impl<T> BudgetedJob<T> {
    /// Wraps a handle with a tick budget.
    #[must_use]
    pub fn new(handle: JobHandle<T>, budget: u32) -> Self {
        Self {
            handle,
            ticks: 0,
            budget,
        }
    }

    /// Ticks spent waiting so far.
    #[inline]
    #[must_use]
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Polls once. Blocks if `urgent` or the budget is exceeded.
    pub fn poll(&mut self, urgent: bool) -> JobPoll<T> {
        self.ticks += 1;
        if let Some(result) = self.handle.try_take() {
            return result.map_or(JobPoll::Failed, |value| JobPoll::Ready { value, forced: false });
        }
        if urgent || self.ticks > self.budget {
            return self
                .handle
                .join()
                .map_or(JobPoll::Failed, |value| JobPoll::Ready { value, forced: true });
        }
        JobPoll::Pending
    }
}

// =============================================================================
// POOL
// =============================================================================

/// Fixed pool of worker threads.
pub struct JobPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl JobPool {
    /// Starts `count` workers named `strata-worker-N`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::WorkerSpawn`] if a thread cannot be created.
    pub fn new(count: usize) -> WorldResult<Self> {
        let (sender, receiver) = unbounded::<Job>();
        let mut workers = Vec::with_capacity(count);

        for index in 0..count {
            let receiver = receiver.clone();
            let worker = thread::Builder::new()
                .name(format!("strata-worker-{index}"))
                .spawn(move || {
                    while let Ok(job) = receiver.recv() {
                        job();
                    }
                })
                .map_err(|source| WorldError::WorkerSpawn { index, source })?;
            workers.push(worker);
        }

        tracing::info!("job pool started with {count} workers");
        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Number of worker threads.
    #[inline]
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    /// Jobs submitted but not yet picked up.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.sender.as_ref().map_or(0, Sender::len)
    }

    /// Submits a job.
    ///
    /// If no worker is alive the job runs on the calling thread.
    pub fn spawn<T, F>(&self, work: F) -> JobHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let shared = Arc::new(Shared {
            slot: Mutex::new(Slot::Running),
            ready: Condvar::new(),
        });
        let handle = JobHandle {
            shared: Arc::clone(&shared),
        };

        let job: Job = Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(work));
            let mut slot = shared.slot.lock();
            *slot = match outcome {
                Ok(value) => Slot::Done(value),
                Err(_) => {
                    tracing::warn!("worker job panicked");
                    Slot::Panicked
                }
            };
            shared.ready.notify_all();
        });

        match &self.sender {
            Some(sender) => {
                if let Err(rejected) = sender.send(job) {
                    tracing::warn!("no live workers, running job inline");
                    (rejected.into_inner())();
                }
            }
            None => job(),
        }
        handle
    }
}

impl Drop for JobPool {
    fn drop(&mut self) {
        self.sender.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
