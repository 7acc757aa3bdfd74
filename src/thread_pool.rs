// SPDX-License-Identifier: Apache-2.0 OR MIT
// Worker pool for asynchronous delivery. Producers post envelopes through
// the blocking queue; workers drain it and drive the owning logger's
// backend operations. Shutdown is cooperative: dropping the pool enqueues
// one Terminate per worker and joins them all.

use crate::async_logger::AsyncLogger;
use crate::blocking_queue::BlockingQueue;
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::record::Record;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Upper bound on `worker_count`
pub const MAX_WORKERS: usize = 1000;

// Workers wake up periodically even when idle so that external shutdown
// signals can be observed in tests; the wait could otherwise be unbounded.
const IDLE_WAIT: Duration = Duration::from_secs(10);

/// Pool of worker threads draining one shared envelope queue
pub struct ThreadPool {
    queue: Arc<BlockingQueue<Envelope>>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Create a pool with a queue of `queue_size` envelopes and
    /// `worker_count` threads (1 to [`MAX_WORKERS`])
    pub fn new(queue_size: usize, worker_count: usize) -> Result<Self> {
        if worker_count == 0 || worker_count > MAX_WORKERS {
            return Err(Error::Config(format!(
                "thread pool: worker_count must be 1-{}, got {}",
                MAX_WORKERS, worker_count
            )));
        }
        if queue_size == 0 {
            // A zero-capacity queue would deadlock the blocking post path
            return Err(Error::Config(
                "thread pool: queue_size must be greater than 0".to_string(),
            ));
        }

        let queue = Arc::new(BlockingQueue::new(queue_size));
        let mut workers = Vec::with_capacity(worker_count);
        for index in 0..worker_count {
            let queue = Arc::clone(&queue);
            let handle = std::thread::Builder::new()
                .name(format!("logrelay-worker-{}", index))
                .spawn(move || worker_loop(&queue))?;
            workers.push(handle);
        }

        Ok(Self { queue, workers })
    }

    /// Post a record, waiting while the queue is full
    pub fn post_log(&self, owner: Arc<AsyncLogger>, record: &Record) {
        self.queue.enqueue(Envelope::Log {
            owner,
            record: record.to_owned(),
        });
    }

    /// Post a record without waiting, overwriting the oldest queued
    /// envelope when full
    pub fn post_log_nowait(&self, owner: Arc<AsyncLogger>, record: &Record) {
        self.queue.enqueue_nowait(Envelope::Log {
            owner,
            record: record.to_owned(),
        });
    }

    /// Post a flush marker, waiting while the queue is full
    pub fn post_flush(&self, owner: Arc<AsyncLogger>) {
        self.queue.enqueue(Envelope::Flush { owner });
    }

    /// Number of envelopes lost to overwrite posts
    pub fn overrun_counter(&self) -> usize {
        self.queue.overrun_counter()
    }

    /// Number of envelopes currently queued
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        // Terminate markers go through the same FIFO, so everything posted
        // before this point is processed first. Blocking enqueue: a
        // terminate must not be lost to overwrite.
        for _ in 0..self.workers.len() {
            self.queue.enqueue(Envelope::Terminate);
        }
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

fn worker_loop(queue: &BlockingQueue<Envelope>) {
    loop {
        match queue.dequeue_for(IDLE_WAIT) {
            None => continue,
            Some(Envelope::Log { owner, record }) => {
                owner.backend_log(&record.as_record());
            }
            Some(Envelope::Flush { owner }) => {
                owner.backend_flush();
            }
            Some(Envelope::Terminate) => break,
        }
    }
}
