// SPDX-License-Identifier: Apache-2.0 OR MIT
// Blocking MPMC queue: ring buffer + mutex + two condition variables.
// Producers are application threads, consumers are pool workers. Every
// ring access happens under the mutex; the condvars are never waited on
// while holding sink I/O.

use crate::ring_buffer::RingBuffer;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub(crate) struct BlockingQueue<T> {
    ring: Mutex<RingBuffer<T>>,
    not_full: Condvar,
    not_empty: Condvar,
}

impl<T> BlockingQueue<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            ring: Mutex::new(RingBuffer::new(capacity)),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        }
    }

    /// Enqueue, waiting while the queue is full
    pub(crate) fn enqueue(&self, item: T) {
        let mut ring = self
            .not_full
            .wait_while(self.lock(), |ring| ring.is_full())
            .unwrap_or_else(PoisonError::into_inner);
        ring.push_back(item);
        drop(ring);
        self.not_empty.notify_one();
    }

    /// Enqueue without waiting; overwrites the oldest item when full
    pub(crate) fn enqueue_nowait(&self, item: T) {
        let mut ring = self.lock();
        ring.push_back(item);
        drop(ring);
        self.not_empty.notify_one();
    }

    /// Dequeue, waiting up to `timeout` for an item to arrive
    pub(crate) fn dequeue_for(&self, timeout: Duration) -> Option<T> {
        let (mut ring, _) = self
            .not_empty
            .wait_timeout_while(self.lock(), timeout, |ring| ring.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        let item = ring.pop_front();
        drop(ring);
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /// Number of items dropped by overwrite enqueues
    pub(crate) fn overrun_counter(&self) -> usize {
        self.lock().overrun_counter()
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().size()
    }

    // A panicking worker must not wedge the rest of the pipeline, so
    // poisoned locks are taken over rather than propagated.
    fn lock(&self) -> MutexGuard<'_, RingBuffer<T>> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
