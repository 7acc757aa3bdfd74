// SPDX-License-Identifier: Apache-2.0 OR MIT
// Asynchronous logger: the sink path enqueues into the worker pool and
// returns; workers call back into backend_log/backend_flush to drive the
// sinks. The pool reference is weak (envelopes hold strong logger handles,
// and a strong pool reference here would close a cycle through the queue).

use crate::error::{Error, Result};
use crate::level::Level;
use crate::logger::{LoggerCore, LoggerHandle};
use crate::record::{Record, SourceLoc};
use crate::sinks::Sink;
use crate::thread_pool::ThreadPool;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};

/// What a full queue does to the producer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Wait until a worker frees a slot; no records are lost
    #[default]
    Block,
    /// Overwrite the oldest queued record; the producer never waits
    OverwriteOldest,
}

/// Logger whose records are delivered by the worker pool
pub struct AsyncLogger {
    core: LoggerCore,
    pool: Weak<ThreadPool>,
    policy: OverflowPolicy,
    // Set at construction via Arc::new_cyclic; lets the sink path hand a
    // strong self-handle to each envelope
    me: Weak<AsyncLogger>,
}

impl AsyncLogger {
    pub fn new(
        name: impl Into<String>,
        sinks: Vec<Arc<dyn Sink>>,
        pool: Weak<ThreadPool>,
        policy: OverflowPolicy,
    ) -> Arc<Self> {
        let core = LoggerCore::new(name.into(), sinks);
        Arc::new_cyclic(|me| Self {
            core,
            pool,
            policy,
            me: me.clone(),
        })
    }

    pub fn with_sink(
        name: impl Into<String>,
        sink: Arc<dyn Sink>,
        pool: Weak<ThreadPool>,
        policy: OverflowPolicy,
    ) -> Arc<Self> {
        Self::new(name, vec![sink], pool, policy)
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.policy
    }

    pub fn sinks(&self) -> &[Arc<dyn Sink>] {
        self.core.sinks()
    }

    fn strong_self(&self) -> Arc<AsyncLogger> {
        // A live &self implies at least one strong handle exists
        self.me
            .upgrade()
            .expect("async logger is reachable only through an Arc")
    }

    fn sink_record(&self, record: &Record) -> Result<()> {
        let pool = self.pool.upgrade().ok_or(Error::PoolGone)?;
        match self.policy {
            OverflowPolicy::Block => pool.post_log(self.strong_self(), record),
            OverflowPolicy::OverwriteOldest => pool.post_log_nowait(self.strong_self(), record),
        }
        Ok(())
    }

    /// Worker-side delivery of one record to every matching sink.
    /// Sink failures stay on the worker thread; there is no route back to
    /// the producer.
    pub(crate) fn backend_log(&self, record: &Record) {
        for sink in self.core.sinks() {
            if sink.should_log(record.level) {
                let _ = sink.log(record);
            }
        }
        if record.level >= self.core.flush_level() {
            self.backend_flush();
        }
    }

    /// Worker-side flush of every sink
    pub(crate) fn backend_flush(&self) {
        for sink in self.core.sinks() {
            let _ = sink.flush();
        }
    }
}

impl LoggerHandle for AsyncLogger {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn level(&self) -> Level {
        self.core.level()
    }

    fn set_level(&self, level: Level) {
        self.core.set_level(level);
    }

    fn log_at(&self, level: Level, msg: &str, source: Option<SourceLoc>) -> Result<()> {
        if !self.core.should_log(level) {
            return Ok(());
        }
        let record = Record::with_source(self.core.name(), level, msg, source);
        self.sink_record(&record)
    }

    /// Returns once the flush marker is enqueued, not once it has drained
    fn flush(&self) -> Result<()> {
        let pool = self.pool.upgrade().ok_or(Error::PoolGone)?;
        pool.post_flush(self.strong_self());
        Ok(())
    }

    fn flush_on(&self, level: Level) {
        self.core.set_flush_level(level);
    }
}
