// SPDX-License-Identifier: Apache-2.0 OR MIT
// Logger front end: level filtering, sink fan-out, flush-on threshold.
// `Logger` drives its sinks on the caller thread; `AsyncLogger` (see
// async_logger.rs) hands records to the worker pool instead. Both expose
// the same object-safe surface through `LoggerHandle`, which is what the
// registry stores.

use crate::error::Result;
use crate::level::{AtomicLevel, Level};
use crate::record::{Record, SourceLoc};
use crate::sinks::Sink;
use std::sync::Arc;

/// Object-safe logger surface shared by sync and async loggers
pub trait LoggerHandle: Send + Sync {
    fn name(&self) -> &str;

    fn level(&self) -> Level;

    fn set_level(&self, level: Level);

    /// Emit `msg` at `level` with an optional source location
    fn log_at(&self, level: Level, msg: &str, source: Option<SourceLoc>) -> Result<()>;

    /// Request a flush of every sink
    fn flush(&self) -> Result<()>;

    /// Automatically flush after any record at `level` or above
    fn flush_on(&self, level: Level);

    fn should_log(&self, level: Level) -> bool {
        level >= self.level()
    }

    fn log(&self, level: Level, msg: &str) -> Result<()> {
        self.log_at(level, msg, None)
    }

    fn trace(&self, msg: &str) -> Result<()> {
        self.log(Level::Trace, msg)
    }

    fn debug(&self, msg: &str) -> Result<()> {
        self.log(Level::Debug, msg)
    }

    fn info(&self, msg: &str) -> Result<()> {
        self.log(Level::Info, msg)
    }

    fn warn(&self, msg: &str) -> Result<()> {
        self.log(Level::Warn, msg)
    }

    fn error(&self, msg: &str) -> Result<()> {
        self.log(Level::Error, msg)
    }

    fn critical(&self, msg: &str) -> Result<()> {
        self.log(Level::Critical, msg)
    }
}

/// State shared by both logger kinds
pub(crate) struct LoggerCore {
    name: String,
    level: AtomicLevel,
    flush_level: AtomicLevel,
    sinks: Vec<Arc<dyn Sink>>,
}

impl LoggerCore {
    pub(crate) fn new(name: String, sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self {
            name,
            level: AtomicLevel::new(Level::Trace),
            flush_level: AtomicLevel::new(Level::Off),
            sinks,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn level(&self) -> Level {
        self.level.load()
    }

    pub(crate) fn set_level(&self, level: Level) {
        self.level.store(level);
    }

    pub(crate) fn flush_level(&self) -> Level {
        self.flush_level.load()
    }

    pub(crate) fn set_flush_level(&self, level: Level) {
        self.flush_level.store(level);
    }

    pub(crate) fn should_log(&self, level: Level) -> bool {
        level >= self.level.load()
    }

    pub(crate) fn sinks(&self) -> &[Arc<dyn Sink>] {
        &self.sinks
    }
}

/// Synchronous logger: records reach every sink on the caller thread
pub struct Logger {
    core: LoggerCore,
}

impl Logger {
    pub fn new(name: impl Into<String>, sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self {
            core: LoggerCore::new(name.into(), sinks),
        }
    }

    pub fn with_sink(name: impl Into<String>, sink: Arc<dyn Sink>) -> Self {
        Self::new(name, vec![sink])
    }

    pub fn sinks(&self) -> &[Arc<dyn Sink>] {
        self.core.sinks()
    }

    fn sink_record(&self, record: &Record) -> Result<()> {
        for sink in self.core.sinks() {
            if sink.should_log(record.level) {
                sink.log(record)?;
            }
        }
        if record.level >= self.core.flush_level() {
            self.flush()?;
        }
        Ok(())
    }
}

impl LoggerHandle for Logger {
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

    fn flush(&self) -> Result<()> {
        for sink in self.core.sinks() {
            sink.flush()?;
        }
        Ok(())
    }

    fn flush_on(&self, level: Level) {
        self.core.set_flush_level(level);
    }
}
