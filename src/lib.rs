// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Embeddable structured logging for long-running processes.
//!
//! Records flow from a logger front end to one or more sinks (console,
//! file, rotating file), either synchronously on the caller thread
//! ([`Logger`]) or through a shared worker pool ([`AsyncLogger`]). The
//! async path hands each record to a bounded queue under a selectable
//! overflow policy; queued records keep their logger alive until a worker
//! has delivered them, and dropping the pool drains the queue before the
//! workers are joined.
//!
//! ```no_run
//! use logrelay::{info, LoggerHandle, OverflowPolicy};
//!
//! fn main() -> logrelay::Result<()> {
//!     logrelay::init_thread_pool(16384, 1)?;
//!     let logger = logrelay::async_rotating_file(
//!         "app",
//!         "logs/app.log",
//!         10 * 1024 * 1024,
//!         3,
//!         OverflowPolicy::Block,
//!     )?;
//!     info!(logger, "starting up, pid {}", std::process::id());
//!     logger.flush()?;
//!     Ok(())
//! }
//! ```

mod async_logger;
mod blocking_queue;
mod envelope;
mod error;
mod factory;
mod formatter;
mod level;
mod logger;
#[macro_use]
mod macros;
mod record;
mod registry;
mod ring_buffer;
pub mod sinks;
mod thread_pool;

pub use async_logger::{AsyncLogger, OverflowPolicy};
pub use error::{Error, Result};
pub use factory::{
    async_file, async_rotating_file, async_stderr_color, async_stdout, async_stdout_color,
    file_logger, init_thread_pool, rotating_file_logger, stderr_color_logger, stderr_logger,
    stdout_color_logger, stdout_logger,
};
pub use formatter::{Formatter, PatternFormatter, DEFAULT_PATTERN};
pub use level::Level;
pub use logger::{Logger, LoggerHandle};
pub use record::{OwnedRecord, Record, SourceLoc};
pub use registry::{Registry, DEFAULT_QUEUE_SIZE, DEFAULT_WORKER_COUNT};
pub use thread_pool::{ThreadPool, MAX_WORKERS};

use std::sync::Arc;

/// Look up a registered logger by name
pub fn get(name: &str) -> Option<Arc<dyn LoggerHandle>> {
    Registry::global().get(name)
}

/// Register a logger under its name
pub fn register_logger(logger: Arc<dyn LoggerHandle>) -> Result<()> {
    Registry::global().register(logger)
}

/// Remove a registered logger; in-flight records still reach its sinks
pub fn drop_logger(name: &str) {
    Registry::global().drop_logger(name)
}

/// Remove every registered logger
pub fn drop_all() {
    Registry::global().drop_all()
}

/// The process-wide default logger (colored stdout at `info`), unless replaced
pub fn default_logger() -> Option<Arc<dyn LoggerHandle>> {
    Registry::global().default_logger()
}

/// Replace the default logger
pub fn set_default_logger(logger: Arc<dyn LoggerHandle>) {
    Registry::global().set_default_logger(logger)
}

/// Set the level of the default logger and every registered logger
pub fn set_level(level: Level) {
    Registry::global().set_level_all(level)
}

/// Flush every registered logger
pub fn flush_all() -> Result<()> {
    Registry::global().flush_all()
}

/// Drop all loggers and the shared pool, draining queued records
pub fn shutdown() {
    Registry::global().shutdown()
}
