// SPDX-License-Identifier: Apache-2.0 OR MIT
// Factory helpers: build a sink, wrap it in a logger, register it

use crate::async_logger::{AsyncLogger, OverflowPolicy};
use crate::error::Result;
use crate::logger::Logger;
use crate::registry::Registry;
use crate::sinks::{ConsoleSink, FileSink, MutexLock, RotatingFileSink, Sink};
use std::path::Path;
use std::sync::Arc;

/// Configure the shared worker pool before any async logger is created.
/// Replaces (and drains) a previously created pool.
pub fn init_thread_pool(queue_size: usize, worker_count: usize) -> Result<()> {
    Registry::global().init_thread_pool(queue_size, worker_count)
}

fn register_sync(name: &str, sink: Arc<dyn Sink>) -> Result<Arc<Logger>> {
    let logger = Arc::new(Logger::with_sink(name, sink));
    Registry::global().register(logger.clone())?;
    Ok(logger)
}

fn register_async(
    name: &str,
    sink: Arc<dyn Sink>,
    policy: OverflowPolicy,
) -> Result<Arc<AsyncLogger>> {
    let pool = Registry::global().thread_pool()?;
    let logger = AsyncLogger::with_sink(name, sink, Arc::downgrade(&pool), policy);
    Registry::global().register(logger.clone())?;
    Ok(logger)
}

/// Synchronous logger writing plain lines to stdout
pub fn stdout_logger(name: &str) -> Result<Arc<Logger>> {
    register_sync(name, Arc::new(ConsoleSink::<MutexLock<_>>::stdout()))
}

/// Synchronous logger writing colored lines to stdout
pub fn stdout_color_logger(name: &str) -> Result<Arc<Logger>> {
    register_sync(name, Arc::new(ConsoleSink::<MutexLock<_>>::stdout_color()))
}

/// Synchronous logger writing plain lines to stderr
pub fn stderr_logger(name: &str) -> Result<Arc<Logger>> {
    register_sync(name, Arc::new(ConsoleSink::<MutexLock<_>>::stderr()))
}

/// Synchronous logger writing colored lines to stderr
pub fn stderr_color_logger(name: &str) -> Result<Arc<Logger>> {
    register_sync(name, Arc::new(ConsoleSink::<MutexLock<_>>::stderr_color()))
}

/// Synchronous logger appending to a single file
pub fn file_logger(name: &str, path: impl AsRef<Path>, truncate: bool) -> Result<Arc<Logger>> {
    register_sync(name, Arc::new(FileSink::<MutexLock<_>>::new(path, truncate)?))
}

/// Synchronous logger with size-based file rotation
pub fn rotating_file_logger(
    name: &str,
    base_path: impl AsRef<Path>,
    max_size: u64,
    max_files: usize,
) -> Result<Arc<Logger>> {
    register_sync(
        name,
        Arc::new(RotatingFileSink::<MutexLock<_>>::new(base_path, max_size, max_files)?),
    )
}

/// Async logger writing plain lines to stdout via the shared pool
pub fn async_stdout(name: &str, policy: OverflowPolicy) -> Result<Arc<AsyncLogger>> {
    register_async(name, Arc::new(ConsoleSink::<MutexLock<_>>::stdout()), policy)
}

/// Async logger writing colored lines to stdout via the shared pool
pub fn async_stdout_color(name: &str, policy: OverflowPolicy) -> Result<Arc<AsyncLogger>> {
    register_async(name, Arc::new(ConsoleSink::<MutexLock<_>>::stdout_color()), policy)
}

/// Async logger writing colored lines to stderr via the shared pool
pub fn async_stderr_color(name: &str, policy: OverflowPolicy) -> Result<Arc<AsyncLogger>> {
    register_async(name, Arc::new(ConsoleSink::<MutexLock<_>>::stderr_color()), policy)
}

/// Async logger appending to a single file via the shared pool
pub fn async_file(
    name: &str,
    path: impl AsRef<Path>,
    truncate: bool,
    policy: OverflowPolicy,
) -> Result<Arc<AsyncLogger>> {
    register_async(name, Arc::new(FileSink::<MutexLock<_>>::new(path, truncate)?), policy)
}

/// Async logger with size-based file rotation via the shared pool
pub fn async_rotating_file(
    name: &str,
    base_path: impl AsRef<Path>,
    max_size: u64,
    max_files: usize,
    policy: OverflowPolicy,
) -> Result<Arc<AsyncLogger>> {
    register_async(
        name,
        Arc::new(RotatingFileSink::<MutexLock<_>>::new(base_path, max_size, max_files)?),
        policy,
    )
}
