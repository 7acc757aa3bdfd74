// SPDX-License-Identifier: Apache-2.0 OR MIT
// Process-wide registry: named loggers, the default logger, and the
// shared worker pool (created lazily on first use).

use crate::error::{Error, Result};
use crate::level::Level;
use crate::logger::{Logger, LoggerHandle};
use crate::sinks::{ConsoleSink, MutexLock};
use crate::thread_pool::ThreadPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Queue capacity of the lazily created default pool
pub const DEFAULT_QUEUE_SIZE: usize = 8192;
/// Worker count of the lazily created default pool
pub const DEFAULT_WORKER_COUNT: usize = 1;

static GLOBAL: OnceLock<Registry> = OnceLock::new();

struct RegistryInner {
    loggers: HashMap<String, Arc<dyn LoggerHandle>>,
    default_logger: Option<Arc<dyn LoggerHandle>>,
    thread_pool: Option<Arc<ThreadPool>>,
}

/// Owner of logger handles and the shared worker pool
pub struct Registry {
    inner: Mutex<RegistryInner>,
}

impl Registry {
    /// The process-wide registry, created on first access with a colored
    /// stdout default logger at level `info`
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(|| {
            let console = Arc::new(ConsoleSink::<MutexLock<_>>::stdout_color());
            let default_logger = Arc::new(Logger::with_sink("", console));
            default_logger.set_level(Level::Info);
            Registry {
                inner: Mutex::new(RegistryInner {
                    loggers: HashMap::new(),
                    default_logger: Some(default_logger),
                    thread_pool: None,
                }),
            }
        })
    }

    #[cfg(test)]
    fn empty() -> Self {
        Registry {
            inner: Mutex::new(RegistryInner {
                loggers: HashMap::new(),
                default_logger: None,
                thread_pool: None,
            }),
        }
    }

    /// Register a logger under its name; duplicate names are refused
    pub fn register(&self, logger: Arc<dyn LoggerHandle>) -> Result<()> {
        let mut inner = self.lock();
        let name = logger.name().to_string();
        if inner.loggers.contains_key(&name) {
            return Err(Error::AlreadyExists(name));
        }
        inner.loggers.insert(name, logger);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn LoggerHandle>> {
        self.lock().loggers.get(name).cloned()
    }

    /// Remove a logger by name. In-flight envelopes keep an async logger
    /// alive past this point; the registry only gives up its handle.
    pub fn drop_logger(&self, name: &str) {
        let mut inner = self.lock();
        inner.loggers.remove(name);
        let is_default = inner
            .default_logger
            .as_ref()
            .is_some_and(|logger| logger.name() == name);
        if is_default {
            inner.default_logger = None;
        }
    }

    pub fn drop_all(&self) {
        let mut inner = self.lock();
        inner.loggers.clear();
        inner.default_logger = None;
    }

    pub fn default_logger(&self) -> Option<Arc<dyn LoggerHandle>> {
        self.lock().default_logger.clone()
    }

    /// Replace the default logger, registering it by name as well
    pub fn set_default_logger(&self, logger: Arc<dyn LoggerHandle>) {
        let mut inner = self.lock();
        inner
            .loggers
            .insert(logger.name().to_string(), Arc::clone(&logger));
        inner.default_logger = Some(logger);
    }

    /// Set the level of the default logger and every registered logger
    pub fn set_level_all(&self, level: Level) {
        let inner = self.lock();
        if let Some(default_logger) = &inner.default_logger {
            default_logger.set_level(level);
        }
        for logger in inner.loggers.values() {
            logger.set_level(level);
        }
    }

    /// Flush every logger; the first failure is reported after all have
    /// been attempted
    pub fn flush_all(&self) -> Result<()> {
        let inner = self.lock();
        let mut outcome = Ok(());
        let default_logger = inner.default_logger.iter();
        for logger in default_logger.chain(inner.loggers.values()) {
            if let Err(err) = logger.flush() {
                if outcome.is_ok() {
                    outcome = Err(err);
                }
            }
        }
        outcome
    }

    /// Replace the shared worker pool. The previous pool, if any, is
    /// dropped outside the registry lock, draining its queue.
    pub fn init_thread_pool(&self, queue_size: usize, worker_count: usize) -> Result<()> {
        let pool = Arc::new(ThreadPool::new(queue_size, worker_count)?);
        let previous = {
            let mut inner = self.lock();
            inner.thread_pool.replace(pool)
        };
        drop(previous);
        Ok(())
    }

    /// The shared worker pool, created with the default configuration on
    /// first use
    pub fn thread_pool(&self) -> Result<Arc<ThreadPool>> {
        let mut inner = self.lock();
        if let Some(pool) = &inner.thread_pool {
            return Ok(Arc::clone(pool));
        }
        let pool = Arc::new(ThreadPool::new(DEFAULT_QUEUE_SIZE, DEFAULT_WORKER_COUNT)?);
        inner.thread_pool = Some(Arc::clone(&pool));
        Ok(pool)
    }

    /// Drop every logger handle and the shared pool; dropping the pool
    /// drains outstanding envelopes and joins the workers
    pub fn shutdown(&self) {
        let (pool, loggers, default_logger) = {
            let mut inner = self.lock();
            (
                inner.thread_pool.take(),
                std::mem::take(&mut inner.loggers),
                inner.default_logger.take(),
            )
        };
        drop(loggers);
        drop(default_logger);
        drop(pool);
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
