// SPDX-License-Identifier: Apache-2.0 OR MIT
// Sink contract and the lock policies shared by the concrete sinks

mod console;
mod file;
pub mod rotating_file;

pub use console::{ConsoleSink, ConsoleSinkSt, ConsoleState, ConsoleTarget};
pub use file::{FileSink, FileSinkSt, FileState};
pub use rotating_file::{RotatingFileSink, RotatingFileSinkSt, RotatingState};

use crate::error::Result;
use crate::formatter::Formatter;
use crate::level::Level;
use crate::record::Record;
use std::cell::UnsafeCell;
use std::sync::{Mutex, PoisonError};

/// Destination for formatted records
///
/// `log` must be callable concurrently; implementations serialize their
/// own internal state. The built-in sinks do this through a [`SinkLock`]
/// policy: the default policy wraps a mutex, the single-threaded policy
/// elides it.
pub trait Sink: Send + Sync {
    /// Format the record and write it out
    fn log(&self, record: &Record) -> Result<()>;

    /// Flush buffered output to the underlying destination
    fn flush(&self) -> Result<()>;

    fn level(&self) -> Level;

    fn set_level(&self, level: Level);

    fn should_log(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// Replace the sink's formatter
    fn set_formatter(&self, formatter: Box<dyn Formatter>);
}

/// Locking policy guarding a sink's mutable state
pub trait SinkLock<T: Send>: Send + Sync {
    fn new(value: T) -> Self;

    /// Run `f` with exclusive access to the guarded state
    fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R;
}

/// Mutex-backed policy used by the default (thread-safe) sink variants
pub struct MutexLock<T>(Mutex<T>);

impl<T: Send> SinkLock<T> for MutexLock<T> {
    fn new(value: T) -> Self {
        Self(Mutex::new(value))
    }

    fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        // Survive poisoning: a panic mid-write may leave a torn line in the
        // output, never a wedged logger.
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

/// Lock-free policy for the `*St` sink variants
///
/// All synchronization is delegated to the caller: a sink built on this
/// policy must only ever be driven from one thread at a time.
pub struct SingleThreadLock<T>(UnsafeCell<T>);

// SAFETY: SingleThreadLock hands out `&mut T` without synchronization.
// The `*St` sink variants that use it document that callers must
// serialize access externally; under that contract no two threads touch
// the cell at once.
unsafe impl<T: Send> Sync for SingleThreadLock<T> {}

impl<T: Send> SinkLock<T> for SingleThreadLock<T> {
    fn new(value: T) -> Self {
        Self(UnsafeCell::new(value))
    }

    fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        // SAFETY: exclusive access is the caller's contract, see the Sync impl
        f(unsafe { &mut *self.0.get() })
    }
}
