// SPDX-License-Identifier: Apache-2.0 OR MIT
// Log record snapshot passed between loggers, formatters and sinks

use crate::level::Level;
use std::time::SystemTime;

/// Source location captured at the call site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLoc {
    pub file: &'static str,
    pub line: u32,
    pub function: Option<&'static str>,
}

/// Immutable view of one log event
///
/// Borrows the logger name and the formatted payload from the caller; the
/// payload stays valid for as long as any sink observes the record. Records
/// that cross threads are deep-copied into an [`OwnedRecord`] first.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub logger_name: &'a str,
    pub level: Level,
    pub time: SystemTime,
    pub thread_id: u64,
    pub source: Option<SourceLoc>,
    pub payload: &'a str,
}

impl<'a> Record<'a> {
    pub fn new(logger_name: &'a str, level: Level, payload: &'a str) -> Self {
        Self {
            logger_name,
            level,
            time: SystemTime::now(),
            thread_id: current_thread_id(),
            source: None,
            payload,
        }
    }

    pub fn with_source(
        logger_name: &'a str,
        level: Level,
        payload: &'a str,
        source: Option<SourceLoc>,
    ) -> Self {
        Self {
            source,
            ..Self::new(logger_name, level, payload)
        }
    }

    /// Deep-copy the record so it can outlive the caller's stack frame
    pub fn to_owned(&self) -> OwnedRecord {
        OwnedRecord {
            logger_name: self.logger_name.to_string(),
            level: self.level,
            time: self.time,
            thread_id: self.thread_id,
            source: self.source,
            payload: self.payload.to_string(),
        }
    }
}

/// Record with owned name and payload storage
///
/// The payload lives in this struct's `String`; its heap buffer does not
/// move when the struct does, so a [`Record`] view can be rebuilt at any
/// time with [`OwnedRecord::as_record`].
#[derive(Debug)]
pub struct OwnedRecord {
    logger_name: String,
    level: Level,
    time: SystemTime,
    thread_id: u64,
    source: Option<SourceLoc>,
    payload: String,
}

impl OwnedRecord {
    pub fn as_record(&self) -> Record<'_> {
        Record {
            logger_name: &self.logger_name,
            level: self.level,
            time: self.time,
            thread_id: self.thread_id,
            source: self.source,
            payload: &self.payload,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

/// Get the OS thread id (Linux), or a stable hash of the Rust thread id elsewhere
pub(crate) fn current_thread_id() -> u64 {
    #[cfg(target_os = "linux")]
    {
        unsafe { libc::gettid() as u64 }
    }
    #[cfg(not(target_os = "linux"))]
    {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        std::thread::current().id().hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let record = Record::new("net", Level::Info, "link up");
        assert_eq!(record.logger_name, "net");
        assert_eq!(record.level, Level::Info);
        assert_eq!(record.payload, "link up");
        assert!(record.source.is_none());
    }

    #[test]
    fn test_record_with_source() {
        let loc = SourceLoc {
            file: "worker.rs",
            line: 42,
            function: None,
        };
        let record = Record::with_source("net", Level::Warn, "retry", Some(loc));
        assert_eq!(record.source, Some(loc));
    }

    #[test]
    fn test_owned_round_trip() {
        let record = Record::new("net", Level::Error, "socket closed");
        let owned = record.to_owned();
        let view = owned.as_record();
        assert_eq!(view.logger_name, "net");
        assert_eq!(view.level, Level::Error);
        assert_eq!(view.payload, "socket closed");
        assert_eq!(view.thread_id, record.thread_id);
        assert_eq!(view.time, record.time);
    }

    #[test]
    fn test_thread_id_stable_within_thread() {
        assert_eq!(current_thread_id(), current_thread_id());
    }

    #[test]
    fn test_thread_id_differs_across_threads() {
        let here = current_thread_id();
        let there = std::thread::spawn(current_thread_id).join().unwrap();
        assert_ne!(here, there);
    }
}
