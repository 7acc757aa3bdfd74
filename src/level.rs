// SPDX-License-Identifier: Apache-2.0 OR MIT
// Severity levels (spdlog-style, lower is more verbose)

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Log severity levels (0-6, higher is more severe)
///
/// A record with level `s` is emitted by a sink iff `s >= sink.level()`.
/// `Off` is a filter value only; records are never produced at `Off`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    /// Most detailed tracing output
    Trace = 0,
    /// Debugging information
    Debug = 1,
    /// Normal operational messages
    Info = 2,
    /// Something unexpected but recoverable
    Warn = 3,
    /// Operation failed
    Error = 4,
    /// Failure that threatens the process
    Critical = 5,
    /// Filter value that disables all output
    Off = 6,
}

impl Level {
    /// Get level as u8 (0-6)
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Get level name as static string
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Critical => "critical",
            Level::Off => "off",
        }
    }

    /// Single-letter form used by the `%L` pattern flag
    pub const fn as_short_str(self) -> &'static str {
        match self {
            Level::Trace => "T",
            Level::Debug => "D",
            Level::Info => "I",
            Level::Warn => "W",
            Level::Error => "E",
            Level::Critical => "C",
            Level::Off => "O",
        }
    }

    /// Create from u8 value (returns None if invalid)
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Level::Trace),
            1 => Some(Level::Debug),
            2 => Some(Level::Info),
            3 => Some(Level::Warn),
            4 => Some(Level::Error),
            5 => Some(Level::Critical),
            6 => Some(Level::Off),
            _ => None,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "critical" => Ok(Level::Critical),
            "off" => Ok(Level::Off),
            other => Err(Error::Config(format!("unknown log level '{}'", other))),
        }
    }
}

/// Level cell shared between caller threads and workers
pub(crate) struct AtomicLevel(AtomicU8);

impl AtomicLevel {
    pub(crate) const fn new(level: Level) -> Self {
        Self(AtomicU8::new(level.as_u8()))
    }

    pub(crate) fn load(&self) -> Level {
        // Only valid discriminants are ever stored
        Level::from_u8(self.0.load(Ordering::Relaxed)).unwrap_or(Level::Off)
    }

    pub(crate) fn store(&self, level: Level) {
        self.0.store(level.as_u8(), Ordering::Relaxed);
    }
}
