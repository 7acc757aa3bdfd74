// SPDX-License-Identifier: Apache-2.0 OR MIT
// Console sinks: stdout/stderr, plain or ANSI-colored by level

use super::{MutexLock, SingleThreadLock, Sink, SinkLock};
use crate::error::Result;
use crate::formatter::{Formatter, PatternFormatter};
use crate::level::{AtomicLevel, Level};
use crate::record::Record;
use std::io::Write;

// ANSI escape codes, applied around the whole rendered line
mod color {
    pub const RESET: &str = "\x1b[0m";
    pub const WHITE: &str = "\x1b[37m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
    pub const BOLD_RED: &str = "\x1b[1m\x1b[31m";
}

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Trace => color::WHITE,
        Level::Debug => color::CYAN,
        Level::Info => color::GREEN,
        Level::Warn => color::YELLOW,
        Level::Error => color::RED,
        Level::Critical => color::BOLD_RED,
        Level::Off => color::RESET,
    }
}

/// Which standard stream a console sink writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    Stderr,
}

pub struct ConsoleState {
    formatter: Box<dyn Formatter>,
}

/// Sink writing rendered records to stdout or stderr
pub struct ConsoleSink<L: SinkLock<ConsoleState> = MutexLock<ConsoleState>> {
    target: ConsoleTarget,
    colored: bool,
    level: AtomicLevel,
    state: L,
}

/// Single-threaded console sink; callers must serialize access externally
pub type ConsoleSinkSt = ConsoleSink<SingleThreadLock<ConsoleState>>;

impl<L: SinkLock<ConsoleState>> ConsoleSink<L> {
    fn with_target(target: ConsoleTarget, colored: bool) -> Self {
        Self {
            target,
            colored,
            level: AtomicLevel::new(Level::Trace),
            state: L::new(ConsoleState {
                formatter: Box::new(PatternFormatter::default()),
            }),
        }
    }

    fn write_line(&self, line: &[u8], level: Level) -> std::io::Result<()> {
        match self.target {
            ConsoleTarget::Stdout => {
                let mut out = std::io::stdout().lock();
                self.write_colored(&mut out, line, level)
            }
            ConsoleTarget::Stderr => {
                let mut out = std::io::stderr().lock();
                self.write_colored(&mut out, line, level)
            }
        }
    }

    fn write_colored(
        &self,
        out: &mut impl Write,
        line: &[u8],
        level: Level,
    ) -> std::io::Result<()> {
        if self.colored {
            out.write_all(level_color(level).as_bytes())?;
            out.write_all(line)?;
            out.write_all(color::RESET.as_bytes())
        } else {
            out.write_all(line)
        }
    }
}

impl ConsoleSink<MutexLock<ConsoleState>> {
    pub fn new(target: ConsoleTarget, colored: bool) -> Self {
        Self::with_target(target, colored)
    }

    pub fn stdout() -> Self {
        Self::with_target(ConsoleTarget::Stdout, false)
    }

    pub fn stdout_color() -> Self {
        Self::with_target(ConsoleTarget::Stdout, true)
    }

    pub fn stderr() -> Self {
        Self::with_target(ConsoleTarget::Stderr, false)
    }

    pub fn stderr_color() -> Self {
        Self::with_target(ConsoleTarget::Stderr, true)
    }
}

impl ConsoleSinkSt {
    pub fn new(target: ConsoleTarget, colored: bool) -> Self {
        Self::with_target(target, colored)
    }

    pub fn stdout() -> Self {
        Self::with_target(ConsoleTarget::Stdout, false)
    }

    pub fn stdout_color() -> Self {
        Self::with_target(ConsoleTarget::Stdout, true)
    }

    pub fn stderr() -> Self {
        Self::with_target(ConsoleTarget::Stderr, false)
    }

    pub fn stderr_color() -> Self {
        Self::with_target(ConsoleTarget::Stderr, true)
    }
}

impl<L: SinkLock<ConsoleState>> Sink for ConsoleSink<L> {
    fn log(&self, record: &Record) -> Result<()> {
        let line = self.state.with(|state| {
            let mut buf = Vec::new();
            state.formatter.format(record, &mut buf);
            buf
        });
        self.write_line(&line, record.level)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().lock().flush()?,
            ConsoleTarget::Stderr => std::io::stderr().lock().flush()?,
        }
        Ok(())
    }

    fn level(&self) -> Level {
        self.level.load()
    }

    fn set_level(&self, level: Level) {
        self.level.store(level);
    }

    fn set_formatter(&self, formatter: Box<dyn Formatter>) {
        self.state.with(|state| state.formatter = formatter);
    }
}
