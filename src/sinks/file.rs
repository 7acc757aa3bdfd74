// SPDX-License-Identifier: Apache-2.0 OR MIT
// Basic file sink: append or truncate, no rotation

use super::{MutexLock, SingleThreadLock, Sink, SinkLock};
use crate::error::{Error, Result};
use crate::formatter::{Formatter, PatternFormatter};
use crate::level::{AtomicLevel, Level};
use crate::record::Record;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

pub struct FileState {
    formatter: Box<dyn Formatter>,
    file: File,
}

/// Sink appending rendered records to a single file
pub struct FileSink<L: SinkLock<FileState> = MutexLock<FileState>> {
    level: AtomicLevel,
    state: L,
}

/// Single-threaded file sink; callers must serialize access externally
pub type FileSinkSt = FileSink<SingleThreadLock<FileState>>;

impl<L: SinkLock<FileState>> FileSink<L> {
    fn open(path: &Path, truncate: bool) -> Result<Self> {
        let mut options = OpenOptions::new();
        options.write(true).create(true);
        if truncate {
            options.truncate(true);
        } else {
            options.append(true);
        }
        let file = options.open(path).map_err(|source| Error::OpenFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            level: AtomicLevel::new(Level::Trace),
            state: L::new(FileState {
                formatter: Box::new(PatternFormatter::default()),
                file,
            }),
        })
    }
}

impl FileSink<MutexLock<FileState>> {
    /// Open `path` for writing; `truncate` discards existing content,
    /// otherwise records are appended
    pub fn new(path: impl AsRef<Path>, truncate: bool) -> Result<Self> {
        Self::open(path.as_ref(), truncate)
    }
}

impl FileSinkSt {
    pub fn new(path: impl AsRef<Path>, truncate: bool) -> Result<Self> {
        Self::open(path.as_ref(), truncate)
    }
}

impl<L: SinkLock<FileState>> Sink for FileSink<L> {
    fn log(&self, record: &Record) -> Result<()> {
        self.state.with(|state| {
            let mut buf = Vec::new();
            state.formatter.format(record, &mut buf);
            state.file.write_all(&buf)?;
            Ok(())
        })
    }

    fn flush(&self) -> Result<()> {
        self.state.with(|state| {
            state.file.flush()?;
            Ok(())
        })
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_truncate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("basic.log");

        {
            let sink = FileSink::<MutexLock<_>>::new(&path, false).unwrap();
            sink.set_formatter(Box::new(PatternFormatter::new("%v")));
            sink.log(&Record::new("file", Level::Info, "one")).unwrap();
            sink.log(&Record::new("file", Level::Info, "two")).unwrap();
            sink.flush().unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");

        {
            let sink = FileSink::<MutexLock<_>>::new(&path, false).unwrap();
            sink.set_formatter(Box::new(PatternFormatter::new("%v")));
            sink.log(&Record::new("file", Level::Info, "three"))
                .unwrap();
            sink.flush().unwrap();
        }
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "one\ntwo\nthree\n"
        );

        {
            let sink = FileSink::<MutexLock<_>>::new(&path, true).unwrap();
            sink.set_formatter(Box::new(PatternFormatter::new("%v")));
            sink.log(&Record::new("file", Level::Info, "fresh"))
                .unwrap();
            sink.flush().unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn test_open_failure_is_reported() {
        let result = FileSink::<MutexLock<_>>::new("/nonexistent-dir/deep/basic.log", false);
        assert!(matches!(result, Err(Error::OpenFile { .. })));
    }

    #[test]
    fn test_single_thread_variant_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("st.log");
        let sink = FileSinkSt::new(&path, false).unwrap();
        sink.set_formatter(Box::new(PatternFormatter::new("%v")));
        sink.log(&Record::new("file", Level::Info, "st")).unwrap();
        sink.flush().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "st\n");
    }
}
