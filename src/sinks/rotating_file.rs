// SPDX-License-Identifier: Apache-2.0 OR MIT
// Size-based rotating file sink
//
// Rotation policy: when a rendered record would push the current file past
// `max_size`, the history chain is renamed high-to-low (`base.1` becomes
// `base.2`, `base` becomes `base.1`, the oldest falls off) and a fresh
// `base` is opened. A rename failure reopens the stuck file truncated, so
// the size cap holds even when the chain cannot move.

use super::{MutexLock, SingleThreadLock, Sink, SinkLock};
use crate::error::{Error, Result};
use crate::formatter::{Formatter, PatternFormatter};
use crate::level::{AtomicLevel, Level};
use crate::record::Record;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct RotatingState {
    formatter: Box<dyn Formatter>,
    // None only after a failed rotation left no writable file
    file: Option<File>,
    current_size: u64,
}

/// File sink that rotates by size, keeping a bounded history
pub struct RotatingFileSink<L: SinkLock<RotatingState> = MutexLock<RotatingState>> {
    base_path: PathBuf,
    max_size: u64,
    max_files: usize,
    level: AtomicLevel,
    state: L,
}

/// Single-threaded rotating sink; callers must serialize access externally
pub type RotatingFileSinkSt = RotatingFileSink<SingleThreadLock<RotatingState>>;

impl<L: SinkLock<RotatingState>> RotatingFileSink<L> {
    fn open(base_path: &Path, max_size: u64, max_files: usize) -> Result<Self> {
        if max_size == 0 {
            return Err(Error::Config(
                "rotating file sink: max_size must be greater than 0".to_string(),
            ));
        }
        if max_files == 0 {
            return Err(Error::Config(
                "rotating file sink: max_files must be greater than 0".to_string(),
            ));
        }

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(base_path)
            .map_err(|source| Error::OpenFile {
                path: base_path.to_path_buf(),
                source,
            })?;
        // Picking up an existing file counts its bytes toward the cap
        let current_size = file.metadata().map(|meta| meta.len()).unwrap_or(0);

        Ok(Self {
            base_path: base_path.to_path_buf(),
            max_size,
            max_files,
            level: AtomicLevel::new(Level::Trace),
            state: L::new(RotatingState {
                formatter: Box::new(PatternFormatter::default()),
                file: Some(file),
                current_size,
            }),
        })
    }

    /// Path of the file currently being written
    pub fn current_path(&self) -> &Path {
        &self.base_path
    }

    /// Close the current file, shift the history chain up by one, and open
    /// a fresh base file. On a rename failure the source file is reopened
    /// truncated and the rest of the chain is left alone for this cycle.
    fn rotate(&self, state: &mut RotatingState) -> Result<()> {
        state.file = None;

        for index in (1..=self.max_files).rev() {
            let src = calc_filename(&self.base_path, index - 1);
            if !src.exists() {
                continue;
            }
            let target = calc_filename(&self.base_path, index);
            if target.exists() {
                let _ = std::fs::remove_file(&target);
            }
            if std::fs::rename(&src, &target).is_err() {
                let file = open_truncated(&src)?;
                state.file = Some(file);
                state.current_size = 0;
                return Ok(());
            }
        }

        let file = open_truncated(&self.base_path)?;
        state.file = Some(file);
        state.current_size = 0;
        Ok(())
    }
}

impl RotatingFileSink<MutexLock<RotatingState>> {
    /// Create a rotating sink writing to `base_path`, rotating once a file
    /// would exceed `max_size` bytes, keeping at most `max_files` history
    /// files beside the current one
    pub fn new(base_path: impl AsRef<Path>, max_size: u64, max_files: usize) -> Result<Self> {
        Self::open(base_path.as_ref(), max_size, max_files)
    }
}

impl RotatingFileSinkSt {
    pub fn new(base_path: impl AsRef<Path>, max_size: u64, max_files: usize) -> Result<Self> {
        Self::open(base_path.as_ref(), max_size, max_files)
    }
}

impl<L: SinkLock<RotatingState>> Sink for RotatingFileSink<L> {
    fn log(&self, record: &Record) -> Result<()> {
        self.state.with(|state| {
            let mut buf = Vec::new();
            state.formatter.format(record, &mut buf);
            let len = buf.len() as u64;

            if state.current_size + len > self.max_size {
                self.rotate(state)?;
            }

            match state.file.as_mut() {
                Some(file) => file.write_all(&buf)?,
                None => {
                    return Err(Error::Io(std::io::Error::other(
                        "rotating file sink has no open file",
                    )))
                }
            }
            state.current_size += len;
            Ok(())
        })
    }

    fn flush(&self) -> Result<()> {
        self.state.with(|state| {
            if let Some(file) = state.file.as_mut() {
                file.flush()?;
            }
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

fn open_truncated(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(path)
        .map_err(|source| Error::OpenFile {
            path: path.to_path_buf(),
            source,
        })
}

/// Derive the on-disk name for history index `index`
///
/// Index 0 is `base_path` itself. For higher indices the index is spliced
/// in front of the extension: `logs/app.log` becomes `logs/app.3.log`,
/// `logs/app` becomes `logs/app.3`. The extension is the suffix starting
/// at the last `.` of the final path component.
pub fn calc_filename(base_path: &Path, index: usize) -> PathBuf {
    if index == 0 {
        return base_path.to_path_buf();
    }
    let base = base_path.to_string_lossy();
    let (stem, ext) = split_extension(&base);
    PathBuf::from(format!("{}.{}{}", stem, index, ext))
}

fn split_extension(base: &str) -> (&str, &str) {
    let last_sep = base.rfind(['/', '\\']);
    match base.rfind('.') {
        Some(dot) if last_sep.map_or(true, |sep| dot > sep) => base.split_at(dot),
        _ => (base, ""),
    }
}
