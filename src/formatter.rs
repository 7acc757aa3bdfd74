// SPDX-License-Identifier: Apache-2.0 OR MIT
// Record formatting: the Formatter contract plus the pattern-compiled
// default implementation.

use crate::record::Record;
use chrono::{DateTime, Datelike, Local, Timelike};
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

/// Renders records into bytes; one instance per sink
pub trait Formatter: Send {
    /// Append the fully rendered line (including trailing newline) to `dest`
    fn format(&mut self, record: &Record, dest: &mut Vec<u8>);

    /// Produce an independent instance for a new sink
    fn clone_box(&self) -> Box<dyn Formatter>;
}

/// Default pattern: timestamp with milliseconds, level, payload
pub const DEFAULT_PATTERN: &str = "[%Y-%m-%d %H:%M:%S.%e] [%l] %v";

/// One compiled element of a pattern string
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Aggregated run of literal text between flags
    Literal(String),
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millis,
    Level,
    ShortLevel,
    LoggerName,
    ThreadId,
    Source,
    Payload,
}

/// Formatter driven by a `%`-flag pattern string
///
/// Supported flags: `%Y %m %d %H %M %S %e` (time), `%l` (level name),
/// `%L` (level letter), `%n` (logger name), `%t` (thread id), `%s`
/// (source file:line, empty when absent), `%v` (payload), `%%` (literal
/// percent). Unknown flags are kept verbatim.
pub struct PatternFormatter {
    pattern: String,
    segments: Vec<Segment>,
    // Calendar conversion cache, keyed by whole seconds
    cached: Option<(u64, DateTime<Local>)>,
}

impl PatternFormatter {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let segments = compile(&pattern);
        Self {
            pattern,
            segments,
            cached: None,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Replace the pattern, recompiling the segment list
    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.pattern = pattern.into();
        self.segments = compile(&self.pattern);
    }

    fn local_time(&mut self, time: SystemTime) -> DateTime<Local> {
        let secs = time
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        match self.cached {
            Some((cached_secs, datetime)) if cached_secs == secs => datetime,
            _ => {
                let datetime = DateTime::<Local>::from(time);
                self.cached = Some((secs, datetime));
                datetime
            }
        }
    }
}

impl Default for PatternFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

impl Formatter for PatternFormatter {
    fn format(&mut self, record: &Record, dest: &mut Vec<u8>) {
        let datetime = self.local_time(record.time);
        let millis = record
            .time
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_millis())
            .unwrap_or(0);

        for segment in &self.segments {
            // Writing into a Vec cannot fail
            let _ = match segment {
                Segment::Literal(text) => dest.write_all(text.as_bytes()),
                Segment::Year => write!(dest, "{:04}", datetime.year()),
                Segment::Month => write!(dest, "{:02}", datetime.month()),
                Segment::Day => write!(dest, "{:02}", datetime.day()),
                Segment::Hour => write!(dest, "{:02}", datetime.hour()),
                Segment::Minute => write!(dest, "{:02}", datetime.minute()),
                Segment::Second => write!(dest, "{:02}", datetime.second()),
                Segment::Millis => write!(dest, "{:03}", millis),
                Segment::Level => dest.write_all(record.level.as_str().as_bytes()),
                Segment::ShortLevel => dest.write_all(record.level.as_short_str().as_bytes()),
                Segment::LoggerName => dest.write_all(record.logger_name.as_bytes()),
                Segment::ThreadId => write!(dest, "{}", record.thread_id),
                Segment::Source => match record.source {
                    Some(loc) => write!(dest, "{}:{}", loc.file, loc.line),
                    None => Ok(()),
                },
                Segment::Payload => dest.write_all(record.payload.as_bytes()),
            };
        }
        dest.push(b'\n');
    }

    fn clone_box(&self) -> Box<dyn Formatter> {
        Box::new(Self::new(self.pattern.clone()))
    }
}

fn compile(pattern: &str) -> Vec<Segment> {
    fn push_literal(segments: &mut Vec<Segment>, ch: char) {
        if let Some(Segment::Literal(text)) = segments.last_mut() {
            text.push(ch);
        } else {
            segments.push(Segment::Literal(ch.to_string()));
        }
    }

    let mut segments = Vec::new();
    let mut chars = pattern.chars();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            push_literal(&mut segments, ch);
            continue;
        }
        match chars.next() {
            Some('Y') => segments.push(Segment::Year),
            Some('m') => segments.push(Segment::Month),
            Some('d') => segments.push(Segment::Day),
            Some('H') => segments.push(Segment::Hour),
            Some('M') => segments.push(Segment::Minute),
            Some('S') => segments.push(Segment::Second),
            Some('e') => segments.push(Segment::Millis),
            Some('l') => segments.push(Segment::Level),
            Some('L') => segments.push(Segment::ShortLevel),
            Some('n') => segments.push(Segment::LoggerName),
            Some('t') => segments.push(Segment::ThreadId),
            Some('s') => segments.push(Segment::Source),
            Some('v') => segments.push(Segment::Payload),
            Some('%') => push_literal(&mut segments, '%'),
            Some(other) => {
                push_literal(&mut segments, '%');
                push_literal(&mut segments, other);
            }
            None => push_literal(&mut segments, '%'),
        }
    }

    segments
}
