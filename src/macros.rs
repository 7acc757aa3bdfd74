// SPDX-License-Identifier: Apache-2.0 OR MIT
// Logging macros. Each gates on should_log before formatting, captures
// the call site, and discards delivery errors; call LoggerHandle::log
// directly to observe them.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at_level {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &*$logger;
        if $crate::LoggerHandle::should_log(logger, $level) {
            let source = $crate::SourceLoc {
                file: file!(),
                line: line!(),
                function: None,
            };
            let _ = $crate::LoggerHandle::log_at(
                logger,
                $level,
                &format!($($arg)+),
                Some(source),
            );
        }
    }};
}

/// Log at trace level
///
/// # Examples
/// ```ignore
/// trace!(logger, "polling queue, depth {}", depth);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at_level!($logger, $crate::Level::Trace, $($arg)+)
    };
}

/// Log at debug level
///
/// # Examples
/// ```ignore
/// debug!(logger, "handshake took {:?}", elapsed);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at_level!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log at info level
///
/// # Examples
/// ```ignore
/// info!(logger, "listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at_level!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log at warn level
///
/// # Examples
/// ```ignore
/// warn!(logger, "retrying after {} failures", attempts);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at_level!($logger, $crate::Level::Warn, $($arg)+)
    };
}

/// Log at error level
///
/// # Examples
/// ```ignore
/// error!(logger, "write failed: {}", err);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at_level!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log at critical level
///
/// # Examples
/// ```ignore
/// critical!(logger, "worker pool unavailable");
/// ```
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at_level!($logger, $crate::Level::Critical, $($arg)+)
    };
}
