//! Logging for the IMR binding helper
//!
//! All crates in the workspace log through one global [`Logger`]. The default
//! prints colored lines to stdout; tests and applications swap it with
//! [`set_logger`]. Error entries carry the file and line they were raised at.

use colored::*;
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Receiver for every log entry emitted by the binding helper and its backends
///
/// # Example
///
/// ```no_run
/// use imr_bind::imr::log::{Logger, LogEntry, LogSeverity};
///
/// /// Forwards only backend failures
/// struct BackendErrorLogger;
///
/// impl Logger for BackendErrorLogger {
///     fn log(&self, entry: &LogEntry) {
///         if entry.severity == LogSeverity::Error && entry.source.starts_with("imr::vulkan") {
///             eprintln!("{}", entry.message);
///         }
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,

    /// Emitting module, e.g. "imr::bind_helper" or "imr::vulkan"
    pub source: String,
    pub message: String,

    /// Call site, set by `imr_error!` and `imr_err!` only
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Per-call detail (set allocation, descriptor writes, bind commands)
    Trace,
    /// Lifecycle events (pool creation, helper destruction)
    Debug,
    Info,
    Warn,
    /// Failures, reported with their call site
    Error,
}

/// Console logger installed until `set_logger` replaces it
///
/// Prints `[timestamp] [SEVERITY] [source] message`, followed by
/// `(file:line)` when the entry carries a call site.
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let local: DateTime<Local> = entry.timestamp.into();

        let label = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };

        let location = match (entry.file, entry.line) {
            (Some(file), Some(line)) => format!(" ({}:{})", file, line),
            _ => String::new(),
        };

        println!(
            "[{}] [{}] [{}] {}{}",
            local.format("%H:%M:%S%.3f"),
            label,
            entry.source.bright_blue(),
            entry.message,
            location
        );
    }
}

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

/// Install `new_logger` as the global logger
///
/// ```no_run
/// use imr_bind::imr::log::{self, DefaultLogger};
///
/// log::set_logger(DefaultLogger);
/// ```
pub fn set_logger<L: Logger + 'static>(new_logger: L) {
    if let Ok(mut current) = logger().write() {
        *current = Box::new(new_logger);
    }
}

/// Put the console logger back
pub fn reset_logger() {
    set_logger(DefaultLogger);
}

fn dispatch(severity: LogSeverity, source: &str, message: String, site: Option<(&'static str, u32)>) {
    if let Ok(current) = logger().read() {
        current.log(&LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: site.map(|(file, _)| file),
            line: site.map(|(_, line)| line),
        });
    }
}

/// Send a message to the global logger
pub fn log(severity: LogSeverity, source: &str, message: String) {
    dispatch(severity, source, message, None);
}

/// Send a message with its call site (used by `imr_error!` and `imr_err!`)
pub fn log_detailed(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: &'static str,
    line: u32,
) {
    dispatch(severity, source, message, Some((file, line)));
}

// ===== LOGGING MACROS =====

/// Log a TRACE message
///
/// ```no_run
/// imr_bind::imr_trace!("imr::bind_helper", "Allocated set {}", 0);
/// ```
#[macro_export]
macro_rules! imr_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! imr_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message
#[macro_export]
macro_rules! imr_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message
#[macro_export]
macro_rules! imr_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
///
/// ```no_run
/// imr_bind::imr_error!("imr::vulkan", "Failed to create image view: {}", "ERROR_FORMAT_NOT_SUPPORTED");
/// ```
#[macro_export]
macro_rules! imr_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log an ERROR and evaluate to an `Error::BackendError` carrying the same message
///
/// ```no_run
/// # fn f() -> imr_bind::imr::Result<()> {
/// let code = -1;
/// Err(imr_bind::imr_err!("imr::vulkan", "Failed to allocate descriptor set: {:?}", code))
/// # }
/// ```
#[macro_export]
macro_rules! imr_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::log::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::imr::Error::BackendError(message)
    }};
}

/// Log an ERROR and return `Err(Error::BackendError(..))` from the enclosing function
#[macro_export]
macro_rules! imr_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::imr_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
