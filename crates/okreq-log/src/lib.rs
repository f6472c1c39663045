//! Leveled logging for okreq.
//!
//! Provides a [`Logger`] instance that gates events by severity and tags
//! every line with the caller's source location. Instances are injected
//! where they are needed (the request builder takes one for its debug
//! dumps); there is no process-wide default to reassign.
//!
//! By default events are forwarded to `tracing`, so a host application's
//! subscriber picks them up. A logger can instead be pointed at any
//! `io::Write` sink with [`Logger::with_writer`], in which case lines are
//! formatted as `[file:line][LEVEL] message`.
//!
//! ```
//! use okreq_log::{Level, Logger};
//!
//! let log = Logger::new(Level::Info);
//! log.info("starting up");
//! log.debug("suppressed below the Info threshold");
//! ```

use std::fmt;
use std::io::{self, Write};
use std::panic::Location;
use std::process;
use std::sync::{Arc, Mutex};

/// Log severity, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Diagnostic detail, suppressed by default.
    Debug,
    /// Routine events.
    Info,
    /// Something unexpected that the caller can survive.
    Warn,
    /// A failure.
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

enum Sink {
    Tracing,
    Writer(Mutex<Box<dyn Write + Send>>),
}

/// Leveled logger with caller-location tagging.
///
/// Cloning is cheap; clones share the same sink.
#[derive(Clone)]
pub struct Logger {
    threshold: Level,
    sink: Arc<Sink>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sink = match *self.sink {
            Sink::Tracing => "tracing",
            Sink::Writer(_) => "writer",
        };
        f.debug_struct("Logger")
            .field("threshold", &self.threshold)
            .field("sink", &sink)
            .finish()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

impl Logger {
    /// Create a logger that forwards events at or above `threshold` to
    /// `tracing`.
    pub fn new(threshold: Level) -> Self {
        Self {
            threshold,
            sink: Arc::new(Sink::Tracing),
        }
    }

    /// Create a logger that writes formatted lines to `writer`.
    pub fn with_writer(threshold: Level, writer: impl Write + Send + 'static) -> Self {
        Self {
            threshold,
            sink: Arc::new(Sink::Writer(Mutex::new(Box::new(writer)))),
        }
    }

    /// Convenience constructor writing to stderr.
    pub fn stderr(threshold: Level) -> Self {
        Self::with_writer(threshold, io::stderr())
    }

    /// The severity below which events are suppressed.
    pub fn threshold(&self) -> Level {
        self.threshold
    }

    /// Log at [`Level::Debug`].
    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Level::Debug, Location::caller(), &message);
    }

    /// Log at [`Level::Info`].
    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::Info, Location::caller(), &message);
    }

    /// Log at [`Level::Warn`].
    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(Level::Warn, Location::caller(), &message);
    }

    /// Log at [`Level::Error`].
    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(Level::Error, Location::caller(), &message);
    }

    /// Log `message` and panic with it.
    ///
    /// # Panics
    ///
    /// Always, after the message is written. The event bypasses the
    /// threshold gate.
    #[track_caller]
    pub fn panic(&self, message: impl fmt::Display) -> ! {
        let location = Location::caller();
        self.emit(Level::Error, "PANIC", location, &message);
        panic!("{message}");
    }

    /// Log `message` and terminate the process with exit code 1.
    ///
    /// The event bypasses the threshold gate.
    #[track_caller]
    pub fn fatal(&self, message: impl fmt::Display) -> ! {
        let location = Location::caller();
        self.emit(Level::Error, "FATAL", location, &message);
        process::exit(1);
    }

    fn log(&self, level: Level, location: &Location<'_>, message: &dyn fmt::Display) {
        if level < self.threshold {
            return;
        }
        self.emit(level, level.tag(), location, message);
    }

    fn emit(&self, level: Level, tag: &str, location: &Location<'_>, message: &dyn fmt::Display) {
        match &*self.sink {
            Sink::Tracing => {
                let prefix = format!("[{}:{}]", location.file(), location.line());
                match level {
                    Level::Debug => tracing::debug!("{prefix}[{tag}] {message}"),
                    Level::Info => tracing::info!("{prefix}[{tag}] {message}"),
                    Level::Warn => tracing::warn!("{prefix}[{tag}] {message}"),
                    Level::Error => tracing::error!("{prefix}[{tag}] {message}"),
                }
            }
            Sink::Writer(writer) => {
                let mut writer = match writer.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                // A failed log write must not fail the caller.
                let _ = writeln!(
                    writer,
                    "[{}:{}][{}] {}",
                    location.file(),
                    location.line(),
                    tag,
                    message
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            let buf = self.0.lock().expect("buffer lock");
            String::from_utf8_lossy(&buf).into_owned()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("buffer lock").extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn threshold_gates_lower_levels() {
        let buf = SharedBuf::default();
        let log = Logger::with_writer(Level::Info, buf.clone());

        log.debug("hidden");
        log.info("shown");

        let out = buf.contents();
        assert!(!out.contains("hidden"));
        assert!(out.contains("shown"));
    }

    #[test]
    fn lines_carry_location_and_level() {
        let buf = SharedBuf::default();
        let log = Logger::with_writer(Level::Debug, buf.clone());

        log.warn("watch out");

        let out = buf.contents();
        assert!(out.contains("[WARN] watch out"), "got: {out}");
        assert!(out.contains("lib.rs:"), "got: {out}");
    }

    #[test]
    fn error_always_passes_the_gate() {
        let buf = SharedBuf::default();
        let log = Logger::with_writer(Level::Error, buf.clone());

        log.info("hidden");
        log.error("boom");

        let out = buf.contents();
        assert!(!out.contains("hidden"));
        assert!(out.contains("[ERROR] boom"));
    }

    #[test]
    fn clones_share_the_sink() {
        let buf = SharedBuf::default();
        let log = Logger::with_writer(Level::Debug, buf.clone());
        let other = log.clone();

        other.info("from the clone");

        assert!(buf.contents().contains("from the clone"));
    }

    #[test]
    #[should_panic(expected = "it broke")]
    fn panic_logs_then_panics() {
        let buf = SharedBuf::default();
        let log = Logger::with_writer(Level::Error, buf.clone());
        log.panic("it broke");
    }
}
