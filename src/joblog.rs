//! Job log: the line-oriented record of what every worker did.
//!
//! Each record is one line of the form
//!
//! ```text
//! <yyyy-mm-dd-hh-mm-ss> : <actor> : <INFOS|ERROR> : <message>
//! ```
//!
//! Field order and the `" : "` separator are relied on by log scrapers and
//! must not change. Diagnostics go through `tracing` instead and never reach
//! this stream.

use std::fmt;
use std::io::{self, Write};

use chrono::{Local, NaiveDateTime};
use parking_lot::Mutex;

/// `chrono` format of the timestamp field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Separator between fields of a record.
pub const FIELD_SEPARATOR: &str = " : ";

/// Actor written when no identity could be resolved.
pub const UNKNOWN_ACTOR: &str = "unknown";

/// Severity of a job log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

impl LogLevel {
    /// The level as written on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFOS",
            LogLevel::Error => "ERROR",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "INFOS" => Some(LogLevel::Info),
            "ERROR" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the job log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub timestamp: String,
    pub actor: String,
    pub level: LogLevel,
    pub message: String,
}

impl LogRecord {
    /// Build a record stamped with the current local time.
    pub fn now(actor: &str, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            actor: actor.to_string(),
            level,
            message: message.into(),
        }
    }

    /// Parse a line written by [`Logger`]. Returns `None` for anything that
    /// does not have all four fields, a valid timestamp and a known level.
    ///
    /// The message is the remainder of the line and may itself contain the
    /// separator.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let mut fields = line.splitn(4, FIELD_SEPARATOR);
        let timestamp = fields.next()?;
        let actor = fields.next()?;
        let level = LogLevel::parse(fields.next()?)?;
        let message = fields.next()?;

        NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;
        if actor.is_empty() || line.contains('\n') {
            return None;
        }

        Some(Self {
            timestamp: timestamp.to_string(),
            actor: actor.to_string(),
            level,
            message: message.to_string(),
        })
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}",
            self.timestamp,
            self.actor,
            self.level,
            self.message,
            sep = FIELD_SEPARATOR
        )
    }
}

/// Resolve the actor once at startup.
///
/// An explicit override wins, then `USER`, then `LOGNAME`, then
/// [`UNKNOWN_ACTOR`].
pub fn resolve_actor(explicit: Option<&str>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var("USER").ok())
        .or_else(|| std::env::var("LOGNAME").ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN_ACTOR.to_string())
}

/// Make `actor` safe to place in the actor field.
///
/// Line breaks become spaces and every `" : "` becomes `" - "`, as does a
/// trailing `" :"` that would merge with the following separator. A blank
/// result becomes [`UNKNOWN_ACTOR`].
pub fn sanitize_actor(actor: &str) -> String {
    let mut clean = actor.replace(['\n', '\r'], " ").trim().to_string();
    while clean.contains(FIELD_SEPARATOR) {
        clean = clean.replace(FIELD_SEPARATOR, " - ");
    }
    if let Some(head) = clean.strip_suffix(" :") {
        clean = format!("{head} -");
    }
    if clean.is_empty() {
        UNKNOWN_ACTOR.to_string()
    } else {
        clean
    }
}

/// Writes job log records from any number of threads onto one stream.
///
/// Each call produces exactly one complete line; lines from concurrent
/// callers never interleave. The lock guarding the stream is held only for
/// the write and flush of an already formatted line.
pub struct Logger {
    actor: String,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Logger {
    /// Log to an arbitrary writer.
    ///
    /// The actor is cleaned with [`sanitize_actor`] so it always fits in a
    /// single field.
    pub fn new(actor: impl Into<String>, sink: impl Write + Send + 'static) -> Self {
        Self {
            actor: sanitize_actor(&actor.into()),
            sink: Mutex::new(Box::new(sink)),
        }
    }

    /// Log to standard output.
    pub fn stdout(actor: impl Into<String>) -> Self {
        Self::new(actor, io::stdout())
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Write one record.
    ///
    /// Line breaks inside `message` are replaced with spaces so a record can
    /// never span two lines. A failing sink is reported as a diagnostic and
    /// otherwise ignored; losing the log must not stop the workers.
    pub fn log(&self, level: LogLevel, message: &str) {
        let message = if message.contains(['\n', '\r']) {
            message.replace(['\n', '\r'], " ")
        } else {
            message.to_string()
        };
        let mut line = LogRecord::now(&self.actor, level, message).to_string();
        line.push('\n');

        let mut sink = self.sink.lock();
        if let Err(e) = sink.write_all(line.as_bytes()).and_then(|()| sink.flush()) {
            tracing::warn!("Failed to write job log record: {}", e);
        }
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("actor", &self.actor).finish()
    }
}
