use std::{
    fmt,
    io::{self, Write},
    thread,
};

use crossbeam::channel;
use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};
use time::{format_description::FormatItem, OffsetDateTime};

pub struct Logger {
    sender: channel::Sender<Message>,
    level: log::LevelFilter,
}

impl Logger {
    /// Installs the logger. [`log::set_max_level`] can narrow the level
    /// afterwards.
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        log::set_max_level(self.level);
        log::set_boxed_logger(Box::new(self))?;
        Ok(())
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level().to_level_filter() <= self.level
    }

    fn log(&self, record: &log::Record) {
        const TIMESTAMP_FORMAT: &[FormatItem] = time::macros::format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]"
        );

        if self.enabled(record.metadata()) {
            let timestamp = OffsetDateTime::now_local()
                .unwrap_or_else(|_| OffsetDateTime::now_utc())
                .format(&TIMESTAMP_FORMAT)
                .unwrap_or_default();

            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            // gilrs reports every unmapped axis event at debug.
            if target.starts_with("gilrs") && record.level() > log::Level::Info {
                return;
            }

            let _ = self.sender.send(Message {
                timestamp,
                level: record.level(),
                message: format!("[{}] {}", target, record.args()),
            });
        }
    }

    fn flush(&self) {}
}

pub struct LoggerBuilder {
    sender: Result<channel::Sender<Message>, BuildError>,
    level: log::LevelFilter,
}

impl LoggerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(self) -> Result<Logger, BuildError> {
        self.sender.map(|sender| Logger {
            sender,
            level: self.level,
        })
    }

    #[must_use]
    pub fn sender(mut self, sender: channel::Sender<Message>) -> Self {
        self.sender = Ok(sender);
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: log::LevelFilter) -> Self {
        self.level = level;
        self
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            sender: Err(BuildError::SenderMissing),
            level: log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("sender missing")]
    SenderMissing,
}

#[derive(Debug, Clone)]
pub struct Message {
    timestamp: String,
    level: log::Level,
    message: String,
}

impl Message {
    pub const fn level(&self) -> log::Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:<5} {}", self.timestamp, self.level, self.message)
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.level == other.level && self.message == other.message
    }
}

impl Eq for Message {}

/// Prints every received message to stderr until all senders are gone.
pub fn spawn_writer(receiver: channel::Receiver<Message>) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("log-writer".into())
        .spawn(move || {
            let stderr = io::stderr();
            for message in receiver {
                let _ = writeln!(stderr.lock(), "{}", message);
            }
        })
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Sequence)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<Level> for log::LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Off => Self::Off,
            Level::Error => Self::Error,
            Level::Warn => Self::Warn,
            Level::Info => Self::Info,
            Level::Debug => Self::Debug,
            Level::Trace => Self::Trace,
        }
    }
}
