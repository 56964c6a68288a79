// Copyright 2019 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A small stdout logger on top of the `log` facade.
//!
//! ```no_run
//! use logger::*;
//!
//! Logger::new()
//!     .label("demo")
//!     .level(Level::Debug)
//!     .init()
//!     .expect("Failed to initialize logger");
//! info!("ready");
//! ```

pub use log::{debug, error, info, trace, warn, Level, LevelFilter, SetLoggerError};

use log::{Log, Metadata, Record};

use std::io::Write;

/// Log at error level and terminate the process with a non-zero status.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => ({
        $crate::error!($($arg)+);
        $crate::flush();
        std::process::exit(1)
    });
}

/// Flush the installed logger, used before exiting.
pub fn flush() {
    log::logger().flush();
}

pub struct Logger {
    label: String,
    level: Level,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    pub fn new() -> Logger {
        Logger {
            label: String::new(),
            level: Level::Info,
        }
    }

    /// Label printed in place of the record target for info and above.
    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Install as the global logger. Fails if a logger is already set.
    pub fn init(self) -> Result<(), SetLoggerError> {
        let filter = self.level.to_level_filter();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(filter);
        Ok(())
    }

    fn format(&self, record: &Record) -> String {
        // debug and trace keep the module path
        let target = if record.level() >= Level::Debug || self.label.is_empty() {
            record.target()
        } else {
            &self.label
        };
        format!(
            "{} {:<5} [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            target,
            record.args()
        )
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            let _ = writeln!(handle, "{}", self.format(record));
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}
