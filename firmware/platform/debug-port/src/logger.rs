use crate::sink::PortSink;
use core::fmt;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// A `log` backend writing to a [`PortSink`].
pub struct DebugPortLogger {
    port: u16,
    max_level: LevelFilter,
}

impl DebugPortLogger {
    #[must_use]
    pub const fn new(port: u16, max_level: LevelFilter) -> Self {
        Self { port, max_level }
    }

    #[must_use]
    pub const fn max_level(&self) -> LevelFilter {
        self.max_level
    }

    /// Installs this logger as the global `log` backend. Call once during
    /// early init.
    ///
    /// # Errors
    /// Fails if a logger was already installed.
    pub fn init(&'static self) -> Result<(), SetLoggerError> {
        log::set_logger(self)?;
        log::set_max_level(self.max_level);
        Ok(())
    }
}

impl Log for DebugPortLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let _ = write_record(&mut PortSink::new(self.port), record);
    }

    fn flush(&self) {}
}

/// Writes `record` as `"[LEVEL] target: message\n"`.
///
/// # Errors
/// Propagates errors of `out`.
pub fn write_record(out: &mut impl fmt::Write, record: &Record) -> fmt::Result {
    writeln!(out, "[{}] {}: {}", record.level(), record.target(), record.args())
}
