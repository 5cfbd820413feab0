use debug_port::{DebugPortLogger, QEMU_DEBUG_PORT};
use log::{LevelFilter, SetLoggerError};

static LOGGER: DebugPortLogger = DebugPortLogger::new(QEMU_DEBUG_PORT, LevelFilter::Debug);

/// Routes `log` output to the QEMU debug console. Call once, before the
/// pre-memory phase starts.
///
/// # Errors
/// Fails if another logger is already installed.
pub fn init_logging(level: LevelFilter) -> Result<(), SetLoggerError> {
    LOGGER.init()?;
    log::set_max_level(level.min(LOGGER.max_level()));
    Ok(())
}
