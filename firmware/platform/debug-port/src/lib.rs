//! # Debug Port Console
//!
//! Early platform code runs before any console exists. This crate writes
//! diagnostics byte by byte to an I/O port that a debugger, a POST card, or
//! an emulator captures. QEMU's debug console listens on
//! [`QEMU_DEBUG_PORT`] (`-debugcon stdio`).
//!
//! ```text
//! log::info!(..)  ──► DebugPortLogger ──┐
//!                                        ├─► PortSink ─► out dx, al
//! debug_trace!(..) ─────────────────────┘
//! ```
//!
//! ## Features
//!
//! * `enabled` (default): port writes are compiled in. Without it every write
//!   is a no-op and no port is touched, which is what host builds and
//!   production images want.
//!
//! The line format is produced by [`write_record`], which works on any
//! [`core::fmt::Write`] so other backends can share it.
//!
//! ```rust,no_run
//! use debug_port::{DebugPortLogger, QEMU_DEBUG_PORT};
//! use log::LevelFilter;
//!
//! static LOGGER: DebugPortLogger = DebugPortLogger::new(QEMU_DEBUG_PORT, LevelFilter::Debug);
//!
//! LOGGER.init().expect("logger already set");
//! log::info!("policy installed");
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod logger;
mod sink;

pub use logger::{DebugPortLogger, write_record};
pub use sink::PortSink;

/// The port QEMU's `-debugcon` device listens on.
pub const QEMU_DEBUG_PORT: u16 = 0x402;

#[doc(hidden)]
pub fn _trace(port: u16, args: core::fmt::Arguments) {
    // Best effort; the sink never fails.
    let _ = core::fmt::write(&mut PortSink::new(port), args);
}

/// Formats directly to the QEMU debug port, bypassing `log`.
///
/// ```rust,no_run
/// debug_port::debug_trace!("TOLUD={:#x}\n", 0x8000_0000u32);
/// ```
#[macro_export]
macro_rules! debug_trace {
    ($($arg:tt)*) => {{
        $crate::_trace($crate::QEMU_DEBUG_PORT, ::core::format_args!($($arg)*));
    }};
}
