//! # Platform Initialization
//!
//! Board-side driver of the silicon policy flow. It owns what the silicon
//! crates deliberately do not know: which board this is, what the setup
//! variables say, and when each phase runs.
//!
//! ```text
//! PreMemoryPhase::run                        PostMemoryPhase::run
//!   Memory + Chipset defaults                  require_handoff  (fatal if bad)
//!   apply_memory / apply_chipset               CPU + Graphics defaults
//!   train → apply_training                     apply_cpu / apply_graphics
//!   install → pack_handoff ──► HandoffList ──► install
//!   end_phase (registry dropped)               registry serves the phase
//! ```
//!
//! ```rust
//! use platform_init::{BoardId, BoardProfile, HandoffList, PostMemoryPhase, PreMemoryPhase, SetupOptions};
//! use silicon_handoff::BootMode;
//! use silicon_policy::{CpuConfig, CpuPolicy};
//!
//! let board = BoardProfile::preset(BoardId::QemuQ35);
//! let setup = SetupOptions::default();
//! let mut handoffs = HandoffList::new();
//!
//! PreMemoryPhase::new(&board, &setup, BootMode::FullConfiguration)
//!     .run(&mut handoffs)
//!     .unwrap();
//! let registry = PostMemoryPhase::new(&board, &setup).run(&handoffs).unwrap();
//!
//! let cpu = registry.locate_domain::<CpuPolicy>().unwrap();
//! assert!(cpu.get::<CpuConfig>().unwrap().features.vmx());
//! ```
//!
//! ## Features
//!
//! * `debug-port` (default): enables [`init_logging`], which sends `log`
//!   output to the QEMU debug console.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

mod board;
mod error;
#[cfg(feature = "debug-port")]
mod logging;
mod memory_init;
mod overrides;
mod phase;
mod setup;
mod transport;

pub use board::{BoardId, BoardProfile, DIMM_SLOTS, Dimm, UnknownBoard};
pub use error::PlatformError;
#[cfg(feature = "debug-port")]
pub use logging::init_logging;
pub use memory_init::{LOW_MMIO_BASE, TrainingResult, apply_training, train};
pub use overrides::{apply_chipset, apply_cpu, apply_graphics, apply_memory};
pub use phase::{PostMemoryPhase, PreMemoryPhase};
pub use setup::SetupOptions;
pub use transport::{HandoffEntry, HandoffList};
