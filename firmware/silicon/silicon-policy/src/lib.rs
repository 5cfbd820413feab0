//! # Silicon Policy
//!
//! Per-domain silicon configuration ("policy") built on config block tables.
//!
//! ## Flow within a boot phase
//!
//! ```text
//! PolicyBuilder::create_defaults::<D>()   compiled-in defaults, no probing
//!     ↓  Policy<D> (Updating)
//! Policy::update / update_block           board and runtime corrections
//!     ↓
//! PolicyRegistry::install                 sealed, read-only from here on
//!     ↓
//! PolicyRegistry::locate / locate_domain  consumers
//!     ↓
//! pack_handoff                            facts for the next phase
//! ```
//!
//! Silicon code owns "which knobs exist" (the domains and their defaults);
//! board code only decides "which values this board needs" by updating blocks
//! it addresses by type or GUID.
//!
//! ## Domains
//!
//! | Domain | Blocks | Installed in |
//! |--------|--------|--------------|
//! | [`MemoryPolicy`] | [`MemoryConfig`], [`MemoryTimingConfig`], [`SpdConfig`] | pre-memory |
//! | [`ChipsetPolicy`] | [`PchGeneralConfig`], [`UsbConfig`], [`HdAudioConfig`] | pre-memory |
//! | [`CpuPolicy`] | [`CpuConfig`], [`CpuPowerMgmtConfig`] | post-memory |
//! | [`GraphicsPolicy`] | [`GraphicsConfig`], [`VbtConfig`] | post-memory |
//!
//! ```rust
//! use silicon_policy::{BootPhase, CpuConfig, CpuPolicy, PolicyBuilder, PolicyRegistry};
//!
//! let mut policy = PolicyBuilder::create_defaults::<CpuPolicy>().unwrap();
//! policy.update::<CpuConfig, _>(|cpu| { cpu.set_active_core_count(4); }).unwrap();
//!
//! let mut registry = PolicyRegistry::new(BootPhase::PostMemory);
//! registry.install(policy).unwrap();
//!
//! let cpu = registry.locate_domain::<CpuPolicy>().unwrap();
//! assert_eq!(cpu.get::<CpuConfig>().unwrap().active_core_count, 4);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

mod builder;
mod chipset;
mod cpu;
mod domain;
mod dump;
mod error;
mod graphics;
mod handoff;
mod memory;
mod policy;
mod registry;

pub use builder::PolicyBuilder;
pub use chipset::{
    ChipsetBlock, ChipsetPolicy, HdAudioConfig, PchGeneralConfig, USB_OC_SKIP, USB_PORT_COUNT, UsbConfig,
};
pub use cpu::{CpuBlock, CpuConfig, CpuFeatures, CpuPolicy, CpuPowerMgmtConfig};
pub use domain::{BlockKind, DomainBlock, PolicyDomain};
pub use dump::{BlockSummary, TableSummary, block_name, domain_name, dump};
pub use error::PolicyError;
pub use graphics::{GraphicsBlock, GraphicsConfig, GraphicsPolicy, PrimaryDisplay, VbtConfig};
pub use handoff::{handoff_fields, pack_handoff};
pub use memory::{MemoryBlock, MemoryConfig, MemoryPolicy, MemoryTimingConfig, SpdConfig};
pub use policy::{Policy, PolicyState, PolicyView};
pub use registry::{BootPhase, PolicyRegistry};

pub use config_block::{BlockRef, ConfigBlock, ConfigBlockTable, Guid, TableCapacity, TableError, guid};
