//! # Configuration Blocks and Policy Tables
//!
//! This crate implements the data-layout convention silicon and platform code
//! use to hand configuration ("policy") around during platform bring-up: a
//! table header followed by a linear, contiguous sequence of GUID-tagged
//! configuration blocks.
//!
//! ## Layout
//!
//! ```text
//! offset 0  ┌──────────────────────────────────────────────┐
//!           │ ConfigBlockTableHeader (32 bytes)            │
//!           │   header: ConfigBlockHeader (domain id)      │
//!           │   block_count / available_block_count        │
//!           │   available_size                             │
//! 32        ├──────────────────────────────────────────────┤
//!           │ ConfigBlockHeader (24 bytes) | payload ...   │  block 0
//!           ├──────────────────────────────────────────────┤
//!           │ ConfigBlockHeader (24 bytes) | payload ...   │  block 1
//!           ├──────────────────────────────────────────────┤
//!           │ ...                                          │
//! used      ├──────────────────────────────────────────────┤
//!           │ zeroed headroom (available_size bytes)       │
//! allocated └──────────────────────────────────────────────┘
//! ```
//!
//! All multi-byte fields are little-endian. The used part of the buffer is
//! the canonical byte image of a table: building the same blocks in the same
//! order always yields byte-identical images.
//!
//! ## Blocks
//!
//! A block type is a plain struct implementing [`ConfigBlock`], usually via
//! `#[derive(ConfigBlock)]`. Its [`Default`] impl carries the compiled-in
//! defaults; its payload is packed field by field through [`BlockField`].
//!
//! ```rust
//! use config_block::{ConfigBlock, ConfigBlockTable, TableCapacity, guid};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, ConfigBlock)]
//! #[config_block(guid = "6f1b3d2a-94c5-4e07-8a61-2d0b9c7e5f13", revision = 1)]
//! struct FanConfig {
//!     duty_cycle: u8,
//!     enabled: bool,
//! }
//!
//! impl Default for FanConfig {
//!     fn default() -> Self {
//!         Self { duty_cycle: 40, enabled: true }
//!     }
//! }
//!
//! let domain = guid!("0c8d2b7e-1f4a-4d36-b5e9-7a3c1e2d4f60");
//! let mut table = ConfigBlockTable::create(domain, 1, TableCapacity::DEFAULT).unwrap();
//! table.add(&FanConfig::default()).unwrap();
//! table.update::<FanConfig, _>(|fan| { fan.set_duty_cycle(75); }).unwrap();
//!
//! assert_eq!(table.get::<FanConfig>().unwrap().duty_cycle, 75);
//! assert_eq!(table.total_size(), 32 + 24 + 2);
//! ```
//!
//! ## Lifecycle
//!
//! Tables are built and updated by their owner and then sealed. A sealed
//! table rejects every mutation with [`TableError::Sealed`]; images parsed
//! with [`ConfigBlockTable::parse`] are always sealed.
//!
//! The crate does not log; callers decide how failures surface.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

extern crate alloc;
extern crate self as config_block;

mod block;
mod error;
mod field;
mod header;
mod table;

pub use block::ConfigBlock;
pub use config_block_derive::ConfigBlock;
pub use error::TableError;
pub use field::BlockField;
pub use header::{ConfigBlockHeader, ConfigBlockTableHeader};
pub use table::{
    BlockRef, BlockView, Blocks, ConfigBlockTable, GROWTH_MARGIN_BLOCKS, GROWTH_MARGIN_BYTES,
    TableCapacity,
};
pub use uefi::{Guid, guid};
