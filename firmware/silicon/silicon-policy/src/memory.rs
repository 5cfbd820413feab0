//! # Memory Policy
//!
//! Memory controller configuration. Built by the pre-memory phase; memory
//! initialization writes the detected and trained values back before install.

use crate::policy_domain;
use config_block::ConfigBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ConfigBlock)]
#[config_block(guid = "2b7f0e6c-94d1-4a38-bc25-6e81f3d7a092", revision = 1)]
pub struct MemoryConfig {
    /// Upper bound for training, in MT/s; 0 lets training pick.
    pub max_frequency_mts: u16,
    pub ecc: bool,
    /// Bit `n` enables channel `n`.
    pub channel_enable: u8,
    /// Written by memory init.
    pub detected_size_mb: u32,
    /// Top of low usable DRAM in bytes, written by memory init.
    pub tolud: u32,
    /// Pre-allocated graphics memory carved out below TOLUD.
    pub igd_stolen_size_mb: u16,
    /// Skip training when the DIMM population is unchanged.
    pub fast_boot: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_frequency_mts: 0,
            ecc: false,
            channel_enable: 0b11,
            detected_size_mb: 0,
            tolud: 0,
            igd_stolen_size_mb: 64,
            fast_boot: true,
        }
    }
}

/// DRAM timings. Zero requests the SPD value; memory init writes back the
/// trained result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ConfigBlock)]
#[config_block(guid = "c6a9e2d1-05b8-4f6e-a734-1d9c8b2e5f30", revision = 1)]
pub struct MemoryTimingConfig {
    /// Trained data rate in MT/s.
    pub frequency_mts: u16,
    pub tcl: u8,
    pub trcd: u8,
    pub trp: u8,
    pub tras: u8,
    pub trfc: u16,
    pub trefi: u16,
    /// 1N or 2N, 0 for auto.
    pub command_rate: u8,
}

/// SMBus addresses of the SPD EEPROMs, one per DIMM slot. 0 marks an unused
/// slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ConfigBlock)]
#[config_block(guid = "47e05d3b-b9a2-4c1f-8e76-f2a0d14c3b85", revision = 1)]
pub struct SpdConfig {
    pub smbus_addresses: [u8; 4],
}

impl Default for SpdConfig {
    fn default() -> Self {
        Self {
            smbus_addresses: [0xA0, 0xA2, 0xA4, 0xA6],
        }
    }
}

policy_domain! {
    /// Memory controller silicon policy.
    pub struct MemoryPolicy {
        id: "91d3f7a0-2c6e-4b85-a1f9-0e4b7d2c6a13",
        name: "Memory",
        revision: 1,
        kinds: MemoryBlock {
            Config => MemoryConfig,
            Timing => MemoryTimingConfig,
            Spd => SpdConfig,
        },
    }
}
