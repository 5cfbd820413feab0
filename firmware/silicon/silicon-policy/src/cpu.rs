//! # CPU Policy
//!
//! Core enablement and power management. Installed by the post-memory phase.

use crate::policy_domain;
use bitfield_struct::bitfield;
use config_block::{ConfigBlock, impl_block_field_for_bits};

/// Processor features the silicon code may enable.
///
/// A feature that is not fused in stays disabled regardless of this mask.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct CpuFeatures {
    /// Bit 0: VMX, Intel Virtualization Technology.
    pub vmx: bool,

    /// Bit 1: SMX, Safer Mode Extensions.
    pub smx: bool,

    /// Bit 2: AES-NI instructions.
    pub aes: bool,

    /// Bit 3: TXT, Trusted Execution Technology. Requires SMX.
    pub txt: bool,

    /// Bit 4: x2APIC mode.
    pub x2apic: bool,

    /// Bit 5: Protected Processor Inventory Number.
    pub ppin: bool,

    /// Bits 6-31: reserved.
    #[bits(26)]
    __: u32,
}

impl_block_field_for_bits!(CpuFeatures: u32);

/// Core enablement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ConfigBlock)]
#[config_block(guid = "5d8b6c2e-3a41-4f7d-b0e9-2c14a7f38d51", revision = 1)]
pub struct CpuConfig {
    pub hyper_threading: bool,
    /// Number of cores to enable; 0 enables all.
    pub active_core_count: u8,
    pub features: CpuFeatures,
    /// Physical address of the microcode patch to load, 0 for none.
    pub microcode_patch_address: u64,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            hyper_threading: true,
            active_core_count: 0,
            features: CpuFeatures::new()
                .with_vmx(true)
                .with_aes(true)
                .with_x2apic(true),
            microcode_patch_address: 0,
        }
    }
}

/// Turbo, P-states, C-states and package power limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ConfigBlock)]
#[config_block(guid = "a0f34d97-8e1c-4b52-96d3-7b2e5c0a1f84", revision = 1)]
pub struct CpuPowerMgmtConfig {
    pub turbo_mode: bool,
    /// Enhanced Intel SpeedStep.
    pub eist: bool,
    /// Deepest package C-state, 0 (C0/C1) to 10 (C10).
    pub package_c_state_limit: u8,
    /// PL1 in milliwatts, 0 keeps the fused value.
    pub power_limit1_mw: u32,
    /// PL2 in milliwatts, 0 keeps the fused value.
    pub power_limit2_mw: u32,
    /// PL1 time window in seconds.
    pub power_limit1_time_s: u8,
    /// Degrees below TjMax at which throttling starts.
    pub tcc_activation_offset: u8,
}

impl Default for CpuPowerMgmtConfig {
    fn default() -> Self {
        Self {
            turbo_mode: true,
            eist: true,
            package_c_state_limit: 10,
            power_limit1_mw: 0,
            power_limit2_mw: 0,
            power_limit1_time_s: 28,
            tcc_activation_offset: 0,
        }
    }
}

policy_domain! {
    /// CPU silicon policy.
    pub struct CpuPolicy {
        id: "e8c1d4a3-7f25-4b9e-8d60-3a5b2c1f9e47",
        name: "CPU",
        revision: 1,
        kinds: CpuBlock {
            Config => CpuConfig,
            PowerMgmt => CpuPowerMgmtConfig,
        },
    }
}
