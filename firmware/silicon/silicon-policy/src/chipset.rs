//! # Chipset Policy
//!
//! Platform controller hub configuration. Built and installed by the
//! pre-memory phase, since it assigns the resources later phases depend on.

use crate::policy_domain;
use config_block::ConfigBlock;

/// Number of USB ports the controller exposes.
pub const USB_PORT_COUNT: usize = 16;

/// Marks a USB port without an overcurrent pin.
pub const USB_OC_SKIP: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ConfigBlock)]
#[config_block(guid = "f2c85b19-6a3d-4e07-9b4c-5d1e8a7f2c60", revision = 1)]
pub struct PchGeneralConfig {
    /// ACPI PM I/O base.
    pub acpi_base: u16,
    pub pcie_ecam_base: u64,
    pub pcie_ecam_length: u32,
    /// Compatible revision ID.
    pub crid: bool,
    pub legacy_io_low_latency: bool,
}

impl Default for PchGeneralConfig {
    fn default() -> Self {
        Self {
            acpi_base: 0x1800,
            pcie_ecam_base: 0xC000_0000,
            pcie_ecam_length: 0x1000_0000,
            crid: false,
            legacy_io_low_latency: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ConfigBlock)]
#[config_block(guid = "0d4a6e3f-c1b7-4592-8f2e-a63b90d5c714", revision = 1)]
pub struct UsbConfig {
    /// Bit `n` enables port `n`.
    pub port_enable_mask: u16,
    /// Overcurrent pin per port, [`USB_OC_SKIP`] for none.
    pub overcurrent_pins: [u8; USB_PORT_COUNT],
    pub xhci_compliance_mode: bool,
}

impl Default for UsbConfig {
    fn default() -> Self {
        Self {
            port_enable_mask: 0xFFFF,
            overcurrent_pins: [USB_OC_SKIP; USB_PORT_COUNT],
            xhci_compliance_mode: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ConfigBlock)]
#[config_block(guid = "b83e1f25-7d09-4c6a-a2e1-94f6c0b3d857", revision = 1)]
pub struct HdAudioConfig {
    pub enable: bool,
    pub codec_sx_wake: bool,
    pub dsp_enable: bool,
}

impl Default for HdAudioConfig {
    fn default() -> Self {
        Self {
            enable: true,
            codec_sx_wake: false,
            dsp_enable: true,
        }
    }
}

policy_domain! {
    /// Chipset (PCH) silicon policy.
    pub struct ChipsetPolicy {
        id: "6a0e3c85-d2f4-4179-b3a8-c5e91f07d2b6",
        name: "Chipset",
        revision: 1,
        kinds: ChipsetBlock {
            General => PchGeneralConfig,
            Usb => UsbConfig,
            HdAudio => HdAudioConfig,
        },
    }
}
