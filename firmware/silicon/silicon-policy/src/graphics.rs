//! # Graphics Policy
//!
//! Integrated graphics (IGD). Installed by the post-memory phase once the
//! stolen-memory base is known from the hand-off.

use crate::policy_domain;
use config_block::{BlockField, ConfigBlock};

/// Which display controller is initialized first.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum PrimaryDisplay {
    #[default]
    Auto,
    Igd,
    Peg,
    Pci,
    /// A value this build does not know, kept so it is written back as is.
    Reserved(u8),
}

impl PrimaryDisplay {
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Auto,
            1 => Self::Igd,
            2 => Self::Peg,
            3 => Self::Pci,
            other => Self::Reserved(other),
        }
    }

    #[must_use]
    pub const fn into_raw(self) -> u8 {
        match self {
            Self::Auto => 0,
            Self::Igd => 1,
            Self::Peg => 2,
            Self::Pci => 3,
            Self::Reserved(raw) => raw,
        }
    }
}

/// Stored as one byte.
impl BlockField for PrimaryDisplay {
    const SIZE: usize = 1;

    fn write_le(&self, out: &mut [u8]) {
        out[0] = self.into_raw();
    }

    fn read_le(bytes: &[u8]) -> Self {
        Self::from_raw(bytes[0])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ConfigBlock)]
#[config_block(guid = "3e9f2a74-8c1d-4d06-b5e3-0a7c4f9b2d18", revision = 1)]
pub struct GraphicsConfig {
    pub igd_enable: bool,
    pub primary_display: PrimaryDisplay,
    pub gtt_size_mb: u8,
    pub aperture_size_mb: u16,
    /// Base of the IGD stolen memory; from the hand-off.
    pub stolen_memory_base: u32,
    pub gtt_mmio_base: u64,
    /// Graphics memory (aperture) base.
    pub gm_base: u64,
    pub panel_power_enable: bool,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            igd_enable: true,
            primary_display: PrimaryDisplay::Auto,
            gtt_size_mb: 8,
            aperture_size_mb: 256,
            stolen_memory_base: 0,
            gtt_mmio_base: 0xAF00_0000,
            gm_base: 0xB000_0000,
            panel_power_enable: true,
        }
    }
}

/// Video BIOS Table location. Pointer-valued, so it differs between
/// environments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ConfigBlock)]
#[config_block(guid = "d1b56c08-2f3e-47a9-8c41-e7a05b3d9f62", revision = 1)]
pub struct VbtConfig {
    pub vbt_address: u64,
    pub vbt_size: u32,
}

policy_domain! {
    /// Integrated graphics silicon policy.
    pub struct GraphicsPolicy {
        id: "47c2e9b1-0a5d-4f38-9e17-b6d3a8c0f524",
        name: "Graphics",
        revision: 1,
        kinds: GraphicsBlock {
            Config => GraphicsConfig,
            Vbt => VbtConfig,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PolicyBuilder;

    #[test]
    fn unknown_primary_display_survives_typed_update() {
        let mut policy = PolicyBuilder::create_defaults::<GraphicsPolicy>().unwrap();
        policy.update_block(GraphicsConfig::GUID, |p| p[1] = 7).unwrap();

        let gfx = policy.get::<GraphicsConfig>().unwrap();
        assert_eq!(gfx.primary_display, PrimaryDisplay::Reserved(7));

        policy
            .update::<GraphicsConfig, _>(|g| {
                g.set_aperture_size_mb(512);
            })
            .unwrap();
        let table = policy.table();
        let block = table.block(table.find_block(GraphicsConfig::GUID).unwrap()).unwrap();
        assert_eq!(block.payload()[1], 7);
        assert_eq!(policy.get::<GraphicsConfig>().unwrap().aperture_size_mb, 512);
    }

    #[test]
    fn known_displays_keep_their_encoding() {
        for (display, raw) in [
            (PrimaryDisplay::Auto, 0),
            (PrimaryDisplay::Igd, 1),
            (PrimaryDisplay::Peg, 2),
            (PrimaryDisplay::Pci, 3),
        ] {
            assert_eq!(display.into_raw(), raw);
            assert_eq!(PrimaryDisplay::from_raw(raw), display);
        }
    }
}
