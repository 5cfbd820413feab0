//! # Board Profiles
//!
//! What platform code knows about the board it runs on: straps, DIMM
//! population, fused CPU capabilities and on-board devices. Real firmware
//! reads these from GPIO straps, SPD and CPUID; here they are presets.

use core::fmt;
use core::str::FromStr;
use silicon_policy::{CpuFeatures, USB_OC_SKIP, USB_PORT_COUNT};

/// DIMM slots per board, two per channel.
pub const DIMM_SLOTS: usize = 4;

/// Known boards.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardId {
    /// QEMU q35 machine.
    QemuQ35,
    /// Desktop reference board: two channels, ECC-capable UDIMMs.
    DesktopRvp,
    /// Fanless embedded board: one soldered-down channel, eDP panel.
    EmbeddedSbc,
}

impl BoardId {
    pub const ALL: [Self; 3] = [Self::QemuQ35, Self::DesktopRvp, Self::EmbeddedSbc];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::QemuQ35 => "qemu-q35",
            Self::DesktopRvp => "desktop-rvp",
            Self::EmbeddedSbc => "embedded-sbc",
        }
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a board name is not known.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown board")]
pub struct UnknownBoard;

impl FromStr for BoardId {
    type Err = UnknownBoard;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.name() == s)
            .ok_or(UnknownBoard)
    }
}

/// A populated DIMM slot, as read from SPD.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Dimm {
    pub size_mb: u32,
    pub max_speed_mts: u16,
    pub ranks: u8,
    pub ecc: bool,
}

/// Board facts consumed by the policy updaters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardProfile {
    pub id: BoardId,
    /// Slot `n` sits on channel `n / 2`.
    pub dimms: [Option<Dimm>; DIMM_SLOTS],
    /// Features fused into the CPU.
    pub fused_features: CpuFeatures,
    pub core_count: u8,
    /// Package power limits the board's VRs and cooling are designed for.
    pub power_limit1_mw: u32,
    pub power_limit2_mw: u32,
    /// Ports wired to connectors, counted from port 0.
    pub usb_port_count: u8,
    /// Overcurrent pin per port, `USB_OC_SKIP` for none.
    pub usb_overcurrent: [u8; USB_PORT_COUNT],
    pub audio_codec_present: bool,
    pub edp_panel: bool,
    /// Location and size of the Video BIOS Table in flash.
    pub vbt: Option<(u64, u32)>,
    /// ACPI PM base strap, if the board moves it.
    pub acpi_base: Option<u16>,
}

impl BoardProfile {
    #[must_use]
    pub fn preset(id: BoardId) -> Self {
        match id {
            BoardId::QemuQ35 => Self {
                id,
                dimms: [
                    Some(Dimm {
                        size_mb: 2048,
                        max_speed_mts: 3200,
                        ranks: 1,
                        ecc: false,
                    }),
                    None,
                    None,
                    None,
                ],
                fused_features: CpuFeatures::new().with_vmx(true).with_aes(true).with_x2apic(true),
                core_count: 4,
                power_limit1_mw: 0,
                power_limit2_mw: 0,
                usb_port_count: 4,
                usb_overcurrent: [USB_OC_SKIP; USB_PORT_COUNT],
                audio_codec_present: false,
                edp_panel: false,
                vbt: None,
                acpi_base: Some(0x0600),
            },
            BoardId::DesktopRvp => {
                let udimm = Dimm {
                    size_mb: 16384,
                    max_speed_mts: 4800,
                    ranks: 2,
                    ecc: true,
                };
                let mut usb_overcurrent = [USB_OC_SKIP; USB_PORT_COUNT];
                for (port, pin) in usb_overcurrent.iter_mut().take(10).enumerate() {
                    *pin = u8::try_from(port / 2).unwrap_or(USB_OC_SKIP);
                }
                Self {
                    id,
                    dimms: [Some(udimm), Some(udimm), Some(udimm), None],
                    fused_features: CpuFeatures::new()
                        .with_vmx(true)
                        .with_smx(true)
                        .with_aes(true)
                        .with_txt(true)
                        .with_x2apic(true)
                        .with_ppin(true),
                    core_count: 16,
                    power_limit1_mw: 125_000,
                    power_limit2_mw: 253_000,
                    usb_port_count: 10,
                    usb_overcurrent,
                    audio_codec_present: true,
                    edp_panel: false,
                    vbt: Some((0xFFE8_0000, 0x2000)),
                    acpi_base: None,
                }
            }
            BoardId::EmbeddedSbc => Self {
                id,
                dimms: [
                    Some(Dimm {
                        size_mb: 8192,
                        max_speed_mts: 4267,
                        ranks: 1,
                        ecc: false,
                    }),
                    None,
                    None,
                    None,
                ],
                fused_features: CpuFeatures::new().with_vmx(true).with_aes(true),
                core_count: 4,
                power_limit1_mw: 15_000,
                power_limit2_mw: 28_000,
                usb_port_count: 3,
                usb_overcurrent: [USB_OC_SKIP; USB_PORT_COUNT],
                audio_codec_present: true,
                edp_panel: true,
                vbt: Some((0xFFE4_0000, 0x1800)),
                acpi_base: None,
            },
        }
    }

    /// Bit `n` set if channel `n` has at least one DIMM.
    #[must_use]
    pub fn populated_channels(&self) -> u8 {
        self.dimms
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_some())
            .fold(0, |mask, (slot, _)| mask | (1 << (slot / 2)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for board in BoardId::ALL {
            assert_eq!(board.name().parse(), Ok(board));
        }
        assert_eq!("pc-xt".parse::<BoardId>(), Err(UnknownBoard));
    }

    #[test]
    fn channel_population() {
        assert_eq!(BoardProfile::preset(BoardId::QemuQ35).populated_channels(), 0b01);
        assert_eq!(BoardProfile::preset(BoardId::DesktopRvp).populated_channels(), 0b11);
    }
}
