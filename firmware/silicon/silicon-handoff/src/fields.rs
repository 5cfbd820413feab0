//! The enumerated facts carried across the hand-off.
//!
//! Only values the consuming phase cannot re-derive belong here: results of
//! memory training and resource assignments made while building the
//! pre-memory policies.

use crate::HandoffError;
use config_block::BlockField;

/// How the platform is booting; decides how much the next phase may skip.
#[repr(u8)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum BootMode {
    #[default]
    FullConfiguration = 0,
    /// Memory configuration matched the saved one; training was skipped.
    FastBoot = 1,
    S3Resume = 2,
    Recovery = 3,
}

impl TryFrom<u8> for BootMode {
    type Error = HandoffError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::FullConfiguration),
            1 => Ok(Self::FastBoot),
            2 => Ok(Self::S3Resume),
            3 => Ok(Self::Recovery),
            _ => Err(HandoffError::InvalidField("boot mode")),
        }
    }
}

/// Trained DRAM timings, in memory clocks unless noted.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct MemoryTimings {
    pub tcl: u8,
    pub trcd: u8,
    pub trp: u8,
    pub tras: u8,
    pub trfc: u16,
    pub trefi: u16,
    /// 1N or 2N.
    pub command_rate: u8,
}

/// Memory facts known only after training.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct MemoryHandoff {
    pub total_size_mb: u32,
    /// Top of low usable DRAM, in bytes.
    pub tolud: u32,
    pub frequency_mts: u16,
    pub ecc_enabled: bool,
    /// Bit `n` set if channel `n` is populated and trained.
    pub channel_mask: u8,
    pub timings: MemoryTimings,
}

/// Resource assignments made by the pre-memory phase.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ResourceHandoff {
    pub acpi_base: u16,
    pub pcie_ecam_base: u64,
    pub pcie_ecam_length: u32,
    pub igd_stolen_base: u32,
    pub igd_stolen_size_mb: u16,
}

/// Everything the blob carries after its header.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct HandoffFields {
    pub boot_mode: BootMode,
    pub memory: MemoryHandoff,
    pub resources: ResourceHandoff,
}

impl HandoffFields {
    /// Encoded size in bytes.
    pub const SIZE: usize = 1 + MemoryHandoff::SIZE + ResourceHandoff::SIZE;

    pub(crate) fn write_to(&self, out: &mut [u8]) {
        let mut w = Writer { out, pos: 0 };
        w.put(&(self.boot_mode as u8));

        let m = &self.memory;
        w.put(&m.total_size_mb);
        w.put(&m.tolud);
        w.put(&m.frequency_mts);
        w.put(&m.ecc_enabled);
        w.put(&m.channel_mask);

        let t = &m.timings;
        w.put(&t.tcl);
        w.put(&t.trcd);
        w.put(&t.trp);
        w.put(&t.tras);
        w.put(&t.trfc);
        w.put(&t.trefi);
        w.put(&t.command_rate);

        let r = &self.resources;
        w.put(&r.acpi_base);
        w.put(&r.pcie_ecam_base);
        w.put(&r.pcie_ecam_length);
        w.put(&r.igd_stolen_base);
        w.put(&r.igd_stolen_size_mb);

        debug_assert_eq!(w.pos, Self::SIZE);
    }

    /// Decodes and validates the field area; `bytes` is at least [`SIZE`](Self::SIZE) long.
    pub(crate) fn read_from(bytes: &[u8]) -> Result<Self, HandoffError> {
        let mut r = Reader { bytes, pos: 0 };
        let boot_mode = BootMode::try_from(r.take::<u8>())?;

        let total_size_mb = r.take();
        let tolud = r.take();
        let frequency_mts = r.take();
        let ecc_enabled = match r.take::<u8>() {
            0 => false,
            1 => true,
            _ => return Err(HandoffError::InvalidField("ECC flag")),
        };
        let channel_mask = r.take();

        let timings = MemoryTimings {
            tcl: r.take(),
            trcd: r.take(),
            trp: r.take(),
            tras: r.take(),
            trfc: r.take(),
            trefi: r.take(),
            command_rate: r.take(),
        };

        let resources = ResourceHandoff {
            acpi_base: r.take(),
            pcie_ecam_base: r.take(),
            pcie_ecam_length: r.take(),
            igd_stolen_base: r.take(),
            igd_stolen_size_mb: r.take(),
        };

        if total_size_mb == 0 || channel_mask == 0 {
            return Err(HandoffError::InvalidField("no trained memory"));
        }
        if !matches!(timings.command_rate, 1 | 2) {
            return Err(HandoffError::InvalidField("command rate"));
        }

        Ok(Self {
            boot_mode,
            memory: MemoryHandoff {
                total_size_mb,
                tolud,
                frequency_mts,
                ecc_enabled,
                channel_mask,
                timings,
            },
            resources,
        })
    }
}

impl MemoryHandoff {
    const SIZE: usize = 4 + 4 + 2 + 1 + 1 + MemoryTimings::SIZE;
}

impl MemoryTimings {
    const SIZE: usize = 4 + 2 + 2 + 1;
}

impl ResourceHandoff {
    const SIZE: usize = 2 + 8 + 4 + 4 + 2;
}

struct Writer<'a> {
    out: &'a mut [u8],
    pos: usize,
}

impl Writer<'_> {
    fn put<T: BlockField>(&mut self, value: &T) {
        let end = self.pos + T::SIZE;
        value.write_le(&mut self.out[self.pos..end]);
        self.pos = end;
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take<T: BlockField>(&mut self) -> T {
        let end = self.pos + T::SIZE;
        let value = T::read_le(&self.bytes[self.pos..end]);
        self.pos = end;
        value
    }
}
