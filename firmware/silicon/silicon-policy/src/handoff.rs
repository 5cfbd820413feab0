//! Packing installed pre-memory policies into the cross-phase hand-off.

use crate::chipset::{ChipsetPolicy, PchGeneralConfig};
use crate::error::PolicyError;
use crate::memory::{MemoryConfig, MemoryPolicy, MemoryTimingConfig};
use crate::registry::PolicyRegistry;
use silicon_handoff::{
    BootMode, HandoffBlob, HandoffFields, MemoryHandoff, MemoryTimings, ResourceHandoff, encode_handoff,
};

/// Copies the enumerated hand-off fields out of the installed Memory and
/// Chipset policies.
///
/// Only facts the next phase cannot re-derive are copied; the tables
/// themselves stay behind.
///
/// # Errors
/// [`PolicyError::DomainNotFound`] if either domain is not installed, a
/// table error if a required block is missing, or
/// [`PolicyError::StolenMemoryAboveTolud`] if the requested stolen memory
/// is larger than the memory below TOLUD.
pub fn handoff_fields(registry: &PolicyRegistry, boot_mode: BootMode) -> Result<HandoffFields, PolicyError> {
    let memory = registry.locate_domain::<MemoryPolicy>()?;
    let chipset = registry.locate_domain::<ChipsetPolicy>()?;

    let config = memory.get::<MemoryConfig>()?;
    let timing = memory.get::<MemoryTimingConfig>()?;
    let pch = chipset.get::<PchGeneralConfig>()?;

    let igd_stolen_base = u32::try_from(u64::from(config.igd_stolen_size_mb) << 20)
        .ok()
        .and_then(|stolen| config.tolud.checked_sub(stolen))
        .ok_or(PolicyError::StolenMemoryAboveTolud(config.igd_stolen_size_mb, config.tolud))?;

    Ok(HandoffFields {
        boot_mode,
        memory: MemoryHandoff {
            total_size_mb: config.detected_size_mb,
            tolud: config.tolud,
            frequency_mts: timing.frequency_mts,
            ecc_enabled: config.ecc,
            channel_mask: config.channel_enable,
            timings: MemoryTimings {
                tcl: timing.tcl,
                trcd: timing.trcd,
                trp: timing.trp,
                tras: timing.tras,
                trfc: timing.trfc,
                trefi: timing.trefi,
                command_rate: timing.command_rate,
            },
        },
        resources: ResourceHandoff {
            acpi_base: pch.acpi_base,
            pcie_ecam_base: pch.pcie_ecam_base,
            pcie_ecam_length: pch.pcie_ecam_length,
            igd_stolen_base,
            igd_stolen_size_mb: config.igd_stolen_size_mb,
        },
    })
}

/// Packs the installed pre-memory policies into a hand-off blob.
///
/// # Errors
/// As [`handoff_fields`].
pub fn pack_handoff(registry: &PolicyRegistry, boot_mode: BootMode) -> Result<HandoffBlob, PolicyError> {
    Ok(encode_handoff(&handoff_fields(registry, boot_mode)?))
}
