//! # Board Policy Overrides
//!
//! The board-specific half of every policy: one mutator per domain that
//! applies board facts first and setup-variable overrides on top. Silicon
//! defaults survive wherever neither says otherwise.

use crate::board::BoardProfile;
use crate::error::PlatformError;
use crate::setup::SetupOptions;
use silicon_handoff::HandoffFields;
use silicon_policy::{
    ChipsetPolicy, CpuConfig, CpuFeatures, CpuPolicy, CpuPowerMgmtConfig, GraphicsConfig, GraphicsPolicy, HdAudioConfig,
    MemoryConfig, MemoryPolicy, PchGeneralConfig, Policy, UsbConfig, VbtConfig,
};

/// # Errors
/// Propagates policy update failures.
pub fn apply_memory(policy: &mut Policy<MemoryPolicy>, setup: &SetupOptions) -> Result<(), PlatformError> {
    policy.update::<MemoryConfig, _>(|m| {
        if let Some(limit) = setup.max_memory_frequency_mts {
            m.set_max_frequency_mts(limit);
        }
        if let Some(ecc) = setup.ecc {
            m.set_ecc(ecc);
        }
        if let Some(fast) = setup.memory_fast_boot {
            m.set_fast_boot(fast);
        }
        if let Some(stolen) = setup.igd_stolen_size_mb {
            m.set_igd_stolen_size_mb(stolen);
        }
    })?;
    Ok(())
}

/// # Errors
/// Propagates policy update failures.
pub fn apply_chipset(
    policy: &mut Policy<ChipsetPolicy>,
    board: &BoardProfile,
    setup: &SetupOptions,
) -> Result<(), PlatformError> {
    if let Some(base) = board.acpi_base {
        policy.update::<PchGeneralConfig, _>(|p| {
            p.set_acpi_base(base);
        })?;
    }

    let wired = if board.usb_port_count >= 16 {
        u16::MAX
    } else {
        (1u16 << board.usb_port_count) - 1
    };
    let disabled = setup.usb_port_disable_mask.unwrap_or(0);
    policy.update::<UsbConfig, _>(|u| {
        u.set_port_enable_mask(u.port_enable_mask & wired & !disabled)
            .set_overcurrent_pins(board.usb_overcurrent);
    })?;

    policy.update::<HdAudioConfig, _>(|a| {
        let enable = board.audio_codec_present && setup.hd_audio.unwrap_or(a.enable);
        a.set_enable(enable);
        a.set_dsp_enable(enable && setup.audio_dsp.unwrap_or(a.dsp_enable));
    })?;

    Ok(())
}

/// # Errors
/// Propagates policy update failures.
pub fn apply_cpu(
    policy: &mut Policy<CpuPolicy>,
    board: &BoardProfile,
    setup: &SetupOptions,
) -> Result<(), PlatformError> {
    policy.update::<CpuConfig, _>(|c| {
        let mut features = c.features;
        if let Some(vmx) = setup.vmx {
            features.set_vmx(vmx);
        }
        if let Some(txt) = setup.txt {
            features.set_txt(txt);
        }
        // TXT needs SMX; neither survives unless fused.
        features.set_txt(features.txt() && features.smx());
        let fused = board.fused_features.into_bits();
        c.set_features(CpuFeatures::from_bits(features.into_bits() & fused));

        if let Some(ht) = setup.hyper_threading {
            c.set_hyper_threading(ht);
        }
        if let Some(cores) = setup.active_cores {
            c.set_active_core_count(if cores >= board.core_count { 0 } else { cores });
        }
    })?;

    policy.update::<CpuPowerMgmtConfig, _>(|p| {
        if board.power_limit1_mw != 0 {
            p.set_power_limit1_mw(board.power_limit1_mw);
        }
        if board.power_limit2_mw != 0 {
            p.set_power_limit2_mw(board.power_limit2_mw);
        }
        if let Some(turbo) = setup.turbo {
            p.set_turbo_mode(turbo);
        }
        if let Some(limit) = setup.package_c_state_limit {
            p.set_package_c_state_limit(limit.min(10));
        }
        if let Some(offset) = setup.tcc_activation_offset {
            p.set_tcc_activation_offset(offset);
        }
    })?;

    Ok(())
}

/// Applies board and setup values plus the stolen-memory base assigned by
/// the pre-memory phase.
///
/// # Errors
/// Propagates policy update failures.
pub fn apply_graphics(
    policy: &mut Policy<GraphicsPolicy>,
    board: &BoardProfile,
    setup: &SetupOptions,
    handoff: &HandoffFields,
) -> Result<(), PlatformError> {
    policy.update::<GraphicsConfig, _>(|g| {
        let igd = setup.igd.unwrap_or(g.igd_enable) && handoff.resources.igd_stolen_size_mb != 0;
        g.set_igd_enable(igd)
            .set_stolen_memory_base(handoff.resources.igd_stolen_base)
            .set_panel_power_enable(igd && board.edp_panel);
        if let Some(display) = setup.primary_display {
            g.set_primary_display(display);
        }
        if let Some(aperture) = setup.aperture_size_mb {
            g.set_aperture_size_mb(aperture);
        }
    })?;

    if let Some((address, size)) = board.vbt {
        policy.update::<VbtConfig, _>(|v| {
            v.set_vbt_address(address).set_vbt_size(size);
        })?;
    }

    Ok(())
}
