//! # Memory Initialization
//!
//! A deterministic model of DRAM training: it derives the data rate, timings,
//! size and TOLUD from the board's DIMM population and the memory policy, the
//! way the memory reference code would, and writes the results back into the
//! policy so they can be handed off.

use crate::board::BoardProfile;
use crate::error::PlatformError;
use silicon_handoff::{BootMode, MemoryTimings};
use silicon_policy::{MemoryConfig, MemoryPolicy, MemoryTimingConfig, Policy};

/// Start of the low MMIO hole; TOLUD never exceeds it.
pub const LOW_MMIO_BASE: u32 = 0x8000_0000;

// JEDEC-style minimum timings, in picoseconds.
const T_CL_PS: u64 = 13_750;
const T_RCD_PS: u64 = 13_750;
const T_RP_PS: u64 = 13_750;
const T_RAS_PS: u64 = 32_000;
const T_RFC_PS: u64 = 350_000;
const T_REFI_PS: u64 = 7_800_000;

/// Outcome of training.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TrainingResult {
    pub size_mb: u32,
    pub tolud: u32,
    pub channel_mask: u8,
    pub ecc: bool,
    pub frequency_mts: u16,
    pub timings: MemoryTimings,
    /// Training was skipped because fast boot was allowed.
    pub fast_path: bool,
}

/// Trains the DIMMs on enabled channels.
///
/// Non-zero timings in the policy are taken as overrides of the computed
/// ones.
///
/// # Errors
/// [`PlatformError::MemoryInit`] if no DIMM sits on an enabled channel.
pub fn train(
    board: &BoardProfile,
    policy: &Policy<MemoryPolicy>,
    boot_mode: BootMode,
) -> Result<TrainingResult, PlatformError> {
    let config = policy.get::<MemoryConfig>()?;
    let requested = policy.get::<MemoryTimingConfig>()?;

    let dimms = || {
        board
            .dimms
            .iter()
            .enumerate()
            .filter(move |(slot, _)| config.channel_enable & (1 << (slot / 2)) != 0)
            .filter_map(|(_, d)| d.as_ref())
    };

    let channel_mask = board.populated_channels() & config.channel_enable;
    if channel_mask == 0 {
        return Err(PlatformError::MemoryInit("no DIMMs on enabled channels"));
    }

    let size_mb = dimms().fold(0u32, |sum, d| sum.saturating_add(d.size_mb));
    let tolud = u32::try_from((u64::from(size_mb) << 20).min(u64::from(LOW_MMIO_BASE)))
        .unwrap_or(LOW_MMIO_BASE);

    let mut frequency_mts = dimms().map(|d| d.max_speed_mts).min().unwrap_or(0);
    if config.max_frequency_mts != 0 {
        frequency_mts = frequency_mts.min(config.max_frequency_mts);
    }

    let ecc = config.ecc && dimms().all(|d| d.ecc);
    let dense = dimms().any(|d| d.ranks > 1) || dimms().count() > channel_mask.count_ones() as usize;

    let clock_mhz = u64::from(frequency_mts / 2);
    let timings = MemoryTimings {
        tcl: pick(requested.tcl, cycles(T_CL_PS, clock_mhz)),
        trcd: pick(requested.trcd, cycles(T_RCD_PS, clock_mhz)),
        trp: pick(requested.trp, cycles(T_RP_PS, clock_mhz)),
        tras: pick(requested.tras, cycles(T_RAS_PS, clock_mhz)),
        trfc: pick(requested.trfc, cycles(T_RFC_PS, clock_mhz)),
        trefi: pick(requested.trefi, cycles(T_REFI_PS, clock_mhz)),
        command_rate: pick(requested.command_rate, if dense { 2 } else { 1 }),
    };

    Ok(TrainingResult {
        size_mb,
        tolud,
        channel_mask,
        ecc,
        frequency_mts,
        timings,
        fast_path: config.fast_boot && matches!(boot_mode, BootMode::FastBoot | BootMode::S3Resume),
    })
}

/// Writes the training result into the memory policy.
///
/// # Errors
/// Propagates policy update failures.
pub fn apply_training(policy: &mut Policy<MemoryPolicy>, result: &TrainingResult) -> Result<(), PlatformError> {
    policy.update::<MemoryConfig, _>(|c| {
        c.set_detected_size_mb(result.size_mb)
            .set_tolud(result.tolud)
            .set_ecc(result.ecc)
            .set_channel_enable(result.channel_mask);
    })?;

    let t = result.timings;
    policy.update::<MemoryTimingConfig, _>(|c| {
        *c = MemoryTimingConfig {
            frequency_mts: result.frequency_mts,
            tcl: t.tcl,
            trcd: t.trcd,
            trp: t.trp,
            tras: t.tras,
            trfc: t.trfc,
            trefi: t.trefi,
            command_rate: t.command_rate,
        };
    })?;

    Ok(())
}

/// Clock cycles covering `ps` picoseconds at `clock_mhz`, saturating.
fn cycles<T: TryFrom<u64> + Bounded>(ps: u64, clock_mhz: u64) -> T {
    let n = (ps * clock_mhz).div_ceil(1_000_000);
    T::try_from(n).unwrap_or(T::MAX)
}

fn pick<T: PartialEq + Default + Copy>(requested: T, computed: T) -> T {
    if requested == T::default() { computed } else { requested }
}

trait Bounded {
    const MAX: Self;
}

impl Bounded for u8 {
    const MAX: Self = Self::MAX;
}

impl Bounded for u16 {
    const MAX: Self = Self::MAX;
}
