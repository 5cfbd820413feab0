//! # Boot Phases
//!
//! Drives policy creation for each phase: build defaults, let the board
//! correct them, install, consume, hand off. The pre-memory registry dies at
//! the end of its phase; only the hand-off blob crosses over.

use crate::board::BoardProfile;
use crate::error::PlatformError;
use crate::memory_init::{apply_training, train};
use crate::overrides::{apply_chipset, apply_cpu, apply_graphics, apply_memory};
use crate::setup::SetupOptions;
use crate::transport::HandoffList;
use log::{debug, error, info, warn};
use silicon_handoff::{BootMode, HANDOFF_GUID, HandoffBlob, HandoffFields, require_handoff};
use silicon_policy::{
    BootPhase, ChipsetPolicy, CpuPolicy, GraphicsPolicy, MemoryConfig, MemoryPolicy, PolicyBuilder, PolicyRegistry, dump,
    pack_handoff,
};

/// The phase that runs before DRAM is available.
#[derive(Debug, Clone, Copy)]
pub struct PreMemoryPhase<'a> {
    board: &'a BoardProfile,
    setup: &'a SetupOptions,
    boot_mode: BootMode,
}

impl<'a> PreMemoryPhase<'a> {
    #[must_use]
    pub const fn new(board: &'a BoardProfile, setup: &'a SetupOptions, boot_mode: BootMode) -> Self {
        Self {
            board,
            setup,
            boot_mode,
        }
    }

    /// Builds, corrects and installs the Memory and Chipset policies, training
    /// memory in between so the results land in the installed tables.
    ///
    /// # Errors
    /// Any policy error, or [`PlatformError::MemoryInit`] if training fails.
    pub fn build_policies(&self) -> Result<PolicyRegistry, PlatformError> {
        let mut registry = PolicyRegistry::new(BootPhase::PreMemory);
        info!("{} phase on {} ({:?})", BootPhase::PreMemory.name(), self.board.id, self.boot_mode);

        let mut memory = PolicyBuilder::create_defaults::<MemoryPolicy>()?;
        apply_memory(&mut memory, self.setup)?;
        let ecc_requested = memory.get::<MemoryConfig>()?.ecc;
        let training = train(self.board, &memory, self.boot_mode).inspect_err(|e| error!("{e}"))?;
        apply_training(&mut memory, &training)?;
        if ecc_requested && !training.ecc {
            warn!("ECC requested but not every DIMM supports it; running without");
        }
        info!(
            "memory: {} MiB at {} MT/s, TOLUD {:#x}{}",
            training.size_mb,
            training.frequency_mts,
            training.tolud,
            if training.fast_path { ", fast path" } else { "" }
        );

        let mut chipset = PolicyBuilder::create_defaults::<ChipsetPolicy>()?;
        apply_chipset(&mut chipset, self.board, self.setup)?;

        dump(memory.table());
        dump(chipset.table());
        registry.install(memory)?;
        registry.install(chipset)?;
        Ok(registry)
    }

    /// Runs the whole phase and publishes the hand-off.
    ///
    /// # Errors
    /// As [`build_policies`](Self::build_policies), or if the hand-off cannot
    /// be published.
    pub fn run(&self, handoffs: &mut HandoffList) -> Result<HandoffBlob, PlatformError> {
        let registry = self.build_policies()?;
        let blob = pack_handoff(&registry, self.boot_mode)?;
        handoffs.publish(HANDOFF_GUID, blob.as_bytes())?;
        debug!("hand-off published, {} bytes", blob.as_bytes().len());

        let phase = registry.end_phase();
        info!("{} phase done", phase.name());
        Ok(blob)
    }
}

/// The phase that runs from DRAM.
#[derive(Debug, Clone, Copy)]
pub struct PostMemoryPhase<'a> {
    board: &'a BoardProfile,
    setup: &'a SetupOptions,
}

impl<'a> PostMemoryPhase<'a> {
    #[must_use]
    pub const fn new(board: &'a BoardProfile, setup: &'a SetupOptions) -> Self {
        Self { board, setup }
    }

    /// Recovers the pre-memory facts, then builds and installs the CPU and
    /// Graphics policies. The returned registry serves the rest of the phase.
    ///
    /// # Errors
    /// [`PlatformError::Handoff`] if the hand-off is missing or corrupt. Boot
    /// cannot continue without it.
    pub fn run(&self, handoffs: &HandoffList) -> Result<PolicyRegistry, PlatformError> {
        let fields = Self::recover(handoffs)?;
        info!(
            "{} phase on {} ({:?}), {} MiB",
            BootPhase::PostMemory.name(),
            self.board.id,
            fields.boot_mode,
            fields.memory.total_size_mb
        );

        let mut registry = PolicyRegistry::new(BootPhase::PostMemory);

        let mut cpu = PolicyBuilder::create_defaults::<CpuPolicy>()?;
        apply_cpu(&mut cpu, self.board, self.setup)?;

        let mut graphics = PolicyBuilder::create_defaults::<GraphicsPolicy>()?;
        apply_graphics(&mut graphics, self.board, self.setup, &fields)?;

        dump(cpu.table());
        dump(graphics.table());
        registry.install(cpu)?;
        registry.install(graphics)?;
        Ok(registry)
    }

    fn recover(handoffs: &HandoffList) -> Result<HandoffFields, PlatformError> {
        let fields = require_handoff(handoffs.find(HANDOFF_GUID)).inspect_err(|e| error!("{e}"))?;
        Ok(fields)
    }
}
