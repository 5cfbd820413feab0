use silicon_handoff::{BootMode, HANDOFF_SIZE, unpack_handoff};
use silicon_policy::{
    BootPhase, ChipsetPolicy, CpuPolicy, MemoryConfig, MemoryPolicy, MemoryTimingConfig, PchGeneralConfig,
    PolicyBuilder, PolicyDomain, PolicyError, PolicyRegistry, handoff_fields, pack_handoff,
};
use uefi::Status;

fn trained_registry() -> PolicyRegistry {
    let mut memory = PolicyBuilder::create_defaults::<MemoryPolicy>().unwrap();
    memory
        .update::<MemoryConfig, _>(|m| {
            m.set_detected_size_mb(8192).set_tolud(0x8000_0000).set_ecc(true);
        })
        .unwrap();
    memory
        .update::<MemoryTimingConfig, _>(|t| {
            *t = MemoryTimingConfig {
                frequency_mts: 3200,
                tcl: 22,
                trcd: 22,
                trp: 22,
                tras: 52,
                trfc: 560,
                trefi: 12480,
                command_rate: 1,
            };
        })
        .unwrap();

    let mut chipset = PolicyBuilder::create_defaults::<ChipsetPolicy>().unwrap();
    chipset
        .update::<PchGeneralConfig, _>(|p| {
            p.set_acpi_base(0x0400);
        })
        .unwrap();

    let mut registry = PolicyRegistry::new(BootPhase::PreMemory);
    registry.install(memory).unwrap();
    registry.install(chipset).unwrap();
    registry
}

#[test]
fn pack_copies_enumerated_fields() {
    let registry = trained_registry();
    let blob = pack_handoff(&registry, BootMode::FullConfiguration).unwrap();
    assert_eq!(blob.as_bytes().len(), HANDOFF_SIZE);

    let fields = unpack_handoff(blob.as_bytes()).unwrap();
    assert_eq!(fields, handoff_fields(&registry, BootMode::FullConfiguration).unwrap());

    assert_eq!(fields.memory.total_size_mb, 8192);
    assert_eq!(fields.memory.frequency_mts, 3200);
    assert!(fields.memory.ecc_enabled);
    assert_eq!(fields.memory.channel_mask, 0b11);
    assert_eq!(fields.memory.timings.trfc, 560);
    assert_eq!(fields.resources.acpi_base, 0x0400);
    assert_eq!(fields.resources.igd_stolen_size_mb, 64);
    assert_eq!(fields.resources.igd_stolen_base, 0x8000_0000 - (64 << 20));
}

#[test]
fn packing_is_deterministic() {
    let a = pack_handoff(&trained_registry(), BootMode::S3Resume).unwrap();
    let b = pack_handoff(&trained_registry(), BootMode::S3Resume).unwrap();
    assert_eq!(a, b);
}

#[test]
fn pack_requires_pre_memory_domains() {
    let mut registry = PolicyRegistry::new(BootPhase::PreMemory);
    registry
        .install(PolicyBuilder::create_defaults::<MemoryPolicy>().unwrap())
        .unwrap();

    assert_eq!(
        pack_handoff(&registry, BootMode::FullConfiguration).err(),
        Some(PolicyError::DomainNotFound(ChipsetPolicy::ID))
    );

    let mut post_memory = PolicyRegistry::new(BootPhase::PostMemory);
    post_memory
        .install(PolicyBuilder::create_defaults::<CpuPolicy>().unwrap())
        .unwrap();
    assert_eq!(
        pack_handoff(&post_memory, BootMode::FullConfiguration).err(),
        Some(PolicyError::DomainNotFound(MemoryPolicy::ID))
    );
}

fn registry_with_stolen(tolud: u32, stolen_mb: u16) -> PolicyRegistry {
    let mut memory = PolicyBuilder::create_defaults::<MemoryPolicy>().unwrap();
    memory
        .update::<MemoryConfig, _>(|m| {
            m.set_tolud(tolud).set_igd_stolen_size_mb(stolen_mb);
        })
        .unwrap();
    let mut registry = PolicyRegistry::new(BootPhase::PreMemory);
    registry.install(memory).unwrap();
    registry
        .install(PolicyBuilder::create_defaults::<ChipsetPolicy>().unwrap())
        .unwrap();
    registry
}

#[test]
fn stolen_memory_must_fit_below_tolud() {
    let registry = registry_with_stolen(0x0800_0000, 256);

    let err = pack_handoff(&registry, BootMode::FullConfiguration).unwrap_err();
    assert_eq!(err, PolicyError::StolenMemoryAboveTolud(256, 0x0800_0000));
    assert_eq!(Status::from(err), Status::INVALID_PARAMETER);

    // 64 GiB does not fit in 32 bits, so it must not saturate to a base of 0.
    assert_eq!(
        handoff_fields(&registry_with_stolen(u32::MAX, u16::MAX), BootMode::FullConfiguration).err(),
        Some(PolicyError::StolenMemoryAboveTolud(u16::MAX, u32::MAX))
    );
}

#[test]
fn stolen_memory_may_fill_all_of_tolud() {
    let registry = registry_with_stolen(0x1000_0000, 256);
    let fields = handoff_fields(&registry, BootMode::FullConfiguration).unwrap();
    assert_eq!(fields.resources.igd_stolen_base, 0);
}
