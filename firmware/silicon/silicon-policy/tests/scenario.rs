//! A minimal two-block CPU-like domain walked through build, update, install.

use config_block::{ConfigBlock, ConfigBlockTableHeader, TableError};
use silicon_policy::{
    BlockKind, BootPhase, PolicyBuilder, PolicyDomain, PolicyError, PolicyRegistry, PolicyState, guid,
    policy_domain,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ConfigBlock)]
#[config_block(guid = "11111111-1111-1111-1111-111111111111", revision = 1)]
struct FeatureBlock {
    enable_feature_x: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ConfigBlock)]
#[config_block(guid = "22222222-2222-2222-2222-222222222222", revision = 1)]
struct CoreBlock {
    core_count: u8,
}

impl Default for CoreBlock {
    fn default() -> Self {
        Self { core_count: 4 }
    }
}

policy_domain! {
    struct DemoCpu {
        id: "c0c0c0c0-0000-4000-8000-000000000001",
        name: "CPU",
        revision: 1,
        kinds: DemoBlock {
            Feature => FeatureBlock,
            Core => CoreBlock,
        },
    }
}

#[test]
fn build_update_install() {
    let mut policy = PolicyBuilder::create_defaults::<DemoCpu>().unwrap();
    let table = policy.table();

    assert_eq!(table.block_count(), 2);
    assert_eq!(
        table.total_size(),
        ConfigBlockTableHeader::SIZE as u32 + FeatureBlock::BLOCK_SIZE + CoreBlock::BLOCK_SIZE
    );
    assert!(!policy.get::<FeatureBlock>().unwrap().enable_feature_x);
    assert_eq!(policy.get::<CoreBlock>().unwrap().core_count, 4);

    policy
        .update_block(FeatureBlock::GUID, |payload| payload[0] = 1)
        .unwrap();
    assert!(policy.get::<FeatureBlock>().unwrap().enable_feature_x);
    let view = policy.find_block(FeatureBlock::GUID).unwrap();
    assert_eq!(view.payload(), &[1]);

    let unknown = guid!("33333333-3333-3333-3333-333333333333");
    assert_eq!(
        policy.update_block(unknown, |_| ()),
        Err(PolicyError::Table(TableError::NotFound(unknown)))
    );

    let mut registry = PolicyRegistry::new(BootPhase::PostMemory);
    registry.install(policy.clone()).unwrap();
    assert_eq!(registry.state(DemoCpu::ID), PolicyState::Installed);
    assert_eq!(
        registry.install(policy),
        Err(PolicyError::AlreadyInstalled(DemoCpu::ID))
    );
}

#[test]
fn update_leaves_layout_alone() {
    let mut policy = PolicyBuilder::create_defaults::<DemoCpu>().unwrap();
    let before = policy.table().header();
    let headers: Vec<_> = policy.table().blocks().map(|b| *b.header()).collect();

    policy
        .update::<CoreBlock, _>(|c| {
            c.set_core_count(8);
        })
        .unwrap();

    assert_eq!(policy.table().header(), before);
    let after: Vec<_> = policy.table().blocks().map(|b| *b.header()).collect();
    assert_eq!(after, headers);
    assert_eq!(policy.get::<CoreBlock>().unwrap().core_count, 8);
}

#[test]
fn kinds_resolve_by_enum_and_guid() {
    let policy = PolicyBuilder::create_defaults::<DemoCpu>().unwrap();

    assert_eq!(DemoBlock::from_guid(CoreBlock::GUID), Some(DemoBlock::Core));
    assert_eq!(DemoBlock::Core.name(), "CoreBlock");
    assert_eq!(policy.block(DemoBlock::Core).unwrap().guid(), CoreBlock::GUID);
}

#[test]
fn lookups_do_not_disturb_the_table() {
    let policy = PolicyBuilder::create_defaults::<DemoCpu>().unwrap();
    let image = policy.table().as_bytes().to_vec();

    for _ in 0..4 {
        assert!(policy.find_block(CoreBlock::GUID).is_some());
        assert!(policy.find_block(guid!("44444444-4444-4444-4444-444444444444")).is_none());
    }
    assert_eq!(policy.table().as_bytes(), image.as_slice());
}

#[test]
fn installed_policy_is_read_only() {
    let mut registry = PolicyRegistry::new(BootPhase::PostMemory);
    registry
        .install(PolicyBuilder::create_defaults::<DemoCpu>().unwrap())
        .unwrap();

    let view = registry.locate_domain::<DemoCpu>().unwrap();
    assert!(view.table().is_sealed());
    assert_eq!(view.get::<CoreBlock>().unwrap().core_count, 4);
    assert_eq!(view.block(DemoBlock::Feature).unwrap().payload(), &[0]);

    let mut copy = view.table().clone();
    assert_eq!(copy.update_block(CoreBlock::GUID, |p| p[0] = 1), Err(TableError::Sealed));
    assert_eq!(
        copy.add_block(guid!("55555555-5555-5555-5555-555555555555"), 24, 1),
        Err(TableError::Sealed)
    );
}

#[test]
fn errors_map_to_firmware_status() {
    use uefi::Status;

    assert_eq!(Status::from(PolicyError::AlreadyInstalled(DemoCpu::ID)), Status::ALREADY_STARTED);
    assert_eq!(Status::from(PolicyError::DomainNotFound(DemoCpu::ID)), Status::NOT_FOUND);
    assert_eq!(Status::from(PolicyError::Table(TableError::OutOfMemory)), Status::OUT_OF_RESOURCES);
    assert_eq!(Status::from(PolicyError::Table(TableError::Sealed)), Status::WRITE_PROTECTED);
    assert_eq!(
        Status::from(PolicyError::Table(TableError::DuplicateGuid(CoreBlock::GUID))),
        Status::INVALID_PARAMETER
    );
}
