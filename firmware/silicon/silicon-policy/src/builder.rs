use crate::domain::{BlockKind, PolicyDomain};
use crate::error::PolicyError;
use crate::policy::Policy;
use alloc::vec::Vec;
use config_block::{ConfigBlockTable, TableError};

/// Builds the default policy of a domain from compiled-in values.
///
/// No hardware is probed, so building the same domain twice yields
/// byte-identical tables.
pub struct PolicyBuilder;

impl PolicyBuilder {
    /// Creates a table for `D` and appends every kind's default block.
    ///
    /// The returned policy is in [`PolicyState::Updating`](crate::PolicyState::Updating).
    /// Consumers must look blocks up by GUID or kind, never by position.
    ///
    /// # Errors
    /// [`TableError::OutOfMemory`] if the table cannot be allocated; no
    /// partially built policy is returned.
    pub fn create_defaults<D: PolicyDomain>() -> Result<Policy<D>, PolicyError> {
        let kinds = <D::Kind as BlockKind>::ALL;
        let mut table = ConfigBlockTable::create(D::ID, D::REVISION, D::CAPACITY)?;

        let mut refs = Vec::new();
        refs.try_reserve_exact(kinds.len())
            .map_err(|_| TableError::OutOfMemory)?;

        for kind in kinds {
            debug_assert_eq!(kind.index(), refs.len());
            refs.push(kind.add_default(&mut table)?);
        }

        let mut policy = Policy::building(table, refs);
        policy.finish_defaults();
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ChipsetBlock, ChipsetPolicy, CpuConfig, CpuPolicy, GraphicsPolicy, MemoryConfig, MemoryPolicy,
        PolicyState, UsbConfig,
    };
    use config_block::{ConfigBlock, ConfigBlockTableHeader};

    fn sum_of_blocks(table: &ConfigBlockTable) -> usize {
        table.blocks().map(|b| b.size() as usize).sum()
    }

    #[test]
    fn defaults_contain_every_kind() {
        let policy = PolicyBuilder::create_defaults::<ChipsetPolicy>().unwrap();
        let table = policy.table();

        assert_eq!(policy.state(), PolicyState::Updating);
        assert_eq!(table.id(), ChipsetPolicy::ID);
        assert_eq!(usize::from(table.block_count()), ChipsetBlock::ALL.len());
        for kind in ChipsetBlock::ALL {
            assert!(table.find_block(kind.guid()).is_some(), "{kind:?} missing");
            assert_eq!(policy.block(*kind).unwrap().guid(), kind.guid());
        }
    }

    #[test]
    fn defaults_fill_exact_capacity() {
        let policy = PolicyBuilder::create_defaults::<MemoryPolicy>().unwrap();
        let table = policy.table();

        assert_eq!(table.available_size(), 0);
        assert_eq!(table.available_block_count(), 0);
        assert_eq!(
            table.total_size() as usize,
            ConfigBlockTableHeader::SIZE + sum_of_blocks(table)
        );
    }

    #[test]
    fn defaults_are_deterministic() {
        fn image<D: PolicyDomain>() -> Vec<u8> {
            PolicyBuilder::create_defaults::<D>()
                .unwrap()
                .table()
                .as_bytes()
                .to_vec()
        }

        assert_eq!(image::<CpuPolicy>(), image::<CpuPolicy>());
        assert_eq!(image::<MemoryPolicy>(), image::<MemoryPolicy>());
        assert_eq!(image::<ChipsetPolicy>(), image::<ChipsetPolicy>());
        assert_eq!(image::<GraphicsPolicy>(), image::<GraphicsPolicy>());
    }

    #[test]
    fn defaults_carry_compiled_in_values() {
        let cpu = PolicyBuilder::create_defaults::<CpuPolicy>().unwrap();
        assert_eq!(cpu.get::<CpuConfig>().unwrap(), CpuConfig::default());

        let memory = PolicyBuilder::create_defaults::<MemoryPolicy>().unwrap();
        assert_eq!(memory.get::<MemoryConfig>().unwrap().igd_stolen_size_mb, 64);

        let chipset = PolicyBuilder::create_defaults::<ChipsetPolicy>().unwrap();
        let usb = chipset.block(ChipsetBlock::Usb).unwrap();
        assert_eq!(usb.size(), UsbConfig::BLOCK_SIZE);
        assert_eq!(usb.revision(), UsbConfig::REVISION);
    }
}
