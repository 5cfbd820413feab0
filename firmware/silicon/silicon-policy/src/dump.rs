//! Human-readable policy dumps.
//!
//! Nothing in this crate logs on its own; [`dump`] is called by platform code
//! that wants the installed policies in its debug output.

use crate::chipset::ChipsetPolicy;
use crate::cpu::CpuPolicy;
use crate::domain::{BlockKind, PolicyDomain};
use crate::graphics::GraphicsPolicy;
use crate::memory::MemoryPolicy;
use config_block::{BlockView, ConfigBlockTable, Guid};
use core::fmt;

/// Name of a known domain.
#[must_use]
pub fn domain_name(id: Guid) -> Option<&'static str> {
    fn name_of<D: PolicyDomain>(id: Guid) -> Option<&'static str> {
        (id == D::ID).then_some(D::NAME)
    }

    name_of::<CpuPolicy>(id)
        .or_else(|| name_of::<MemoryPolicy>(id))
        .or_else(|| name_of::<ChipsetPolicy>(id))
        .or_else(|| name_of::<GraphicsPolicy>(id))
}

/// Name of a known block type.
#[must_use]
pub fn block_name(guid: Guid) -> Option<&'static str> {
    fn name_of<D: PolicyDomain>(guid: Guid) -> Option<&'static str> {
        <D::Kind as BlockKind>::from_guid(guid).map(BlockKind::name)
    }

    name_of::<CpuPolicy>(guid)
        .or_else(|| name_of::<MemoryPolicy>(guid))
        .or_else(|| name_of::<ChipsetPolicy>(guid))
        .or_else(|| name_of::<GraphicsPolicy>(guid))
}

/// One-line summary of a table header.
pub struct TableSummary<'a>(pub &'a ConfigBlockTable);

impl fmt::Display for TableSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.0;
        write!(
            f,
            "{} policy {} rev {}: {} blocks, {} bytes ({} free, {} free slots){}",
            domain_name(t.id()).unwrap_or("unknown"),
            t.id(),
            t.revision(),
            t.block_count(),
            t.total_size(),
            t.available_size(),
            t.available_block_count(),
            if t.is_sealed() { ", sealed" } else { "" },
        )
    }
}

/// One-line summary of a block header.
pub struct BlockSummary<'a>(pub &'a BlockView<'a>);

impl fmt::Display for BlockSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.0;
        write!(
            f,
            "+{:#06x} {} {} rev {} size {}",
            b.offset(),
            block_name(b.guid()).unwrap_or("<unknown>"),
            b.guid(),
            b.revision(),
            b.size(),
        )
    }
}

/// Logs the table header and every block header at debug level.
pub fn dump(table: &ConfigBlockTable) {
    log::debug!("{}", TableSummary(table));
    for block in table.blocks() {
        log::debug!("  {}", BlockSummary(&block));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CpuBlock, CpuConfig, PolicyBuilder};
    use config_block::{ConfigBlock, TableCapacity};

    #[test]
    fn names_resolve_across_domains() {
        assert_eq!(domain_name(MemoryPolicy::ID), Some("Memory"));
        assert_eq!(block_name(CpuConfig::GUID), Some("CpuConfig"));
        assert_eq!(block_name(Guid::ZERO), None);
    }

    #[test]
    fn summaries_describe_headers() {
        let policy = PolicyBuilder::create_defaults::<CpuPolicy>().unwrap();
        let table = policy.table();

        let summary = TableSummary(table).to_string();
        assert!(summary.starts_with("CPU policy "));
        assert!(summary.contains(" 2 blocks"));
        assert!(!summary.ends_with("sealed"));

        let block = policy.block(CpuBlock::Config).unwrap();
        let line = BlockSummary(&block).to_string();
        assert!(line.starts_with("+0x0020 CpuConfig "));
        assert!(line.ends_with(&format!("rev 1 size {}", CpuConfig::BLOCK_SIZE)));

        dump(table);
    }

    #[test]
    fn unknown_tables_still_dump() {
        let table = ConfigBlockTable::create(Guid::ZERO, 3, TableCapacity::DEFAULT).unwrap();
        assert!(TableSummary(&table).to_string().starts_with("unknown policy"));
    }
}
