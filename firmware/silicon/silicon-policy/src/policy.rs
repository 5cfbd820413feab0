use crate::domain::{BlockKind, DomainBlock, PolicyDomain};
use crate::error::PolicyError;
use alloc::vec::Vec;
use config_block::{BlockRef, BlockView, ConfigBlockTable, Guid};
use core::marker::PhantomData;

/// Lifecycle of one domain's policy within a boot phase.
///
/// `Uninitialized -> Building -> Updating -> Installed`; there is no way back
/// from `Installed`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PolicyState {
    Uninitialized,
    /// Defaults are being appended.
    Building,
    /// Defaults are complete; board and runtime updates may be applied.
    Updating,
    /// Published in the registry and sealed.
    Installed,
}

/// A domain's policy table while it is owned by its producer.
///
/// Obtained from [`PolicyBuilder::create_defaults`](crate::PolicyBuilder::create_defaults)
/// and consumed by [`PolicyRegistry::install`](crate::PolicyRegistry::install).
/// Holding a `Policy` is the only way to mutate the table, so nothing can
/// change it after it has been installed.
#[derive(Debug, Clone)]
pub struct Policy<D: PolicyDomain> {
    table: ConfigBlockTable,
    /// Indexed by [`BlockKind::index`].
    refs: Vec<BlockRef>,
    state: PolicyState,
    _domain: PhantomData<D>,
}

impl<D: PolicyDomain> Policy<D> {
    pub(crate) const fn building(table: ConfigBlockTable, refs: Vec<BlockRef>) -> Self {
        Self {
            table,
            refs,
            state: PolicyState::Building,
            _domain: PhantomData,
        }
    }

    pub(crate) const fn finish_defaults(&mut self) {
        self.state = PolicyState::Updating;
    }

    pub(crate) fn into_table(self) -> ConfigBlockTable {
        self.table
    }

    #[must_use]
    pub const fn state(&self) -> PolicyState {
        self.state
    }

    /// The table under construction.
    #[must_use]
    pub const fn table(&self) -> &ConfigBlockTable {
        &self.table
    }

    /// Looks up a block by its wire identifier. `None` means the domain does
    /// not carry that block.
    #[must_use]
    pub fn find_block(&self, guid: Guid) -> Option<BlockView<'_>> {
        self.table.block(self.table.find_block(guid)?)
    }

    /// Looks up a block by kind, without scanning the table.
    #[must_use]
    pub fn block(&self, kind: D::Kind) -> Option<BlockView<'_>> {
        self.table.block(*self.refs.get(kind.index())?)
    }

    /// Decodes a block of this domain.
    ///
    /// # Errors
    /// See [`ConfigBlockTable::get`].
    pub fn get<T: DomainBlock<D>>(&self) -> Result<T, PolicyError> {
        Ok(self.table.get::<T>()?)
    }

    /// Applies `mutator` to the payload of the block `guid`.
    ///
    /// The block header is out of reach of the mutator.
    ///
    /// # Errors
    /// [`TableError::NotFound`](config_block::TableError::NotFound) if the
    /// domain's defaults do not include the block.
    pub fn update_block<R>(&mut self, guid: Guid, mutator: impl FnOnce(&mut [u8]) -> R) -> Result<R, PolicyError> {
        Ok(self.table.update_block(guid, mutator)?)
    }

    /// Typed form of [`update_block`](Self::update_block), restricted to
    /// blocks of this domain.
    ///
    /// # Errors
    /// See [`ConfigBlockTable::update`].
    pub fn update<T: DomainBlock<D>, R>(&mut self, mutator: impl FnOnce(&mut T) -> R) -> Result<R, PolicyError> {
        Ok(self.table.update::<T, R>(mutator)?)
    }
}

/// Read-only access to an installed domain policy.
#[derive(Debug, Clone)]
pub struct PolicyView<'a, D: PolicyDomain> {
    table: &'a ConfigBlockTable,
    /// Indexed by [`BlockKind::index`]; `None` for kinds the table lacks.
    refs: Vec<Option<BlockRef>>,
    _domain: PhantomData<D>,
}

impl<'a, D: PolicyDomain> PolicyView<'a, D> {
    pub(crate) fn new(table: &'a ConfigBlockTable) -> Self {
        let refs = <D::Kind as BlockKind>::ALL
            .iter()
            .map(|kind| table.find_block(kind.guid()))
            .collect();
        Self {
            table,
            refs,
            _domain: PhantomData,
        }
    }

    #[must_use]
    pub const fn table(&self) -> &'a ConfigBlockTable {
        self.table
    }

    #[must_use]
    pub fn block(&self, kind: D::Kind) -> Option<BlockView<'a>> {
        self.table.block((*self.refs.get(kind.index())?)?)
    }

    /// Decodes a block of this domain.
    ///
    /// # Errors
    /// See [`ConfigBlockTable::get`].
    pub fn get<T: DomainBlock<D>>(&self) -> Result<T, PolicyError> {
        Ok(self.table.get::<T>()?)
    }
}
