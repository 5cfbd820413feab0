//! # Policy Registry
//!
//! The per-phase set of installed policies. A registry is created empty when a
//! boot phase starts, filled only through [`PolicyRegistry::install`], read by
//! every later consumer of the phase, and dropped by
//! [`PolicyRegistry::end_phase`]. Anything the next phase needs leaves through
//! the hand-off, never through the registry.

use crate::domain::PolicyDomain;
use crate::error::PolicyError;
use crate::policy::{Policy, PolicyState, PolicyView};
use alloc::vec::Vec;
use config_block::{ConfigBlockTable, Guid, TableError};

/// Boot phases that own a policy registry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BootPhase {
    /// Runs from cache before DRAM is trained.
    PreMemory,
    /// Runs from DRAM after memory initialization.
    PostMemory,
}

impl BootPhase {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PreMemory => "pre-memory",
            Self::PostMemory => "post-memory",
        }
    }
}

/// Installed, sealed policy tables of one boot phase, keyed by domain id.
#[derive(Debug)]
pub struct PolicyRegistry {
    phase: BootPhase,
    tables: Vec<ConfigBlockTable>,
}

impl PolicyRegistry {
    #[must_use]
    pub const fn new(phase: BootPhase) -> Self {
        Self {
            phase,
            tables: Vec::new(),
        }
    }

    #[must_use]
    pub const fn phase(&self) -> BootPhase {
        self.phase
    }

    /// Publishes a finished domain policy. The table is sealed and ownership
    /// moves into the registry.
    ///
    /// # Errors
    /// - [`PolicyError::AlreadyInstalled`] if the domain already has a policy
    ///   in this phase.
    /// - [`TableError::OutOfMemory`] if the registry cannot grow.
    pub fn install<D: PolicyDomain>(&mut self, policy: Policy<D>) -> Result<(), PolicyError> {
        self.install_table(policy.into_table())
    }

    /// Publishes a table that was not built through a [`Policy`], e.g. one
    /// parsed from an image. The table's id names its domain.
    ///
    /// # Errors
    /// As [`install`](Self::install).
    pub fn install_table(&mut self, mut table: ConfigBlockTable) -> Result<(), PolicyError> {
        let id = table.id();
        if self.position(id).is_some() {
            return Err(PolicyError::AlreadyInstalled(id));
        }

        self.tables
            .try_reserve(1)
            .map_err(|_| TableError::OutOfMemory)?;
        table.seal();
        self.tables.push(table);
        Ok(())
    }

    /// Read-only retrieval by domain id.
    ///
    /// # Errors
    /// [`PolicyError::DomainNotFound`] if nothing was installed under `id`;
    /// the consumer ran before its producer.
    pub fn locate(&self, id: Guid) -> Result<&ConfigBlockTable, PolicyError> {
        self.position(id)
            .map(|i| &self.tables[i])
            .ok_or(PolicyError::DomainNotFound(id))
    }

    /// Typed form of [`locate`](Self::locate).
    ///
    /// # Errors
    /// As [`locate`](Self::locate).
    pub fn locate_domain<D: PolicyDomain>(&self) -> Result<PolicyView<'_, D>, PolicyError> {
        self.locate(D::ID).map(PolicyView::new)
    }

    /// Lifecycle state of a domain as far as this registry knows: either
    /// installed or not yet.
    #[must_use]
    pub fn state(&self, id: Guid) -> PolicyState {
        if self.position(id).is_some() {
            PolicyState::Installed
        } else {
            PolicyState::Uninitialized
        }
    }

    /// Installed tables, in installation order.
    pub fn installed(&self) -> impl ExactSizeIterator<Item = &ConfigBlockTable> {
        self.tables.iter()
    }

    /// Tears the registry down at the end of its phase.
    pub fn end_phase(self) -> BootPhase {
        self.phase
    }

    fn position(&self, id: Guid) -> Option<usize> {
        self.tables.iter().position(|t| t.id() == id)
    }
}
