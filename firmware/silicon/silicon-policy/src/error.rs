use config_block::{Guid, TableError};
use uefi::Status;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("no policy is installed for domain {0}")]
    DomainNotFound(Guid),
    #[error("a policy for domain {0} is already installed in this phase")]
    AlreadyInstalled(Guid),
    #[error("{0} MiB of IGD stolen memory does not fit below TOLUD {1:#x}")]
    StolenMemoryAboveTolud(u16, u32),
}

impl From<PolicyError> for Status {
    fn from(value: PolicyError) -> Self {
        match value {
            PolicyError::Table(e) => e.into(),
            PolicyError::DomainNotFound(_) => Self::NOT_FOUND,
            PolicyError::AlreadyInstalled(_) => Self::ALREADY_STARTED,
            PolicyError::StolenMemoryAboveTolud(..) => Self::INVALID_PARAMETER,
        }
    }
}
