use silicon_handoff::HandoffError;
use silicon_policy::{Guid, PolicyError, TableError};
use uefi::Status;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error("silicon policy hand-off unusable: {0}")]
    Handoff(#[from] HandoffError),
    #[error("memory initialization failed: {0}")]
    MemoryInit(&'static str),
    #[error("a hand-off with GUID {0} was already published")]
    DuplicateHandoff(Guid),
    #[error("out of memory in the hand-off list")]
    OutOfMemory,
}

impl From<TableError> for PlatformError {
    fn from(value: TableError) -> Self {
        Self::Policy(value.into())
    }
}

impl From<PlatformError> for Status {
    fn from(value: PlatformError) -> Self {
        match value {
            PlatformError::Policy(e) => e.into(),
            PlatformError::Handoff(e) => e.into(),
            PlatformError::MemoryInit(_) => Self::DEVICE_ERROR,
            PlatformError::DuplicateHandoff(_) => Self::ALREADY_STARTED,
            PlatformError::OutOfMemory => Self::OUT_OF_RESOURCES,
        }
    }
}
