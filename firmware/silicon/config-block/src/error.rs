use uefi::{Guid, Status};

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("out of memory while growing the config block table")]
    OutOfMemory,
    #[error("a config block with GUID {0} already exists in the table")]
    DuplicateGuid(Guid),
    #[error("no config block with GUID {0} in the table")]
    NotFound(Guid),
    #[error("invalid size {size} for config block {guid}")]
    InvalidBlockSize { guid: Guid, size: u32 },
    #[error("config block {guid} is {found} bytes, expected at least {expected}")]
    SizeMismatch { guid: Guid, expected: u32, found: u32 },
    #[error("config block {guid} has revision {found}, expected at least {expected}")]
    UnsupportedRevision { guid: Guid, expected: u8, found: u8 },
    #[error("the config block table is sealed")]
    Sealed,
    #[error("the config block table cannot hold more blocks")]
    CapacityExhausted,
    #[error("malformed config block table image: {0}")]
    Malformed(&'static str),
}

impl From<TableError> for Status {
    fn from(value: TableError) -> Self {
        match value {
            TableError::OutOfMemory | TableError::CapacityExhausted => Self::OUT_OF_RESOURCES,
            TableError::DuplicateGuid(_) | TableError::InvalidBlockSize { .. } => Self::INVALID_PARAMETER,
            TableError::NotFound(_) => Self::NOT_FOUND,
            TableError::SizeMismatch { .. } | TableError::UnsupportedRevision { .. } => {
                Self::INCOMPATIBLE_VERSION
            }
            TableError::Sealed => Self::WRITE_PROTECTED,
            TableError::Malformed(_) => Self::VOLUME_CORRUPTED,
        }
    }
}
