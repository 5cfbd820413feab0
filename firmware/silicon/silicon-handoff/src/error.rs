use uefi::Status;

/// Reasons a hand-off blob cannot be used.
///
/// None of these is recoverable for the consuming phase: the hardware was
/// already configured by the producer and no safe default exists.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandoffError {
    #[error("no silicon policy hand-off was published by the previous phase")]
    Missing,
    #[error("hand-off blob is truncated: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },
    #[error("hand-off blob has an invalid signature")]
    BadMagic,
    #[error("unsupported hand-off version {0}")]
    UnsupportedVersion(u16),
    #[error("hand-off header size {0} does not match this layout")]
    BadHeaderSize(u16),
    #[error("hand-off declares {declared} bytes, layout requires {required}")]
    SizeMismatch { declared: u32, required: usize },
    #[error("hand-off checksum mismatch")]
    ChecksumMismatch,
    #[error("invalid hand-off field: {0}")]
    InvalidField(&'static str),
}

impl From<HandoffError> for Status {
    fn from(value: HandoffError) -> Self {
        match value {
            HandoffError::Missing => Self::NOT_FOUND,
            HandoffError::UnsupportedVersion(_) => Self::INCOMPATIBLE_VERSION,
            HandoffError::Truncated { .. }
            | HandoffError::BadMagic
            | HandoffError::BadHeaderSize(_)
            | HandoffError::SizeMismatch { .. }
            | HandoffError::ChecksumMismatch
            | HandoffError::InvalidField(_) => Self::VOLUME_CORRUPTED,
        }
    }
}
