//! # Silicon Policy Hand-off
//!
//! The pre-memory and post-memory phases do not share memory layout or
//! lifetime, so installed policy tables cannot simply be passed along. Instead
//! the producer copies a fixed, enumerated set of facts into a flat carrier
//! ("hand-off blob") that the platform transports to the consumer under
//! [`HANDOFF_GUID`].
//!
//! ## Layout
//!
//! ```text
//! 0   magic        "SIPOLHOB"
//! 8   version      u16    HANDOFF_VERSION
//! 10  header_size  u16    24
//! 12  total_size   u32    header + fields
//! 16  checksum     u8     all total_size bytes sum to zero (mod 256)
//! 17  reserved     [u8; 7], zero
//! 24  HandoffFields, packed little-endian
//! ```
//!
//! Unlike a config block table, the carrier is looked up by fixed layout, not
//! by GUID. Any deviation from the layout is a hard error: see
//! [`unpack_handoff`] and [`require_handoff`].

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

mod error;
mod fields;

use config_block::{Guid, guid};

pub use error::HandoffError;
pub use fields::{BootMode, HandoffFields, MemoryHandoff, MemoryTimings, ResourceHandoff};

/// Identifies the silicon policy hand-off in the platform's hand-off list.
pub const HANDOFF_GUID: Guid = guid!("7c4e9a1d-5b2f-4f83-9e06-c1d8a3b5f270");

/// Signature at offset zero of every blob.
pub const HANDOFF_MAGIC: [u8; 8] = *b"SIPOLHOB";

/// Layout version; bumped whenever [`HandoffFields`] changes.
pub const HANDOFF_VERSION: u16 = 1;

/// Size of an encoded blob.
pub const HANDOFF_SIZE: usize = HandoffHeader::SIZE + HandoffFields::SIZE;

/// Header preceding the fields of a blob.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandoffHeader {
    /// Constant [`HANDOFF_MAGIC`].
    pub magic: [u8; 8],
    pub version: u16,
    /// Offset of the fields, i.e. [`HandoffHeader::SIZE`].
    pub header_size: u16,
    /// Header plus fields, in bytes.
    pub total_size: u32,
    /// Makes the bytes of the blob sum to zero.
    pub checksum: u8,
    /// Must be zero.
    pub reserved: [u8; 7],
}

const _: () = {
    assert!(size_of::<HandoffHeader>() == HandoffHeader::SIZE);
    assert!(HANDOFF_SIZE <= u32::MAX as usize);
};

impl HandoffHeader {
    pub const SIZE: usize = 24;

    fn write_to(&self, out: &mut [u8]) {
        out[0..8].copy_from_slice(&self.magic);
        out[8..10].copy_from_slice(&self.version.to_le_bytes());
        out[10..12].copy_from_slice(&self.header_size.to_le_bytes());
        out[12..16].copy_from_slice(&self.total_size.to_le_bytes());
        out[16] = self.checksum;
        out[17..24].copy_from_slice(&self.reserved);
    }

    fn read_from(bytes: &[u8]) -> Result<Self, HandoffError> {
        let bytes = bytes.get(..Self::SIZE).ok_or(HandoffError::Truncated {
            expected: Self::SIZE,
            found: bytes.len(),
        })?;

        let mut magic = [0u8; 8];
        magic.copy_from_slice(&bytes[0..8]);
        let mut reserved = [0u8; 7];
        reserved.copy_from_slice(&bytes[17..24]);

        Ok(Self {
            magic,
            version: u16::from_le_bytes([bytes[8], bytes[9]]),
            header_size: u16::from_le_bytes([bytes[10], bytes[11]]),
            total_size: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
            checksum: bytes[16],
            reserved,
        })
    }
}

/// An encoded, checksummed hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffBlob([u8; HANDOFF_SIZE]);

impl HandoffBlob {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for HandoffBlob {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Serializes `fields` into a blob.
#[must_use]
pub fn encode_handoff(fields: &HandoffFields) -> HandoffBlob {
    let mut bytes = [0u8; HANDOFF_SIZE];

    #[allow(clippy::cast_possible_truncation)]
    let mut header = HandoffHeader {
        magic: HANDOFF_MAGIC,
        version: HANDOFF_VERSION,
        header_size: HandoffHeader::SIZE as u16,
        total_size: HANDOFF_SIZE as u32,
        checksum: 0,
        reserved: [0; 7],
    };

    fields.write_to(&mut bytes[HandoffHeader::SIZE..]);
    header.write_to(&mut bytes);
    header.checksum = 0u8.wrapping_sub(sum(&bytes));
    header.write_to(&mut bytes);

    HandoffBlob(bytes)
}

/// Validates a blob and returns its fields.
///
/// Trailing bytes past `total_size` (transport padding) are ignored.
///
/// # Errors
/// Any structural problem, see [`HandoffError`]. The checksum is verified
/// before any field is interpreted.
pub fn unpack_handoff(bytes: &[u8]) -> Result<HandoffFields, HandoffError> {
    let header = HandoffHeader::read_from(bytes)?;

    if header.magic != HANDOFF_MAGIC {
        return Err(HandoffError::BadMagic);
    }
    if header.version != HANDOFF_VERSION {
        return Err(HandoffError::UnsupportedVersion(header.version));
    }
    if usize::from(header.header_size) != HandoffHeader::SIZE {
        return Err(HandoffError::BadHeaderSize(header.header_size));
    }
    if header.total_size as usize != HANDOFF_SIZE {
        return Err(HandoffError::SizeMismatch {
            declared: header.total_size,
            required: HANDOFF_SIZE,
        });
    }

    let blob = bytes.get(..HANDOFF_SIZE).ok_or(HandoffError::Truncated {
        expected: HANDOFF_SIZE,
        found: bytes.len(),
    })?;

    if sum(blob) != 0 {
        return Err(HandoffError::ChecksumMismatch);
    }
    if header.reserved != [0; 7] {
        return Err(HandoffError::InvalidField("reserved header bytes"));
    }

    HandoffFields::read_from(&blob[HandoffHeader::SIZE..])
}

/// Like [`unpack_handoff`], but for a consumer that depends on the hand-off:
/// an absent blob is an error too.
///
/// # Errors
/// [`HandoffError::Missing`] if `blob` is `None`, otherwise as
/// [`unpack_handoff`].
pub fn require_handoff(blob: Option<&[u8]>) -> Result<HandoffFields, HandoffError> {
    unpack_handoff(blob.ok_or(HandoffError::Missing)?)
}

fn sum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |a, &b| a.wrapping_add(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HandoffFields {
        HandoffFields {
            boot_mode: BootMode::FastBoot,
            memory: MemoryHandoff {
                total_size_mb: 16384,
                tolud: 0x8000_0000,
                frequency_mts: 4800,
                ecc_enabled: true,
                channel_mask: 0b11,
                timings: MemoryTimings {
                    tcl: 40,
                    trcd: 39,
                    trp: 39,
                    tras: 77,
                    trfc: 295,
                    trefi: 9360,
                    command_rate: 2,
                },
            },
            resources: ResourceHandoff {
                acpi_base: 0x1800,
                pcie_ecam_base: 0xC000_0000,
                pcie_ecam_length: 0x1000_0000,
                igd_stolen_base: 0x7C00_0000,
                igd_stolen_size_mb: 64,
            },
        }
    }

    fn resum(bytes: &mut [u8]) {
        bytes[16] = 0;
        bytes[16] = 0u8.wrapping_sub(sum(&bytes[..HANDOFF_SIZE]));
    }

    #[test]
    fn header_is_well_formed() {
        let blob = encode_handoff(&sample());
        let bytes = blob.as_bytes();

        assert_eq!(bytes.len(), HANDOFF_SIZE);
        assert_eq!(&bytes[0..8], b"SIPOLHOB");
        assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), HANDOFF_VERSION);
        assert_eq!(u16::from_le_bytes([bytes[10], bytes[11]]), 24);
        assert_eq!(sum(bytes), 0);
        assert_eq!(bytes[24], BootMode::FastBoot as u8);
    }

    #[test]
    fn unpack_recovers_fields() {
        let blob = encode_handoff(&sample());
        assert_eq!(unpack_handoff(blob.as_bytes()), Ok(sample()));
    }

    #[test]
    fn trailing_padding_is_ignored() {
        let mut padded = encode_handoff(&sample()).as_bytes().to_vec();
        padded.extend_from_slice(&[0xFF; 8]);
        assert_eq!(unpack_handoff(&padded), Ok(sample()));
    }

    #[test]
    fn corruption_is_detected() {
        let mut bytes = encode_handoff(&sample()).as_bytes().to_vec();
        bytes[30] ^= 0x01;
        assert_eq!(unpack_handoff(&bytes), Err(HandoffError::ChecksumMismatch));
    }

    #[test]
    fn structural_errors_are_reported() {
        let good = encode_handoff(&sample()).as_bytes().to_vec();

        assert_eq!(
            unpack_handoff(&good[..10]),
            Err(HandoffError::Truncated {
                expected: 24,
                found: 10
            })
        );
        assert_eq!(
            unpack_handoff(&good[..HANDOFF_SIZE - 1]),
            Err(HandoffError::Truncated {
                expected: HANDOFF_SIZE,
                found: HANDOFF_SIZE - 1
            })
        );

        let mut bad = good.clone();
        bad[0] = b'X';
        assert_eq!(unpack_handoff(&bad), Err(HandoffError::BadMagic));

        let mut bad = good.clone();
        bad[8] = 9;
        assert_eq!(unpack_handoff(&bad), Err(HandoffError::UnsupportedVersion(9)));

        let mut bad = good.clone();
        bad[10] = 32;
        assert_eq!(unpack_handoff(&bad), Err(HandoffError::BadHeaderSize(32)));

        let mut bad = good;
        bad[12] = 0xFF;
        assert!(matches!(
            unpack_handoff(&bad),
            Err(HandoffError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn field_values_are_validated() {
        let good = encode_handoff(&sample()).as_bytes().to_vec();

        let mut bad = good.clone();
        bad[24] = 7;
        resum(&mut bad);
        assert_eq!(unpack_handoff(&bad), Err(HandoffError::InvalidField("boot mode")));

        let mut bad = good.clone();
        bad[17] = 1;
        resum(&mut bad);
        assert_eq!(
            unpack_handoff(&bad),
            Err(HandoffError::InvalidField("reserved header bytes"))
        );

        let mut no_memory = sample();
        no_memory.memory.channel_mask = 0;
        let blob = encode_handoff(&no_memory);
        assert_eq!(
            unpack_handoff(blob.as_bytes()),
            Err(HandoffError::InvalidField("no trained memory"))
        );
    }

    #[test]
    fn missing_blob_is_fatal() {
        assert_eq!(require_handoff(None), Err(HandoffError::Missing));
        assert_eq!(uefi::Status::from(HandoffError::Missing), uefi::Status::NOT_FOUND);
        assert_eq!(
            uefi::Status::from(HandoffError::ChecksumMismatch),
            uefi::Status::VOLUME_CORRUPTED
        );
    }
}
