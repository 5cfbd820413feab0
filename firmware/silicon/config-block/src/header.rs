//! # Block and Table Headers
//!
//! Both headers are `#[repr(C)]` to document the ABI, but they are always
//! (de)serialized field by field in little-endian order so the byte image
//! does not depend on the host.

use crate::field::BlockField;
use uefi::Guid;

/// Self-describing header at the start of every configuration block.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigBlockHeader {
    /// Identifies the block type; unique within a table.
    pub guid: Guid,
    /// Total length of the block in bytes, header included.
    pub size: u32,
    /// Layout revision of the payload.
    pub revision: u8,
    /// Must be zero.
    pub reserved: [u8; 3],
}

/// Header at offset zero of a configuration block table.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigBlockTableHeader {
    /// `guid` names the policy domain, `size` is the table's total used size.
    pub header: ConfigBlockHeader,
    /// Number of blocks in the table.
    pub block_count: u16,
    /// Blocks that still fit before the slot index must grow.
    pub available_block_count: u16,
    /// Zeroed bytes left in the backing buffer.
    pub available_size: u32,
}

const _: () = {
    assert!(size_of::<ConfigBlockHeader>() == ConfigBlockHeader::SIZE);
    assert!(size_of::<ConfigBlockTableHeader>() == ConfigBlockTableHeader::SIZE);
};

impl ConfigBlockHeader {
    /// Serialized size in bytes.
    pub const SIZE: usize = 24;

    #[must_use]
    pub const fn new(guid: Guid, size: u32, revision: u8) -> Self {
        Self {
            guid,
            size,
            revision,
            reserved: [0; 3],
        }
    }

    /// Writes the header into the first [`SIZE`](Self::SIZE) bytes of `out`.
    ///
    /// # Panics
    /// Panics if `out` is shorter than [`SIZE`](Self::SIZE).
    pub fn write_to(&self, out: &mut [u8]) {
        self.guid.write_le(&mut out[0..16]);
        self.size.write_le(&mut out[16..20]);
        out[20] = self.revision;
        out[21..24].copy_from_slice(&self.reserved);
    }

    /// Reads a header from the first [`SIZE`](Self::SIZE) bytes of `bytes`.
    ///
    /// Returns `None` if `bytes` is too short.
    #[must_use]
    pub fn read_from(bytes: &[u8]) -> Option<Self> {
        let bytes = bytes.get(..Self::SIZE)?;
        Some(Self {
            guid: Guid::read_le(&bytes[0..16]),
            size: u32::read_le(&bytes[16..20]),
            revision: bytes[20],
            reserved: [bytes[21], bytes[22], bytes[23]],
        })
    }
}

impl ConfigBlockTableHeader {
    /// Serialized size in bytes.
    pub const SIZE: usize = 32;

    /// Writes the header into the first [`SIZE`](Self::SIZE) bytes of `out`.
    ///
    /// # Panics
    /// Panics if `out` is shorter than [`SIZE`](Self::SIZE).
    pub fn write_to(&self, out: &mut [u8]) {
        self.header.write_to(&mut out[0..ConfigBlockHeader::SIZE]);
        self.block_count.write_le(&mut out[24..26]);
        self.available_block_count.write_le(&mut out[26..28]);
        self.available_size.write_le(&mut out[28..32]);
    }

    /// Reads a table header from the first [`SIZE`](Self::SIZE) bytes of `bytes`.
    ///
    /// Returns `None` if `bytes` is too short.
    #[must_use]
    pub fn read_from(bytes: &[u8]) -> Option<Self> {
        let bytes = bytes.get(..Self::SIZE)?;
        Some(Self {
            header: ConfigBlockHeader::read_from(bytes)?,
            block_count: u16::read_le(&bytes[24..26]),
            available_block_count: u16::read_le(&bytes[26..28]),
            available_size: u32::read_le(&bytes[28..32]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uefi::guid;

    #[test]
    fn block_header_layout_is_little_endian() {
        let h = ConfigBlockHeader::new(guid!("01020304-0506-0708-090a-0b0c0d0e0f10"), 0x48, 3);
        let mut buf = [0xAAu8; ConfigBlockHeader::SIZE];
        h.write_to(&mut buf);

        assert_eq!(&buf[0..16], &h.guid.to_bytes());
        assert_eq!(&buf[16..20], &[0x48, 0, 0, 0]);
        assert_eq!(buf[20], 3);
        assert_eq!(&buf[21..24], &[0, 0, 0]);
        assert_eq!(ConfigBlockHeader::read_from(&buf), Some(h));
    }

    #[test]
    fn table_header_rejects_short_input() {
        assert!(ConfigBlockTableHeader::read_from(&[0u8; 31]).is_none());
        assert!(ConfigBlockHeader::read_from(&[0u8; 23]).is_none());
    }

    #[test]
    fn table_header_counts_sit_after_block_header() {
        let h = ConfigBlockTableHeader {
            header: ConfigBlockHeader::new(Guid::ZERO, 96, 1),
            block_count: 2,
            available_block_count: 6,
            available_size: 0x0102,
        };
        let mut buf = [0u8; ConfigBlockTableHeader::SIZE];
        h.write_to(&mut buf);

        assert_eq!(&buf[24..26], &[2, 0]);
        assert_eq!(&buf[26..28], &[6, 0]);
        assert_eq!(&buf[28..32], &[0x02, 0x01, 0, 0]);
        assert_eq!(ConfigBlockTableHeader::read_from(&buf), Some(h));
    }
}
