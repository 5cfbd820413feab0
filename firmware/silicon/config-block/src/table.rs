//! # Config Block Table
//!
//! A growable arena of configuration blocks kept in one contiguous,
//! zero-initialized byte buffer. Blocks are appended at the end of the used
//! region and addressed by [`BlockRef`] (an index into the arena), so growing
//! the buffer never invalidates a reference.

use crate::block::ConfigBlock;
use crate::error::TableError;
use crate::field::BlockField;
use crate::header::{ConfigBlockHeader, ConfigBlockTableHeader};
use alloc::vec::Vec;
use core::iter::FusedIterator;
use uefi::Guid;

/// Extra zeroed bytes reserved whenever the buffer has to grow, to amortize
/// subsequent appends.
pub const GROWTH_MARGIN_BYTES: usize = 256;

/// Extra block slots reserved whenever the slot index has to grow.
pub const GROWTH_MARGIN_BLOCKS: u16 = 4;

/// Initial sizing hint for [`ConfigBlockTable::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCapacity {
    /// Number of blocks expected.
    pub blocks: u16,
    /// Payload bytes to reserve after the table header (block headers included).
    pub bytes: u32,
}

impl TableCapacity {
    pub const DEFAULT: Self = Self::new(8, 512);

    #[must_use]
    pub const fn new(blocks: u16, bytes: u32) -> Self {
        Self { blocks, bytes }
    }

    /// Room for the given block sizes (headers included), without margin.
    #[must_use]
    pub const fn exact(block_sizes: &[u32]) -> Self {
        let mut bytes = 0u32;
        let mut i = 0;
        while i < block_sizes.len() {
            bytes = bytes.saturating_add(block_sizes[i]);
            i += 1;
        }
        #[allow(clippy::cast_possible_truncation)]
        let blocks = if block_sizes.len() > u16::MAX as usize {
            u16::MAX
        } else {
            block_sizes.len() as u16
        };
        Self { blocks, bytes }
    }
}

impl Default for TableCapacity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Index of a block within its table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BlockRef(u16);

impl BlockRef {
    /// Position of the block in insertion order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Read-only view of one block: its decoded header and raw payload.
#[derive(Debug, Clone, Copy)]
pub struct BlockView<'a> {
    header: ConfigBlockHeader,
    offset: usize,
    payload: &'a [u8],
}

impl<'a> BlockView<'a> {
    #[must_use]
    pub const fn header(&self) -> &ConfigBlockHeader {
        &self.header
    }

    #[must_use]
    pub const fn guid(&self) -> Guid {
        self.header.guid
    }

    #[must_use]
    pub const fn size(&self) -> u32 {
        self.header.size
    }

    #[must_use]
    pub const fn revision(&self) -> u8 {
        self.header.revision
    }

    /// Byte offset of the block header within the table image.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Payload bytes following the block header.
    #[must_use]
    pub const fn payload(&self) -> &'a [u8] {
        self.payload
    }
}

/// A policy table: table header plus a contiguous run of configuration blocks.
///
/// # Invariants
/// - No two blocks share a GUID.
/// - `total_size() == ConfigBlockTableHeader::SIZE + sum(block sizes)`.
/// - `available_size() == allocated_size() - total_size()`, and the
///   headroom is zero-filled.
/// - `block_count() + available_block_count()` is the slot capacity.
/// - The header bytes at offset zero always mirror these values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBlockTable {
    id: Guid,
    revision: u8,
    /// Allocated backing store; `buffer.len()` is the allocated size.
    buffer: Vec<u8>,
    /// End of the last block.
    used: usize,
    /// Block header offsets in insertion order.
    offsets: Vec<u32>,
    block_capacity: u16,
    sealed: bool,
}

impl ConfigBlockTable {
    /// Allocates an empty table for the domain `id`.
    ///
    /// # Errors
    /// - [`TableError::OutOfMemory`] if the backing buffer cannot be allocated.
    /// - [`TableError::CapacityExhausted`] if the size hint does not fit the
    ///   32-bit size fields.
    pub fn create(id: Guid, revision: u8, capacity: TableCapacity) -> Result<Self, TableError> {
        let allocated = ConfigBlockTableHeader::SIZE
            .checked_add(capacity.bytes as usize)
            .filter(|&n| u32::try_from(n).is_ok())
            .ok_or(TableError::CapacityExhausted)?;

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(allocated)
            .map_err(|_| TableError::OutOfMemory)?;
        buffer.resize(allocated, 0);

        let mut offsets = Vec::new();
        offsets
            .try_reserve_exact(usize::from(capacity.blocks))
            .map_err(|_| TableError::OutOfMemory)?;

        let mut table = Self {
            id,
            revision,
            buffer,
            used: ConfigBlockTableHeader::SIZE,
            offsets,
            block_capacity: capacity.blocks,
            sealed: false,
        };
        table.sync_header();
        Ok(table)
    }

    /// Parses and validates a table image, e.g. one handed over by another
    /// component. The returned table is sealed and holds exactly the used
    /// bytes: its header reports no free space or block slots.
    ///
    /// # Errors
    /// - [`TableError::Malformed`] if headers are truncated, sizes do not add
    ///   up, or reserved bytes are set.
    /// - [`TableError::DuplicateGuid`] if two blocks share a GUID.
    /// - [`TableError::OutOfMemory`] if the copy cannot be allocated.
    pub fn parse(bytes: &[u8]) -> Result<Self, TableError> {
        let header = ConfigBlockTableHeader::read_from(bytes)
            .ok_or(TableError::Malformed("truncated table header"))?;

        let total = header.header.size as usize;
        if total < ConfigBlockTableHeader::SIZE || total > bytes.len() {
            return Err(TableError::Malformed("table size exceeds the image"));
        }

        if header.header.reserved != [0; 3] {
            return Err(TableError::Malformed("reserved table header bytes are set"));
        }

        let mut offsets: Vec<u32> = Vec::new();
        offsets
            .try_reserve_exact(usize::from(header.block_count))
            .map_err(|_| TableError::OutOfMemory)?;

        let mut offset = ConfigBlockTableHeader::SIZE;
        for _ in 0..header.block_count {
            let block = ConfigBlockHeader::read_from(&bytes[offset..total])
                .ok_or(TableError::Malformed("truncated block header"))?;

            let size = block.size as usize;
            if size < ConfigBlockHeader::SIZE || size > total - offset {
                return Err(TableError::Malformed("block size out of bounds"));
            }
            if block.reserved != [0; 3] {
                return Err(TableError::Malformed("reserved block header bytes are set"));
            }
            if offsets
                .iter()
                .any(|&o| Guid::read_le(&bytes[o as usize..o as usize + 16]) == block.guid)
            {
                return Err(TableError::DuplicateGuid(block.guid));
            }

            #[allow(clippy::cast_possible_truncation)]
            offsets.push(offset as u32);
            offset += size;
        }

        if offset != total {
            return Err(TableError::Malformed("block sizes do not add up to the table size"));
        }

        // Sealed tables never grow, so advertised headroom is dropped.
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(total)
            .map_err(|_| TableError::OutOfMemory)?;
        buffer.extend_from_slice(&bytes[..total]);

        let mut table = Self {
            id: header.header.guid,
            revision: header.header.revision,
            buffer,
            used: total,
            offsets,
            block_capacity: header.block_count,
            sealed: true,
        };
        table.sync_header();
        Ok(table)
    }

    /// Domain identifier stored in the table header.
    #[must_use]
    pub const fn id(&self) -> Guid {
        self.id
    }

    #[must_use]
    pub const fn revision(&self) -> u8 {
        self.revision
    }

    /// Table header as currently stored at offset zero.
    #[must_use]
    pub fn header(&self) -> ConfigBlockTableHeader {
        ConfigBlockTableHeader {
            header: ConfigBlockHeader::new(self.id, self.total_size(), self.revision),
            block_count: self.block_count(),
            available_block_count: self.available_block_count(),
            available_size: self.available_size(),
        }
    }

    /// Table header size plus the sizes of all blocks.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn total_size(&self) -> u32 {
        // Bounded to u32 by `create` and `add_block`.
        self.used as u32
    }

    /// Size of the backing buffer, headroom included.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn allocated_size(&self) -> u32 {
        self.buffer.len() as u32
    }

    #[must_use]
    pub const fn available_size(&self) -> u32 {
        self.allocated_size() - self.total_size()
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn block_count(&self) -> u16 {
        self.offsets.len() as u16
    }

    #[must_use]
    pub const fn available_block_count(&self) -> u16 {
        self.block_capacity - self.block_count()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    #[must_use]
    pub const fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Marks the table read-only. Sealing cannot be undone.
    pub const fn seal(&mut self) {
        self.sealed = true;
    }

    /// The used part of the backing buffer: the table's canonical byte image.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.used]
    }

    /// Appends a zeroed block with the given header fields.
    ///
    /// The buffer grows by at least `size + GROWTH_MARGIN_BYTES` when it lacks
    /// headroom. On error the table is left unchanged.
    ///
    /// # Errors
    /// - [`TableError::Sealed`] if the table is sealed.
    /// - [`TableError::InvalidBlockSize`] if `size` cannot hold a block header.
    /// - [`TableError::DuplicateGuid`] if a block with `guid` already exists.
    /// - [`TableError::CapacityExhausted`] if the block count or total size
    ///   would overflow the header fields.
    /// - [`TableError::OutOfMemory`] if growing the buffer fails.
    pub fn add_block(&mut self, guid: Guid, size: u32, revision: u8) -> Result<BlockRef, TableError> {
        self.ensure_mutable()?;

        let block_size = size as usize;
        if block_size < ConfigBlockHeader::SIZE {
            return Err(TableError::InvalidBlockSize { guid, size });
        }
        if self.contains(guid) {
            return Err(TableError::DuplicateGuid(guid));
        }

        let end = self
            .used
            .checked_add(block_size)
            .filter(|&n| u32::try_from(n).is_ok())
            .ok_or(TableError::CapacityExhausted)?;
        let index = self.block_count();
        if index == u16::MAX {
            return Err(TableError::CapacityExhausted);
        }

        self.reserve(block_size)?;

        let offset = self.used;
        let block = &mut self.buffer[offset..end];
        block.fill(0);
        ConfigBlockHeader::new(guid, size, revision).write_to(block);

        #[allow(clippy::cast_possible_truncation)]
        self.offsets.push(offset as u32);
        self.used = end;
        self.sync_header();

        Ok(BlockRef(index))
    }

    /// Appends `value` as a new block of type `T`.
    ///
    /// # Errors
    /// Same as [`add_block`](Self::add_block).
    pub fn add<T: ConfigBlock>(&mut self, value: &T) -> Result<BlockRef, TableError> {
        let block = self.add_block(T::GUID, T::BLOCK_SIZE, T::REVISION)?;
        let start = self.payload_start(block);
        value.encode(&mut self.buffer[start..start + T::PAYLOAD_SIZE]);
        Ok(block)
    }

    /// Finds the block with the given GUID by scanning the table.
    #[must_use]
    pub fn find_block(&self, guid: Guid) -> Option<BlockRef> {
        #[allow(clippy::cast_possible_truncation)]
        self.offsets
            .iter()
            .position(|&offset| self.guid_at(offset as usize) == guid)
            .map(|index| BlockRef(index as u16))
    }

    #[must_use]
    pub fn contains(&self, guid: Guid) -> bool {
        self.find_block(guid).is_some()
    }

    /// Returns a view of the referenced block.
    #[must_use]
    pub fn block(&self, block: BlockRef) -> Option<BlockView<'_>> {
        let offset = *self.offsets.get(block.index())? as usize;
        let header = ConfigBlockHeader::read_from(&self.buffer[offset..])?;
        let payload = &self.buffer[offset + ConfigBlockHeader::SIZE..offset + header.size as usize];
        Some(BlockView {
            header,
            offset,
            payload,
        })
    }

    /// Iterates over all blocks in insertion order.
    #[must_use]
    pub const fn blocks(&self) -> Blocks<'_> {
        Blocks {
            table: self,
            next: 0,
        }
    }

    /// Decodes the block of type `T`.
    ///
    /// Blocks written with a newer, larger revision decode fine; the extra
    /// bytes are ignored.
    ///
    /// # Errors
    /// - [`TableError::NotFound`] if the table has no block with `T::GUID`.
    /// - [`TableError::SizeMismatch`] if the stored block is smaller than `T`.
    /// - [`TableError::UnsupportedRevision`] if the stored revision is older
    ///   than `T::REVISION`.
    pub fn get<T: ConfigBlock>(&self) -> Result<T, TableError> {
        let block = self.find_block(T::GUID).ok_or(TableError::NotFound(T::GUID))?;
        let start = self.checked_payload_start::<T>(block)?;
        Ok(T::decode(&self.buffer[start..start + T::PAYLOAD_SIZE]))
    }

    /// Decodes the block of type `T`, lets `f` mutate it and writes it back.
    ///
    /// Only the payload is touched; the block header stays as it is.
    ///
    /// # Errors
    /// [`TableError::Sealed`] if the table is sealed, otherwise the same as
    /// [`get`](Self::get).
    pub fn update<T: ConfigBlock, R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Result<R, TableError> {
        self.ensure_mutable()?;
        let block = self.find_block(T::GUID).ok_or(TableError::NotFound(T::GUID))?;
        let start = self.checked_payload_start::<T>(block)?;

        let payload = &mut self.buffer[start..start + T::PAYLOAD_SIZE];
        let mut value = T::decode(payload);
        let result = f(&mut value);
        value.encode(payload);
        Ok(result)
    }

    /// Grants `f` exclusive access to the raw payload of the block `guid`.
    ///
    /// # Errors
    /// - [`TableError::Sealed`] if the table is sealed.
    /// - [`TableError::NotFound`] if the table has no block with `guid`.
    pub fn update_block<R>(&mut self, guid: Guid, f: impl FnOnce(&mut [u8]) -> R) -> Result<R, TableError> {
        self.ensure_mutable()?;
        let block = self.find_block(guid).ok_or(TableError::NotFound(guid))?;
        let start = self.payload_start(block);
        let end = self.block_end(block);
        Ok(f(&mut self.buffer[start..end]))
    }

    const fn ensure_mutable(&self) -> Result<(), TableError> {
        if self.sealed {
            Err(TableError::Sealed)
        } else {
            Ok(())
        }
    }

    /// Makes room for one more block of `block_size` bytes. Both allocations
    /// are attempted before any bookkeeping changes.
    fn reserve(&mut self, block_size: usize) -> Result<(), TableError> {
        let grow_bytes = self.buffer.len() - self.used < block_size;
        let grow_slots = self.offsets.len() == usize::from(self.block_capacity);

        let new_capacity = if grow_slots {
            let grown = self.block_capacity.saturating_add(GROWTH_MARGIN_BLOCKS);
            self.offsets
                .try_reserve_exact(usize::from(grown) - self.offsets.len())
                .map_err(|_| TableError::OutOfMemory)?;
            grown
        } else {
            self.block_capacity
        };

        if grow_bytes {
            let target = (self.used + block_size + GROWTH_MARGIN_BYTES).min(u32::MAX as usize);
            self.buffer
                .try_reserve_exact(target - self.buffer.len())
                .map_err(|_| TableError::OutOfMemory)?;
            self.buffer.resize(target, 0);
        }

        self.block_capacity = new_capacity;
        Ok(())
    }

    fn sync_header(&mut self) {
        let header = self.header();
        header.write_to(&mut self.buffer[..ConfigBlockTableHeader::SIZE]);
    }

    fn guid_at(&self, offset: usize) -> Guid {
        Guid::read_le(&self.buffer[offset..offset + 16])
    }

    fn payload_start(&self, block: BlockRef) -> usize {
        self.offsets[block.index()] as usize + ConfigBlockHeader::SIZE
    }

    fn block_end(&self, block: BlockRef) -> usize {
        let offset = self.offsets[block.index()] as usize;
        offset + u32::read_le(&self.buffer[offset + 16..offset + 20]) as usize
    }

    fn checked_payload_start<T: ConfigBlock>(&self, block: BlockRef) -> Result<usize, TableError> {
        let offset = self.offsets[block.index()] as usize;
        let size = u32::read_le(&self.buffer[offset + 16..offset + 20]);
        let revision = self.buffer[offset + 20];

        if size < T::BLOCK_SIZE {
            return Err(TableError::SizeMismatch {
                guid: T::GUID,
                expected: T::BLOCK_SIZE,
                found: size,
            });
        }
        if revision < T::REVISION {
            return Err(TableError::UnsupportedRevision {
                guid: T::GUID,
                expected: T::REVISION,
                found: revision,
            });
        }
        Ok(offset + ConfigBlockHeader::SIZE)
    }
}

/// Iterator over the blocks of a table, see [`ConfigBlockTable::blocks`].
pub struct Blocks<'a> {
    table: &'a ConfigBlockTable,
    next: usize,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = BlockView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        #[allow(clippy::cast_possible_truncation)]
        let view = self.table.block(BlockRef(self.next as u16))?;
        self.next += 1;
        Some(view)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let r = self.table.offsets.len().saturating_sub(self.next);
        (r, Some(r))
    }
}

impl ExactSizeIterator for Blocks<'_> {}

impl FusedIterator for Blocks<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use uefi::guid;

    const DOMAIN: Guid = guid!("3f1e6a52-0c7d-4b8e-a9d4-62b1f0e7c835");
    const A: Guid = guid!("11111111-1111-1111-1111-111111111111");
    const B: Guid = guid!("22222222-2222-2222-2222-222222222222");
    const C: Guid = guid!("33333333-3333-3333-3333-333333333333");

    fn table() -> ConfigBlockTable {
        ConfigBlockTable::create(DOMAIN, 1, TableCapacity::new(2, 64)).unwrap()
    }

    fn sum_of_blocks(t: &ConfigBlockTable) -> u32 {
        t.blocks().map(|b| b.size()).sum()
    }

    #[test]
    fn create_yields_empty_table() {
        let t = table();
        assert!(t.is_empty());
        assert_eq!(t.block_count(), 0);
        assert_eq!(t.available_block_count(), 2);
        assert_eq!(t.total_size(), 32);
        assert_eq!(t.allocated_size(), 32 + 64);
        assert_eq!(t.available_size(), 64);
        assert_eq!(t.id(), DOMAIN);
        assert_eq!(t.as_bytes().len(), 32);
    }

    #[test]
    fn add_block_appends_zeroed_block_with_header() {
        let mut t = table();
        let r = t.add_block(A, 40, 3).unwrap();

        let view = t.block(r).unwrap();
        assert_eq!(view.guid(), A);
        assert_eq!(view.size(), 40);
        assert_eq!(view.revision(), 3);
        assert_eq!(view.offset(), 32);
        assert_eq!(view.payload(), &[0u8; 16]);
        assert_eq!(t.total_size(), 72);
        assert_eq!(t.available_size(), 24);
        assert_eq!(t.available_block_count(), 1);
    }

    #[test]
    fn duplicate_guid_is_rejected_and_table_unchanged() {
        let mut t = table();
        t.add_block(A, 32, 1).unwrap();
        let before = t.clone();

        assert_eq!(t.add_block(A, 48, 2), Err(TableError::DuplicateGuid(A)));
        assert_eq!(t, before);
    }

    #[test]
    fn block_smaller_than_header_is_rejected() {
        let mut t = table();
        assert_eq!(
            t.add_block(A, 23, 1),
            Err(TableError::InvalidBlockSize { guid: A, size: 23 })
        );
        assert!(t.add_block(A, 24, 1).is_ok());
    }

    #[test]
    fn growth_keeps_block_bytes_and_refs() {
        let mut t = table();
        let a = t.add_block(A, 40, 1).unwrap();
        t.update_block(A, |p| p.copy_from_slice(&[0x5A; 16])).unwrap();

        // Needs 100 bytes with only 24 left, and the slot index is full after B.
        let b = t.add_block(B, 32, 1).unwrap();
        let c = t.add_block(C, 100, 1).unwrap();

        assert_eq!(t.block(a).unwrap().payload(), &[0x5A; 16]);
        assert_eq!(t.block(b).unwrap().guid(), B);
        assert_eq!(t.block(c).unwrap().offset(), 32 + 40 + 32);
        assert_eq!(t.block_count(), 3);
        assert_eq!(t.available_block_count(), GROWTH_MARGIN_BLOCKS - 1);
        assert_eq!(t.allocated_size() as usize, 32 + 40 + 32 + 100 + GROWTH_MARGIN_BYTES);
        assert_eq!(t.available_size() as usize, GROWTH_MARGIN_BYTES);
    }

    #[test]
    fn size_is_conserved_across_additions() {
        let mut t = table();
        for (guid, size) in [(A, 24), (B, 100), (C, 333)] {
            t.add_block(guid, size, 1).unwrap();
            assert_eq!(t.total_size(), 32 + sum_of_blocks(&t));
            assert_eq!(t.available_size(), t.allocated_size() - t.total_size());
            assert_eq!(t.as_bytes().len(), t.total_size() as usize);
        }
    }

    #[test]
    fn header_bytes_mirror_bookkeeping() {
        let mut t = table();
        t.add_block(A, 40, 1).unwrap();
        t.add_block(B, 300, 1).unwrap();

        let h = ConfigBlockTableHeader::read_from(t.as_bytes()).unwrap();
        assert_eq!(h, t.header());
        assert_eq!(h.header.guid, DOMAIN);
        assert_eq!(h.header.size, t.total_size());
        assert_eq!(h.block_count, 2);
    }

    #[test]
    fn find_block_is_pure() {
        let mut t = table();
        t.add_block(A, 24, 1).unwrap();
        t.add_block(B, 24, 1).unwrap();
        let before = t.clone();

        for _ in 0..3 {
            assert_eq!(t.find_block(B).map(BlockRef::index), Some(1));
            assert_eq!(t.find_block(C), None);
        }
        assert_eq!(t, before);
    }

    #[test]
    fn sealed_table_rejects_mutation() {
        let mut t = table();
        t.add_block(A, 24, 1).unwrap();
        t.seal();

        assert_eq!(t.add_block(B, 24, 1), Err(TableError::Sealed));
        assert_eq!(t.update_block(A, |_| ()), Err(TableError::Sealed));
        assert!(t.find_block(A).is_some());
    }

    #[test]
    fn update_block_reports_missing_guid() {
        let mut t = table();
        assert_eq!(t.update_block(A, |_| ()), Err(TableError::NotFound(A)));
    }

    #[test]
    fn parse_accepts_own_image() {
        let mut t = table();
        t.add_block(A, 40, 2).unwrap();
        t.add_block(B, 28, 1).unwrap();
        t.update_block(B, |p| p[0] = 7).unwrap();

        let parsed = ConfigBlockTable::parse(t.as_bytes()).unwrap();
        assert!(parsed.is_sealed());
        assert_eq!(parsed.as_bytes()[..24], t.as_bytes()[..24]);
        assert_eq!(parsed.as_bytes()[32..], t.as_bytes()[32..]);
        assert_eq!(parsed.header().block_count, 2);
        assert_eq!(parsed.header().available_size, 0);
        assert_eq!(parsed.header().available_block_count, 0);
        assert_eq!(parsed.allocated_size(), parsed.total_size());
        assert_eq!(parsed.block(parsed.find_block(B).unwrap()).unwrap().payload(), &[7, 0, 0, 0]);
    }

    #[test]
    fn parse_rejects_inconsistent_images() {
        let mut t = table();
        t.add_block(A, 40, 2).unwrap();
        let image = t.as_bytes().to_vec();

        assert_eq!(
            ConfigBlockTable::parse(&image[..20]),
            Err(TableError::Malformed("truncated table header"))
        );
        assert_eq!(
            ConfigBlockTable::parse(&image[..60]),
            Err(TableError::Malformed("table size exceeds the image"))
        );

        let mut bad_size = image.clone();
        bad_size[32 + 16] = 80;
        assert_eq!(
            ConfigBlockTable::parse(&bad_size),
            Err(TableError::Malformed("block size out of bounds"))
        );

        let mut bad_reserved = image;
        bad_reserved[32 + 21] = 1;
        assert_eq!(
            ConfigBlockTable::parse(&bad_reserved),
            Err(TableError::Malformed("reserved block header bytes are set"))
        );
    }

    #[test]
    fn parse_ignores_advertised_headroom() {
        let mut t = table();
        t.add_block(A, 28, 1).unwrap();
        let mut image = t.as_bytes().to_vec();
        image[26..28].copy_from_slice(&u16::MAX.to_le_bytes());
        image[28..32].copy_from_slice(&0x4000_0000u32.to_le_bytes());

        let parsed = ConfigBlockTable::parse(&image).unwrap();
        assert_eq!(parsed.allocated_size(), 32 + 28);
        assert_eq!(parsed.available_size(), 0);
        assert_eq!(parsed.available_block_count(), 0);
        assert_eq!(ConfigBlockTable::parse(parsed.as_bytes()).unwrap().as_bytes(), parsed.as_bytes());
    }

    #[test]
    fn parse_rejects_reserved_table_header_bytes() {
        let mut t = table();
        t.add_block(A, 24, 1).unwrap();
        let mut image = t.as_bytes().to_vec();
        image[22] = 0x5A;

        assert_eq!(
            ConfigBlockTable::parse(&image),
            Err(TableError::Malformed("reserved table header bytes are set"))
        );
    }

    #[test]
    fn parse_rejects_duplicate_guids() {
        let mut t = table();
        t.add_block(A, 24, 1).unwrap();
        t.add_block(B, 24, 1).unwrap();
        let mut image = t.as_bytes().to_vec();
        image[56..72].copy_from_slice(&A.to_bytes());

        assert_eq!(ConfigBlockTable::parse(&image), Err(TableError::DuplicateGuid(A)));
    }

    #[test]
    fn oversized_hint_is_rejected() {
        assert_eq!(
            ConfigBlockTable::create(DOMAIN, 1, TableCapacity::new(1, u32::MAX)),
            Err(TableError::CapacityExhausted)
        );
    }

    #[test]
    fn exact_capacity_sums_block_sizes() {
        assert_eq!(TableCapacity::exact(&[24, 40, 16]), TableCapacity::new(3, 80));
    }
}
