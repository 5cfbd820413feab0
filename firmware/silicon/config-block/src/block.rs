use crate::header::ConfigBlockHeader;
use uefi::Guid;

/// A configuration block type: a GUID-tagged, fixed-layout payload.
///
/// [`Default`] provides the compiled-in defaults appended by policy builders.
/// Implement this trait with `#[derive(ConfigBlock)]`; a hand-written impl must
/// keep [`encode`](Self::encode) and [`decode`](Self::decode) within
/// [`PAYLOAD_SIZE`](Self::PAYLOAD_SIZE) bytes.
pub trait ConfigBlock: Default {
    /// Block type identifier, stable across builds.
    const GUID: Guid;

    /// Payload layout revision.
    const REVISION: u8;

    /// Encoded payload size in bytes, header excluded.
    const PAYLOAD_SIZE: usize;

    /// Total block size, header included.
    #[allow(clippy::cast_possible_truncation)]
    const BLOCK_SIZE: u32 = (ConfigBlockHeader::SIZE + Self::PAYLOAD_SIZE) as u32;

    /// Writes the payload into `out[..PAYLOAD_SIZE]`.
    fn encode(&self, out: &mut [u8]);

    /// Reads the payload from `bytes[..PAYLOAD_SIZE]`.
    fn decode(bytes: &[u8]) -> Self;
}
