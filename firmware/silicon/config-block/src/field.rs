use uefi::Guid;

/// A fixed-size value stored in a block payload.
///
/// Values are packed without padding and in little-endian byte order. The
/// slices handed to [`write_le`](Self::write_le) and [`read_le`](Self::read_le)
/// are exactly [`SIZE`](Self::SIZE) bytes long.
pub trait BlockField: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    fn write_le(&self, out: &mut [u8]);

    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! int_block_field {
    ($($ty:ty),*) => {
        $(
            impl BlockField for $ty {
                const SIZE: usize = size_of::<$ty>();

                #[inline]
                fn write_le(&self, out: &mut [u8]) {
                    out[..Self::SIZE].copy_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

int_block_field!(u8, u16, u32, u64);

/// Stored as one byte; any non-zero byte reads back as `true`.
impl BlockField for bool {
    const SIZE: usize = 1;

    #[inline]
    fn write_le(&self, out: &mut [u8]) {
        out[0] = u8::from(*self);
    }

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

/// Stored in the UEFI mixed-endian wire format.
impl BlockField for Guid {
    const SIZE: usize = 16;

    #[inline]
    fn write_le(&self, out: &mut [u8]) {
        out[..16].copy_from_slice(&self.to_bytes());
    }

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        let mut raw = [0u8; 16];
        raw.copy_from_slice(&bytes[..16]);
        Self::from_bytes(raw)
    }
}

impl<T: BlockField, const N: usize> BlockField for [T; N] {
    const SIZE: usize = T::SIZE * N;

    fn write_le(&self, out: &mut [u8]) {
        for (item, chunk) in self.iter().zip(out.chunks_exact_mut(T::SIZE)) {
            item.write_le(chunk);
        }
    }

    fn read_le(bytes: &[u8]) -> Self {
        core::array::from_fn(|i| T::read_le(&bytes[i * T::SIZE..(i + 1) * T::SIZE]))
    }
}

/// Implements [`BlockField`] for `bitfield-struct` register types by storing
/// their backing integer.
///
/// ```rust
/// use bitfield_struct::bitfield;
/// use config_block::{BlockField, impl_block_field_for_bits};
///
/// #[bitfield(u16)]
/// pub struct PortMask {
///     pub port0: bool,
///     pub port1: bool,
///     #[bits(14)]
///     __: u16,
/// }
///
/// impl_block_field_for_bits!(PortMask: u16);
///
/// let mut raw = [0u8; 2];
/// PortMask::new().with_port1(true).write_le(&mut raw);
/// assert_eq!(raw, [0b10, 0]);
/// ```
#[macro_export]
macro_rules! impl_block_field_for_bits {
    ($($ty:ty : $bits:ty),* $(,)?) => {
        $(
            impl $crate::BlockField for $ty {
                const SIZE: usize = <$bits as $crate::BlockField>::SIZE;

                #[inline]
                fn write_le(&self, out: &mut [u8]) {
                    <$bits as $crate::BlockField>::write_le(&self.into_bits(), out);
                }

                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    Self::from_bits(<$bits as $crate::BlockField>::read_le(bytes))
                }
            }
        )*
    };
}
