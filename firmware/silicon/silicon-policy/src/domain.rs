//! # Policy Domains
//!
//! A domain is a category of configuration (CPU, memory, chipset, ...) with
//! its own table and a closed set of block kinds known at compile time. Each
//! domain names its kinds in an enum implementing [`BlockKind`]; the GUID of
//! each kind stays the identifier on the wire.
//!
//! Domains are declared with [`policy_domain!`](crate::policy_domain).

use config_block::{BlockRef, ConfigBlock, ConfigBlockTable, Guid, TableCapacity, TableError};
use core::fmt::Debug;

/// The closed set of block kinds of one domain.
pub trait BlockKind: Copy + Eq + Debug + 'static {
    /// Every kind, in the order defaults are appended.
    const ALL: &'static [Self];

    /// Wire identifier of the kind's block.
    fn guid(self) -> Guid;

    /// Name of the block type, for diagnostics.
    fn name(self) -> &'static str;

    /// Dense index of the kind, `0..ALL.len()`.
    fn index(self) -> usize;

    /// Appends the kind's compiled-in default block to `table`.
    ///
    /// # Errors
    /// Propagates [`ConfigBlockTable::add`] failures.
    fn add_default(self, table: &mut ConfigBlockTable) -> Result<BlockRef, TableError>;

    /// Maps a wire identifier back to the kind.
    #[must_use]
    fn from_guid(guid: Guid) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.guid() == guid)
    }
}

/// A policy domain.
pub trait PolicyDomain: 'static {
    /// Domain identifier; also the GUID in the table header.
    const ID: Guid;
    const NAME: &'static str;
    /// Table revision.
    const REVISION: u8;
    /// Exact room for the domain's default blocks.
    const CAPACITY: TableCapacity;

    type Kind: BlockKind;
}

/// Marks `Self` as a block kind of domain `D`.
pub trait DomainBlock<D: PolicyDomain>: ConfigBlock {
    const KIND: D::Kind;
}

/// Declares a policy domain, its kind enum and the [`DomainBlock`] impls.
///
/// ```rust
/// use silicon_policy::{BlockKind, ConfigBlock, PolicyDomain, policy_domain};
///
/// #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ConfigBlock)]
/// #[config_block(guid = "8e2b7c1a-6d4f-4b3e-9a05-1c2d3e4f5a6b", revision = 1)]
/// pub struct FanConfig {
///     pub duty_cycle: u8,
/// }
///
/// policy_domain! {
///     /// Fan control.
///     pub struct FanPolicy {
///         id: "d3b1a2c4-5e6f-4708-9a1b-2c3d4e5f6071",
///         name: "Fan",
///         revision: 1,
///         kinds: FanBlock {
///             Config => FanConfig,
///         },
///     }
/// }
///
/// assert_eq!(FanPolicy::NAME, "Fan");
/// assert_eq!(FanBlock::ALL, &[FanBlock::Config]);
/// assert_eq!(FanPolicy::CAPACITY.bytes, 24 + 1);
/// ```
#[macro_export]
macro_rules! policy_domain {
    (
        $(#[$meta:meta])*
        $vis:vis struct $domain:ident {
            id: $id:literal,
            name: $name:literal,
            revision: $revision:literal,
            kinds: $kind:ident {
                $($variant:ident => $block:ty),+ $(,)?
            } $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis struct $domain;

        #[doc = concat!("Block kinds of the ", $name, " policy domain.")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $kind {
            $($variant),+
        }

        impl $crate::BlockKind for $kind {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn guid(self) -> $crate::Guid {
                match self {
                    $(Self::$variant => <$block as $crate::ConfigBlock>::GUID),+
                }
            }

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($block)),+
                }
            }

            fn index(self) -> usize {
                self as usize
            }

            fn add_default(
                self,
                table: &mut $crate::ConfigBlockTable,
            ) -> ::core::result::Result<$crate::BlockRef, $crate::TableError> {
                match self {
                    $(Self::$variant => table.add(&<$block as ::core::default::Default>::default())),+
                }
            }
        }

        impl $crate::PolicyDomain for $domain {
            const ID: $crate::Guid = $crate::guid!($id);
            const NAME: &'static str = $name;
            const REVISION: u8 = $revision;
            const CAPACITY: $crate::TableCapacity = $crate::TableCapacity::exact(&[
                $(<$block as $crate::ConfigBlock>::BLOCK_SIZE),+
            ]);

            type Kind = $kind;
        }

        $(
            impl $crate::DomainBlock<$domain> for $block {
                const KIND: $kind = $kind::$variant;
            }
        )+
    };
}
