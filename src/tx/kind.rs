use std::{ffi::c_uint, fmt::Debug};

mod private {
    pub trait Sealed {}

    impl Sealed for super::RO {}
    impl Sealed for super::RW {}
}

/// Marker trait for transaction kinds. Either [`RO`] or [`RW`].
pub trait TransactionKind: private::Sealed + Debug + 'static {
    /// Flags passed to the engine when a transaction of this kind begins.
    #[doc(hidden)]
    const OPEN_FLAGS: c_uint;

    /// Convenience flag for distinguishing between read-only and read-write transactions.
    #[doc(hidden)]
    const IS_READ_ONLY: bool;
}

/// Marker type for read-only transactions.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct RO;

/// Marker type for read-write transactions.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct RW;

impl TransactionKind for RO {
    const OPEN_FLAGS: c_uint = ffi::MDB_RDONLY;
    const IS_READ_ONLY: bool = true;
}

impl TransactionKind for RW {
    const OPEN_FLAGS: c_uint = 0;
    const IS_READ_ONLY: bool = false;
}
