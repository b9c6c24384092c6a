//! Transaction management and access.
//!
//! # Core Types (re-exported at crate root)
//!
//! - [`Transaction`] - A read-only or read-write transaction
//! - [`Database`] - Handle to an opened database
//! - [`RO`], [`RW`] - Transaction kind markers
//!
//! Raw FFI calls for data operations live in the private `ops` module; the
//! typed layer never hands out engine pointers.

mod database;
pub use database::Database;

mod kind;
pub use kind::{RO, RW, TransactionKind};

pub(crate) mod ops;

mod transaction;
pub use transaction::Transaction;
