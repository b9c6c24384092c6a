//! Idiomatic and safe Rust bindings for [LMDB].
//!
//! # Overview
//!
//! [LMDB] (the Lightning Memory-Mapped Database) is an embedded key-value
//! store built on a copy-on-write B+tree over a memory-mapped file, with
//! fully ACID transactions and lock-free readers.
//!
//! This crate provides a safe, idiomatic Rust interface for:
//! - Creating, configuring, and opening memory-mapped database environments
//! - Performing transactional read and write operations
//! - Classifying engine and filesystem failures with typed errors
//!
//! The storage engine itself lives in the native library; this crate is the
//! adaptation layer that owns the environment handle and translates between
//! Rust types and the C API.
//!
//! # Quick Start
//!
//! An environment is a directory on disk holding the data and lock files.
//! The handle starts out unopened: configure it first, then bind it to a
//! path with [`Environment::open`].
//!
//! ```no_run
//! use vellum_lmdb::{Environment, EnvironmentFlags, LmdbResult, WriteFlags};
//! use std::path::Path;
//!
//! fn main() -> LmdbResult<()> {
//!     let mut env = Environment::new()?;
//!     env.set_map_size(10 * 1024 * 1024)?;
//!     env.set_max_dbs(4)?;
//!     env.open(Path::new("/tmp/my_database"), EnvironmentFlags::empty(), 0o644)?;
//!
//!     // Write data in a read-write transaction
//!     let txn = env.begin_rw_txn()?;
//!     let db = txn.open_db(None)?;
//!     txn.put(db, b"hello", b"world", WriteFlags::empty())?;
//!     txn.commit()?;
//!
//!     // Read it back in a read-only transaction
//!     let txn = env.begin_ro_txn()?;
//!     let db = txn.open_db(None)?;
//!     assert_eq!(txn.get(db, b"hello")?, Some(b"world".as_slice()));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Key Concepts
//!
//! - [`Environment`] - A handle to one storage environment. Created
//!   unopened via [`Environment::new()`], configured with the `set_*`
//!   methods, then bound to a directory with [`Environment::open()`].
//!   Dropping the handle (or calling [`Environment::close()`]) releases the
//!   engine resources; because `close` consumes the value, use after close
//!   is a compile error rather than a runtime one.
//! - [`Transaction`] - All database operations happen inside a
//!   transaction. [`RO`] and [`RW`] marker types distinguish read-only from
//!   read-write transactions at the type level. A transaction dropped
//!   without [`Transaction::commit()`] is aborted.
//! - [`Database`] - A handle to the unnamed default database or a named
//!   sub-database within an environment, opened with
//!   [`Transaction::open_db()`] or created with
//!   [`Transaction::create_db()`]. Named databases require
//!   [`Environment::set_max_dbs()`] before open.
//! - [`Environment::update()`] / [`Environment::view()`] - closure-based
//!   helpers that begin a transaction, run your work, and commit on `Ok` or
//!   abort on `Err`.
//!
//! # Environment lifecycle
//!
//! Several settings are consumed by the engine when the environment is
//! opened and are immutable afterwards: [`Environment::set_max_readers()`]
//! and [`Environment::set_max_dbs()`] must be called before
//! [`Environment::open()`], and the engine rejects later attempts with
//! `EINVAL`. The map size may be grown at any time, and runtime flags
//! ([`EnvironmentFlags::NO_SYNC`] and friends) may be toggled with
//! [`Environment::set_flags()`] / [`Environment::unset_flags()`] whenever
//! convenient.
//!
//! Read transactions never use thread-local reader slots: `open` always ORs
//! [`EnvironmentFlags::NO_TLS`] into the open flags, because [`Transaction`]
//! values are free to move between threads before first use.
//!
//! # Error classification
//!
//! Engine return codes map onto [`LmdbError`] variants one to one; anything
//! else (filesystem failures surfaced by the engine) arrives as
//! [`LmdbError::Other`] carrying the OS errno. Two predicates cover the
//! common dispatch cases without the caller needing to know which layer
//! failed: [`LmdbError::is_not_exist()`] for missing paths and
//! [`LmdbError::os_errno()`] for errno equality checks.

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]

pub extern crate lmdb_sys as ffi;

mod error;
pub use error::{LmdbError, LmdbResult};

mod flags;
pub use flags::{DatabaseFlags, EnvironmentFlags, WriteFlags};

pub mod sys;
pub use sys::{Environment, Info, Stat};

pub mod tx;
pub use tx::{Database, RO, RW, Transaction, TransactionKind};
