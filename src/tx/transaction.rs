use crate::{
    Database, DatabaseFlags, Environment, LmdbResult, Stat, TransactionKind, WriteFlags,
    error::lmdb_result,
    tx::{kind::RW, ops},
};
use smallvec::SmallVec;
use std::{ffi::CStr, fmt, marker::PhantomData, ptr};

/// An LMDB transaction.
///
/// All database operations require a transaction. The marker type `K`
/// ([`RO`] or [`RW`]) fixes the kind at compile time; write operations are
/// only available on `Transaction<RW>`. The transaction borrows its
/// [`Environment`] and is aborted on drop unless [`Transaction::commit`]
/// consumed it first.
///
/// Transactions are intentionally neither `Send` nor `Sync`: the engine
/// requires a write transaction to be used and finished on the thread that
/// began it.
///
/// [`RO`]: crate::RO
/// [`RW`]: crate::RW
pub struct Transaction<'env, K: TransactionKind> {
    txn: *mut ffi::MDB_txn,
    committed: bool,
    env: &'env Environment,
    // The raw pointer member keeps the type !Send and !Sync.
    _kind: PhantomData<(K, *mut ())>,
}

impl<'env, K: TransactionKind> Transaction<'env, K> {
    pub(crate) fn new(env: &'env Environment) -> LmdbResult<Transaction<'env, K>> {
        let mut txn: *mut ffi::MDB_txn = ptr::null_mut();
        // SAFETY: env borrows a live environment handle.
        unsafe {
            lmdb_result(ffi::mdb_txn_begin(
                env.env_ptr(),
                ptr::null_mut(),
                K::OPEN_FLAGS,
                &mut txn,
            ))?;
        }
        tracing::trace!(target: "lmdb", read_only = K::IS_READ_ONLY, "transaction begun");
        Ok(Transaction { txn, committed: false, env, _kind: PhantomData })
    }

    /// Returns the environment this transaction runs in.
    pub const fn env(&self) -> &'env Environment {
        self.env
    }

    /// Commits the transaction, making any pending operations durable.
    ///
    /// The engine frees the transaction whether or not the commit succeeds;
    /// on error the pending operations are discarded and the error is
    /// surfaced unchanged.
    pub fn commit(mut self) -> LmdbResult<()> {
        // Spent either way; Drop must not abort it again.
        self.committed = true;
        // SAFETY: txn is live until this call.
        let result = unsafe { lmdb_result(ffi::mdb_txn_commit(self.txn)) };
        tracing::trace!(target: "lmdb", read_only = K::IS_READ_ONLY, ok = result.is_ok(), "transaction committed");
        result
    }

    /// Aborts the transaction, discarding any pending operations.
    ///
    /// Equivalent to dropping the value; provided for call sites that want
    /// the abort to be visible.
    pub fn abort(self) {
        drop(self);
    }

    /// Gets an item from a database.
    ///
    /// Returns `None` if the key is not present. If the database supports
    /// duplicate keys ([`DatabaseFlags::DUP_SORT`]), the first data item
    /// for the key is returned; retrieval of the others needs a dedicated
    /// lookup by pair. The returned slice borrows the memory map and is
    /// valid until the transaction ends.
    pub fn get(&self, db: Database, key: impl AsRef<[u8]>) -> LmdbResult<Option<&[u8]>> {
        // SAFETY: the transaction is live for `&self`; the borrow is tied
        // to it by the signature.
        unsafe { ops::get_raw(self.txn, db.dbi(), key.as_ref()) }
    }

    /// Opens a handle to a database.
    ///
    /// If `name` is `None`, the returned handle is for the unnamed default
    /// database. Otherwise it is for the named database, which must already
    /// exist (see [`Transaction::create_db`]); named databases require the
    /// environment to have been configured with
    /// [`Environment::set_max_dbs`] before open.
    ///
    /// The database name may not contain the null character.
    pub fn open_db(&self, name: Option<&str>) -> LmdbResult<Database> {
        self.open_db_with_flags(name, DatabaseFlags::empty())
    }

    fn open_db_with_flags(&self, name: Option<&str>, flags: DatabaseFlags) -> LmdbResult<Database> {
        let mut c_name_buf = SmallVec::<[u8; 32]>::new();
        let c_name = name.map(|n| {
            c_name_buf.extend_from_slice(n.as_bytes());
            c_name_buf.push(0);
            CStr::from_bytes_with_nul(&c_name_buf).unwrap()
        });
        let name_ptr = c_name.as_ref().map_or(ptr::null(), |s| s.as_ptr());

        // SAFETY: the transaction is live; name_ptr is null or points to a
        // nul-terminated string.
        let (dbi, db_flags) = unsafe { ops::open_db_raw(self.txn, name_ptr, flags)? };
        Ok(Database::new(dbi, db_flags))
    }

    /// Retrieves statistics for a database.
    pub fn db_stat(&self, db: Database) -> LmdbResult<Stat> {
        // SAFETY: the transaction is live for `&self`.
        unsafe { ops::db_stat_raw(self.txn, db.dbi()) }
    }

    /// Gets the effective option flags for a database.
    pub fn db_flags(&self, db: Database) -> LmdbResult<DatabaseFlags> {
        // SAFETY: the transaction is live for `&self`.
        unsafe { ops::db_flags_raw(self.txn, db.dbi()) }
    }
}

impl Transaction<'_, RW> {
    /// Opens a handle to a database, creating the database if necessary.
    ///
    /// If the database already exists, the given option flags are added to
    /// it and the handle carries the effective persisted set. Named
    /// databases require [`Environment::set_max_dbs`]; exceeding that limit
    /// fails with [`LmdbError::DbsFull`](crate::LmdbError::DbsFull).
    pub fn create_db(&self, name: Option<&str>, flags: DatabaseFlags) -> LmdbResult<Database> {
        self.open_db_with_flags(name, flags | DatabaseFlags::CREATE)
    }

    /// Stores an item into a database.
    ///
    /// The default behavior is to enter the new key/data pair, replacing
    /// any previously existing key if duplicates are disallowed, or adding
    /// a duplicate data item if duplicates are allowed
    /// ([`DatabaseFlags::DUP_SORT`]). See [`WriteFlags`] for the
    /// alternatives.
    pub fn put(
        &self,
        db: Database,
        key: impl AsRef<[u8]>,
        data: impl AsRef<[u8]>,
        flags: WriteFlags,
    ) -> LmdbResult<()> {
        // SAFETY: the transaction is live for `&self` and read-write by
        // construction.
        unsafe { ops::put_raw(self.txn, db.dbi(), key.as_ref(), data.as_ref(), flags) }
    }

    /// Deletes items from a database.
    ///
    /// If `data` is `Some`, only the exactly matching key/data pair is
    /// deleted (relevant for [`DatabaseFlags::DUP_SORT`] databases);
    /// otherwise all values for the key are. Returns `true` if anything was
    /// present.
    pub fn del(
        &self,
        db: Database,
        key: impl AsRef<[u8]>,
        data: Option<&[u8]>,
    ) -> LmdbResult<bool> {
        // SAFETY: the transaction is live for `&self` and read-write by
        // construction.
        unsafe { ops::del_raw(self.txn, db.dbi(), key.as_ref(), data) }
    }

    /// Empties the given database. All items are removed.
    pub fn clear_db(&self, db: Database) -> LmdbResult<()> {
        // SAFETY: the transaction is live for `&self` and read-write by
        // construction.
        unsafe { ops::clear_db_raw(self.txn, db.dbi()) }
    }

    /// Deletes the database from the environment.
    ///
    /// # Safety
    ///
    /// The caller must ensure that no other [`Database`] handle for the
    /// same database is used after this call; the engine invalidates them
    /// all once the transaction commits.
    pub unsafe fn drop_db(&self, db: Database) -> LmdbResult<()> {
        // SAFETY: forwarded from the caller's contract.
        unsafe { ops::drop_db_raw(self.txn, db.dbi()) }
    }
}

impl<K: TransactionKind> fmt::Debug for Transaction<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction").field("read_only", &K::IS_READ_ONLY).finish_non_exhaustive()
    }
}

impl<K: TransactionKind> Drop for Transaction<'_, K> {
    fn drop(&mut self) {
        if !self.committed {
            // SAFETY: txn is live and exclusively owned by this value.
            unsafe { ffi::mdb_txn_abort(self.txn) };
            tracing::trace!(target: "lmdb", read_only = K::IS_READ_ONLY, "transaction aborted");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Environment, EnvironmentFlags, WriteFlags};
    use tempfile::tempdir;

    fn open_env(path: &std::path::Path) -> Environment {
        let mut env = Environment::new().unwrap();
        env.open(path, EnvironmentFlags::empty(), 0o644).unwrap();
        env
    }

    #[test]
    fn test_empty_value_roundtrip() {
        let dir = tempdir().unwrap();
        let env = open_env(dir.path());

        let txn = env.begin_rw_txn().unwrap();
        let db = txn.open_db(None).unwrap();
        txn.put(db, b"empty", b"", WriteFlags::empty()).unwrap();
        txn.commit().unwrap();

        let txn = env.begin_ro_txn().unwrap();
        let db = txn.open_db(None).unwrap();
        assert_eq!(txn.get(db, b"empty").unwrap(), Some(&[][..]));
    }

    #[test]
    fn test_value_borrow_outlives_operations() {
        let dir = tempdir().unwrap();
        let env = open_env(dir.path());

        let txn = env.begin_rw_txn().unwrap();
        let db = txn.open_db(None).unwrap();
        txn.put(db, b"k1", b"v1", WriteFlags::empty()).unwrap();
        txn.put(db, b"k2", b"v2", WriteFlags::empty()).unwrap();

        let v1 = txn.get(db, b"k1").unwrap().unwrap();
        let v2 = txn.get(db, b"k2").unwrap().unwrap();
        assert_eq!((v1, v2), (&b"v1"[..], &b"v2"[..]));
    }
}
