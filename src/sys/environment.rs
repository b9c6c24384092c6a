use crate::{
    EnvironmentFlags, LmdbError, LmdbResult, RO, RW, Transaction,
    error::lmdb_result,
};
use std::{
    ffi::{CStr, CString, c_char, c_int, c_uint},
    fmt,
    path::Path,
    ptr,
};

/// A handle to one LMDB storage environment.
///
/// The handle starts out *unopened*: [`Environment::new`] allocates the
/// engine handle without touching the filesystem. Configure it with the
/// `set_*` methods, then bind it to a directory with [`Environment::open`].
/// Once open it can serve any number of [`Transaction`]s, which borrow the
/// environment for their lifetime.
///
/// Dropping the handle releases the engine resources. [`Environment::close`]
/// does the same eagerly; since it consumes the value, using a closed
/// environment is a compile error.
///
/// The handle may be shared across threads once set up (`&self` methods are
/// engine-synchronized), but configuration and teardown belong to a single
/// controlling thread: the mutating setters take `&mut self`, which also
/// guarantees no transaction is live while pre-open settings or the map
/// size change.
pub struct Environment {
    env: *mut ffi::MDB_env,
}

// SAFETY: the engine synchronizes transactional use of the handle
// internally; configuration mutators take `&mut self`.
unsafe impl Send for Environment {}

// SAFETY: see above.
unsafe impl Sync for Environment {}

impl Environment {
    /// Allocates a new, unopened environment handle.
    ///
    /// No filesystem or mapping resource is touched until
    /// [`Environment::open`]; this fails only if the engine cannot allocate
    /// the handle.
    pub fn new() -> LmdbResult<Environment> {
        let mut env: *mut ffi::MDB_env = ptr::null_mut();
        unsafe { lmdb_result(ffi::mdb_env_create(&mut env))? };
        Ok(Environment { env })
    }

    /// Opens the environment at `path`.
    ///
    /// By default `path` must be an existing directory the process can
    /// access; with [`EnvironmentFlags::NO_SUB_DIR`] it names the data file
    /// itself. `mode` is the UNIX permission set applied to files the
    /// engine creates (ignored on Windows). Opening a nonexistent path
    /// fails with an error for which [`LmdbError::is_not_exist`] returns
    /// `true`.
    ///
    /// [`EnvironmentFlags::NO_TLS`] is always added to `flags`: read
    /// transactions are owned by [`Transaction`] values rather than OS
    /// threads.
    ///
    /// Opening an environment that is already open is an error; the engine
    /// rejects the second open with `EINVAL`. If `open` fails, the handle
    /// must be discarded: dropping it remains valid (and required, to
    /// release the engine handle), but no further operation is.
    pub fn open(
        &mut self,
        path: &Path,
        flags: EnvironmentFlags,
        mode: ffi::mdb_mode_t,
    ) -> LmdbResult<()> {
        let c_path = path_to_cstring(path)?;
        let flags = flags | EnvironmentFlags::NO_TLS;
        unsafe { lmdb_result(ffi::mdb_env_open(self.env, c_path.as_ptr(), flags.bits(), mode))? };
        tracing::debug!(target: "lmdb", path = %path.display(), ?flags, "environment opened");
        Ok(())
    }

    /// Closes the environment, releasing all engine resources.
    ///
    /// Equivalent to dropping the handle; provided for call sites that want
    /// the release to be visible. Valid in every state, including on an
    /// environment that was never opened or whose open failed.
    pub fn close(self) {
        drop(self);
    }

    /// Returns the path the environment was opened at.
    ///
    /// This is exactly the string passed to [`Environment::open`], not a
    /// normalized or resolved variant. Before a successful open there is no
    /// path, and this fails with [`LmdbError::NotOpen`].
    pub fn path(&self) -> LmdbResult<&Path> {
        let mut path_ptr: *const c_char = ptr::null();
        unsafe { lmdb_result(ffi::mdb_env_get_path(self.env, &mut path_ptr))? };
        if path_ptr.is_null() {
            return Err(LmdbError::NotOpen);
        }
        // SAFETY: the engine owns the path string; it is set once at open
        // and lives until the handle is closed, which `&self` outlives.
        let path = unsafe { CStr::from_ptr(path_ptr) };
        let path = path.to_str().map_err(|_| LmdbError::Invalid)?;
        Ok(Path::new(path))
    }

    /// Sets the size of the memory map, in bytes.
    ///
    /// The size is the maximum the database may grow to and should be a
    /// multiple of the OS page size. It may be set freely before open and
    /// increased after open; the engine rejects a post-open change while
    /// transactions are live, which the `&mut self` receiver already rules
    /// out within this process. The new size takes effect for subsequent
    /// transactions and is reported by [`Environment::info`].
    pub fn set_map_size(&mut self, size: usize) -> LmdbResult<()> {
        unsafe { lmdb_result(ffi::mdb_env_set_mapsize(self.env, size))? };
        tracing::debug!(target: "lmdb", size, "map size set");
        Ok(())
    }

    /// Sets the maximum number of concurrent reader slots.
    ///
    /// Only valid on an unopened environment; once open, the slot table is
    /// sized and the engine rejects changes with `EINVAL`.
    pub fn set_max_readers(&mut self, readers: u32) -> LmdbResult<()> {
        unsafe { lmdb_result(ffi::mdb_env_set_maxreaders(self.env, readers)) }
    }

    /// Returns the effective maximum number of reader slots, whether
    /// configured or the engine default.
    pub fn max_readers(&self) -> LmdbResult<u32> {
        let mut readers: c_uint = 0;
        unsafe { lmdb_result(ffi::mdb_env_get_maxreaders(self.env, &mut readers))? };
        Ok(readers)
    }

    /// Sets the maximum number of named databases the environment can
    /// track.
    ///
    /// Only needed when named databases are used; keep it small, since the
    /// engine scans the table linearly on every database open. Only valid
    /// on an unopened environment.
    pub fn set_max_dbs(&mut self, dbs: u32) -> LmdbResult<()> {
        unsafe { lmdb_result(ffi::mdb_env_set_maxdbs(self.env, dbs)) }
    }

    /// Sets the given environment flags.
    ///
    /// Bits already set are unaffected; see [`EnvironmentFlags`] for which
    /// bits the engine accepts after open. Concurrent flag mutation from
    /// several threads is the caller's to serialize.
    pub fn set_flags(&self, flags: EnvironmentFlags) -> LmdbResult<()> {
        unsafe { lmdb_result(ffi::mdb_env_set_flags(self.env, flags.bits(), 1)) }
    }

    /// Clears the given environment flags.
    pub fn unset_flags(&self, flags: EnvironmentFlags) -> LmdbResult<()> {
        unsafe { lmdb_result(ffi::mdb_env_set_flags(self.env, flags.bits(), 0)) }
    }

    /// Returns the currently effective environment flags, the union of
    /// defaults and explicitly set bits.
    pub fn flags(&self) -> LmdbResult<EnvironmentFlags> {
        let mut flags: c_uint = 0;
        unsafe { lmdb_result(ffi::mdb_env_get_flags(self.env, &mut flags))? };
        Ok(EnvironmentFlags::from_bits_truncate(flags))
    }

    /// Flushes buffered data to disk.
    ///
    /// Only meaningful when the environment runs with
    /// [`EnvironmentFlags::NO_SYNC`], [`EnvironmentFlags::NO_META_SYNC`] or
    /// [`EnvironmentFlags::MAP_ASYNC`]; `force` flushes even then. Fails
    /// with `EACCES` on a read-only environment.
    pub fn sync(&self, force: bool) -> LmdbResult<()> {
        unsafe { lmdb_result(ffi::mdb_env_sync(self.env, force as c_int)) }
    }

    /// Returns statistics about the environment's main B+tree.
    pub fn stat(&self) -> LmdbResult<Stat> {
        let mut stat = Stat::new();
        unsafe { lmdb_result(ffi::mdb_env_stat(self.env, stat.mdb_stat()))? };
        Ok(stat)
    }

    /// Returns a snapshot of environment information, including the current
    /// map size.
    pub fn info(&self) -> LmdbResult<Info> {
        let mut info = Info::new();
        unsafe { lmdb_result(ffi::mdb_env_info(self.env, info.mdb_info()))? };
        Ok(info)
    }

    /// Returns the maximum size of a key, in bytes.
    ///
    /// This is a fixed engine constant (511 for default engine builds). It
    /// is available in every handle state, including on an environment that
    /// was never opened.
    pub fn max_key_size(&self) -> u32 {
        unsafe { ffi::mdb_env_get_maxkeysize(self.env) as u32 }
    }

    /// Copies the environment to `path` as a consistent hot backup.
    ///
    /// `path` must be an existing, empty, writable directory.
    pub fn copy(&self, path: &Path) -> LmdbResult<()> {
        let c_path = path_to_cstring(path)?;
        unsafe { lmdb_result(ffi::mdb_env_copy(self.env, c_path.as_ptr())) }
    }

    /// Clears reader slots held by crashed processes, returning the number
    /// of slots cleared.
    pub fn reader_check(&self) -> LmdbResult<usize> {
        let mut dead: c_int = 0;
        unsafe { lmdb_result(ffi::mdb_reader_check(self.env, &mut dead))? };
        Ok(dead as usize)
    }

    /// Begins a read-only transaction.
    pub fn begin_ro_txn(&self) -> LmdbResult<Transaction<'_, RO>> {
        Transaction::new(self)
    }

    /// Begins a read-write transaction.
    ///
    /// Blocks until any other write transaction on the environment (in this
    /// or another process) finishes.
    pub fn begin_rw_txn(&self) -> LmdbResult<Transaction<'_, RW>> {
        Transaction::new(self)
    }

    /// Runs `work` inside a read-write transaction.
    ///
    /// The transaction is committed when `work` returns `Ok` and aborted
    /// when it returns `Err`; either way the closure's result (or the
    /// commit error) is surfaced unchanged.
    pub fn update<'env, T, F>(&'env self, work: F) -> LmdbResult<T>
    where
        F: FnOnce(&Transaction<'env, RW>) -> LmdbResult<T>,
    {
        let txn = self.begin_rw_txn()?;
        let value = work(&txn)?;
        txn.commit()?;
        Ok(value)
    }

    /// Runs `work` inside a read-only transaction, which is finished when
    /// the closure returns.
    pub fn view<'env, T, F>(&'env self, work: F) -> LmdbResult<T>
    where
        F: FnOnce(&Transaction<'env, RO>) -> LmdbResult<T>,
    {
        let txn = self.begin_ro_txn()?;
        work(&txn)
    }

    /// Returns the raw pointer to the engine environment handle.
    pub(crate) const fn env_ptr(&self) -> *mut ffi::MDB_env {
        self.env
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment").finish_non_exhaustive()
    }
}

impl Drop for Environment {
    fn drop(&mut self) {
        tracing::trace!(target: "lmdb", "closing environment");
        // SAFETY: the handle is valid and about to become unreachable.
        // Close is required even after a failed open.
        unsafe { ffi::mdb_env_close(self.env) }
    }
}

fn path_to_cstring(path: &Path) -> LmdbResult<CString> {
    let path = path.to_str().ok_or(LmdbError::Invalid)?;
    CString::new(path).map_err(|_| LmdbError::Invalid)
}

/// Statistics for the environment's main B+tree, as returned by
/// [`Environment::stat`].
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct Stat(ffi::MDB_stat);

impl Stat {
    /// Creates a zeroed `Stat` for the engine to fill in.
    pub(crate) const fn new() -> Stat {
        Stat(unsafe { std::mem::zeroed() })
    }

    /// Returns a mut pointer to the inner `ffi::MDB_stat`.
    pub(crate) const fn mdb_stat(&mut self) -> *mut ffi::MDB_stat {
        &mut self.0
    }

    /// Size of a database page in bytes.
    pub const fn page_size(&self) -> u32 {
        self.0.ms_psize
    }

    /// Depth (height) of the B+tree.
    pub const fn depth(&self) -> u32 {
        self.0.ms_depth
    }

    /// Number of internal (non-leaf) pages.
    pub const fn branch_pages(&self) -> usize {
        self.0.ms_branch_pages
    }

    /// Number of leaf pages.
    pub const fn leaf_pages(&self) -> usize {
        self.0.ms_leaf_pages
    }

    /// Number of overflow pages.
    pub const fn overflow_pages(&self) -> usize {
        self.0.ms_overflow_pages
    }

    /// Number of data items.
    pub const fn entries(&self) -> usize {
        self.0.ms_entries
    }
}

impl fmt::Debug for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stat")
            .field("page_size", &self.page_size())
            .field("depth", &self.depth())
            .field("branch_pages", &self.branch_pages())
            .field("leaf_pages", &self.leaf_pages())
            .field("overflow_pages", &self.overflow_pages())
            .field("entries", &self.entries())
            .finish()
    }
}

/// Environment information snapshot, as returned by [`Environment::info`].
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct Info(ffi::MDB_envinfo);

impl Info {
    /// Creates a zeroed `Info` for the engine to fill in.
    pub(crate) const fn new() -> Info {
        Info(unsafe { std::mem::zeroed() })
    }

    /// Returns a mut pointer to the inner `ffi::MDB_envinfo`.
    pub(crate) const fn mdb_info(&mut self) -> *mut ffi::MDB_envinfo {
        &mut self.0
    }

    /// Size of the memory map in bytes.
    ///
    /// Reflects [`Environment::set_map_size`] growth once the engine has
    /// applied it; run a transaction after the change before relying on the
    /// reported value.
    pub const fn map_size(&self) -> usize {
        self.0.me_mapsize
    }

    /// Page number of the last used page in the map.
    pub const fn last_pgno(&self) -> usize {
        self.0.me_last_pgno
    }

    /// ID of the last committed transaction.
    pub const fn last_txnid(&self) -> usize {
        self.0.me_last_txnid
    }

    /// Maximum number of reader slots.
    pub const fn max_readers(&self) -> u32 {
        self.0.me_maxreaders
    }

    /// Number of reader slots currently in use.
    pub const fn num_readers(&self) -> u32 {
        self.0.me_numreaders
    }
}

impl fmt::Debug for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Info")
            .field("map_size", &self.map_size())
            .field("last_pgno", &self.last_pgno())
            .field("last_txnid", &self.last_txnid())
            .field("max_readers", &self.max_readers())
            .field("num_readers", &self.num_readers())
            .finish()
    }
}
