use bitflags::bitflags;
use std::ffi::c_uint;

bitflags! {
    /// Environment-wide behavioral toggles.
    ///
    /// A subset of these is accepted at [`Environment::open`]; the
    /// durability-related bits ([`NO_SYNC`], [`NO_META_SYNC`],
    /// [`MAP_ASYNC`]) and [`NO_MEM_INIT`] may additionally be toggled at
    /// runtime with [`Environment::set_flags`] and
    /// [`Environment::unset_flags`].
    ///
    /// [`Environment::open`]: crate::Environment::open
    /// [`Environment::set_flags`]: crate::Environment::set_flags
    /// [`Environment::unset_flags`]: crate::Environment::unset_flags
    /// [`NO_SYNC`]: EnvironmentFlags::NO_SYNC
    /// [`NO_META_SYNC`]: EnvironmentFlags::NO_META_SYNC
    /// [`MAP_ASYNC`]: EnvironmentFlags::MAP_ASYNC
    /// [`NO_MEM_INIT`]: EnvironmentFlags::NO_MEM_INIT
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct EnvironmentFlags: c_uint {
        /// Use a fixed address for the memory map.
        ///
        /// The map must be opened at the same address each time; this is an
        /// experimental engine option and highly system dependent.
        const FIXED_MAP = ffi::MDB_FIXEDMAP;

        /// Treat the path passed to `open` as the data file itself rather
        /// than a directory containing it. The lock file gains a `-lock`
        /// suffix next to it.
        const NO_SUB_DIR = ffi::MDB_NOSUBDIR;

        /// Don't flush system buffers to disk when committing a
        /// transaction.
        ///
        /// This trades durability for commit throughput: the last committed
        /// transactions may be lost on system crash, but database integrity
        /// is maintained. Runtime-toggleable.
        const NO_SYNC = ffi::MDB_NOSYNC;

        /// Open the environment read-only. Write transactions fail to
        /// begin, and no lock file modifications occur.
        const READ_ONLY = ffi::MDB_RDONLY;

        /// Flush system buffers to disk only once per transaction, omitting
        /// the separate metadata flush. The last committed transaction may
        /// be lost on system crash. Runtime-toggleable.
        const NO_META_SYNC = ffi::MDB_NOMETASYNC;

        /// Use a writeable memory map unless [`READ_ONLY`] is set.
        ///
        /// Faster for write-heavy workloads, but trades safety: a stray
        /// write through a wild pointer in the process can corrupt the
        /// database.
        ///
        /// [`READ_ONLY`]: EnvironmentFlags::READ_ONLY
        const WRITE_MAP = ffi::MDB_WRITEMAP;

        /// When using [`WRITE_MAP`], flush the map asynchronously.
        /// Runtime-toggleable.
        ///
        /// [`WRITE_MAP`]: EnvironmentFlags::WRITE_MAP
        const MAP_ASYNC = ffi::MDB_MAPASYNC;

        /// Don't tie reader locktable slots to thread-local storage.
        ///
        /// This crate always sets this bit on open: read transactions are
        /// owned by [`Transaction`] values, which may migrate between
        /// threads before first use.
        ///
        /// [`Transaction`]: crate::Transaction
        const NO_TLS = ffi::MDB_NOTLS;

        /// Don't do any locking. Caller takes over concurrency control
        /// entirely; misuse can corrupt the database.
        const NO_LOCK = ffi::MDB_NOLOCK;

        /// Turn off readahead on the memory map. Improves performance when
        /// the database is larger than RAM with random read access.
        const NO_READAHEAD = ffi::MDB_NORDAHEAD;

        /// Don't zero-initialize malloc'd memory before writing it to the
        /// data file. Runtime-toggleable.
        const NO_MEM_INIT = ffi::MDB_NOMEMINIT;
    }
}

bitflags! {
    /// Per-database options, fixed when the database is first created.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct DatabaseFlags: c_uint {
        /// Keys are compared as byte strings in reverse order, from the end
        /// of the key to the beginning.
        const REVERSE_KEY = ffi::MDB_REVERSEKEY;

        /// Allow duplicate (sorted) data items per key.
        const DUP_SORT = ffi::MDB_DUPSORT;

        /// Keys are binary integers in native byte order
        /// (`u32` or `usize`), all of the same size.
        const INTEGER_KEY = ffi::MDB_INTEGERKEY;

        /// With [`DUP_SORT`], all data items for a key are the same size,
        /// enabling fixed-stride storage.
        ///
        /// [`DUP_SORT`]: DatabaseFlags::DUP_SORT
        const DUP_FIXED = ffi::MDB_DUPFIXED;

        /// With [`DUP_SORT`], duplicate data items are binary integers like
        /// [`INTEGER_KEY`].
        ///
        /// [`DUP_SORT`]: DatabaseFlags::DUP_SORT
        /// [`INTEGER_KEY`]: DatabaseFlags::INTEGER_KEY
        const INTEGER_DUP = ffi::MDB_INTEGERDUP;

        /// With [`DUP_SORT`], duplicate data items are compared in reverse
        /// byte order.
        ///
        /// [`DUP_SORT`]: DatabaseFlags::DUP_SORT
        const REVERSE_DUP = ffi::MDB_REVERSEDUP;

        /// Create the named database if it doesn't already exist. Set
        /// implicitly by [`Transaction::create_db`].
        ///
        /// [`Transaction::create_db`]: crate::Transaction::create_db
        const CREATE = ffi::MDB_CREATE;
    }
}

bitflags! {
    /// Options for individual write operations.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct WriteFlags: c_uint {
        /// Fail with [`LmdbError::KeyExist`] instead of overwriting when
        /// the key already exists.
        ///
        /// [`LmdbError::KeyExist`]: crate::LmdbError::KeyExist
        const NO_OVERWRITE = ffi::MDB_NOOVERWRITE;

        /// On a [`DatabaseFlags::DUP_SORT`] database, fail with
        /// [`LmdbError::KeyExist`] if the exact key/data pair is already
        /// present.
        ///
        /// [`LmdbError::KeyExist`]: crate::LmdbError::KeyExist
        const NO_DUP_DATA = ffi::MDB_NODUPDATA;

        /// Replace the item at the current cursor position. Reserved for
        /// cursor-based operation.
        const CURRENT = ffi::MDB_CURRENT;

        /// Append the key/data pair to the end of the database without
        /// comparing against existing keys. Loading pre-sorted data this
        /// way avoids page splits; misordered keys fail with
        /// [`LmdbError::KeyExist`].
        ///
        /// [`LmdbError::KeyExist`]: crate::LmdbError::KeyExist
        const APPEND = ffi::MDB_APPEND;

        /// Like [`APPEND`], for the duplicate items of a
        /// [`DatabaseFlags::DUP_SORT`] database.
        ///
        /// [`APPEND`]: WriteFlags::APPEND
        const APPEND_DUP = ffi::MDB_APPENDDUP;
    }
}
