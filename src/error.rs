use std::ffi::c_int;
use thiserror::Error;

/// Result type returned by all fallible operations in this crate.
pub type LmdbResult<T> = Result<T, LmdbError>;

/// An LMDB error kind.
///
/// Engine return codes map onto dedicated variants; any other code is an OS
/// errno surfaced unchanged by the engine or the filesystem and is carried
/// in [`LmdbError::Other`]. [`LmdbError::NotOpen`] is the one condition
/// raised by this crate itself, for queries that require an opened
/// environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LmdbError {
    /// key/data pair already exists.
    #[error("key/data pair already exists")]
    KeyExist,
    /// key/data pair not found (EOF).
    #[error("no matching key/data pair found")]
    NotFound,
    /// Requested page not found - this usually indicates corruption.
    #[error("requested page not found")]
    PageNotFound,
    /// Located page was wrong type.
    #[error("located page was wrong type")]
    Corrupted,
    /// Update of meta page failed or environment had fatal error.
    #[error("update of meta page failed or environment had fatal error")]
    Panic,
    /// Environment version mismatch.
    #[error("environment version mismatch")]
    VersionMismatch,
    /// File is not a valid LMDB file.
    #[error("file is not an LMDB file")]
    Invalid,
    /// Environment mapsize reached.
    #[error("environment mapsize limit reached")]
    MapFull,
    /// Environment maxdbs reached.
    #[error("environment maxdbs limit reached")]
    DbsFull,
    /// Environment maxreaders reached.
    #[error("environment maxreaders limit reached")]
    ReadersFull,
    /// Thread-local storage keys full - too many environments open.
    #[error("thread-local storage keys full - too many environments open")]
    TlsFull,
    /// Transaction has too many dirty pages.
    #[error("transaction has too many dirty pages")]
    TxnFull,
    /// Cursor stack too deep - internal error.
    #[error("cursor stack too deep - internal error")]
    CursorFull,
    /// Page has not enough space - internal error.
    #[error("page has not enough space - internal error")]
    PageFull,
    /// Database contents grew beyond environment mapsize.
    #[error("database contents grew beyond environment mapsize")]
    MapResized,
    /// Operation and DB incompatible, or DB type changed.
    #[error("operation and DB incompatible, or DB type changed")]
    Incompatible,
    /// Invalid reuse of reader locktable slot.
    #[error("invalid reuse of reader locktable slot")]
    BadRslot,
    /// Transaction must abort, has a child, or is invalid.
    #[error("transaction must abort, has a child, or is invalid")]
    BadTxn,
    /// Unsupported size of key/DB name/data, or wrong DUPFIXED size.
    #[error("unsupported size of key/DB name/data, or wrong DUPFIXED size")]
    BadValSize,
    /// The specified DBI was changed unexpectedly.
    #[error("the specified DBI handle was closed or changed unexpectedly")]
    BadDbi,
    /// The environment has not been opened yet.
    ///
    /// Returned by queries such as [`Environment::path`] that are only
    /// meaningful once [`Environment::open`] has succeeded.
    ///
    /// [`Environment::path`]: crate::Environment::path
    /// [`Environment::open`]: crate::Environment::open
    #[error("environment is not yet open")]
    NotOpen,
    /// Unclassified error code, typically an OS errno surfaced by the
    /// engine or the filesystem (`ENOENT`, `EACCES`, `EINVAL`, ...).
    #[error("{}", os_error_message(.0))]
    Other(c_int),
}

fn os_error_message(code: &c_int) -> String {
    std::io::Error::from_raw_os_error(*code).to_string()
}

impl LmdbError {
    /// Converts a raw engine return code to an `LmdbError`.
    pub const fn from_err_code(err_code: c_int) -> LmdbError {
        match err_code {
            ffi::MDB_KEYEXIST => LmdbError::KeyExist,
            ffi::MDB_NOTFOUND => LmdbError::NotFound,
            ffi::MDB_PAGE_NOTFOUND => LmdbError::PageNotFound,
            ffi::MDB_CORRUPTED => LmdbError::Corrupted,
            ffi::MDB_PANIC => LmdbError::Panic,
            ffi::MDB_VERSION_MISMATCH => LmdbError::VersionMismatch,
            ffi::MDB_INVALID => LmdbError::Invalid,
            ffi::MDB_MAP_FULL => LmdbError::MapFull,
            ffi::MDB_DBS_FULL => LmdbError::DbsFull,
            ffi::MDB_READERS_FULL => LmdbError::ReadersFull,
            ffi::MDB_TLS_FULL => LmdbError::TlsFull,
            ffi::MDB_TXN_FULL => LmdbError::TxnFull,
            ffi::MDB_CURSOR_FULL => LmdbError::CursorFull,
            ffi::MDB_PAGE_FULL => LmdbError::PageFull,
            ffi::MDB_MAP_RESIZED => LmdbError::MapResized,
            ffi::MDB_INCOMPATIBLE => LmdbError::Incompatible,
            ffi::MDB_BAD_RSLOT => LmdbError::BadRslot,
            ffi::MDB_BAD_TXN => LmdbError::BadTxn,
            ffi::MDB_BAD_VALSIZE => LmdbError::BadValSize,
            ffi::MDB_BAD_DBI => LmdbError::BadDbi,
            other => LmdbError::Other(other),
        }
    }

    /// Converts an `LmdbError` back to the raw engine return code.
    pub const fn to_err_code(&self) -> c_int {
        match self {
            LmdbError::KeyExist => ffi::MDB_KEYEXIST,
            LmdbError::NotFound => ffi::MDB_NOTFOUND,
            LmdbError::PageNotFound => ffi::MDB_PAGE_NOTFOUND,
            LmdbError::Corrupted => ffi::MDB_CORRUPTED,
            LmdbError::Panic => ffi::MDB_PANIC,
            LmdbError::VersionMismatch => ffi::MDB_VERSION_MISMATCH,
            LmdbError::Invalid => ffi::MDB_INVALID,
            LmdbError::MapFull => ffi::MDB_MAP_FULL,
            LmdbError::DbsFull => ffi::MDB_DBS_FULL,
            LmdbError::ReadersFull => ffi::MDB_READERS_FULL,
            LmdbError::TlsFull => ffi::MDB_TLS_FULL,
            LmdbError::TxnFull => ffi::MDB_TXN_FULL,
            LmdbError::CursorFull => ffi::MDB_CURSOR_FULL,
            LmdbError::PageFull => ffi::MDB_PAGE_FULL,
            LmdbError::MapResized => ffi::MDB_MAP_RESIZED,
            LmdbError::Incompatible => ffi::MDB_INCOMPATIBLE,
            LmdbError::BadRslot => ffi::MDB_BAD_RSLOT,
            LmdbError::BadTxn => ffi::MDB_BAD_TXN,
            LmdbError::BadValSize => ffi::MDB_BAD_VALSIZE,
            LmdbError::BadDbi => ffi::MDB_BAD_DBI,
            // Wrapper-level ordering error; the closest errno is EINVAL.
            LmdbError::NotOpen => libc::EINVAL,
            LmdbError::Other(code) => *code,
        }
    }

    /// Returns `true` if the root cause of this error is a missing file or
    /// directory.
    ///
    /// This holds uniformly whether the `ENOENT` originated in the
    /// filesystem (opening an environment at a nonexistent path) or inside
    /// the engine; callers can branch on it without knowing which layer
    /// failed.
    pub const fn is_not_exist(&self) -> bool {
        match self {
            LmdbError::Other(code) => *code == libc::ENOENT,
            _ => false,
        }
    }

    /// Returns the OS errno behind this error, if there is one.
    ///
    /// Engine-specific conditions ([`LmdbError::NotFound`],
    /// [`LmdbError::MapFull`], ...) and wrapper-level conditions
    /// ([`LmdbError::NotOpen`]) return `None`; errors that wrap a raw
    /// system error code return it, enabling errno-equality checks such as
    /// `err.os_errno() == Some(libc::EINVAL)`.
    pub const fn os_errno(&self) -> Option<c_int> {
        match self {
            LmdbError::Other(code) => Some(*code),
            _ => None,
        }
    }
}

/// Translates an engine return code into an empty `LmdbResult`.
#[inline]
pub(crate) fn lmdb_result(err_code: c_int) -> LmdbResult<()> {
    if err_code == ffi::MDB_SUCCESS { Ok(()) } else { Err(LmdbError::from_err_code(err_code)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_err_code_roundtrip() {
        for code in [ffi::MDB_KEYEXIST, ffi::MDB_NOTFOUND, ffi::MDB_MAP_FULL, ffi::MDB_BAD_DBI] {
            assert_eq!(LmdbError::from_err_code(code).to_err_code(), code);
        }
        assert_eq!(LmdbError::from_err_code(libc::EACCES), LmdbError::Other(libc::EACCES));
    }

    #[test]
    fn test_classification() {
        assert!(LmdbError::from_err_code(libc::ENOENT).is_not_exist());
        assert!(!LmdbError::NotFound.is_not_exist());
        assert!(!LmdbError::NotOpen.is_not_exist());

        assert_eq!(LmdbError::from_err_code(libc::EINVAL).os_errno(), Some(libc::EINVAL));
        assert_eq!(LmdbError::MapFull.os_errno(), None);
        assert_eq!(LmdbError::NotOpen.os_errno(), None);
    }

    #[test]
    fn test_display_uses_os_message() {
        let msg = LmdbError::Other(libc::ENOENT).to_string();
        assert!(!msg.is_empty());
        assert_ne!(msg, LmdbError::NotFound.to_string());
    }
}
