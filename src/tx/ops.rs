//! Raw operations on transactions.
//!
//! Thin `unsafe` wrappers over the engine's data-plane entry points. Every
//! function takes a live transaction pointer; the typed layer in
//! [`transaction`](super::transaction) is responsible for pointer validity
//! and borrow lifetimes.

use crate::{
    DatabaseFlags, LmdbError, LmdbResult, Stat, WriteFlags,
    error::lmdb_result,
};
use std::{
    ffi::{c_char, c_uint, c_void},
    ptr, slice,
};

/// Builds an `MDB_val` describing `data`.
///
/// The engine does not write through the pointer for any operation in this
/// module; the `*mut` is an artifact of the C signatures.
#[inline]
const fn slice_to_val(data: &[u8]) -> ffi::MDB_val {
    ffi::MDB_val { mv_size: data.len(), mv_data: data.as_ptr() as *mut c_void }
}

/// Borrows the memory the engine handed back in `val`.
///
/// # Safety
///
/// `val` must have been filled in by the engine within a transaction that
/// is still live for the caller-chosen lifetime `'a`.
#[inline]
unsafe fn val_to_slice<'a>(val: ffi::MDB_val) -> &'a [u8] {
    if val.mv_size == 0 {
        &[]
    } else {
        // SAFETY: non-empty engine values point into the memory map and
        // stay valid until the transaction ends.
        unsafe { slice::from_raw_parts(val.mv_data as *const u8, val.mv_size) }
    }
}

/// Reads the value stored at `key`, `MDB_NOTFOUND` mapped to `None`.
///
/// # Safety
///
/// `txn` must be a live transaction on the environment that owns `dbi`.
/// The returned slice borrows the memory map and must not outlive the
/// transaction; the caller picks `'a` accordingly.
pub(crate) unsafe fn get_raw<'a>(
    txn: *mut ffi::MDB_txn,
    dbi: ffi::MDB_dbi,
    key: &[u8],
) -> LmdbResult<Option<&'a [u8]>> {
    let mut key_val = slice_to_val(key);
    let mut data_val = ffi::MDB_val { mv_size: 0, mv_data: ptr::null_mut() };
    // SAFETY: both vals are valid for the duration of the call.
    match unsafe { ffi::mdb_get(txn, dbi, &mut key_val, &mut data_val) } {
        ffi::MDB_SUCCESS => {
            // SAFETY: forwarded from the caller's contract.
            Ok(Some(unsafe { val_to_slice(data_val) }))
        }
        ffi::MDB_NOTFOUND => Ok(None),
        err_code => Err(LmdbError::from_err_code(err_code)),
    }
}

/// Stores `data` at `key`.
///
/// # Safety
///
/// `txn` must be a live read-write transaction on the environment that owns
/// `dbi`.
pub(crate) unsafe fn put_raw(
    txn: *mut ffi::MDB_txn,
    dbi: ffi::MDB_dbi,
    key: &[u8],
    data: &[u8],
    flags: WriteFlags,
) -> LmdbResult<()> {
    let mut key_val = slice_to_val(key);
    let mut data_val = slice_to_val(data);
    // SAFETY: both vals are valid for the duration of the call.
    unsafe { lmdb_result(ffi::mdb_put(txn, dbi, &mut key_val, &mut data_val, flags.bits())) }
}

/// Deletes `key` (or the exact `key`/`data` pair when `data` is `Some`),
/// reporting whether anything was present.
///
/// # Safety
///
/// `txn` must be a live read-write transaction on the environment that owns
/// `dbi`.
pub(crate) unsafe fn del_raw(
    txn: *mut ffi::MDB_txn,
    dbi: ffi::MDB_dbi,
    key: &[u8],
    data: Option<&[u8]>,
) -> LmdbResult<bool> {
    let mut key_val = slice_to_val(key);
    let mut data_val = data.map(slice_to_val);
    let data_ptr = data_val.as_mut().map_or(ptr::null_mut(), |val| val as *mut ffi::MDB_val);
    // SAFETY: key_val is valid; data_ptr is null or valid.
    match unsafe { ffi::mdb_del(txn, dbi, &mut key_val, data_ptr) } {
        ffi::MDB_SUCCESS => Ok(true),
        ffi::MDB_NOTFOUND => Ok(false),
        err_code => Err(LmdbError::from_err_code(err_code)),
    }
}

/// Opens the database `name_ptr` with `flags`, returning the handle and its
/// effective flags.
///
/// # Safety
///
/// `txn` must be a live transaction; `name_ptr` must be null (the default
/// database) or point to a nul-terminated string.
pub(crate) unsafe fn open_db_raw(
    txn: *mut ffi::MDB_txn,
    name_ptr: *const c_char,
    flags: DatabaseFlags,
) -> LmdbResult<(ffi::MDB_dbi, DatabaseFlags)> {
    let mut dbi: ffi::MDB_dbi = 0;
    // SAFETY: forwarded from the caller's contract.
    unsafe { lmdb_result(ffi::mdb_dbi_open(txn, name_ptr, flags.bits(), &mut dbi))? };

    // The persisted flags may differ from the requested set when the
    // database already existed.
    // SAFETY: dbi was just opened in this transaction.
    let actual = unsafe { db_flags_raw(txn, dbi)? };
    Ok((dbi, actual))
}

/// Reads the effective option flags of `dbi`.
///
/// # Safety
///
/// `txn` must be a live transaction on the environment that owns `dbi`.
pub(crate) unsafe fn db_flags_raw(
    txn: *mut ffi::MDB_txn,
    dbi: ffi::MDB_dbi,
) -> LmdbResult<DatabaseFlags> {
    let mut flags: c_uint = 0;
    // SAFETY: forwarded from the caller's contract.
    unsafe { lmdb_result(ffi::mdb_dbi_flags(txn, dbi, &mut flags))? };
    Ok(DatabaseFlags::from_bits_truncate(flags))
}

/// Retrieves statistics for `dbi`.
///
/// # Safety
///
/// `txn` must be a live transaction on the environment that owns `dbi`.
pub(crate) unsafe fn db_stat_raw(txn: *mut ffi::MDB_txn, dbi: ffi::MDB_dbi) -> LmdbResult<Stat> {
    let mut stat = Stat::new();
    // SAFETY: forwarded from the caller's contract; stat outlives the call.
    unsafe { lmdb_result(ffi::mdb_stat(txn, dbi, stat.mdb_stat()))? };
    Ok(stat)
}

/// Removes all items from `dbi`, keeping the database itself.
///
/// # Safety
///
/// `txn` must be a live read-write transaction on the environment that owns
/// `dbi`.
pub(crate) unsafe fn clear_db_raw(txn: *mut ffi::MDB_txn, dbi: ffi::MDB_dbi) -> LmdbResult<()> {
    // SAFETY: forwarded from the caller's contract.
    unsafe { lmdb_result(ffi::mdb_drop(txn, dbi, 0)) }
}

/// Deletes `dbi` from the environment and closes the handle.
///
/// # Safety
///
/// `txn` must be a live read-write transaction on the environment that owns
/// `dbi`, and no other handle to the same database may be used afterwards.
pub(crate) unsafe fn drop_db_raw(txn: *mut ffi::MDB_txn, dbi: ffi::MDB_dbi) -> LmdbResult<()> {
    // SAFETY: forwarded from the caller's contract.
    unsafe { lmdb_result(ffi::mdb_drop(txn, dbi, 1)) }
}
