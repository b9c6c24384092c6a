#![allow(missing_docs)]
mod common;
use common::{get_data, get_key, open_env, setup};

use tempfile::tempdir;
use vellum_lmdb::{DatabaseFlags, LmdbError, WriteFlags};

#[test]
fn test_put_get_del() {
    let (_dir, env) = setup();

    let txn = env.begin_rw_txn().unwrap();
    let db = txn.open_db(None).unwrap();
    txn.put(db, b"key1", b"val1", WriteFlags::empty()).unwrap();
    txn.put(db, b"key2", b"val2", WriteFlags::empty()).unwrap();
    txn.put(db, b"key3", b"val3", WriteFlags::empty()).unwrap();
    txn.commit().unwrap();

    let txn = env.begin_rw_txn().unwrap();
    let db = txn.open_db(None).unwrap();
    assert_eq!(txn.get(db, b"key1").unwrap(), Some(&b"val1"[..]));
    assert_eq!(txn.get(db, b"key2").unwrap(), Some(&b"val2"[..]));
    assert_eq!(txn.get(db, b"key3").unwrap(), Some(&b"val3"[..]));
    assert_eq!(txn.get(db, b"key").unwrap(), None);

    assert!(txn.del(db, b"key1", None).unwrap());
    assert_eq!(txn.get(db, b"key1").unwrap(), None);
    assert!(!txn.del(db, b"key1", None).unwrap());
}

#[test]
fn test_del_exact_pair() {
    let (_dir, env) = setup();

    let txn = env.begin_rw_txn().unwrap();
    let db = txn.create_db(Some("dups"), DatabaseFlags::DUP_SORT).unwrap();
    txn.put(db, b"key1", b"val1", WriteFlags::empty()).unwrap();
    txn.put(db, b"key1", b"val2", WriteFlags::empty()).unwrap();
    txn.commit().unwrap();

    let txn = env.begin_rw_txn().unwrap();
    let db = txn.open_db(Some("dups")).unwrap();
    assert!(txn.db_flags(db).unwrap().contains(DatabaseFlags::DUP_SORT));

    assert!(txn.del(db, b"key1", Some(b"val1")).unwrap());
    // The remaining duplicate is now the first item for the key.
    assert_eq!(txn.get(db, b"key1").unwrap(), Some(&b"val2"[..]));
    assert!(!txn.del(db, b"key1", Some(b"val1")).unwrap());
}

#[test]
fn test_put_no_overwrite() {
    let (_dir, env) = setup();

    let txn = env.begin_rw_txn().unwrap();
    let db = txn.open_db(None).unwrap();
    txn.put(db, b"key", b"old", WriteFlags::empty()).unwrap();
    assert_eq!(
        txn.put(db, b"key", b"new", WriteFlags::NO_OVERWRITE).unwrap_err(),
        LmdbError::KeyExist
    );
    assert_eq!(txn.get(db, b"key").unwrap(), Some(&b"old"[..]));
}

#[test]
fn test_abort_discards() {
    let (_dir, env) = setup();

    {
        let txn = env.begin_rw_txn().unwrap();
        let db = txn.open_db(None).unwrap();
        txn.put(db, b"key", b"val", WriteFlags::empty()).unwrap();
        txn.abort();
    }
    {
        // Dropping without commit behaves the same.
        let txn = env.begin_rw_txn().unwrap();
        let db = txn.open_db(None).unwrap();
        txn.put(db, b"key", b"val", WriteFlags::empty()).unwrap();
    }

    let txn = env.begin_ro_txn().unwrap();
    let db = txn.open_db(None).unwrap();
    assert_eq!(txn.get(db, b"key").unwrap(), None);
}

#[test]
fn test_commit_persists_across_reopen() {
    let dir = tempdir().unwrap();
    {
        let env = open_env(dir.path());
        let txn = env.begin_rw_txn().unwrap();
        let db = txn.open_db(None).unwrap();
        txn.put(db, b"durable", b"yes", WriteFlags::empty()).unwrap();
        txn.commit().unwrap();
    }

    let env = open_env(dir.path());
    let txn = env.begin_ro_txn().unwrap();
    let db = txn.open_db(None).unwrap();
    assert_eq!(txn.get(db, b"durable").unwrap(), Some(&b"yes"[..]));
}

#[test]
fn test_update_commits() {
    let (_dir, env) = setup();

    let n = env
        .update(|txn| {
            let db = txn.open_db(None)?;
            for i in 0..10 {
                txn.put(db, get_key(i), get_data(i), WriteFlags::empty())?;
            }
            Ok(10u32)
        })
        .unwrap();
    assert_eq!(n, 10);

    env.view(|txn| {
        let db = txn.open_db(None)?;
        for i in 0..10 {
            assert_eq!(txn.get(db, get_key(i))?, Some(get_data(i).as_bytes()));
        }
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_update_aborts_on_error() {
    let (_dir, env) = setup();

    let err = env
        .update(|txn| {
            let db = txn.open_db(None)?;
            txn.put(db, b"key", b"val", WriteFlags::empty())?;
            Err::<(), _>(LmdbError::Invalid)
        })
        .unwrap_err();
    assert_eq!(err, LmdbError::Invalid);

    env.view(|txn| {
        let db = txn.open_db(None)?;
        assert_eq!(txn.get(db, b"key")?, None);
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_clear_db() {
    let (_dir, env) = setup();

    env.update(|txn| {
        let db = txn.open_db(None)?;
        txn.put(db, b"key1", b"val1", WriteFlags::empty())?;
        txn.put(db, b"key2", b"val2", WriteFlags::empty())?;
        Ok(())
    })
    .unwrap();

    env.update(|txn| {
        let db = txn.open_db(None)?;
        txn.clear_db(db)
    })
    .unwrap();

    let txn = env.begin_ro_txn().unwrap();
    let db = txn.open_db(None).unwrap();
    assert_eq!(txn.get(db, b"key1").unwrap(), None);
    assert_eq!(txn.db_stat(db).unwrap().entries(), 0);
}

#[test]
fn test_drop_db() {
    let (_dir, env) = setup();

    env.update(|txn| {
        let db = txn.create_db(Some("doomed"), DatabaseFlags::empty())?;
        txn.put(db, b"key", b"val", WriteFlags::empty())?;
        Ok(())
    })
    .unwrap();

    env.update(|txn| {
        let db = txn.open_db(Some("doomed"))?;
        // SAFETY: no other handle to this database is used afterwards.
        unsafe { txn.drop_db(db) }
    })
    .unwrap();

    let txn = env.begin_ro_txn().unwrap();
    assert_eq!(txn.open_db(Some("doomed")).unwrap_err(), LmdbError::NotFound);
}

#[test]
fn test_db_stat() {
    let (_dir, env) = setup();

    env.update(|txn| {
        let db = txn.create_db(Some("counted"), DatabaseFlags::empty())?;
        for i in 0..3 {
            txn.put(db, get_key(i), get_data(i), WriteFlags::empty())?;
        }
        Ok(())
    })
    .unwrap();

    let txn = env.begin_ro_txn().unwrap();
    let db = txn.open_db(Some("counted")).unwrap();
    assert_eq!(txn.db_stat(db).unwrap().entries(), 3);
}
