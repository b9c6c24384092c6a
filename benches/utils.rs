//! Utility functions for benchmarks.
#![allow(dead_code, unreachable_pub)]

use std::path::Path;
use tempfile::{TempDir, tempdir};
use vellum_lmdb::{Environment, EnvironmentFlags, WriteFlags};

/// Name of the named benchmark database.
pub const NAMED_DB: &str = "named_benchmark_db";

/// Generate a DB key string for testing.
pub fn get_key(n: u32) -> String {
    format!("key{n}")
}

/// Generate a DB data string for testing.
pub fn get_data(n: u32) -> String {
    format!("data{n}")
}

/// Opens an environment at `path` with default options.
pub fn open_env(path: &Path) -> Environment {
    let mut env = Environment::new().unwrap();
    env.open(path, EnvironmentFlags::empty(), 0o644).unwrap();
    env
}

/// Create a temporary benchmark database with the specified number of rows.
pub fn setup_bench_db(num_rows: u32) -> (TempDir, Environment) {
    let dir = tempdir().unwrap();
    let mut env = Environment::new().unwrap();
    env.set_max_dbs(2).unwrap();
    env.set_map_size(256 << 20).unwrap();
    env.open(dir.path(), EnvironmentFlags::empty(), 0o644).unwrap();

    {
        let txn = env.begin_rw_txn().unwrap();
        let db = txn.open_db(None).unwrap();
        for i in 0..num_rows {
            txn.put(db, get_key(i), get_data(i), WriteFlags::empty()).unwrap();
        }

        let named_db = txn.create_db(Some(NAMED_DB), Default::default()).unwrap();
        for i in 0..num_rows {
            txn.put(named_db, get_key(i), get_data(i), WriteFlags::empty()).unwrap();
        }
        txn.commit().unwrap();
    }
    (dir, env)
}
