//! Shared test infrastructure.
#![allow(dead_code)]

use std::path::Path;
use tempfile::{TempDir, tempdir};
use vellum_lmdb::{Environment, EnvironmentFlags};

/// Opens an environment at `path` with default options.
pub fn open_env(path: &Path) -> Environment {
    let mut env = Environment::new().expect("env create");
    env.open(path, EnvironmentFlags::empty(), 0o664).expect("env open");
    env
}

/// Creates a scratch environment with room for named databases.
pub fn setup() -> (TempDir, Environment) {
    let dir = tempdir().expect("tempdir");
    let mut env = Environment::new().expect("env create");
    env.set_max_dbs(64).expect("set_max_dbs");
    env.open(dir.path(), EnvironmentFlags::empty(), 0o664).expect("env open");
    (dir, env)
}

/// Generate a DB key string for testing.
pub fn get_key(n: u32) -> String {
    format!("key{n}")
}

/// Generate a DB data string for testing.
pub fn get_data(n: u32) -> String {
    format!("data{n}")
}
