#![allow(missing_docs, unreachable_pub)]
mod utils;
use utils::*;

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tempfile::tempdir;
use vellum_lmdb::{Environment, EnvironmentFlags};

/// Open and close an existing environment.
fn bench_env_open(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    // Create the data file once so the bench measures attach, not create.
    drop(open_env(dir.path()));

    c.bench_function("env::open_close", |b| {
        b.iter(|| {
            let mut env = Environment::new().unwrap();
            env.open(dir.path(), EnvironmentFlags::empty(), 0o644).unwrap();
            black_box(&env);
        })
    });
}

/// Begin a read-only transaction on a warm environment.
fn bench_begin_ro_txn(c: &mut Criterion) {
    let (_dir, env) = setup_bench_db(100);

    c.bench_function("env::begin_ro_txn", |b| {
        b.iter(|| black_box(env.begin_ro_txn().unwrap()))
    });
}

/// Snapshot environment statistics.
fn bench_stat(c: &mut Criterion) {
    let (_dir, env) = setup_bench_db(100);

    c.bench_function("env::stat", |b| b.iter(|| black_box(env.stat().unwrap())));
}

criterion_group! {
    name = env_open;
    config = Criterion::default();
    targets = bench_env_open, bench_begin_ro_txn, bench_stat
}
criterion_main!(env_open);
