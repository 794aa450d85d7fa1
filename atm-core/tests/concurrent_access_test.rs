//! Concurrent access tests
//!
//! Only one session may hold a data file. Every other opener must fail fast
//! with `Error::Locked` rather than race on whole-file rewrites.
//!
//! Run with: cargo test --test concurrent_access_test -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use rust_decimal::Decimal;
use tempfile::TempDir;

use atm_core::adapters::json_file::JsonFileRepository;
use atm_core::{AccountStore, Error, Pin};

const THREAD_COUNT: usize = 6;

#[test]
fn test_only_one_opener_wins() {
    let temp_dir = TempDir::new().unwrap();
    let path = Arc::new(temp_dir.path().join("users.json"));

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let locked_count = Arc::new(AtomicUsize::new(0));
    let winners = Arc::new(Mutex::new(Vec::new()));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|_| {
            let path = Arc::clone(&path);
            let barrier = Arc::clone(&barrier);
            let locked_count = Arc::clone(&locked_count);
            let winners = Arc::clone(&winners);

            thread::spawn(move || {
                barrier.wait();
                match JsonFileRepository::open(&path) {
                    Ok(repo) => winners.lock().unwrap().push(repo),
                    Err(Error::Locked(_)) => {
                        locked_count.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => panic!("unexpected error: {}", e),
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(winners.lock().unwrap().len(), 1);
    assert_eq!(locked_count.load(Ordering::SeqCst), THREAD_COUNT - 1);
}

#[test]
fn test_sessions_in_sequence_see_each_others_writes() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("users.json");
    let p = Pin::parse("1234").unwrap();

    for i in 0..THREAD_COUNT {
        let path = path.clone();
        let p = p.clone();
        thread::spawn(move || {
            let repo = JsonFileRepository::open(&path).unwrap();
            let mut store = AccountStore::load(Arc::new(repo)).unwrap();
            if i == 0 {
                store.create(&p).unwrap();
            }
            store.deposit(&p, Decimal::ONE).unwrap();
        })
        .join()
        .unwrap();
    }

    let repo = JsonFileRepository::open(&path).unwrap();
    let store = AccountStore::load(Arc::new(repo)).unwrap();
    assert_eq!(store.balance(&p).unwrap(), Decimal::new(THREAD_COUNT as i64, 0));
    assert_eq!(store.history(&p).unwrap().len(), THREAD_COUNT);
}
