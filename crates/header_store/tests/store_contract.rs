//! Behaviour every `HeaderStore` backend must share.
//!
//! Each test body runs against the memory, file and sled backends.
mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use common::{hash_from_seed, sample_header};
use header_primitives::{InvalidHeaderError, RawHeader, U256};
use header_store::{FileStore, HeaderStore, MemoryStore, SledStore, StoreError};

/// Keeps a backend's temporary directory alive as long as the store.
struct Fixture<S> {
    store: S,
    _dir: Option<tempfile::TempDir>,
}

fn memory() -> Fixture<MemoryStore> {
    Fixture {
        store: MemoryStore::new(),
        _dir: None,
    }
}

fn file() -> Fixture<FileStore> {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("headers.jsonl")).unwrap();
    Fixture {
        store,
        _dir: Some(dir),
    }
}

fn sled() -> Fixture<SledStore> {
    let dir = tempfile::tempdir().unwrap();
    let store = SledStore::open(dir.path().join("db")).unwrap();
    Fixture {
        store,
        _dir: Some(dir),
    }
}

fn round_trip<S: HeaderStore>(store: &S) {
    let header = sample_header(1, 1_000, Some(12));
    assert!(!store.exists(&header.hash).unwrap());
    store.put(&header).unwrap();
    assert!(store.exists(&header.hash).unwrap());
    assert_eq!(store.get_by_hash(&header.hash).unwrap(), header);

    let mut extreme = sample_header(6, 1_001, None);
    extreme.extra_data = vec![0xff; 32];
    extreme.difficulty = U256::MAX;
    store.put(&extreme).unwrap();
    let read = store.get_by_hash(&extreme.hash).unwrap();
    assert_eq!(read.extra_data.len(), 32);
    assert_eq!(read.logs_bloom.as_bytes().len(), 256);
    assert_eq!(read.difficulty, U256::MAX);
    assert_eq!(read, extreme);
}

fn duplicate_leaves_store_unchanged<S: HeaderStore>(store: &S) {
    let first = sample_header(2, 5, None);
    let mut second = first.clone();
    second.gas_used += 1;
    second.extra_data = b"other".to_vec();

    store.put(&first).unwrap();
    assert!(matches!(
        store.put(&second),
        Err(StoreError::DuplicateKey(h)) if h == first.hash
    ));
    assert!(matches!(store.put(&first), Err(StoreError::DuplicateKey(_))));
    assert_eq!(store.get_by_hash(&first.hash).unwrap(), first);
    assert_eq!(store.list_by_height(5, None).unwrap(), vec![first]);
}

fn unknown_hash_is_not_found<S: HeaderStore>(store: &S) {
    let missing = hash_from_seed(404);
    assert!(!store.exists(&missing).unwrap());
    assert!(matches!(
        store.get_by_hash(&missing),
        Err(StoreError::NotFound(h)) if h == missing
    ));
    assert!(store.list_by_height(404, None).unwrap().is_empty());
}

fn missing_field_is_rejected<S: HeaderStore>(store: &S) {
    let header = sample_header(3, 7, None);
    let raw = RawHeader {
        state_root: None,
        ..RawHeader::from(&header)
    };
    assert!(matches!(
        store.put_raw(&raw),
        Err(StoreError::ConstraintViolation(InvalidHeaderError::Missing("state_root")))
    ));
    assert!(!store.exists(&header.hash).unwrap());

    let stored = store.put_raw(&RawHeader::from(&header)).unwrap();
    assert_eq!(stored, header);
}

fn absent_base_fee_stays_absent<S: HeaderStore>(store: &S) {
    let legacy = sample_header(4, 12_000_000, None);
    let london = sample_header(5, 12_965_000, Some(0));
    store.put(&legacy).unwrap();
    store.put(&london).unwrap();
    assert_eq!(store.get_by_hash(&legacy.hash).unwrap().base_fee_per_gas, None);
    assert_eq!(store.get_by_hash(&london.hash).unwrap().base_fee_per_gas, Some(0));
}

fn forks_listed_in_commit_order<S: HeaderStore>(store: &S) {
    let a = sample_header(10, 42, None);
    let b = sample_header(11, 42, None);
    let c = sample_header(12, 42, None);
    store.put(&b).unwrap();
    store.put(&sample_header(13, 43, None)).unwrap();
    store.put(&a).unwrap();
    store.put(&c).unwrap();

    assert_eq!(
        store.list_by_height(42, None).unwrap(),
        vec![b.clone(), a.clone(), c]
    );
    assert_eq!(store.list_by_height(42, Some(2)).unwrap(), vec![b, a]);
    assert!(store.list_by_height(42, Some(0)).unwrap().is_empty());
    assert!(store.list_by_height(41, None).unwrap().is_empty());
}

fn head_is_latest_at_highest_height<S: HeaderStore>(store: &S) {
    assert_eq!(store.head().unwrap(), None);
    store.put(&sample_header(20, 100, None)).unwrap();
    store.put(&sample_header(21, 102, None)).unwrap();
    store.put(&sample_header(22, 101, None)).unwrap();
    assert_eq!(store.head().unwrap().unwrap().hash, hash_from_seed(21));

    store.put(&sample_header(23, 102, None)).unwrap();
    let head = store.head().unwrap().unwrap();
    assert_eq!(head.hash, hash_from_seed(23));
    assert_eq!(head.number, 102);
    assert_eq!(head.parent_hash, hash_from_seed(22));
}

fn racing_puts_for_one_hash<S: HeaderStore + 'static>(store: S) {
    const WRITERS: usize = 16;
    let store = Arc::new(store);
    let barrier = Arc::new(Barrier::new(WRITERS));
    let base = sample_header(30, 77, None);

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            let mut header = base.clone();
            header.gas_used = i as u64;
            thread::spawn(move || {
                barrier.wait();
                store.put(&header).map(|()| header)
            })
        })
        .collect();

    let mut winners = Vec::new();
    let mut duplicates = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(header) => winners.push(header),
            Err(StoreError::DuplicateKey(h)) => {
                assert_eq!(h, base.hash);
                duplicates += 1;
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(duplicates, WRITERS - 1);
    assert_eq!(store.get_by_hash(&base.hash).unwrap(), winners[0]);
    assert_eq!(store.list_by_height(77, None).unwrap().len(), 1);
}

fn racing_puts_for_forks<S: HeaderStore + 'static>(store: S) {
    const WRITERS: u64 = 8;
    let store = Arc::new(store);
    let barrier = Arc::new(Barrier::new(WRITERS as usize));

    let handles: Vec<_> = (0..WRITERS)
        .map(|seed| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.put(&sample_header(100 + seed, 500, None))
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let forks = store.list_by_height(500, None).unwrap();
    assert_eq!(forks.len(), WRITERS as usize);
    for seed in 0..WRITERS {
        assert!(store.exists(&hash_from_seed(100 + seed)).unwrap());
    }
    let head = store.head().unwrap().unwrap();
    assert_eq!(head.hash, forks.last().unwrap().hash);
}

macro_rules! contract_tests {
    ($($backend:ident),* $(,)?) => {
        $(
            mod $backend {
                #[test]
                fn round_trip() {
                    super::round_trip(&super::$backend().store);
                }

                #[test]
                fn duplicate_leaves_store_unchanged() {
                    super::duplicate_leaves_store_unchanged(&super::$backend().store);
                }

                #[test]
                fn unknown_hash_is_not_found() {
                    super::unknown_hash_is_not_found(&super::$backend().store);
                }

                #[test]
                fn missing_field_is_rejected() {
                    super::missing_field_is_rejected(&super::$backend().store);
                }

                #[test]
                fn absent_base_fee_stays_absent() {
                    super::absent_base_fee_stays_absent(&super::$backend().store);
                }

                #[test]
                fn forks_listed_in_commit_order() {
                    super::forks_listed_in_commit_order(&super::$backend().store);
                }

                #[test]
                fn head_is_latest_at_highest_height() {
                    super::head_is_latest_at_highest_height(&super::$backend().store);
                }

                #[test]
                fn racing_puts_for_one_hash() {
                    let fixture = super::$backend();
                    super::racing_puts_for_one_hash(fixture.store);
                }

                #[test]
                fn racing_puts_for_forks() {
                    let fixture = super::$backend();
                    super::racing_puts_for_forks(fixture.store);
                }
            }
        )*
    };
}

contract_tests!(memory, file, sled);
