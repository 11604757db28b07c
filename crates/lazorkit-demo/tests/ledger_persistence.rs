use lazorkit_demo::{
    DemoError, KeyValueStore, Ledger, LedgerConfig, ManualClock, MemoryStore, TxStatus,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

const T0: u64 = 1_700_000_000_000;

/// Store whose reads or writes can be made to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, DemoError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DemoError::PersistenceUnavailable("storage disabled".into()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DemoError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DemoError::PersistenceUnavailable("quota exceeded".into()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }
}

#[test]
fn test_unreadable_storage_degrades_to_memory() {
    let store = Arc::new(FlakyStore::default());
    store.fail_reads.store(true, Ordering::SeqCst);
    let ledger = Ledger::new(
        store.clone(),
        Arc::new(ManualClock::new(T0)),
        LedgerConfig::default(),
    );

    assert!(ledger.register("sig-a"));
    assert!(!ledger.is_persistent());
    assert!(ledger.mark_confirmed("sig-a"));
    assert_eq!(ledger.get("sig-a").unwrap().status, TxStatus::Confirmed);
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
}

#[test]
fn test_failed_write_keeps_entries_in_memory() {
    let store = Arc::new(FlakyStore::default());
    store.fail_writes.store(true, Ordering::SeqCst);
    let clock = Arc::new(ManualClock::new(T0));
    let ledger = Ledger::new(store.clone(), clock.clone(), LedgerConfig::default());

    ledger.register("sig-a");
    assert!(!ledger.is_persistent());

    // Storage recovering later does not resume writes for this ledger
    store.fail_writes.store(false, Ordering::SeqCst);
    clock.advance(10_000);
    ledger.register("sig-b");
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    assert_eq!(ledger.list().len(), 2);
}

#[test]
fn test_ledger_survives_reload() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(T0));

    let first = Ledger::new(store.clone(), clock.clone(), LedgerConfig::default());
    first.register("sig-a");
    clock.advance(20_000);
    first.register("sig-b");
    first.mark_confirmed("sig-a");

    let raw = store.get("lazorkit_pending_txs").unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored[0]["signature"], "sig-a");
    assert_eq!(stored[0]["status"], "confirmed");
    assert_eq!(stored[1]["timestamp"], T0 + 20_000);

    let second = Ledger::new(store, clock, LedgerConfig::default());
    let view: Vec<(String, TxStatus)> = second
        .list()
        .into_iter()
        .map(|tx| (tx.signature, tx.status))
        .collect();
    assert_eq!(
        view,
        vec![
            ("sig-b".to_string(), TxStatus::Pending),
            ("sig-a".to_string(), TxStatus::Confirmed)
        ]
    );
}

#[cfg(feature = "full")]
#[test]
fn test_sqlite_backed_ledger_reload() {
    use lazorkit_demo::SqliteStore;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");
    let path = path.to_str().unwrap();
    let clock = Arc::new(ManualClock::new(T0));

    {
        let store = Arc::new(SqliteStore::open(path).unwrap());
        let ledger = Ledger::new(store, clock.clone(), LedgerConfig::default());
        ledger.register("sig-a");
        assert!(ledger.is_persistent());
    }

    clock.advance(1_000);
    let store = Arc::new(SqliteStore::open(path).unwrap());
    let ledger = Ledger::new(store, clock, LedgerConfig::default());
    assert!(ledger.has_pending());
    assert_eq!(ledger.get("sig-a").unwrap().timestamp, T0);
}
