//! Personal transaction ledger.
//!
//! Records the signatures *this* user submitted so the activity card never
//! shows other wallets' transactions touching the same address. Entries are
//! keyed by signature, persisted after every mutation and rehydrated lazily.

use crate::clock::Clock;
use crate::error::DemoError;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

/// Confirmation status of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Confirmed,
    Failed,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Pending => "pending",
            TxStatus::Confirmed => "confirmed",
            TxStatus::Failed => "failed",
        }
    }
}

/// One signature submitted by the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTransaction {
    pub signature: String,
    /// Milliseconds since epoch at local registration time.
    pub timestamp: u64,
    pub status: TxStatus,
}

/// Retention, staleness and grouping parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Entries older than this are never displayed or rehydrated.
    pub retention: Duration,
    /// Pending entries older than this are no longer polled for confirmation.
    pub stale_after: Duration,
    /// Signatures registered within this window of a displayed entry are
    /// collapsed into it.
    pub group_window: Duration,
    /// Storage key holding the serialized entry set.
    pub storage_key: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            retention: Duration::from_secs(24 * 60 * 60),
            stale_after: Duration::from_secs(60),
            group_window: Duration::from_secs(5),
            storage_key: "lazorkit_pending_txs".to_string(),
        }
    }
}

type Callback = Arc<dyn Fn(&PendingTransaction) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    callbacks: Vec<(u64, Callback)>,
}

struct LedgerInner {
    entries: HashMap<String, PendingTransaction>,
    hydrated: bool,
    /// Cleared on the first storage failure; the ledger then lives in memory
    /// for the rest of the session.
    persistent: bool,
}

/// Process-local record of this user's submitted signatures.
///
/// Created once by the application shell and shared by `Arc`.
pub struct Ledger {
    inner: Mutex<LedgerInner>,
    subscribers: Arc<Mutex<Subscribers>>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    config: LedgerConfig,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::error!("ledger mutex poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl Ledger {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            inner: Mutex::new(LedgerInner {
                entries: HashMap::new(),
                hydrated: false,
                persistent: true,
            }),
            subscribers: Arc::new(Mutex::new(Subscribers::default())),
            store,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Record a freshly submitted signature as `pending`.
    ///
    /// Registering a known signature is a no-op and notifies nobody.
    /// Returns `true` when a new entry was created.
    pub fn register(&self, signature: &str) -> bool {
        let entry = {
            let mut inner = lock(&self.inner);
            self.hydrate(&mut inner);

            if inner.entries.contains_key(signature) {
                tracing::debug!(signature = %signature, "signature already registered");
                return false;
            }

            let entry = PendingTransaction {
                signature: signature.to_string(),
                timestamp: self.clock.now_ms(),
                status: TxStatus::Pending,
            };
            inner.entries.insert(signature.to_string(), entry.clone());
            self.persist(&mut inner);
            entry
        };

        tracing::info!(signature = %entry.signature, "registered pending transaction");

        // Callbacks run outside both locks so they may read the ledger.
        let callbacks: Vec<Callback> = lock(&self.subscribers)
            .callbacks
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(&entry);
        }
        true
    }

    /// Move a `pending` entry to `confirmed`.
    ///
    /// Absent or already terminal signatures are left alone. Returns `true`
    /// when the status changed.
    pub fn mark_confirmed(&self, signature: &str) -> bool {
        let mut inner = lock(&self.inner);
        self.hydrate(&mut inner);

        match inner.entries.get_mut(signature) {
            Some(entry) if entry.status == TxStatus::Pending => {
                entry.status = TxStatus::Confirmed;
            }
            _ => return false,
        }
        self.persist(&mut inner);
        tracing::info!(signature = %signature, "transaction confirmed");
        true
    }

    /// Entries for display: newest first, retention applied, and clusters of
    /// signatures from one user action collapsed to their earliest member.
    pub fn list(&self) -> Vec<PendingTransaction> {
        let now = self.clock.now_ms();
        let retention = millis(self.config.retention);

        let mut recent: Vec<PendingTransaction> = {
            let mut inner = lock(&self.inner);
            self.hydrate(&mut inner);
            inner
                .entries
                .values()
                .filter(|tx| now.saturating_sub(tx.timestamp) <= retention)
                .cloned()
                .collect()
        };

        let mut grouped = group_by_window(&mut recent, millis(self.config.group_window));
        grouped.reverse();
        grouped
    }

    /// Pending entries young enough to still be worth polling, oldest first.
    pub fn pending(&self) -> Vec<PendingTransaction> {
        let now = self.clock.now_ms();
        let stale_after = millis(self.config.stale_after);

        let mut inner = lock(&self.inner);
        self.hydrate(&mut inner);
        let mut pending: Vec<PendingTransaction> = inner
            .entries
            .values()
            .filter(|tx| {
                tx.status == TxStatus::Pending && now.saturating_sub(tx.timestamp) < stale_after
            })
            .cloned()
            .collect();
        pending.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.signature.cmp(&b.signature))
        });
        pending
    }

    /// Whether the confirmation poller should run at its short cadence.
    pub fn has_pending(&self) -> bool {
        !self.pending().is_empty()
    }

    pub fn get(&self, signature: &str) -> Option<PendingTransaction> {
        let mut inner = lock(&self.inner);
        self.hydrate(&mut inner);
        inner.entries.get(signature).cloned()
    }

    /// `false` once a storage failure has degraded the ledger to memory only.
    pub fn is_persistent(&self) -> bool {
        lock(&self.inner).persistent
    }

    /// Register a callback invoked synchronously on every new registration.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&PendingTransaction) + Send + Sync + 'static,
    {
        let mut subs = lock(&self.subscribers);
        let id = subs.next_id;
        subs.next_id += 1;
        subs.callbacks.push((id, Arc::new(callback)));
        Subscription {
            id,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).callbacks.len()
    }

    /// Load persisted entries the first time the ledger is touched while
    /// empty. Any failure leaves the in-memory set empty.
    fn hydrate(&self, inner: &mut LedgerInner) {
        if inner.hydrated {
            return;
        }
        inner.hydrated = true;
        if !inner.entries.is_empty() || !inner.persistent {
            return;
        }

        let raw = match self.store.get(&self.config.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "ledger storage unreadable, continuing in memory");
                inner.persistent = false;
                return;
            }
        };

        let stored: Vec<PendingTransaction> = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "discarding corrupt ledger data");
                return;
            }
        };

        let now = self.clock.now_ms();
        let retention = millis(self.config.retention);
        let total = stored.len();
        for tx in stored {
            if now.saturating_sub(tx.timestamp) > retention {
                continue;
            }
            inner.entries.entry(tx.signature.clone()).or_insert(tx);
        }
        tracing::debug!(
            loaded = inner.entries.len(),
            dropped = total - inner.entries.len(),
            "rehydrated ledger"
        );
    }

    fn persist(&self, inner: &mut LedgerInner) {
        let now = self.clock.now_ms();
        let retention = millis(self.config.retention);
        let before = inner.entries.len();
        inner
            .entries
            .retain(|_, tx| now.saturating_sub(tx.timestamp) <= retention);
        if inner.entries.len() < before {
            tracing::debug!(pruned = before - inner.entries.len(), "pruned expired ledger entries");
        }

        if !inner.persistent {
            return;
        }

        let mut entries: Vec<&PendingTransaction> = inner.entries.values().collect();
        entries.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.signature.cmp(&b.signature))
        });

        let result = serde_json::to_string(&entries)
            .map_err(DemoError::from)
            .and_then(|json| self.store.set(&self.config.storage_key, &json));
        if let Err(e) = result {
            tracing::warn!(error = %e, "ledger persistence failed, continuing in memory");
            inner.persistent = false;
        }
    }
}

/// Sort ascending, then keep an entry only if it falls outside `window_ms`
/// of the last kept one. Returns representatives in ascending order.
fn group_by_window(entries: &mut [PendingTransaction], window_ms: u64) -> Vec<PendingTransaction> {
    entries.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.signature.cmp(&b.signature))
    });

    let mut kept: Vec<PendingTransaction> = Vec::with_capacity(entries.len());
    for tx in entries.iter() {
        match kept.last() {
            Some(last) if tx.timestamp - last.timestamp < window_ms => {}
            _ => kept.push(tx.clone()),
        }
    }
    kept
}

/// Handle returned by [`Ledger::subscribe`]. Call [`Subscription::unsubscribe`]
/// to stop receiving notifications; dropping the handle keeps the callback.
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    id: u64,
    subscribers: Weak<Mutex<Subscribers>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            lock(&subscribers).callbacks.retain(|(id, _)| *id != self.id);
        }
    }
}
