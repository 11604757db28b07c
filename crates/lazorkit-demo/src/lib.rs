//! Local logic behind the LazorKit passkey wallet demo.
//!
//! Passkey authentication, smart-wallet derivation and fee sponsorship all
//! live in the external wallet SDK. This crate owns the two pieces the demo
//! keeps for itself:
//!
//! - **Personal transaction ledger** ([`Ledger`]): the signatures this user
//!   submitted, persisted across reloads, with `pending → confirmed`
//!   transitions and time-window grouping for display
//! - **Polling coordinator** ([`Poller`]): single-flight, throttled refresh of
//!   balances, token balances and confirmation status
//!
//! Around them sit the seams to the outside world: the read-only chain RPC
//! ([`RpcClient`] over an [`RpcTransport`]), the wallet provider
//! ([`WalletProvider`]) and durable key-value storage ([`KeyValueStore`]).
//!
//! # Quick example
//!
//! ```
//! use std::sync::Arc;
//! use lazorkit_demo::{Ledger, LedgerConfig, ManualClock, MemoryStore};
//!
//! let clock = Arc::new(ManualClock::new(1_700_000_000_000));
//! let ledger = Ledger::new(Arc::new(MemoryStore::new()), clock, LedgerConfig::default());
//!
//! ledger.register("5xSig");
//! ledger.register("5xSig");
//! assert_eq!(ledger.list().len(), 1);
//! ```

// Core types
pub mod clock;
pub mod constants;
pub mod error;
pub mod storage;

// Ledger and polling
pub mod ledger;
pub mod poller;

// External collaborators
pub mod rpc;
pub mod wallet;

// Demo flows
pub mod actions;
pub mod activity;
pub mod failure;
pub mod tokens;
pub mod transfer;

// Re-exports
pub use clock::{Clock, ManualClock};
#[cfg(not(target_arch = "wasm32"))]
pub use clock::SystemClock;
pub use constants::*;
pub use error::DemoError;
pub use storage::{KeyValueStore, MemoryStore};
#[cfg(feature = "full")]
pub use storage::SqliteStore;

pub use ledger::{Ledger, LedgerConfig, PendingTransaction, Subscription, TxStatus};
pub use poller::{
    Cadence, DisposeToken, PollHandle, PollWaker, Poller, Published, RefreshOutcome, Wakeups,
};
#[cfg(feature = "full")]
pub use poller::{spawn_poller, spawn_poller_with_wakeups};

pub use rpc::{RpcClient, RpcTransport};
#[cfg(feature = "full")]
pub use rpc::ReqwestTransport;
pub use wallet::{
    ConnectOptions, FeeMode, ProviderError, SignedMessage, WalletAccount, WalletProvider,
    WalletState,
};

pub use actions::{ActionError, TxPhase, WalletActions};
pub use activity::{confirm_pending, own_history, ActivityItem};
pub use failure::{FailureKind, SubmissionFailure};
pub use tokens::{token_balances, KnownToken, TokenBalance, KNOWN_TOKENS};
pub use transfer::{Instruction, Pubkey, QuickAction, TransferRequest, QUICK_ACTIONS};
