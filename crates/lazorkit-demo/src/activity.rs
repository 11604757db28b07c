//! Recent activity: the ledger's view of this user's transactions, plus the
//! confirmation check the activity poller runs.

use crate::constants::NetworkConfig;
use crate::error::DemoError;
use crate::ledger::{Ledger, PendingTransaction, TxStatus};
use crate::rpc::{RpcClient, RpcTransport};

/// One row of the activity card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityItem {
    pub signature: String,
    pub label: &'static str,
    pub timestamp: u64,
    pub status: TxStatus,
    pub explorer_url: String,
}

impl ActivityItem {
    pub fn from_entry(entry: &PendingTransaction, network: &NetworkConfig) -> Self {
        Self {
            signature: entry.signature.clone(),
            label: "Transfer",
            timestamp: entry.timestamp,
            status: entry.status,
            explorer_url: network.explorer_tx_url(&entry.signature),
        }
    }

    /// Newest `limit` grouped ledger entries.
    pub fn recent(ledger: &Ledger, network: &NetworkConfig, limit: usize) -> Vec<Self> {
        ledger
            .list()
            .iter()
            .take(limit)
            .map(|entry| Self::from_entry(entry, network))
            .collect()
    }
}

/// Ask the node about every pending, non-stale ledger entry and confirm the
/// ones that landed. Returns how many were confirmed.
pub async fn confirm_pending<T: RpcTransport>(
    ledger: &Ledger,
    rpc: &RpcClient<T>,
) -> Result<usize, DemoError> {
    let signatures: Vec<String> = ledger
        .pending()
        .into_iter()
        .map(|tx| tx.signature)
        .collect();
    if signatures.is_empty() {
        return Ok(0);
    }

    let statuses = rpc.get_signature_statuses(&signatures).await?;
    let mut confirmed = 0;
    for (signature, status) in signatures.iter().zip(statuses) {
        match status {
            Some(status) if status.is_confirmed() => {
                if ledger.mark_confirmed(signature) {
                    confirmed += 1;
                }
            }
            Some(status) if status.err.is_some() => {
                tracing::warn!(signature = %signature, err = ?status.err, "transaction landed with an error");
            }
            _ => {}
        }
    }
    Ok(confirmed)
}

/// Activity rows for `address`: only signatures this user registered, with
/// on-chain outcome folded in.
///
/// Signatures the node reports as landed are confirmed in the ledger; ones
/// that landed with an error are shown as failed without touching the ledger.
pub async fn own_history<T: RpcTransport>(
    ledger: &Ledger,
    rpc: &RpcClient<T>,
    network: &NetworkConfig,
    address: &str,
    limit: usize,
) -> Result<Vec<ActivityItem>, DemoError> {
    let chain = rpc.get_signatures_for_address(address, limit).await?;

    for info in chain.iter().filter(|info| info.err.is_none()) {
        ledger.mark_confirmed(&info.signature);
    }

    let mut items = ActivityItem::recent(ledger, network, limit);
    for item in items.iter_mut() {
        let failed = chain
            .iter()
            .any(|info| info.signature == item.signature && info.err.is_some());
        if failed {
            item.status = TxStatus::Failed;
        }
    }
    Ok(items)
}

/// `abcdefgh...`
pub fn short_signature(signature: &str) -> String {
    let head: String = signature.chars().take(8).collect();
    format!("{head}...")
}

/// `abcdef...wxyz`
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// `HH:MM` (UTC) of a millisecond timestamp.
pub fn format_time(timestamp_ms: u64) -> String {
    let minutes_of_day = (timestamp_ms / 60_000) % (24 * 60);
    format!("{:02}:{:02}", minutes_of_day / 60, minutes_of_day % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_forms() {
        assert_eq!(short_signature("5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnb"), "5VERv8NM...");
        assert_eq!(
            short_address("GQVbE8ZqMqH3xRAqYsxoKQ6NNQeR4sE7ApCHsVWGvUzY"),
            "GQVbE8...vUzY"
        );
        assert_eq!(short_address("short"), "short");
    }

    #[test]
    fn test_format_time() {
        // 2023-11-14T22:13:20Z
        assert_eq!(format_time(1_700_000_000_000), "22:13");
        assert_eq!(format_time(0), "00:00");
    }
}
