//! Turning provider rejections into short user-facing messages.
//!
//! Providers report failures as free text. A structured `code` is honoured
//! when present; otherwise the text is matched against known fragments.
//! Those fragments track provider wording and may drift between versions.

use crate::wallet::ProviderError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InsufficientFunds,
    /// The user closed the passkey prompt or rejected the request.
    Cancelled,
    /// Refused somewhere other than the prompt, e.g. by a program or the
    /// paymaster. Shown to the user with the provider text.
    Rejected,
    BlockhashExpired,
    ProgramError,
    Unknown,
}

impl FailureKind {
    /// Map a structured provider code (snake_case kind names).
    pub fn from_code(code: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(code.to_ascii_lowercase())).ok()
    }

    /// Best-effort classification of raw provider text.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("insufficient") {
            FailureKind::InsufficientFunds
        } else if lower.contains("user rejected")
            || lower.contains("cancelled")
            || lower.contains("canceled")
        {
            FailureKind::Cancelled
        } else if lower.contains("rejected") {
            FailureKind::Rejected
        } else if message.contains("Blockhash not found") {
            FailureKind::BlockhashExpired
        } else if message.contains("0x1") {
            FailureKind::ProgramError
        } else {
            FailureKind::Unknown
        }
    }

    fn friendly(&self) -> Option<&'static str> {
        match self {
            FailureKind::InsufficientFunds => {
                Some("Insufficient balance. Get devnet SOL from faucet.solana.com")
            }
            FailureKind::Cancelled => Some("Transaction cancelled"),
            FailureKind::BlockhashExpired => Some("Network congestion. Please try again."),
            FailureKind::ProgramError => {
                Some("Transaction failed. Check your balance and try again.")
            }
            FailureKind::Rejected | FailureKind::Unknown => None,
        }
    }
}

/// A failed submission, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFailure {
    pub kind: FailureKind,
    /// Provider text, shown when no friendly message applies.
    pub raw: String,
}

impl SubmissionFailure {
    pub fn is_cancellation(&self) -> bool {
        self.kind == FailureKind::Cancelled
    }

    /// Friendly text, falling back to the raw provider message.
    pub fn user_message(&self) -> String {
        match self.kind.friendly() {
            Some(text) => text.to_string(),
            None if self.raw.trim().is_empty() => "Transaction failed".to_string(),
            None => self.raw.clone(),
        }
    }

    /// One-word banner for quick actions.
    pub fn short_label(&self) -> &'static str {
        match self.kind {
            FailureKind::InsufficientFunds => "Insufficient balance",
            FailureKind::Cancelled => "Cancelled",
            FailureKind::Rejected => "Rejected",
            _ => "Failed",
        }
    }
}

impl From<ProviderError> for SubmissionFailure {
    fn from(err: ProviderError) -> Self {
        let kind = err
            .code
            .as_deref()
            .and_then(FailureKind::from_code)
            .unwrap_or_else(|| FailureKind::classify(&err.message));
        Self {
            kind,
            raw: err.message,
        }
    }
}

impl fmt::Display for SubmissionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}
