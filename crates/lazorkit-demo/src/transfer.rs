//! Transfer form parsing and the instruction description handed to the
//! wallet provider.

use crate::constants::{DEFAULT_RECIPIENT, LAMPORTS_PER_SOL, SYSTEM_PROGRAM_ID};
use crate::error::DemoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 32-byte Solana public key, displayed as base58.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pubkey([u8; 32]);

impl Pubkey {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for Pubkey {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.len() > 44 {
            return Err(DemoError::InvalidInput("Invalid recipient address".into()));
        }
        let bytes = bs58::decode(trimmed)
            .into_vec()
            .map_err(|_| DemoError::InvalidInput("Invalid recipient address".into()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| DemoError::InvalidInput("Invalid recipient address".into()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(&self.0).into_string())
    }
}

impl Serialize for Pubkey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a decimal SOL amount into lamports without going through floats.
///
/// Rejects empty, negative, zero and more-than-9-decimal amounts.
pub fn sol_to_lamports(amount: &str) -> Result<u64, DemoError> {
    let invalid = || DemoError::InvalidInput("Please enter a valid amount".into());
    let trimmed = amount.trim();
    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };
    if (whole.is_empty() && frac.is_empty())
        || frac.len() > 9
        || !whole.bytes().all(|b| b.is_ascii_digit())
        || !frac.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let frac: u64 = if frac.is_empty() {
        0
    } else {
        format!("{frac:0<9}").parse().map_err(|_| invalid())?
    };

    let lamports = whole
        .checked_mul(LAMPORTS_PER_SOL)
        .and_then(|l| l.checked_add(frac))
        .ok_or_else(invalid)?;
    if lamports == 0 {
        return Err(invalid());
    }
    Ok(lamports)
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Opaque instruction description passed to the wallet provider, which turns
/// it into a real Solana instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Instruction {
    #[serde(rename_all = "camelCase")]
    SystemTransfer {
        program_id: String,
        from_pubkey: Pubkey,
        to_pubkey: Pubkey,
        lamports: u64,
    },
}

impl Instruction {
    pub fn transfer(from: Pubkey, to: Pubkey, lamports: u64) -> Self {
        Instruction::SystemTransfer {
            program_id: SYSTEM_PROGRAM_ID.to_string(),
            from_pubkey: from,
            to_pubkey: to,
            lamports,
        }
    }
}

/// Validated transfer form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub recipient: Pubkey,
    pub lamports: u64,
}

impl TransferRequest {
    pub fn parse(recipient: &str, amount: &str) -> Result<Self, DemoError> {
        Ok(Self {
            recipient: recipient.parse()?,
            lamports: sol_to_lamports(amount)?,
        })
    }

    pub fn instruction(&self, from: Pubkey) -> Instruction {
        Instruction::transfer(from, self.recipient, self.lamports)
    }
}

/// One-click transfer to the demo recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub lamports: u64,
}

impl QuickAction {
    pub fn request(&self) -> Result<TransferRequest, DemoError> {
        Ok(TransferRequest {
            recipient: DEFAULT_RECIPIENT.parse()?,
            lamports: self.lamports,
        })
    }

    pub fn amount_sol(&self) -> f64 {
        lamports_to_sol(self.lamports)
    }
}

pub const QUICK_ACTIONS: [QuickAction; 2] = [
    QuickAction {
        id: "tip",
        label: "Send 0.001 SOL",
        description: "Quick tip",
        lamports: 1_000_000,
    },
    QuickAction {
        id: "micro",
        label: "Send 0.0001 SOL",
        description: "Micro payment",
        lamports: 100_000,
    },
];
