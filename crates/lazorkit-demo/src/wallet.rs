//! Seam to the external passkey wallet SDK.
//!
//! The SDK owns passkeys, smart-wallet derivation, paymaster sponsorship and
//! transaction signing. The demo only sees the capability set below.

use crate::transfer::Instruction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// Who pays network fees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeMode {
    /// Sponsored by the paymaster ("gasless").
    #[default]
    Paymaster,
    User,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectOptions {
    pub fee_mode: FeeMode,
}

/// The connected smart wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAccount {
    /// On-chain smart wallet address (base58).
    pub smart_wallet: String,
    /// Passkey credential identifier.
    pub credential_id: String,
}

/// Observable provider state rendered by the cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletState {
    pub is_connected: bool,
    pub is_connecting: bool,
    pub wallet: Option<WalletAccount>,
}

impl WalletState {
    pub fn connecting() -> Self {
        Self {
            is_connected: false,
            is_connecting: true,
            wallet: None,
        }
    }

    pub fn connected(account: WalletAccount) -> Self {
        Self {
            is_connected: true,
            is_connecting: false,
            wallet: Some(account),
        }
    }

    pub fn smart_wallet_address(&self) -> Option<&str> {
        self.wallet.as_ref().map(|w| w.smart_wallet.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedMessage {
    pub signature: String,
}

/// A rejected provider operation.
///
/// `message` is the provider's human-readable text. `code`, when the
/// provider supplies one, takes precedence over matching on that text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({})", self.message, code),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Capability set of the external wallet SDK.
///
/// Futures are not required to be `Send`: in the browser they wrap JS
/// promises and run on the page's single event loop.
pub trait WalletProvider {
    /// Run the passkey flow and return the smart wallet.
    fn connect(
        &self,
        options: ConnectOptions,
    ) -> impl Future<Output = Result<WalletAccount, ProviderError>>;

    fn disconnect(&self) -> impl Future<Output = Result<(), ProviderError>>;

    /// Sign an off-chain message with the passkey.
    fn sign_message(&self, text: &str)
        -> impl Future<Output = Result<SignedMessage, ProviderError>>;

    /// Wrap, sign, sponsor and submit; resolves to the transaction signature.
    fn sign_and_send_transaction(
        &self,
        instructions: &[Instruction],
    ) -> impl Future<Output = Result<String, ProviderError>>;

    fn state(&self) -> WalletState;
}
