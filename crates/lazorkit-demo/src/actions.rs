//! User-triggered flows: connect, transfer, quick send, sign message.
//!
//! Each flow is a thin call-through to the [`WalletProvider`]; successful
//! submissions are registered in the [`Ledger`].

use crate::failure::SubmissionFailure;
use crate::ledger::Ledger;
use crate::transfer::{Pubkey, QuickAction, TransferRequest};
use crate::wallet::{ConnectOptions, FeeMode, WalletAccount, WalletProvider};
use std::sync::Arc;
use thiserror::Error;

/// Form state of a submission card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TxPhase {
    #[default]
    Idle,
    /// Waiting on the passkey prompt.
    Signing,
    /// Submitted, waiting for the signature.
    Confirming,
    Success,
    Error,
}

impl TxPhase {
    pub fn is_busy(&self) -> bool {
        matches!(self, TxPhase::Signing | TxPhase::Confirming)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Please connect your wallet first")]
    NotConnected,

    #[error("{0}")]
    InvalidInput(String),

    /// The user backed out. Views reset to their pre-action state.
    #[error("cancelled")]
    Cancelled,

    #[error("{0}")]
    Failed(SubmissionFailure),
}

impl ActionError {
    /// Text to show, or `None` when the view should just reset.
    pub fn user_message(&self) -> Option<String> {
        match self {
            ActionError::Cancelled => None,
            other => Some(other.to_string()),
        }
    }
}

impl From<SubmissionFailure> for ActionError {
    fn from(failure: SubmissionFailure) -> Self {
        if failure.is_cancellation() {
            ActionError::Cancelled
        } else {
            ActionError::Failed(failure)
        }
    }
}

impl From<crate::error::DemoError> for ActionError {
    fn from(err: crate::error::DemoError) -> Self {
        match err {
            crate::error::DemoError::InvalidInput(msg) => ActionError::InvalidInput(msg),
            other => ActionError::InvalidInput(other.to_string()),
        }
    }
}

/// Wallet flows bound to one provider and the shell's ledger.
pub struct WalletActions<P: WalletProvider> {
    provider: P,
    ledger: Arc<Ledger>,
}

impl<P: WalletProvider> WalletActions<P> {
    pub fn new(provider: P, ledger: Arc<Ledger>) -> Self {
        Self { provider, ledger }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Passkey sign-in with sponsored fees.
    pub async fn connect(&self) -> Result<WalletAccount, ActionError> {
        let options = ConnectOptions {
            fee_mode: FeeMode::Paymaster,
        };
        match self.provider.connect(options).await {
            Ok(account) => {
                tracing::info!(smart_wallet = %account.smart_wallet, "wallet connected");
                Ok(account)
            }
            Err(e) => {
                tracing::warn!(error = %e, "connect failed");
                Err(SubmissionFailure::from(e).into())
            }
        }
    }

    pub async fn disconnect(&self) -> Result<(), ActionError> {
        self.provider.disconnect().await.map_err(|e| {
            tracing::warn!(error = %e, "disconnect failed");
            ActionError::from(SubmissionFailure::from(e))
        })
    }

    fn from_pubkey(&self) -> Result<Pubkey, ActionError> {
        let state = self.provider.state();
        let address = state
            .smart_wallet_address()
            .filter(|_| state.is_connected)
            .ok_or(ActionError::NotConnected)?;
        Ok(address.parse()?)
    }

    /// Validate the form, submit the transfer and record its signature.
    pub async fn transfer(&self, recipient: &str, amount: &str) -> Result<String, ActionError> {
        let from = self.from_pubkey()?;
        let request = TransferRequest::parse(recipient, amount)?;
        self.submit(from, &request).await
    }

    pub async fn quick_send(&self, action: &QuickAction) -> Result<String, ActionError> {
        let from = self.from_pubkey()?;
        let request = action.request()?;
        self.submit(from, &request).await
    }

    async fn submit(&self, from: Pubkey, request: &TransferRequest) -> Result<String, ActionError> {
        let instructions = [request.instruction(from)];
        match self.provider.sign_and_send_transaction(&instructions).await {
            Ok(signature) => {
                tracing::info!(
                    signature = %signature,
                    lamports = request.lamports,
                    "gasless transfer submitted"
                );
                self.ledger.register(&signature);
                Ok(signature)
            }
            Err(e) => {
                let failure = SubmissionFailure::from(e);
                tracing::warn!(kind = ?failure.kind, error = %failure.raw, "transfer failed");
                Err(failure.into())
            }
        }
    }

    /// Sign an off-chain message; returns the signature text.
    pub async fn sign_message(&self, text: &str) -> Result<String, ActionError> {
        if text.trim().is_empty() {
            return Err(ActionError::InvalidInput(
                "Please enter a message to sign".into(),
            ));
        }
        if !self.provider.state().is_connected {
            return Err(ActionError::NotConnected);
        }
        match self.provider.sign_message(text).await {
            Ok(signed) => Ok(signed.signature),
            Err(e) => {
                tracing::warn!(error = %e, "message signing failed");
                Err(SubmissionFailure::from(e).into())
            }
        }
    }
}
