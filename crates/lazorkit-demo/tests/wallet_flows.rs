use lazorkit_demo::activity::own_history;
use lazorkit_demo::rpc::RpcTransport;
use lazorkit_demo::{
    confirm_pending, token_balances, ActionError, ConnectOptions, DemoError, FeeMode,
    Instruction, Ledger, LedgerConfig, ManualClock, MemoryStore, NetworkConfig, ProviderError,
    RpcClient, SignedMessage, TxStatus, WalletAccount, WalletActions, WalletProvider,
    WalletState, DEFAULT_RECIPIENT, KNOWN_TOKENS, QUICK_ACTIONS, TOKEN_PROGRAM_ID,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const SMART_WALLET: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";

/// Wallet provider double: scripted outcomes, records what it was asked.
#[derive(Default)]
struct MockProvider {
    state: Mutex<WalletState>,
    send_results: Mutex<Vec<Result<String, ProviderError>>>,
    sent: Mutex<Vec<Vec<Instruction>>>,
    connect_options: Mutex<Option<ConnectOptions>>,
}

impl MockProvider {
    fn connected() -> Self {
        let provider = Self::default();
        *provider.state.lock().unwrap() = WalletState::connected(WalletAccount {
            smart_wallet: SMART_WALLET.into(),
            credential_id: "cred".into(),
        });
        provider
    }

    fn will_send(&self, result: Result<String, ProviderError>) {
        self.send_results.lock().unwrap().push(result);
    }
}

impl WalletProvider for MockProvider {
    async fn connect(&self, options: ConnectOptions) -> Result<WalletAccount, ProviderError> {
        *self.connect_options.lock().unwrap() = Some(options);
        let account = WalletAccount {
            smart_wallet: SMART_WALLET.into(),
            credential_id: "cred".into(),
        };
        *self.state.lock().unwrap() = WalletState::connected(account.clone());
        Ok(account)
    }

    async fn disconnect(&self) -> Result<(), ProviderError> {
        *self.state.lock().unwrap() = WalletState::default();
        Ok(())
    }

    async fn sign_message(&self, text: &str) -> Result<SignedMessage, ProviderError> {
        Ok(SignedMessage {
            signature: format!("signed:{text}"),
        })
    }

    async fn sign_and_send_transaction(
        &self,
        instructions: &[Instruction],
    ) -> Result<String, ProviderError> {
        self.sent.lock().unwrap().push(instructions.to_vec());
        self.send_results.lock().unwrap().remove(0)
    }

    fn state(&self) -> WalletState {
        self.state.lock().unwrap().clone()
    }
}

/// RPC double answering by method name.
#[derive(Default)]
struct CannedRpc {
    responses: HashMap<&'static str, String>,
    calls: Mutex<Vec<serde_json::Value>>,
}

impl CannedRpc {
    fn with(mut self, method: &'static str, body: serde_json::Value) -> Self {
        self.responses.insert(method, body.to_string());
        self
    }
}

impl RpcTransport for CannedRpc {
    async fn post(&self, body: String) -> Result<String, DemoError> {
        let request: serde_json::Value = serde_json::from_str(&body)?;
        let method = request["method"].as_str().unwrap_or_default().to_string();
        self.calls.lock().unwrap().push(request);
        self.responses
            .get(method.as_str())
            .cloned()
            .ok_or_else(|| DemoError::TransientFetchFailure(format!("no route for {method}")))
    }
}

fn ledger(clock: Arc<ManualClock>) -> Arc<Ledger> {
    Arc::new(Ledger::new(
        Arc::new(MemoryStore::new()),
        clock,
        LedgerConfig::default(),
    ))
}

#[tokio::test]
async fn test_transfer_registers_signature() {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let provider = MockProvider::connected();
    provider.will_send(Ok("sig-transfer".into()));
    let actions = WalletActions::new(provider, ledger(clock));

    let signature = actions.transfer(DEFAULT_RECIPIENT, "0.001").await.unwrap();
    assert_eq!(signature, "sig-transfer");

    let entry = actions.ledger().get("sig-transfer").unwrap();
    assert_eq!(entry.status, TxStatus::Pending);

    let sent = actions.provider().sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    match &sent[0][0] {
        Instruction::SystemTransfer {
            from_pubkey,
            to_pubkey,
            lamports,
            ..
        } => {
            assert_eq!(from_pubkey.to_string(), SMART_WALLET);
            assert_eq!(to_pubkey.to_string(), DEFAULT_RECIPIENT);
            assert_eq!(*lamports, 1_000_000);
        }
    }
}

#[tokio::test]
async fn test_cancellation_leaves_no_trace() {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let provider = MockProvider::connected();
    provider.will_send(Err(ProviderError::new("User rejected the request")));
    let actions = WalletActions::new(provider, ledger(clock));

    let err = actions.quick_send(&QUICK_ACTIONS[0]).await.unwrap_err();
    assert_eq!(err, ActionError::Cancelled);
    assert_eq!(err.user_message(), None);
    assert!(actions.ledger().list().is_empty());
}

#[tokio::test]
async fn test_submission_failure_is_friendly() {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let provider = MockProvider::connected();
    provider.will_send(Err(ProviderError::new(
        "Transaction simulation failed: insufficient lamports 5000, need 1005000",
    )));
    let actions = WalletActions::new(provider, ledger(clock));

    let err = actions.transfer(DEFAULT_RECIPIENT, "0.001").await.unwrap_err();
    assert_eq!(
        err.user_message().as_deref(),
        Some("Insufficient balance. Get devnet SOL from faucet.solana.com")
    );
    assert!(actions.ledger().list().is_empty());
}

#[tokio::test]
async fn test_program_rejection_is_reported() {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let provider = MockProvider::connected();
    provider.will_send(Err(ProviderError::new(
        "Transaction simulation failed: transaction rejected by program",
    )));
    let actions = WalletActions::new(provider, ledger(clock));

    let err = actions.transfer(DEFAULT_RECIPIENT, "0.001").await.unwrap_err();
    assert_ne!(err, ActionError::Cancelled);
    assert_eq!(
        err.user_message().as_deref(),
        Some("Transaction simulation failed: transaction rejected by program")
    );
    assert!(actions.ledger().list().is_empty());
}

#[tokio::test]
async fn test_invalid_form_never_reaches_provider() {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let actions = WalletActions::new(MockProvider::connected(), ledger(clock));

    let err = actions.transfer("nope", "0.001").await.unwrap_err();
    assert_eq!(err, ActionError::InvalidInput("Invalid recipient address".into()));

    let err = actions.transfer(DEFAULT_RECIPIENT, "-3").await.unwrap_err();
    assert_eq!(err, ActionError::InvalidInput("Please enter a valid amount".into()));

    assert!(actions.provider().sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_disconnected_wallet_is_rejected() {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let actions = WalletActions::new(MockProvider::default(), ledger(clock));

    assert_eq!(
        actions.transfer(DEFAULT_RECIPIENT, "0.001").await.unwrap_err(),
        ActionError::NotConnected
    );
    assert_eq!(
        actions.sign_message("hi").await.unwrap_err(),
        ActionError::NotConnected
    );

    let account = actions.connect().await.unwrap();
    assert_eq!(account.smart_wallet, SMART_WALLET);
    assert_eq!(
        actions
            .provider()
            .connect_options
            .lock()
            .unwrap()
            .as_ref()
            .map(|o| o.fee_mode),
        Some(FeeMode::Paymaster)
    );
    assert_eq!(actions.sign_message("hi").await.unwrap(), "signed:hi");

    actions.disconnect().await.unwrap();
    assert!(!actions.provider().state().is_connected);
}

#[tokio::test]
async fn test_sign_message_requires_text() {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let actions = WalletActions::new(MockProvider::connected(), ledger(clock));
    assert_eq!(
        actions.sign_message("   ").await.unwrap_err(),
        ActionError::InvalidInput("Please enter a message to sign".into())
    );
}

#[tokio::test]
async fn test_confirm_pending_marks_landed_signatures() {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let ledger = ledger(clock.clone());
    ledger.register("landed");
    clock.advance(10_000);
    ledger.register("processing");

    let rpc = RpcClient::new(CannedRpc::default().with(
        "getSignatureStatuses",
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "context": { "slot": 100 },
                "value": [
                    { "slot": 99, "confirmations": null, "err": null, "confirmationStatus": "finalized" },
                    null
                ]
            }
        }),
    ));

    assert_eq!(confirm_pending(&ledger, &rpc).await.unwrap(), 1);
    assert_eq!(ledger.get("landed").unwrap().status, TxStatus::Confirmed);
    assert_eq!(ledger.get("processing").unwrap().status, TxStatus::Pending);

    let calls = rpc.transport().calls.lock().unwrap();
    assert_eq!(
        calls[0]["params"][0],
        serde_json::json!(["landed", "processing"])
    );
}

#[tokio::test]
async fn test_confirm_pending_skips_rpc_when_idle() {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let rpc = RpcClient::new(CannedRpc::default());
    assert_eq!(confirm_pending(&ledger(clock), &rpc).await.unwrap(), 0);
    assert!(rpc.transport().calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_history_shows_only_own_signatures() {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let ledger = ledger(clock.clone());
    ledger.register("mine-ok");
    clock.advance(30_000);
    ledger.register("mine-failed");

    let rpc = RpcClient::new(CannedRpc::default().with(
        "getSignaturesForAddress",
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": [
                { "signature": "someone-else", "slot": 5, "err": null, "blockTime": 1_700_000_040 },
                { "signature": "mine-failed", "slot": 4, "err": { "InstructionError": [0, "Custom"] }, "blockTime": 1_700_000_030 },
                { "signature": "mine-ok", "slot": 3, "err": null, "blockTime": 1_700_000_000, "confirmationStatus": "finalized" }
            ]
        }),
    ));

    let items = own_history(&ledger, &rpc, &NetworkConfig::default(), SMART_WALLET, 5)
        .await
        .unwrap();
    let view: Vec<(&str, TxStatus)> = items
        .iter()
        .map(|i| (i.signature.as_str(), i.status))
        .collect();
    assert_eq!(
        view,
        vec![
            ("mine-failed", TxStatus::Failed),
            ("mine-ok", TxStatus::Confirmed)
        ]
    );
    assert!(items[0].explorer_url.ends_with("/tx/mine-failed?cluster=devnet"));
    // The ledger itself only ever moves pending -> confirmed
    assert_eq!(ledger.get("mine-failed").unwrap().status, TxStatus::Pending);
    assert!(ledger.get("someone-else").is_none());
}

#[tokio::test]
async fn test_balance_and_token_queries() {
    let rpc = RpcClient::new(
        CannedRpc::default()
            .with(
                "getBalance",
                serde_json::json!({
                    "jsonrpc": "2.0", "id": 1,
                    "result": { "context": { "slot": 1 }, "value": 2_500_000_000u64 }
                }),
            )
            .with(
                "getTokenAccountsByOwner",
                serde_json::json!({
                    "jsonrpc": "2.0", "id": 1,
                    "result": { "context": { "slot": 1 }, "value": [{
                        "pubkey": "TokenAcct1",
                        "account": { "data": { "parsed": { "info": {
                            "mint": KNOWN_TOKENS[0].mint,
                            "tokenAmount": { "amount": "12500000", "decimals": 6, "uiAmount": 12.5, "uiAmountString": "12.5" }
                        }, "type": "account" }, "program": "spl-token" } }
                    }] }
                }),
            ),
    );

    assert_eq!(rpc.get_balance(SMART_WALLET).await.unwrap(), 2_500_000_000);

    let accounts = rpc
        .get_token_accounts_by_owner(SMART_WALLET, TOKEN_PROGRAM_ID)
        .await
        .unwrap();
    let rows = token_balances(&accounts);
    assert_eq!(rows[0].symbol, "USDC");
    assert_eq!(rows[0].balance, 12.5);
    assert_eq!(rows[1].balance, 0.0);

    let calls = rpc.transport().calls.lock().unwrap();
    assert_eq!(calls[1]["params"][1]["programId"], TOKEN_PROGRAM_ID);
    assert_eq!(calls[1]["params"][2]["encoding"], "jsonParsed");
}

#[tokio::test]
async fn test_rpc_error_surfaces_as_transient() {
    let rpc = RpcClient::new(CannedRpc::default());
    let err = rpc.get_balance(SMART_WALLET).await.unwrap_err();
    assert!(err.is_transient());
}
