use lazorkit_demo::activity::{own_history, short_address, short_signature};
use lazorkit_demo::tokens::format_amount;
use lazorkit_demo::transfer::lamports_to_sol;
use lazorkit_demo::{
    confirm_pending, token_balances, ActionError, ActivityItem, Cadence, DemoError, Ledger,
    LedgerConfig, NetworkConfig, PendingTransaction, PollingConfig, Poller, QuickAction,
    TokenBalance, TxPhase, TxStatus, Wakeups, WalletActions, WalletState, DEFAULT_MESSAGE,
    DEFAULT_RECIPIENT, DEFAULT_TRANSFER_AMOUNT, FAUCET_URL, LOW_BALANCE_HINT_SOL, QUICK_ACTIONS,
    TOKEN_PROGRAM_ID,
};
use leptos::*;
use leptos_meta::*;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use wasm_bindgen::prelude::*;

mod api;
mod bridge;
mod polling;

use api::Rpc;
use bridge::{JsClock, JsWalletProvider, LocalStorage};

/// Handles shared by every card. All fields are `Copy` so event handlers
/// inside `Show` children can capture the context freely.
#[derive(Clone, Copy)]
pub struct DemoContext {
    actions: StoredValue<Rc<WalletActions<JsWalletProvider>>>,
    rpc: StoredValue<Rc<Rpc>>,
    network: StoredValue<NetworkConfig>,
    polling: StoredValue<PollingConfig>,
    wallet: Signal<WalletState>,
    /// Bumped on every ledger registration.
    ledger_version: RwSignal<u64>,
}

impl DemoContext {
    fn actions(&self) -> Rc<WalletActions<JsWalletProvider>> {
        self.actions.get_value()
    }

    fn ledger(&self) -> Arc<Ledger> {
        self.actions.with_value(|a| Arc::clone(a.ledger()))
    }

    fn rpc(&self) -> Rc<Rpc> {
        self.rpc.get_value()
    }

    fn network(&self) -> NetworkConfig {
        self.network.get_value()
    }

    fn polling(&self) -> PollingConfig {
        self.polling.get_value()
    }

    /// Connected smart wallet address, read without tracking.
    fn address(&self) -> String {
        self.wallet
            .with_untracked(|w| w.smart_wallet_address().map(String::from))
            .unwrap_or_default()
    }
}

/// Main application component
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let network = api::network_config();
    log::info!("LazorKit demo on {} via {}", network.network_name, network.rpc_url);

    let ledger = Arc::new(Ledger::new(
        Arc::new(LocalStorage),
        Arc::new(JsClock),
        LedgerConfig::default(),
    ));
    let ledger_version = create_rw_signal(0u64);
    let subscription = ledger.subscribe(move |tx: &PendingTransaction| {
        log::debug!("ledger registered {}", tx.signature);
        ledger_version.update(|v| *v += 1);
    });
    on_cleanup(move || subscription.unsubscribe());

    let provider = JsWalletProvider::new();
    let wallet = provider.watch();
    let rpc = api::rpc_client(&network);

    provide_context(DemoContext {
        actions: store_value(Rc::new(WalletActions::new(provider, ledger))),
        rpc: store_value(Rc::new(rpc)),
        network: store_value(network),
        polling: store_value(PollingConfig::default()),
        wallet,
        ledger_version,
    });

    view! {
        <Html lang="en" />
        <Meta charset="utf-8" />
        <Meta name="viewport" content="width=device-width, initial-scale=1" />
        <Title text="LazorKit Passkey Demo" />
        <Stylesheet href="/style.css" />

        <div class="app">
            <Header />
            <main class="main-content">
                <div class="container">
                    <Hero />
                    <div class="grid-full">
                        <WalletSection />
                    </div>
                    <div class="grid">
                        <QuickActions />
                        <RecentActivity />
                    </div>
                    <div class="grid">
                        <TransactionSection />
                        <MessageSection />
                    </div>
                </div>
            </main>
            <Footer />
        </div>
    }
}

/// Header with logo and network badge
#[component]
fn Header() -> impl IntoView {
    let ctx = expect_context::<DemoContext>();

    view! {
        <header class="header">
            <div class="header-content">
                <div class="logo">
                    <img src="/lazorkit.svg" alt="LazorKit" class="logo-icon" />
                    <span class="logo-text">"LazorKit"</span>
                </div>
                <div class="network-badge">
                    <span class="network-dot"></span>
                    {ctx.network().network_name}
                </div>
            </div>
        </header>
    }
}

#[component]
fn Hero() -> impl IntoView {
    view! {
        <section class="hero">
            <h1>"LazorKit Passkey Demo"</h1>
            <p class="hero-subtitle">
                "Solana wallet authentication using device biometrics. No seed phrases, no browser extensions."
            </p>
            <div class="feature-list">
                <span class="feature-item">"Passkey Auth"</span>
                <span class="feature-item">"Gasless Transactions"</span>
                <span class="feature-item">"Smart Wallet"</span>
                <span class="feature-item">"One-Click Actions"</span>
            </div>
        </section>
    }
}

/// Connect / disconnect button. Connecting always asks for sponsored fees.
#[component]
fn ConnectButton() -> impl IntoView {
    let ctx = expect_context::<DemoContext>();

    let connect = move |_| {
        let actions = ctx.actions();
        spawn_local(async move {
            match actions.connect().await {
                Ok(account) => log::info!("Connected {}", account.smart_wallet),
                Err(ActionError::Cancelled) => log::info!("Connection cancelled"),
                Err(e) => log::error!("Connection failed: {}", e),
            }
        });
    };

    let disconnect = move |_| {
        let actions = ctx.actions();
        spawn_local(async move {
            if let Err(e) = actions.disconnect().await {
                log::error!("Disconnect failed: {}", e);
            }
        });
    };

    view! {
        <Show
            when=move || ctx.wallet.with(|w| w.is_connected)
            fallback=move || view! {
                <button
                    class="btn btn-primary btn-large"
                    on:click=connect
                    disabled=move || ctx.wallet.with(|w| w.is_connecting)
                >
                    {move || {
                        if ctx.wallet.with(|w| w.is_connecting) {
                            "Connecting..."
                        } else {
                            "Connect with Passkey"
                        }
                    }}
                </button>
            }
        >
            <button class="btn btn-secondary" on:click=disconnect>
                "Disconnect"
            </button>
        </Show>
    }
}

/// Wallet card: connect prompt or connected wallet details
#[component]
fn WalletSection() -> impl IntoView {
    let ctx = expect_context::<DemoContext>();

    view! {
        <section class="card">
            <div class="card-header">
                <h2 class="card-title">"Wallet"</h2>
            </div>
            <Show
                when=move || ctx.wallet.with(|w| w.is_connected && w.wallet.is_some())
                fallback=|| view! {
                    <div class="connect-prompt">
                        <ConnectButton />
                        <p class="connect-hint">
                            "Authenticate with your device biometrics to create or access your wallet"
                        </p>
                    </div>
                }
            >
                <WalletInfo />
            </Show>
        </section>
    }
}

/// Address, credential, polled SOL balance and token balances.
#[component]
fn WalletInfo() -> impl IntoView {
    let ctx = expect_context::<DemoContext>();
    let config = ctx.polling();
    let network = ctx.network();
    let account = ctx.wallet.with_untracked(|w| w.wallet.clone());
    let address = account
        .as_ref()
        .map(|a| a.smart_wallet.clone())
        .unwrap_or_default();
    let credential = account.map(|a| a.credential_id).unwrap_or_default();

    let (balance, set_balance) = create_signal(None::<f64>);
    let poller = Rc::new(Poller::<u64>::new(
        "balance",
        config.balance_min_interval,
        Arc::new(JsClock),
    ));
    let fetch = {
        let rpc = ctx.rpc();
        let address = address.clone();
        move || {
            let rpc = Rc::clone(&rpc);
            let address = address.clone();
            async move { rpc.get_balance(&address).await }
        }
    };
    let publish = move |lamports: u64| set_balance.set(Some(lamports_to_sol(lamports)));

    let interval = config.balance_interval;
    let handle = polling::spawn_local_poller(
        Rc::clone(&poller),
        config.balance_initial_delay,
        move || interval,
        fetch.clone(),
        publish,
    );

    // A fresh submission moves the balance; ask again (still throttled).
    let token = handle.token();
    create_effect(move |prev: Option<u64>| {
        let version = ctx.ledger_version.get();
        if prev.is_some() {
            polling::refresh_now(Rc::clone(&poller), token.clone(), fetch.clone(), publish);
        }
        version
    });
    on_cleanup(move || handle.dispose());

    let copy_address = address.clone();
    let explorer = network.explorer_address_url(&address);

    view! {
        <div class="wallet-info">
            <div class="status-bar">
                <span class="status-connected">
                    <span class="status-dot connected"></span>
                    "Connected"
                </span>
                <ConnectButton />
            </div>

            <div class="wallet-details">
                <div class="detail-row">
                    <label>"Smart Wallet Address"</label>
                    <div class="address-display">
                        <code title=address.clone()>{short_address(&address)}</code>
                        <button
                            class="btn-icon"
                            title="Copy address"
                            on:click=move |_| bridge::copy_to_clipboard(&copy_address)
                        >
                            "Copy"
                        </button>
                        <a
                            href=explorer
                            target="_blank"
                            rel="noopener noreferrer"
                            class="btn-icon"
                            title="View on Explorer"
                        >
                            "Explorer"
                        </a>
                    </div>
                </div>

                <div class="detail-row">
                    <label>"Passkey Credential ID"</label>
                    <code class="credential-id" title=credential.clone()>
                        {short_address(&credential)}
                    </code>
                </div>

                <div class="detail-row">
                    <label>"Balance"</label>
                    <div class="balance-display">
                        {move || match balance.get() {
                            Some(sol) => view! {
                                <span class="balance-amount">{format!("{:.4} SOL", sol)}</span>
                            }.into_view(),
                            None => view! {
                                <span class="loading-text">"Loading..."</span>
                            }.into_view(),
                        }}
                    </div>
                </div>

                <TokenBalances address=address.clone() />
            </div>

            <Show
                when=move || balance.get().map(|sol| sol < LOW_BALANCE_HINT_SOL).unwrap_or(false)
                fallback=|| ()
            >
                <div class="info-box">
                    <p>
                        "Need test SOL? Visit the "
                        <a href=FAUCET_URL target="_blank" rel="noopener noreferrer">"Solana Faucet"</a>
                        " and enter your wallet address to get free devnet SOL."
                    </p>
                </div>
            </Show>
        </div>
    }
}

/// Known SPL tokens, zero-filled, refreshed on the slow cadence.
#[component]
fn TokenBalances(address: String) -> impl IntoView {
    let ctx = expect_context::<DemoContext>();
    let interval = ctx.polling().token_interval;

    let (balances, set_balances) = create_signal(Vec::<TokenBalance>::new());
    let poller = Rc::new(Poller::<Vec<TokenBalance>>::new(
        "tokens",
        Duration::ZERO,
        Arc::new(JsClock),
    ));
    let rpc = ctx.rpc();
    let handle = polling::spawn_local_poller(
        poller,
        Duration::ZERO,
        move || interval,
        move || {
            let rpc = Rc::clone(&rpc);
            let address = address.clone();
            async move {
                let accounts = rpc
                    .get_token_accounts_by_owner(&address, TOKEN_PROGRAM_ID)
                    .await?;
                Ok::<_, DemoError>(token_balances(&accounts))
            }
        },
        move |rows| set_balances.set(rows),
    );
    on_cleanup(move || handle.dispose());

    view! {
        <div class="token-balances">
            <span class="wallet-label">"Tokens"</span>
            <div class="token-list">
                <Show
                    when=move || !balances.with(Vec::is_empty)
                    fallback=|| view! { <span class="token-loading">"Loading..."</span> }
                >
                    <For
                        each=move || balances.get()
                        key=|token| token.symbol
                        children=|token| view! {
                            <div class="token-item">
                                <span class="token-icon">{token.icon}</span>
                                <span class="token-symbol">{token.symbol}</span>
                                <span class="token-balance">{format_amount(token.balance, 6)}</span>
                            </div>
                        }
                    />
                </Show>
            </div>
        </div>
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Banner {
    success: bool,
    message: String,
    signature: Option<String>,
}

/// One-click sponsored transfers to the demo recipient
#[component]
fn QuickActions() -> impl IntoView {
    let ctx = expect_context::<DemoContext>();
    let (active, set_active) = create_signal(None::<&'static str>);
    let (banner, set_banner) = create_signal(None::<Banner>);

    let run = move |action: QuickAction| {
        set_active.set(Some(action.id));
        set_banner.set(None);
        let actions = ctx.actions();
        spawn_local(async move {
            let outcome = match actions.quick_send(&action).await {
                Ok(signature) => Some(Banner {
                    success: true,
                    message: format!("Sent {} SOL", action.amount_sol()),
                    signature: Some(signature),
                }),
                // Back to where the user was
                Err(ActionError::Cancelled) => None,
                Err(ActionError::Failed(failure)) => Some(Banner {
                    success: false,
                    message: failure.short_label().to_string(),
                    signature: None,
                }),
                Err(other) => Some(Banner {
                    success: false,
                    message: other.to_string(),
                    signature: None,
                }),
            };
            set_banner.set(outcome);
            set_active.set(None);
        });
    };

    view! {
        <Show
            when=move || ctx.wallet.with(|w| w.is_connected)
            fallback=|| view! {
                <section class="card card-disabled">
                    <div class="card-header">
                        <h2 class="card-title">"Quick Actions"</h2>
                    </div>
                    <div class="disabled-overlay">
                        <span>"Connect wallet to unlock"</span>
                    </div>
                </section>
            }
        >
            <section class="card">
                <div class="card-header">
                    <h2 class="card-title">"Quick Actions"</h2>
                </div>
                <p class="card-description">
                    "One-click gasless transactions. You pay $0.00 in network fees."
                </p>

                <div class="quick-actions-grid">
                    {QUICK_ACTIONS
                        .iter()
                        .map(|action| {
                            let action = *action;
                            view! {
                                <button
                                    class=move || {
                                        if active.get() == Some(action.id) {
                                            "quick-action-btn loading"
                                        } else {
                                            "quick-action-btn"
                                        }
                                    }
                                    disabled=move || active.get().is_some()
                                    on:click=move |_| run(action)
                                >
                                    <Show
                                        when=move || active.get() == Some(action.id)
                                        fallback=move || view! {
                                            <span class="action-label">{action.label}</span>
                                            <span class="action-desc">{action.description}</span>
                                        }
                                    >
                                        <span class="spinner-small"></span>
                                    </Show>
                                </button>
                            }
                        })
                        .collect_view()}
                </div>

                {move || banner.get().map(|b| {
                    let class = if b.success { "result-banner success" } else { "result-banner error" };
                    let network = ctx.network();
                    view! {
                        <div class=class>
                            <span>{b.message}</span>
                            {b.signature.map(|sig| view! {
                                <a
                                    href=network.explorer_tx_url(&sig)
                                    target="_blank"
                                    rel="noopener noreferrer"
                                    class="result-link"
                                >
                                    "View"
                                </a>
                            })}
                        </div>
                    }
                })}
            </section>
        </Show>
    }
}

/// Recent activity card, only while connected.
#[component]
fn RecentActivity() -> impl IntoView {
    let ctx = expect_context::<DemoContext>();

    view! {
        <Show when=move || ctx.wallet.with(|w| w.is_connected) fallback=|| ()>
            <ActivityFeed />
        </Show>
    }
}

/// This user's own transactions from the ledger. A poller confirms pending
/// signatures (fast while anything is pending) and folds in on-chain failures.
#[component]
fn ActivityFeed() -> impl IntoView {
    let ctx = expect_context::<DemoContext>();
    let config = ctx.polling();
    let network = ctx.network();
    let ledger = ctx.ledger();
    let limit = config.history_limit;

    let (failed, set_failed) = create_signal(Vec::<String>::new());
    let (polled, set_polled) = create_signal(0u64);

    let items = {
        let ledger = Arc::clone(&ledger);
        let network = network.clone();
        create_memo(move |_| {
            ctx.ledger_version.track();
            polled.track();
            failed.with(|failed| {
                ActivityItem::recent(&ledger, &network, limit)
                    .into_iter()
                    .map(|mut item| {
                        if failed.contains(&item.signature) {
                            item.status = TxStatus::Failed;
                        }
                        item
                    })
                    .collect::<Vec<_>>()
            })
        })
    };

    let cadence = Cadence::Adaptive {
        short: config.confirm_short_interval,
        long: config.confirm_long_interval,
    };
    let poller = Rc::new(Poller::<Vec<String>>::new(
        "activity",
        Duration::ZERO,
        Arc::new(JsClock),
    ));
    let rpc = ctx.rpc();
    let address = ctx.address();
    // A new submission switches to the short cadence now, not after the
    // long sleep already under way.
    let wakeups = Wakeups::new();
    let waker = wakeups.waker();
    create_effect(move |prev: Option<u64>| {
        let version = ctx.ledger_version.get();
        if prev.is_some() {
            waker.wake();
        }
        version
    });

    let handle = polling::spawn_local_poller_with_wakeups(
        poller,
        Duration::ZERO,
        {
            let ledger = Arc::clone(&ledger);
            move || cadence.interval(ledger.has_pending())
        },
        move || {
            let ledger = Arc::clone(&ledger);
            let rpc = Rc::clone(&rpc);
            let network = network.clone();
            let address = address.clone();
            async move {
                if ledger.has_pending() {
                    confirm_pending(&ledger, &*rpc).await?;
                }
                let rows = own_history(&ledger, &*rpc, &network, &address, limit).await?;
                Ok::<_, DemoError>(
                    rows.into_iter()
                        .filter(|row| row.status == TxStatus::Failed)
                        .map(|row| row.signature)
                        .collect::<Vec<_>>(),
                )
            }
        },
        move |failed_signatures| {
            set_failed.set(failed_signatures);
            set_polled.update(|n| *n += 1);
        },
        wakeups,
    );
    on_cleanup(move || handle.dispose());

    view! {
        <section class="card">
            <div class="card-header">
                <h2 class="card-title">"Recent Activity"</h2>
            </div>

            <Show
                when=move || !items.with(Vec::is_empty)
                fallback=move || {
                    if polled.get() == 0 {
                        view! {
                            <div class="activity-loading">
                                <span class="spinner-small"></span>
                                <span>"Loading..."</span>
                            </div>
                        }
                        .into_view()
                    } else {
                        view! {
                            <div class="activity-empty">
                                <p>"No transactions yet"</p>
                                <span>"Your transaction history will appear here"</span>
                            </div>
                        }
                        .into_view()
                    }
                }
            >
                <div class="activity-list">
                    <For
                        each=move || items.get()
                        key=|item| (item.signature.clone(), item.status)
                        children=|item| view! {
                            <a
                                href=item.explorer_url.clone()
                                target="_blank"
                                rel="noopener noreferrer"
                                class="activity-item"
                            >
                                <div class="activity-info">
                                    <span class=format!("activity-status {}", item.status.as_str())></span>
                                    <span class="activity-type">{item.label}</span>
                                    <code class="activity-sig">{short_signature(&item.signature)}</code>
                                </div>
                                <span class="activity-time">{bridge::local_time(item.timestamp)}</span>
                            </a>
                        }
                    />
                </div>
            </Show>
        </section>
    }
}

/// Gasless SOL transfer form
#[component]
fn TransactionSection() -> impl IntoView {
    let ctx = expect_context::<DemoContext>();
    let (recipient, set_recipient) = create_signal(DEFAULT_RECIPIENT.to_string());
    let (amount, set_amount) = create_signal(DEFAULT_TRANSFER_AMOUNT.to_string());
    let (phase, set_phase) = create_signal(TxPhase::Idle);
    let (signature, set_signature) = create_signal(None::<String>);
    let (error, set_error) = create_signal(None::<String>);

    let send = move |_| {
        let actions = ctx.actions();
        let to = recipient.get_untracked();
        let amount_text = amount.get_untracked();
        set_phase.set(TxPhase::Signing);
        set_error.set(None);
        set_signature.set(None);

        spawn_local(async move {
            match actions.transfer(&to, &amount_text).await {
                Ok(sig) => {
                    set_signature.set(Some(sig));
                    set_phase.set(TxPhase::Success);
                }
                Err(e) => match e.user_message() {
                    Some(message) => {
                        set_error.set(Some(message));
                        set_phase.set(TxPhase::Error);
                    }
                    None => set_phase.set(TxPhase::Idle),
                },
            }
        });
    };

    view! {
        <Show
            when=move || ctx.wallet.with(|w| w.is_connected)
            fallback=|| view! {
                <section class="card card-disabled">
                    <h2>"Gasless Transfer"</h2>
                    <p class="section-description">
                        "Connect your wallet to send gasless SOL transfers."
                    </p>
                    <div class="disabled-overlay">
                        <span>"Connect wallet to unlock"</span>
                    </div>
                </section>
            }
        >
            <section class="card">
                <h2>"Gasless Transfer"</h2>
                <p class="section-description">
                    "Send SOL without paying gas fees! The paymaster sponsors your transaction."
                </p>

                <div class="transaction-form">
                    <div class="form-group">
                        <label for="recipient">"Recipient Address"</label>
                        <input
                            id="recipient"
                            type="text"
                            class="input"
                            placeholder="Enter Solana address..."
                            prop:value=move || recipient.get()
                            on:input=move |ev| set_recipient.set(event_target_value(&ev))
                        />
                    </div>

                    <div class="form-group">
                        <label for="amount">"Amount (SOL)"</label>
                        <input
                            id="amount"
                            type="number"
                            step="0.001"
                            min="0"
                            class="input"
                            placeholder="0.001"
                            prop:value=move || amount.get()
                            on:input=move |ev| set_amount.set(event_target_value(&ev))
                        />
                    </div>

                    <button
                        class="btn btn-primary"
                        on:click=send
                        disabled=move || phase.get().is_busy()
                    >
                        {move || if phase.get().is_busy() { "Sending..." } else { "Send Gasless Transfer" }}
                    </button>
                </div>

                {move || error.get().map(|message| view! {
                    <div class="alert alert-error">{message}</div>
                })}

                {move || signature.get().map(|sig| {
                    let link = ctx.network().explorer_tx_url(&sig);
                    view! {
                        <div class="alert alert-success">
                            <p>"Transaction confirmed!"</p>
                            <a href=link target="_blank" rel="noopener noreferrer" class="tx-link">
                                "View on Solana Explorer"
                            </a>
                        </div>
                    }
                })}

                <div class="info-box">
                    <strong>"How it works:"</strong>
                    <ul>
                        <li>"Your transaction is signed with your passkey (biometric)"</li>
                        <li>"The paymaster pays the network fees"</li>
                        <li>"SOL is sent from your smart wallet to the recipient"</li>
                    </ul>
                </div>
            </section>
        </Show>
    }
}

/// Off-chain message signing
#[component]
fn MessageSection() -> impl IntoView {
    let ctx = expect_context::<DemoContext>();
    let (message, set_message) = create_signal(DEFAULT_MESSAGE.to_string());
    let (signing, set_signing) = create_signal(false);
    let (signature, set_signature) = create_signal(None::<String>);
    let (error, set_error) = create_signal(None::<String>);

    let sign = move |_| {
        let actions = ctx.actions();
        let text = message.get_untracked();
        set_signing.set(true);
        set_error.set(None);
        set_signature.set(None);

        spawn_local(async move {
            match actions.sign_message(&text).await {
                Ok(sig) => set_signature.set(Some(sig)),
                Err(e) => set_error.set(e.user_message()),
            }
            set_signing.set(false);
        });
    };

    view! {
        <Show
            when=move || ctx.wallet.with(|w| w.is_connected)
            fallback=|| view! {
                <section class="card card-disabled">
                    <h2>"Message Signing"</h2>
                    <p class="section-description">"Connect your wallet to sign messages."</p>
                    <div class="disabled-overlay">
                        <span>"Connect wallet to unlock"</span>
                    </div>
                </section>
            }
        >
            <section class="card">
                <h2>"Message Signing"</h2>
                <p class="section-description">
                    "Sign messages to prove wallet ownership without creating a transaction."
                </p>

                <div class="message-form">
                    <div class="form-group">
                        <label for="message">"Message to Sign"</label>
                        <textarea
                            id="message"
                            class="input textarea"
                            rows="3"
                            placeholder="Enter your message..."
                            prop:value=move || message.get()
                            on:input=move |ev| set_message.set(event_target_value(&ev))
                        ></textarea>
                    </div>

                    <button class="btn btn-secondary" on:click=sign disabled=move || signing.get()>
                        {move || if signing.get() { "Signing..." } else { "Sign Message" }}
                    </button>
                </div>

                {move || error.get().map(|message| view! {
                    <div class="alert alert-error">{message}</div>
                })}

                {move || signature.get().map(|sig| {
                    let copy = sig.clone();
                    view! {
                        <div class="signature-result">
                            <label>"Signature"</label>
                            <div class="signature-display">
                                <code class="signature-text">{sig}</code>
                                <button
                                    class="btn-icon"
                                    title="Copy signature"
                                    on:click=move |_| bridge::copy_to_clipboard(&copy)
                                >
                                    "Copy"
                                </button>
                            </div>
                            <p class="signature-note">
                                "Message signed successfully! This signature can be verified to prove you own this wallet."
                            </p>
                        </div>
                    }
                })}

                <div class="info-box">
                    <strong>"Use cases:"</strong>
                    <ul>
                        <li>"Sign-in to dApps without transactions"</li>
                        <li>"Verify wallet ownership off-chain"</li>
                        <li>"Create verifiable attestations"</li>
                    </ul>
                </div>
            </section>
        </Show>
    }
}

/// Footer
#[component]
fn Footer() -> impl IntoView {
    view! {
        <footer class="footer">
            <div class="footer-content">
                <p class="footer-text">
                    "Built for the Solana ecosystem using "
                    <a href="https://lazorkit.com" target="_blank" rel="noopener noreferrer">"LazorKit SDK"</a>
                </p>
                <div class="footer-links">
                    <a href="https://docs.lazorkit.com" target="_blank" rel="noopener noreferrer">"Docs"</a>
                    <a href="https://github.com/lazor-kit/lazor-kit" target="_blank" rel="noopener noreferrer">"GitHub"</a>
                    <a href="https://t.me/lazorkit" target="_blank" rel="noopener noreferrer">"Telegram"</a>
                </div>
            </div>
        </footer>
    }
}

/// Initialize the app
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
    }
    mount_to_body(|| view! { <App /> });
}
