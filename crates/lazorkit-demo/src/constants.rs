use std::time::Duration;

/// Solana devnet RPC endpoint.
pub const RPC_URL: &str = "https://api.devnet.solana.com";

/// LazorKit authentication portal (passkey prompts happen here).
pub const PORTAL_URL: &str = "https://portal.lazor.sh";

/// Paymaster that sponsors fees on devnet.
pub const PAYMASTER_URL: &str = "https://kora.devnet.lazorkit.com";

/// Block explorer base URL.
pub const EXPLORER_BASE: &str = "https://explorer.solana.com";

/// Explorer `cluster` query parameter.
pub const CLUSTER: &str = "devnet";

/// Display name of the network.
pub const NETWORK_NAME: &str = "Devnet";

/// Where to send users whose balance is low.
pub const FAUCET_URL: &str = "https://faucet.solana.com";

/// SPL Token program id.
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// System program id (native SOL transfers).
pub const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Devnet address prefilled in the transfer form and used by quick actions.
pub const DEFAULT_RECIPIENT: &str = "GQVbE8ZqMqH3xRAqYsxoKQ6NNQeR4sE7ApCHsVWGvUzY";

/// Prefilled transfer amount, in SOL.
pub const DEFAULT_TRANSFER_AMOUNT: &str = "0.001";

/// Prefilled message in the signing card.
pub const DEFAULT_MESSAGE: &str = "Hello LazorKit! This is my first signed message.";

/// Below this many SOL the wallet card shows the faucet hint.
pub const LOW_BALANCE_HINT_SOL: f64 = 0.1;

/// Runtime network configuration. Decouples the flows from compile-time
/// constants so the same code can target another cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub portal_url: String,
    pub paymaster_url: String,
    pub explorer_base: String,
    pub cluster: String,
    pub network_name: String,
}

impl Default for NetworkConfig {
    /// Defaults to Solana devnet.
    fn default() -> Self {
        Self {
            rpc_url: RPC_URL.to_string(),
            portal_url: PORTAL_URL.to_string(),
            paymaster_url: PAYMASTER_URL.to_string(),
            explorer_base: EXPLORER_BASE.to_string(),
            cluster: CLUSTER.to_string(),
            network_name: NETWORK_NAME.to_string(),
        }
    }
}

impl NetworkConfig {
    /// Devnet defaults overridden by `LAZORKIT_RPC_URL`, `LAZORKIT_PORTAL_URL`,
    /// `LAZORKIT_PAYMASTER_URL` and `LAZORKIT_CLUSTER` when set.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self::default().with_overrides(
            var("LAZORKIT_RPC_URL").as_deref(),
            var("LAZORKIT_PORTAL_URL").as_deref(),
            var("LAZORKIT_PAYMASTER_URL").as_deref(),
            var("LAZORKIT_CLUSTER").as_deref(),
        )
    }

    /// Apply optional overrides. Used by `from_env` and by the browser app's
    /// compile-time `option_env!` values.
    pub fn with_overrides(
        mut self,
        rpc_url: Option<&str>,
        portal_url: Option<&str>,
        paymaster_url: Option<&str>,
        cluster: Option<&str>,
    ) -> Self {
        if let Some(url) = rpc_url {
            self.rpc_url = url.to_string();
        }
        if let Some(url) = portal_url {
            self.portal_url = url.to_string();
        }
        if let Some(url) = paymaster_url {
            self.paymaster_url = url.to_string();
        }
        if let Some(cluster) = cluster {
            self.cluster = cluster.to_string();
            self.network_name = capitalize(cluster);
        }
        self
    }

    pub fn explorer_tx_url(&self, signature: &str) -> String {
        format!(
            "{}/tx/{}?cluster={}",
            self.explorer_base, signature, self.cluster
        )
    }

    pub fn explorer_address_url(&self, address: &str) -> String {
        format!(
            "{}/address/{}?cluster={}",
            self.explorer_base, address, self.cluster
        )
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Refresh cadences for the demo's pollers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollingConfig {
    /// Delay before the first balance fetch after connecting.
    pub balance_initial_delay: Duration,
    pub balance_interval: Duration,
    /// Minimum spacing between two successful balance fetches.
    pub balance_min_interval: Duration,
    pub token_interval: Duration,
    /// Confirmation cadence while something is pending.
    pub confirm_short_interval: Duration,
    /// Confirmation cadence when nothing is pending.
    pub confirm_long_interval: Duration,
    /// Number of activity rows shown.
    pub history_limit: usize,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            balance_initial_delay: Duration::from_millis(300),
            balance_interval: Duration::from_secs(10),
            balance_min_interval: Duration::from_secs(5),
            token_interval: Duration::from_secs(30),
            confirm_short_interval: Duration::from_secs(3),
            confirm_long_interval: Duration::from_secs(30),
            history_limit: 5,
        }
    }
}
