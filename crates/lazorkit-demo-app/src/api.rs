//! Chain RPC over `gloo-net` and compile-time network configuration.

use gloo_net::http::Request;
use lazorkit_demo::{DemoError, NetworkConfig, RpcClient, RpcTransport};

/// Network overrides baked in at build time, e.g.
/// `LAZORKIT_RPC_URL=http://localhost:8899 trunk build`.
pub fn network_config() -> NetworkConfig {
    NetworkConfig::default().with_overrides(
        option_env!("LAZORKIT_RPC_URL"),
        option_env!("LAZORKIT_PORTAL_URL"),
        option_env!("LAZORKIT_PAYMASTER_URL"),
        option_env!("LAZORKIT_CLUSTER"),
    )
}

/// JSON-RPC POST through the browser's `fetch`.
#[derive(Debug, Clone)]
pub struct GlooTransport {
    url: String,
}

impl GlooTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl RpcTransport for GlooTransport {
    async fn post(&self, body: String) -> Result<String, DemoError> {
        let resp = Request::post(&self.url)
            .header("Content-Type", "application/json")
            .body(body)
            .map_err(|e| DemoError::TransientFetchFailure(format!("Failed to build request: {}", e)))?
            .send()
            .await
            .map_err(|e| DemoError::TransientFetchFailure(format!("Request failed: {}", e)))?;

        if !resp.ok() {
            return Err(DemoError::TransientFetchFailure(format!(
                "RPC returned HTTP {}",
                resp.status()
            )));
        }

        resp.text()
            .await
            .map_err(|e| DemoError::TransientFetchFailure(format!("Failed to read body: {}", e)))
    }
}

pub type Rpc = RpcClient<GlooTransport>;

pub fn rpc_client(network: &NetworkConfig) -> Rpc {
    RpcClient::new(GlooTransport::new(network.rpc_url.clone()))
}
