//! Read-only Solana JSON-RPC calls used by the demo.
//!
//! Only the four methods the cards need are modelled. The transport is a
//! seam: [`ReqwestTransport`] natively, `gloo-net` in the browser app, canned
//! responses in tests.

use crate::error::DemoError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Sends one JSON-RPC request body and returns the raw response body.
pub trait RpcTransport {
    fn post(&self, body: String) -> impl Future<Output = Result<String, DemoError>>;
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

/// `{result, error}` envelope.
#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    #[serde(default)]
    pub code: i64,
    pub message: String,
}

/// Results that carry a slot context, e.g. `getBalance`.
#[derive(Debug, Clone, Deserialize)]
pub struct WithContext<T> {
    pub value: T,
}

/// One row of `getSignaturesForAddress`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub signature: String,
    #[serde(default)]
    pub slot: u64,
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub confirmation_status: Option<String>,
}

/// One entry of `getSignatureStatuses`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    #[serde(default)]
    pub slot: u64,
    #[serde(default)]
    pub confirmations: Option<u64>,
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    #[serde(default)]
    pub confirmation_status: Option<String>,
}

impl SignatureStatus {
    /// Landed without error at `confirmed` or `finalized` commitment.
    pub fn is_confirmed(&self) -> bool {
        self.err.is_none()
            && matches!(
                self.confirmation_status.as_deref(),
                Some("confirmed") | Some("finalized")
            )
    }
}

/// A parsed SPL token account from `getTokenAccountsByOwner` (jsonParsed).
#[derive(Debug, Clone, PartialEq)]
pub struct TokenAccount {
    pub pubkey: String,
    pub mint: String,
    pub ui_amount: f64,
    pub decimals: u8,
}

#[derive(Deserialize)]
struct RawTokenAccount {
    pubkey: String,
    account: RawAccount,
}

#[derive(Deserialize)]
struct RawAccount {
    data: RawData,
}

#[derive(Deserialize)]
struct RawData {
    parsed: RawParsed,
}

#[derive(Deserialize)]
struct RawParsed {
    info: RawTokenInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTokenInfo {
    mint: String,
    token_amount: RawTokenAmount,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTokenAmount {
    #[serde(default)]
    ui_amount: Option<f64>,
    #[serde(default)]
    decimals: u8,
}

/// Build a JSON-RPC 2.0 request body.
pub fn request_body(method: &str, params: serde_json::Value) -> Result<String, DemoError> {
    Ok(serde_json::to_string(&RpcRequest {
        jsonrpc: "2.0",
        id: 1,
        method,
        params,
    })?)
}

/// Decode a response body into its `result`.
///
/// An `error` object is a provider-reported failure; a body that is not an
/// envelope, or carries neither field, is malformed.
pub fn decode_response<T: DeserializeOwned>(method: &str, body: &str) -> Result<T, DemoError> {
    let envelope: RpcEnvelope<T> = serde_json::from_str(body)
        .map_err(|e| DemoError::Malformed(format!("{method}: {e}")))?;

    if let Some(err) = envelope.error {
        return Err(DemoError::TransientFetchFailure(format!(
            "{method}: {} (code {})",
            err.message, err.code
        )));
    }
    envelope
        .result
        .ok_or_else(|| DemoError::Malformed(format!("{method}: response has no result")))
}

/// Typed client over an [`RpcTransport`].
pub struct RpcClient<T: RpcTransport> {
    transport: T,
}

impl<T: RpcTransport> RpcClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<R, DemoError> {
        let body = request_body(method, params)?;
        let response = self.transport.post(body).await?;
        decode_response(method, &response)
    }

    /// Balance in lamports.
    pub async fn get_balance(&self, address: &str) -> Result<u64, DemoError> {
        let result: WithContext<u64> = self
            .call("getBalance", serde_json::json!([address]))
            .await?;
        Ok(result.value)
    }

    /// Most recent signatures touching `address`, newest first.
    pub async fn get_signatures_for_address(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>, DemoError> {
        self.call(
            "getSignaturesForAddress",
            serde_json::json!([address, { "limit": limit }]),
        )
        .await
    }

    /// Statuses in the same order as `signatures`; `None` when unknown to the node.
    pub async fn get_signature_statuses(
        &self,
        signatures: &[String],
    ) -> Result<Vec<Option<SignatureStatus>>, DemoError> {
        let result: WithContext<Vec<Option<SignatureStatus>>> = self
            .call("getSignatureStatuses", serde_json::json!([signatures]))
            .await?;
        if result.value.len() != signatures.len() {
            return Err(DemoError::Malformed(format!(
                "getSignatureStatuses: asked for {} statuses, got {}",
                signatures.len(),
                result.value.len()
            )));
        }
        Ok(result.value)
    }

    /// Parsed SPL token accounts owned by `owner` under `program_id`.
    pub async fn get_token_accounts_by_owner(
        &self,
        owner: &str,
        program_id: &str,
    ) -> Result<Vec<TokenAccount>, DemoError> {
        let result: WithContext<Vec<RawTokenAccount>> = self
            .call(
                "getTokenAccountsByOwner",
                serde_json::json!([
                    owner,
                    { "programId": program_id },
                    { "encoding": "jsonParsed" }
                ]),
            )
            .await?;

        Ok(result
            .value
            .into_iter()
            .map(|raw| {
                let info = raw.account.data.parsed.info;
                TokenAccount {
                    pubkey: raw.pubkey,
                    mint: info.mint,
                    ui_amount: info.token_amount.ui_amount.unwrap_or(0.0),
                    decimals: info.token_amount.decimals,
                }
            })
            .collect())
    }
}

#[cfg(feature = "full")]
pub use native::ReqwestTransport;

#[cfg(feature = "full")]
mod native {
    use super::RpcTransport;
    use crate::error::DemoError;

    /// `reqwest`-backed transport for native callers.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        http: reqwest::Client,
        url: String,
    }

    impl ReqwestTransport {
        pub fn new(url: impl Into<String>) -> Self {
            Self {
                http: reqwest::Client::new(),
                url: url.into(),
            }
        }
    }

    impl RpcTransport for ReqwestTransport {
        async fn post(&self, body: String) -> Result<String, DemoError> {
            let resp = self
                .http
                .post(&self.url)
                .header("Content-Type", "application/json")
                .body(body)
                .send()
                .await
                .map_err(|e| DemoError::TransientFetchFailure(format!("request failed: {e}")))?;

            if !resp.status().is_success() {
                return Err(DemoError::TransientFetchFailure(format!(
                    "rpc returned HTTP {}",
                    resp.status()
                )));
            }

            resp.text()
                .await
                .map_err(|e| DemoError::TransientFetchFailure(format!("failed to read body: {e}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = request_body("getBalance", serde_json::json!(["addr"])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], 1);
        assert_eq!(value["method"], "getBalance");
        assert_eq!(value["params"][0], "addr");
    }

    #[test]
    fn test_decode_error_object_is_fetch_failure() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32005,"message":"Node is behind"}}"#;
        let err = decode_response::<u64>("getBalance", body).unwrap_err();
        assert!(matches!(err, DemoError::TransientFetchFailure(ref m) if m.contains("Node is behind")));
    }

    #[test]
    fn test_decode_missing_result_is_malformed() {
        let err = decode_response::<u64>("getBalance", r#"{"jsonrpc":"2.0","id":1}"#).unwrap_err();
        assert!(matches!(err, DemoError::Malformed(_)));

        let err = decode_response::<u64>("getBalance", "<html>502</html>").unwrap_err();
        assert!(matches!(err, DemoError::Malformed(_)));
    }

    #[test]
    fn test_signature_status_confirmation() {
        let status: SignatureStatus = serde_json::from_value(serde_json::json!({
            "slot": 10, "confirmations": null, "err": null, "confirmationStatus": "finalized"
        }))
        .unwrap();
        assert!(status.is_confirmed());

        let processed: SignatureStatus = serde_json::from_value(serde_json::json!({
            "slot": 10, "confirmations": 0, "err": null, "confirmationStatus": "processed"
        }))
        .unwrap();
        assert!(!processed.is_confirmed());

        let failed: SignatureStatus = serde_json::from_value(serde_json::json!({
            "slot": 10, "err": {"InstructionError": [0, {"Custom": 1}]}, "confirmationStatus": "confirmed"
        }))
        .unwrap();
        assert!(!failed.is_confirmed());
    }
}
