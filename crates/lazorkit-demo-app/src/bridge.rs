//! Browser bindings: the LazorKit JS SDK, localStorage and `Date.now()`.
//!
//! The host page loads the SDK and exposes it as `window.lazorkit` with
//! `connect`, `disconnect`, `signMessage` and `signAndSendTransaction`.
//! Everything crosses the boundary as JSON.

#![allow(deprecated)]

use lazorkit_demo::{
    Clock, ConnectOptions, DemoError, Instruction, KeyValueStore, ProviderError, SignedMessage,
    WalletAccount, WalletProvider, WalletState,
};
use leptos::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = window, js_name = lazorkit)]
    static LAZORKIT: JsValue;

    #[wasm_bindgen(catch, js_namespace = ["window", "lazorkit"], js_name = connect)]
    async fn sdk_connect(options: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["window", "lazorkit"], js_name = disconnect)]
    async fn sdk_disconnect() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["window", "lazorkit"], js_name = signMessage)]
    async fn sdk_sign_message(message: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["window", "lazorkit"], js_name = signAndSendTransaction)]
    async fn sdk_sign_and_send(instructions: JsValue) -> Result<JsValue, JsValue>;
}

// --- JSON across the boundary ---

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, ProviderError> {
    let json = serde_json::to_string(value)
        .map_err(|e| ProviderError::new(format!("Failed to serialize request: {}", e)))?;
    js_sys::JSON::parse(&json).map_err(provider_error)
}

fn from_js<T: DeserializeOwned>(value: &JsValue) -> Result<T, ProviderError> {
    let json: String = js_sys::JSON::stringify(value)
        .map_err(provider_error)?
        .into();
    serde_json::from_str(&json)
        .map_err(|e| ProviderError::new(format!("Unexpected SDK response: {}", e)))
}

/// SDK rejections are usually `Error`s, sometimes with a `code`, sometimes
/// bare strings.
fn provider_error(value: JsValue) -> ProviderError {
    if let Some(text) = value.as_string() {
        return ProviderError::new(text);
    }
    let field = |name: &str| {
        js_sys::Reflect::get(&value, &JsValue::from_str(name))
            .ok()
            .and_then(|v| v.as_string())
    };
    let message = field("message").unwrap_or_else(|| format!("{:?}", value));
    match field("code") {
        Some(code) => ProviderError::new(message).with_code(code),
        None => ProviderError::new(message),
    }
}

fn sdk_loaded() -> Result<(), ProviderError> {
    if LAZORKIT.is_undefined() || LAZORKIT.is_null() {
        return Err(ProviderError::new(
            "LazorKit SDK not loaded. Check the portal and paymaster configuration.",
        ));
    }
    Ok(())
}

// --- Wallet provider ---

async fn request_account(options: &ConnectOptions) -> Result<WalletAccount, ProviderError> {
    let value = sdk_connect(to_js(options)?)
        .await
        .map_err(provider_error)?;
    from_js(&value)
}

/// [`WalletProvider`] over `window.lazorkit`. Connection state lives in a
/// signal so the cards re-render when it changes.
#[derive(Clone, Copy)]
pub struct JsWalletProvider {
    state: RwSignal<WalletState>,
}

impl JsWalletProvider {
    pub fn new() -> Self {
        Self {
            state: create_rw_signal(WalletState::default()),
        }
    }

    /// Reactive view of the connection state.
    pub fn watch(&self) -> Signal<WalletState> {
        self.state.into()
    }
}

impl WalletProvider for JsWalletProvider {
    async fn connect(&self, options: ConnectOptions) -> Result<WalletAccount, ProviderError> {
        sdk_loaded()?;
        self.state.set(WalletState::connecting());

        let result = request_account(&options).await;
        match &result {
            Ok(account) => self.state.set(WalletState::connected(account.clone())),
            Err(_) => self.state.set(WalletState::default()),
        }
        result
    }

    async fn disconnect(&self) -> Result<(), ProviderError> {
        sdk_loaded()?;
        let result = sdk_disconnect().await.map(|_| ()).map_err(provider_error);
        // The session is gone locally even if the SDK complained.
        self.state.set(WalletState::default());
        result
    }

    async fn sign_message(&self, text: &str) -> Result<SignedMessage, ProviderError> {
        sdk_loaded()?;
        let value = sdk_sign_message(text).await.map_err(provider_error)?;
        from_js(&value)
    }

    async fn sign_and_send_transaction(
        &self,
        instructions: &[Instruction],
    ) -> Result<String, ProviderError> {
        sdk_loaded()?;
        let value = sdk_sign_and_send(to_js(&instructions)?)
            .await
            .map_err(provider_error)?;
        value
            .as_string()
            .ok_or_else(|| ProviderError::new("SDK returned no transaction signature"))
    }

    fn state(&self) -> WalletState {
        self.state.get_untracked()
    }
}

// --- localStorage ---

fn local_storage() -> Result<web_sys::Storage, DemoError> {
    web_sys::window()
        .ok_or_else(|| DemoError::PersistenceUnavailable("no window".into()))?
        .local_storage()
        .map_err(|e| DemoError::PersistenceUnavailable(format!("{:?}", e)))?
        .ok_or_else(|| DemoError::PersistenceUnavailable("localStorage disabled".into()))
}

/// `window.localStorage` as a ledger store. Private browsing or a full quota
/// surface as `PersistenceUnavailable`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, DemoError> {
        local_storage()?
            .get_item(key)
            .map_err(|e| DemoError::PersistenceUnavailable(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DemoError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| DemoError::PersistenceUnavailable(format!("{:?}", e)))
    }
}

/// `Date.now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

/// `HH:MM` of a millisecond timestamp in the browser's time zone.
pub fn local_time(timestamp_ms: u64) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(timestamp_ms as f64));
    format!("{:02}:{:02}", date.get_hours(), date.get_minutes())
}

pub fn copy_to_clipboard(text: &str) {
    if let Some(window) = web_sys::window() {
        let clipboard = window.navigator().clipboard();
        let _ = clipboard.write_text(text);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use lazorkit_demo::activity::format_time;
    use lazorkit_demo::{Ledger, LedgerConfig, TxStatus};
    use std::sync::Arc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_local_storage_round_trip() {
        let store = LocalStorage;
        store.set("lazorkit_test_key", "[1,2]").unwrap();
        assert_eq!(
            store.get("lazorkit_test_key").unwrap().as_deref(),
            Some("[1,2]")
        );
        assert_eq!(store.get("lazorkit_missing_key").unwrap(), None);
    }

    #[wasm_bindgen_test]
    fn test_ledger_survives_reload_in_local_storage() {
        let config = LedgerConfig {
            storage_key: "lazorkit_test_ledger".to_string(),
            ..LedgerConfig::default()
        };
        LocalStorage.set(&config.storage_key, "[]").unwrap();

        let ledger = Ledger::new(Arc::new(LocalStorage), Arc::new(JsClock), config.clone());
        ledger.register("sig-local");
        assert!(ledger.is_persistent());

        let reloaded = Ledger::new(Arc::new(LocalStorage), Arc::new(JsClock), config);
        let entry = reloaded.get("sig-local").unwrap();
        assert_eq!(entry.status, TxStatus::Pending);
    }

    #[wasm_bindgen_test]
    fn test_local_time_applies_zone_offset() {
        let ts: u64 = 1_700_000_000_000;
        let offset_min = js_sys::Date::new(&JsValue::from_f64(ts as f64)).get_timezone_offset();
        let shifted = (ts as f64 - offset_min * 60_000.0) as u64;
        assert_eq!(local_time(ts), format_time(shifted));
    }
}
