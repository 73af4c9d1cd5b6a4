//! Browser wallet adapter.
//!
//! [`Eip1193Wallet`] drives the injected `window.ethereum` provider through
//! the Reflect API. ENS lookups are plain `eth_call`s against the registry
//! and the name's resolver, so any EIP-1193 wallet can answer them.

use js_sys::{Array, Function, Object, Promise, Reflect};
use serde::Serialize;
use serde_json::{Value, json};
use tokenscope_core::config::ens::REGISTRY;
use tokenscope_core::ens::{
    AddrResolver, EnsRegistry, addr_calldata, decode_address_return, namehash, resolver_calldata,
};
use tokenscope_core::{EnsResolver, EthAddress, ProviderError, WalletProvider};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen_futures::JsFuture;

use crate::config::{WALLET_DISCONNECTED_KEY, WALLET_TIMEOUT_MS};
use crate::utils::{RaceResult, dom, race_with_timeout};

/// Arguments object for `ethereum.request`.
#[derive(Serialize)]
struct RequestArguments<'a> {
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

/// Convert a rejected provider promise into a [`ProviderError`].
///
/// EIP-1193 errors carry a numeric `code` (4001 = user rejected).
fn provider_error(err: JsValue) -> ProviderError {
    let code = Reflect::get(&err, &"code".into())
        .ok()
        .and_then(|c| c.as_f64())
        .map(|c| c as i64);
    let message = Reflect::get(&err, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err));
    ProviderError { code, message }
}

fn account_list(value: &JsValue) -> Vec<String> {
    Array::from(value).iter().filter_map(|v| v.as_string()).collect()
}

/// Handle to the injected EIP-1193 provider.
#[derive(Clone)]
pub struct Eip1193Wallet {
    ethereum: Object,
}

impl Eip1193Wallet {
    /// The injected provider, if the page has one.
    pub fn detect() -> Option<Self> {
        let window = dom::window()?;
        Reflect::get(&window, &"ethereum".into())
            .ok()
            .and_then(|v| v.dyn_into::<Object>().ok())
            .map(|ethereum| Self { ethereum })
    }

    fn method(&self, name: &str) -> Result<Function, ProviderError> {
        Reflect::get(&self.ethereum, &name.into())
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(|| ProviderError::new(format!("wallet provider has no `{}` method", name)))
    }

    /// Start `ethereum.request({ method, params })` without awaiting it.
    fn request_promise(&self, method: &str, params: Option<Value>) -> Result<Promise, ProviderError> {
        let args = RequestArguments { method, params }
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| ProviderError::new(e.to_string()))?;

        let promise: Promise = self
            .method("request")?
            .call1(&self.ethereum, &args)
            .map_err(provider_error)?
            .into();
        Ok(promise)
    }

    async fn request(&self, method: &str, params: Option<Value>) -> Result<JsValue, ProviderError> {
        let promise = self.request_promise(method, params)?;
        JsFuture::from(promise).await.map_err(provider_error)
    }

    /// Read-only contract call against the latest block.
    async fn eth_call(&self, to: &str, data: String) -> Result<String, ProviderError> {
        let params = json!([{ "to": to, "data": data }, "latest"]);
        self.request("eth_call", Some(params))
            .await?
            .as_string()
            .ok_or_else(|| ProviderError::new("eth_call returned a non-string result"))
    }

    /// Register a callback for `accountsChanged`.
    ///
    /// The closure is leaked with `forget()`; the listener lives as long as
    /// the page.
    pub fn on_accounts_changed(
        &self,
        callback: impl Fn(Vec<String>) + 'static,
    ) -> Result<(), ProviderError> {
        let closure = Closure::wrap(Box::new(move |accounts: JsValue| {
            callback(account_list(&accounts));
        }) as Box<dyn Fn(JsValue)>);

        self.method("on")?
            .call2(&self.ethereum, &"accountsChanged".into(), closure.as_ref())
            .map_err(provider_error)?;

        closure.forget();
        Ok(())
    }
}

impl WalletProvider for Eip1193Wallet {
    type Resolver = EnsRecord;

    async fn list_authorized_accounts(&self) -> Result<Vec<String>, ProviderError> {
        let promise = self.request_promise("eth_accounts", None)?;
        match race_with_timeout(promise, WALLET_TIMEOUT_MS).await {
            RaceResult::Completed(result) => Ok(account_list(&result)),
            RaceResult::TimedOut => Err(ProviderError::new("eth_accounts timed out")),
            RaceResult::Error(e) => Err(provider_error(e)),
        }
    }

    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        let result = self.request("eth_requestAccounts", None).await?;
        Ok(account_list(&result))
    }

    async fn get_resolver(&self, name: &str) -> Result<Option<EnsRecord>, ProviderError> {
        let node = namehash(name);
        let result = self.eth_call(REGISTRY, resolver_calldata(node)).await?;

        let resolver = decode_address_return::<EnsRegistry::resolverCall>(&result)?;
        Ok(resolver.map(|resolver| EnsRecord {
            wallet: self.clone(),
            resolver,
            node,
        }))
    }
}

/// Resolver contract for one ENS node.
pub struct EnsRecord {
    wallet: Eip1193Wallet,
    resolver: EthAddress,
    node: alloy_primitives::B256,
}

impl EnsResolver for EnsRecord {
    async fn get_address(&self) -> Result<Option<String>, ProviderError> {
        let result = self
            .wallet
            .eth_call(self.resolver.as_str(), addr_calldata(self.node))
            .await?;
        let address = decode_address_return::<AddrResolver::addrCall>(&result)?;
        Ok(address.map(|address| address.to_string()))
    }
}

// ============================================================================
// Session Persistence
// ============================================================================

/// Whether the user explicitly disconnected on a previous visit.
pub fn is_disconnect_remembered() -> bool {
    dom::has_flag(WALLET_DISCONNECTED_KEY)
}

/// Remember (or forget) an explicit disconnect across page loads.
pub fn remember_disconnect(disconnected: bool) {
    dom::set_flag(WALLET_DISCONNECTED_KEY, disconnected);
}
