//! Scripted in-memory providers for tests.
//!
//! Clones share state, so a test can keep a handle to a mock after moving it
//! into an orchestrator and inspect the calls it received. Responses can be
//! held back with a gate until the test releases them, which makes
//! interleavings of concurrent queries deterministic.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::oneshot;

use crate::error::{ApiError, CredentialError, ProviderError};
use crate::models::{
    Phase, QueryState, RawTokenBalance, TokenBalancesResponse, TokenMetadataResponse,
};
use crate::orchestrator::QueryStore;
use crate::provider::{EnsResolver, TokenApi, WalletProvider};

fn key(address: &str) -> String {
    address.to_lowercase()
}

// =============================================================================
// Wallet
// =============================================================================

/// Resolver record with a fixed answer.
#[derive(Debug, Clone)]
pub struct MockResolver {
    result: Result<Option<String>, ProviderError>,
}

impl MockResolver {
    pub fn address(address: &str) -> Self {
        Self {
            result: Ok(Some(address.to_string())),
        }
    }

    pub fn empty() -> Self {
        Self { result: Ok(None) }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(ProviderError::new(message)),
        }
    }
}

impl EnsResolver for MockResolver {
    async fn get_address(&self) -> Result<Option<String>, ProviderError> {
        self.result.clone()
    }
}

#[derive(Default)]
struct WalletInner {
    authorized: Vec<String>,
    request_result: Option<Result<Vec<String>, ProviderError>>,
    names: HashMap<String, MockResolver>,
    resolver_lookups: Vec<String>,
    account_requests: usize,
}

#[derive(Clone, Default)]
pub struct MockWallet {
    inner: Rc<RefCell<WalletInner>>,
}

impl MockWallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts reported by `list_authorized_accounts` (and by
    /// `request_accounts` unless overridden).
    pub fn with_authorized(self, accounts: &[&str]) -> Self {
        self.inner.borrow_mut().authorized = accounts.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_request_result(self, result: Result<Vec<String>, ProviderError>) -> Self {
        self.inner.borrow_mut().request_result = Some(result);
        self
    }

    pub fn with_name(self, name: &str, resolver: MockResolver) -> Self {
        self.inner
            .borrow_mut()
            .names
            .insert(name.to_string(), resolver);
        self
    }

    /// Names passed to `get_resolver`, in call order.
    pub fn resolver_lookups(&self) -> Vec<String> {
        self.inner.borrow().resolver_lookups.clone()
    }

    /// Number of `request_accounts` calls (permission prompts).
    pub fn account_requests(&self) -> usize {
        self.inner.borrow().account_requests
    }
}

impl WalletProvider for MockWallet {
    type Resolver = MockResolver;

    async fn list_authorized_accounts(&self) -> Result<Vec<String>, ProviderError> {
        Ok(self.inner.borrow().authorized.clone())
    }

    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        let mut inner = self.inner.borrow_mut();
        inner.account_requests += 1;
        match &inner.request_result {
            Some(result) => result.clone(),
            None => Ok(inner.authorized.clone()),
        }
    }

    async fn get_resolver(&self, name: &str) -> Result<Option<MockResolver>, ProviderError> {
        let mut inner = self.inner.borrow_mut();
        inner.resolver_lookups.push(name.to_string());
        Ok(inner.names.get(name).cloned())
    }
}

// =============================================================================
// Token API
// =============================================================================

struct ApiInner {
    credential: Result<(), CredentialError>,
    balances: HashMap<String, Result<TokenBalancesResponse, ApiError>>,
    metadata: HashMap<String, Result<TokenMetadataResponse, ApiError>>,
    balance_gates: HashMap<String, oneshot::Receiver<()>>,
    metadata_gates: HashMap<String, oneshot::Receiver<()>>,
    balance_calls: Vec<String>,
    metadata_calls: Vec<String>,
}

impl Default for ApiInner {
    fn default() -> Self {
        Self {
            credential: Ok(()),
            balances: HashMap::new(),
            metadata: HashMap::new(),
            balance_gates: HashMap::new(),
            metadata_gates: HashMap::new(),
            balance_calls: Vec::new(),
            metadata_calls: Vec::new(),
        }
    }
}

/// Token API answering from fixed tables.
///
/// Unknown owners hold no tokens; unknown contracts fail metadata lookup.
#[derive(Clone, Default)]
pub struct MockTokenApi {
    inner: Rc<RefCell<ApiInner>>,
}

impl MockTokenApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(self, credential: Result<(), CredentialError>) -> Self {
        self.inner.borrow_mut().credential = credential;
        self
    }

    pub fn with_balances(self, owner: &str, rows: Vec<RawTokenBalance>) -> Self {
        let response = TokenBalancesResponse {
            address: Some(owner.to_string()),
            token_balances: Some(rows),
        };
        self.with_balances_response(owner, Ok(response))
    }

    pub fn with_balances_response(
        self,
        owner: &str,
        response: Result<TokenBalancesResponse, ApiError>,
    ) -> Self {
        self.inner.borrow_mut().balances.insert(key(owner), response);
        self
    }

    pub fn with_metadata(
        self,
        contract: &str,
        response: Result<TokenMetadataResponse, ApiError>,
    ) -> Self {
        self.inner
            .borrow_mut()
            .metadata
            .insert(key(contract), response);
        self
    }

    /// Hold the next balance response for `owner` until the sender fires.
    pub fn gate_balances(&self, owner: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.inner.borrow_mut().balance_gates.insert(key(owner), rx);
        tx
    }

    /// Hold the next metadata response for `contract` until the sender fires.
    pub fn gate_metadata(&self, contract: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.inner
            .borrow_mut()
            .metadata_gates
            .insert(key(contract), rx);
        tx
    }

    /// Owners passed to `get_token_balances`, in call order.
    pub fn balance_calls(&self) -> Vec<String> {
        self.inner.borrow().balance_calls.clone()
    }

    /// Contracts passed to `get_token_metadata`, in call order.
    pub fn metadata_calls(&self) -> Vec<String> {
        self.inner.borrow().metadata_calls.clone()
    }
}

impl TokenApi for MockTokenApi {
    fn check_credential(&self) -> Result<(), CredentialError> {
        self.inner.borrow().credential
    }

    async fn get_token_balances(&self, address: &str) -> Result<TokenBalancesResponse, ApiError> {
        let gate = {
            let mut inner = self.inner.borrow_mut();
            inner.balance_calls.push(address.to_string());
            inner.balance_gates.remove(&key(address))
        };
        if let Some(gate) = gate {
            // A dropped sender releases the gate too.
            let _ = gate.await;
        }

        self.inner
            .borrow()
            .balances
            .get(&key(address))
            .cloned()
            .unwrap_or_else(|| {
                Ok(TokenBalancesResponse {
                    address: Some(address.to_string()),
                    token_balances: Some(Vec::new()),
                })
            })
    }

    async fn get_token_metadata(
        &self,
        contract_address: &str,
    ) -> Result<TokenMetadataResponse, ApiError> {
        let gate = {
            let mut inner = self.inner.borrow_mut();
            inner.metadata_calls.push(contract_address.to_string());
            inner.metadata_gates.remove(&key(contract_address))
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        self.inner
            .borrow()
            .metadata
            .get(&key(contract_address))
            .cloned()
            .unwrap_or_else(|| {
                Err(ApiError::Rpc {
                    code: -32602,
                    message: format!("unknown token {}", contract_address),
                })
            })
    }
}

// =============================================================================
// Store
// =============================================================================

/// Query store that records every phase it passes through.
#[derive(Clone, Default)]
pub struct RecordingStore {
    state: Rc<RefCell<QueryState>>,
    phases: Rc<RefCell<Vec<Phase>>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct consecutive phases seen so far.
    pub fn phases(&self) -> Vec<Phase> {
        self.phases.borrow().clone()
    }
}

impl QueryStore for RecordingStore {
    fn read<R>(&self, f: impl FnOnce(&QueryState) -> R) -> R {
        f(&self.state.borrow())
    }

    fn write(&self, f: impl FnOnce(&mut QueryState)) {
        let phase = {
            let mut state = self.state.borrow_mut();
            f(&mut state);
            state.phase
        };
        let mut phases = self.phases.borrow_mut();
        if phases.last() != Some(&phase) {
            phases.push(phase);
        }
    }
}
