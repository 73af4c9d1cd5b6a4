//! Alchemy JSON-RPC client.
//!
//! Implements [`TokenApi`] with `alchemy_getTokenBalances` and
//! `alchemy_getTokenMetadata`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokenscope_core::models::{TokenBalancesResponse, TokenMetadataResponse};
use tokenscope_core::{ApiError, ApiKey, CredentialError, TokenApi};

use crate::config::AppConfig;
use crate::utils::post_json;

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u32,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct JsonRpcFailure {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcFailure>,
}

impl<T> JsonRpcResponse<T> {
    fn into_result(self) -> Result<T, ApiError> {
        if let Some(JsonRpcFailure { code, message }) = self.error {
            return Err(ApiError::Rpc { code, message });
        }
        self.result
            .ok_or_else(|| ApiError::Decode("response has neither result nor error".to_string()))
    }
}

#[derive(Clone)]
pub struct AlchemyClient {
    /// Endpoint with the key substituted, or why there is none.
    endpoint: Result<String, CredentialError>,
    timeout_ms: u32,
}

impl AlchemyClient {
    pub fn new(config: &AppConfig) -> Self {
        let endpoint = ApiKey::parse(config.api.api_key.as_deref())
            .map(|key| config.api.endpoint_url(key.expose()));
        Self {
            endpoint,
            timeout_ms: config.request_timeout_ms,
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, ApiError> {
        // Unreachable after pre-flight; reported like the server would.
        let endpoint = self.endpoint.as_ref().map_err(|_| ApiError::Http(401))?;
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        log::debug!("{} {}", method, request.params);
        post_json::<_, JsonRpcResponse<T>>(endpoint, &request, self.timeout_ms)
            .await?
            .into_result()
    }
}

impl TokenApi for AlchemyClient {
    fn check_credential(&self) -> Result<(), CredentialError> {
        self.endpoint.as_ref().map(|_| ()).map_err(|e| *e)
    }

    async fn get_token_balances(&self, address: &str) -> Result<TokenBalancesResponse, ApiError> {
        self.call("alchemy_getTokenBalances", json!([address, "erc20"]))
            .await
    }

    async fn get_token_metadata(
        &self,
        contract_address: &str,
    ) -> Result<TokenMetadataResponse, ApiError> {
        self.call("alchemy_getTokenMetadata", json!([contract_address]))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> AppConfig {
        let mut config = AppConfig::default();
        config.api.api_key = key.map(str::to_string);
        config
    }

    #[test]
    fn test_missing_key_fails_preflight() {
        let client = AlchemyClient::new(&config_with_key(None));
        assert_eq!(client.check_credential(), Err(CredentialError::Missing));
    }

    #[test]
    fn test_valid_key_passes_preflight() {
        let client = AlchemyClient::new(&config_with_key(Some("a1b2c3d4e5")));
        assert_eq!(client.check_credential(), Ok(()));
    }

    #[test]
    fn test_rpc_error_takes_precedence() {
        let response: JsonRpcResponse<TokenBalancesResponse> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":429,"message":"too many requests"}}"#,
        )
        .unwrap();
        assert_eq!(
            response.into_result().unwrap_err(),
            ApiError::Rpc {
                code: 429,
                message: "too many requests".to_string()
            }
        );
    }

    #[test]
    fn test_balances_response_decodes() {
        let response: JsonRpcResponse<TokenBalancesResponse> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"result":{"address":"0xd8da6bf26964af9d7eed9e03e53415d37aa96045","tokenBalances":[{"contractAddress":"0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48","tokenBalance":"0x0f4240"}]}}"#,
        )
        .unwrap();
        let balances = response.into_result().unwrap().token_balances.unwrap();
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].token_balance.as_deref(), Some("0x0f4240"));
    }

    #[test]
    fn test_null_result_is_decode_error() {
        let response: JsonRpcResponse<TokenMetadataResponse> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert!(matches!(response.into_result(), Err(ApiError::Decode(_))));
    }
}
