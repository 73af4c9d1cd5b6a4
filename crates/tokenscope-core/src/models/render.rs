use serde::Serialize;

use crate::error::ErrorKind;
use crate::format::format_balance;
use crate::models::{Phase, QueryState, TokenBalanceEntry, TokenMetadata};

/// Name and address shown when the query started from an ENS name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsDisplay {
    pub name: String,
    pub resolved_address: String,
}

/// One row of the token table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenView {
    pub symbol: String,
    pub name: Option<String>,
    pub decimals: u32,
    pub logo_url: Option<String>,
    pub formatted_balance: String,
    pub contract_address: String,
    pub short_address: String,
}

impl TokenView {
    fn new(entry: &TokenBalanceEntry, metadata: &TokenMetadata) -> Self {
        Self {
            symbol: metadata.symbol.clone(),
            name: metadata.name.clone(),
            decimals: metadata.decimals,
            logo_url: metadata.logo_url.clone(),
            formatted_balance: format_balance(&entry.raw_balance, metadata.decimals),
            contract_address: entry.contract_address.to_string(),
            short_address: entry.contract_address.short(),
        }
    }
}

/// Everything the UI needs to draw the current query.
///
/// Tokens are only present once the query is `Done`, so a view built from
/// this model never shows results next to a loading indicator or an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderModel {
    pub phase: Phase,
    pub loading_message: Option<String>,
    pub error_kind: Option<ErrorKind>,
    pub error_message: Option<String>,
    pub ens_display: Option<EnsDisplay>,
    pub tokens: Vec<TokenView>,
}

impl RenderModel {
    pub fn from_state(state: &QueryState) -> Self {
        let tokens = if state.phase == Phase::Done {
            state
                .balances
                .iter()
                .zip(&state.metadata)
                .map(|(entry, metadata)| TokenView::new(entry, metadata))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            phase: state.phase,
            loading_message: state.loading_message.clone(),
            error_kind: state.error_kind(),
            error_message: state.error.as_ref().map(ToString::to_string),
            ens_display: state.ens.as_ref().map(|ens| EnsDisplay {
                name: ens.name.to_string(),
                resolved_address: ens.resolved_address.to_string(),
            }),
            tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::input::classify;
    use crate::models::{EnsName, EthAddress, QueryEvent};

    const ADDR: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
    const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";

    #[test]
    fn test_idle_model() {
        let model = QueryState::new().render();
        assert_eq!(model.phase, Phase::Idle);
        assert!(!model.phase.is_loading());
        assert!(model.tokens.is_empty());
        assert_eq!(model.error_kind, None);
    }

    #[test]
    fn test_done_model_formats_tokens() {
        let state = QueryState::new()
            .apply(QueryEvent::Submitted)
            .apply(QueryEvent::Classified {
                generation: 1,
                classification: classify("vitalik.eth"),
            })
            .apply(QueryEvent::NameResolved {
                generation: 1,
                name: EnsName::parse("vitalik.eth").unwrap(),
                address: EthAddress::parse(ADDR).unwrap(),
            })
            .apply(QueryEvent::BalancesFetched {
                generation: 1,
                entries: vec![TokenBalanceEntry {
                    contract_address: EthAddress::parse(USDC).unwrap(),
                    raw_balance: "0x0f4240".to_string(),
                }],
            })
            .apply(QueryEvent::MetadataCollected {
                generation: 1,
                metadata: vec![TokenMetadata {
                    symbol: "USDC".into(),
                    name: Some("USD Coin".into()),
                    decimals: 6,
                    logo_url: Some("https://example.org/usdc.png".into()),
                }],
            });

        let model = state.render();
        assert_eq!(model.phase, Phase::Done);
        assert_eq!(
            model.ens_display,
            Some(EnsDisplay {
                name: "vitalik.eth".into(),
                resolved_address: ADDR.into(),
            })
        );
        assert_eq!(model.tokens.len(), 1);
        let token = &model.tokens[0];
        assert_eq!(token.symbol, "USDC");
        assert_eq!(token.formatted_balance, "1.0000");
        assert_eq!(token.contract_address, USDC);
        assert_eq!(token.short_address, "0xA0b8...eB48");
    }

    #[test]
    fn test_tokens_hidden_while_loading() {
        let state = QueryState::new()
            .apply(QueryEvent::Submitted)
            .apply(QueryEvent::Classified {
                generation: 1,
                classification: classify(ADDR),
            })
            .apply(QueryEvent::BalancesFetched {
                generation: 1,
                entries: vec![TokenBalanceEntry {
                    contract_address: EthAddress::parse(USDC).unwrap(),
                    raw_balance: "0x1".to_string(),
                }],
            });
        let model = state.render();
        assert!(model.phase.is_loading());
        assert!(model.tokens.is_empty());
        assert!(model.loading_message.unwrap().contains("1 tokens"));
    }

    #[test]
    fn test_error_model() {
        let state = QueryState::new()
            .apply(QueryEvent::Submitted)
            .apply(QueryEvent::Classified {
                generation: 1,
                classification: crate::input::InputClassification::Invalid(
                    ValidationError::InvalidCharacters,
                ),
            });
        let model = state.render();
        assert_eq!(model.error_kind, Some(ErrorKind::Validation));
        assert_eq!(model.error_message.as_deref(), Some("invalid characters"));
        assert!(model.tokens.is_empty());
    }
}
