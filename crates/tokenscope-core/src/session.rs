//! Wallet session operations.
//!
//! Auto-detect, explicit connect, disconnect, and account-change handling.
//! Disconnect cascades into a query reset so no results outlive the session.

use log::{debug, info, warn};

use crate::error::WalletError;
use crate::input::validate_address;
use crate::models::{EthAddress, WalletSession};
use crate::orchestrator::{QueryOrchestrator, QueryStore};
use crate::provider::{TokenApi, WalletProvider};

/// First usable address in a provider account list.
fn first_account(accounts: &[String]) -> Option<EthAddress> {
    accounts.iter().find_map(|account| match validate_address(account) {
        Ok(address) => Some(address),
        Err(err) => {
            warn!("ignoring wallet account {:?}: {}", account, err);
            None
        }
    })
}

/// Restore an already-authorized session without prompting the user.
///
/// Any provider failure is treated as "not connected".
pub async fn auto_detect<W: WalletProvider>(provider: Option<&W>) -> WalletSession {
    let Some(provider) = provider else {
        debug!("no wallet provider, skipping auto-detect");
        return WalletSession::disconnected();
    };

    match provider.list_authorized_accounts().await {
        Ok(accounts) => match first_account(&accounts) {
            Some(address) => {
                info!("restored wallet session for {}", address.short());
                WalletSession::connected(address)
            }
            None => WalletSession::disconnected(),
        },
        Err(err) => {
            warn!("wallet auto-detect failed: {}", err);
            WalletSession::disconnected()
        }
    }
}

/// Ask the wallet for account access.
pub async fn connect<W: WalletProvider>(provider: Option<&W>) -> Result<WalletSession, WalletError> {
    let provider = provider.ok_or(WalletError::NoProvider)?;
    let accounts = provider.request_accounts().await?;
    let address = first_account(&accounts).ok_or(WalletError::NoAccount)?;
    info!("wallet connected: {}", address.short());
    Ok(WalletSession::connected(address))
}

/// End the session and drop all query state.
pub fn disconnect<W, A, S>(session: &mut WalletSession, orchestrator: &QueryOrchestrator<W, A, S>)
where
    W: WalletProvider,
    A: TokenApi,
    S: QueryStore,
{
    *session = WalletSession::disconnected();
    orchestrator.reset();
}

/// Session after the wallet reported a new account list.
///
/// An empty list means the user revoked access.
pub fn accounts_changed(accounts: &[String]) -> WalletSession {
    first_account(accounts)
        .map(WalletSession::connected)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::ProviderError;
    use crate::mock::{MockTokenApi, MockWallet};
    use crate::models::{Phase, QueryState};

    const ACCOUNT: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    #[tokio::test]
    async fn test_auto_detect_without_provider() {
        let session = auto_detect::<MockWallet>(None).await;
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn test_auto_detect_does_not_prompt() {
        let wallet = MockWallet::new().with_authorized(&[ACCOUNT]);
        let session = auto_detect(Some(&wallet)).await;
        assert!(session.is_connected());
        assert_eq!(session.address.unwrap().as_str(), ACCOUNT);
        assert_eq!(wallet.account_requests(), 0);
    }

    #[tokio::test]
    async fn test_auto_detect_with_no_authorized_accounts() {
        let wallet = MockWallet::new();
        let session = auto_detect(Some(&wallet)).await;
        assert_eq!(session, WalletSession::disconnected());
    }

    #[tokio::test]
    async fn test_connect_errors() {
        assert_eq!(
            connect::<MockWallet>(None).await,
            Err(WalletError::NoProvider)
        );

        let rejecting = MockWallet::new().with_request_result(Err(ProviderError::with_code(
            4001,
            "User rejected the request.",
        )));
        assert_eq!(
            connect(Some(&rejecting)).await,
            Err(WalletError::UserRejected)
        );

        let empty = MockWallet::new().with_request_result(Ok(vec![]));
        assert_eq!(connect(Some(&empty)).await, Err(WalletError::NoAccount));
    }

    #[tokio::test]
    async fn test_connect_success() {
        let wallet = MockWallet::new().with_request_result(Ok(vec![ACCOUNT.to_string()]));
        let session = connect(Some(&wallet)).await.unwrap();
        assert!(session.is_connected());
        assert_eq!(wallet.account_requests(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_resets_query() {
        let orchestrator = QueryOrchestrator::new(
            Some(MockWallet::new()),
            MockTokenApi::new(),
            Rc::new(RefCell::new(QueryState::new())),
        );
        orchestrator.submit(ACCOUNT).await;
        assert_eq!(orchestrator.store().snapshot().phase, Phase::Done);

        let mut session = WalletSession::connected(EthAddress::parse(ACCOUNT).unwrap());
        disconnect(&mut session, &orchestrator);

        assert!(!session.is_connected());
        assert_eq!(orchestrator.store().snapshot().phase, Phase::Idle);
    }

    #[test]
    fn test_accounts_changed() {
        assert!(accounts_changed(&[]).address.is_none());
        let session = accounts_changed(&["garbage".to_string(), ACCOUNT.to_string()]);
        assert_eq!(session.address.unwrap().as_str(), ACCOUNT);
    }
}
