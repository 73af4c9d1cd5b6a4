use crate::models::EthAddress;

/// Wallet connection state.
///
/// Mutated only by the session operations in [`crate::session`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalletSession {
    pub connected: bool,
    pub address: Option<EthAddress>,
}

impl WalletSession {
    pub fn connected(address: EthAddress) -> Self {
        Self {
            connected: true,
            address: Some(address),
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connected && self.address.is_some()
    }

    /// Format the session for display (0x1234...5678 or "not connected").
    pub fn display_name(&self) -> String {
        match &self.address {
            Some(address) if self.connected => address.short(),
            _ => "not connected".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_state() {
        let session = WalletSession::disconnected();
        assert!(!session.is_connected());
        assert_eq!(session.address, None);
        assert_eq!(session.display_name(), "not connected");
    }

    #[test]
    fn test_connected_state() {
        let address = EthAddress::parse("0x1234567890123456789012345678901234567890").unwrap();
        let session = WalletSession::connected(address.clone());
        assert!(session.is_connected());
        assert_eq!(session.address, Some(address));
        assert_eq!(session.display_name(), "0x1234...7890");
    }

    #[test]
    fn test_default() {
        assert_eq!(WalletSession::default(), WalletSession::disconnected());
    }
}
