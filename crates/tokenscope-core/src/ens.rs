//! ENS name resolution.
//!
//! [`resolve`] turns an [`EnsName`] into an address through an injected
//! [`WalletProvider`]. The helpers below implement the on-chain side of an
//! EIP-137 lookup (namehash, ABI call encoding through `sol!`, return
//! decoding) so providers that only speak raw JSON-RPC can answer
//! `getResolver` / `getAddress`.

use alloy_primitives::{Address, B256, keccak256};
use alloy_sol_types::{SolCall, sol};
use log::{debug, warn};
use unicode_normalization::UnicodeNormalization;

use crate::error::{ProviderError, ResolveError};
use crate::input::validate_address;
use crate::models::{EnsName, EthAddress};
use crate::provider::{EnsResolver, WalletProvider};

/// Normalize a name before hashing: trim, lowercase, Unicode NFC.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase().nfc().collect()
}

/// EIP-137 namehash of an already normalized name.
pub fn namehash(name: &str) -> B256 {
    let mut node = B256::ZERO;
    if name.is_empty() {
        return node;
    }

    for label in name.rsplit('.') {
        let label_hash = keccak256(label.as_bytes());
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(label_hash.as_slice());
        node = keccak256(buf);
    }
    node
}

sol! {
    /// ENS registry, deployed at [`REGISTRY`](crate::config::ens::REGISTRY).
    interface EnsRegistry {
        function resolver(bytes32 node) external view returns (address);
    }

    /// Address record of an EIP-137 resolver.
    interface AddrResolver {
        function addr(bytes32 node) external view returns (address);
    }
}

/// `eth_call` data for `EnsRegistry.resolver(node)`.
pub fn resolver_calldata(node: B256) -> String {
    encode_call(&EnsRegistry::resolverCall { node })
}

/// `eth_call` data for `AddrResolver.addr(node)`.
pub fn addr_calldata(node: B256) -> String {
    encode_call(&AddrResolver::addrCall { node })
}

fn encode_call<C: SolCall>(call: &C) -> String {
    format!("0x{}", hex::encode(call.abi_encode()))
}

/// Decode the `address` returned by an `eth_call` to `C`.
///
/// Empty data (`0x`, returned for calls to non-contracts) and the zero
/// address both decode to `None`.
pub fn decode_address_return<C>(data: &str) -> Result<Option<EthAddress>, ProviderError>
where
    C: SolCall<Return = Address>,
{
    let raw = data.strip_prefix("0x").unwrap_or(data);
    if raw.is_empty() {
        return Ok(None);
    }

    let bytes = hex::decode(raw)
        .map_err(|e| ProviderError::new(format!("invalid eth_call result: {}", e)))?;
    let address = C::abi_decode_returns(&bytes).map_err(|e| {
        ProviderError::new(format!("cannot decode {} result: {}", C::SIGNATURE, e))
    })?;

    Ok(EthAddress::from_alloy(address))
}

/// Resolve `name` through the wallet provider.
///
/// Fails with [`ResolveError::NoProvider`] when no provider is injected,
/// [`ResolveError::NotFound`] when the name has no resolver, and
/// [`ResolveError::UnresolvedOrZero`] when the resolver has no usable address.
pub async fn resolve<W: WalletProvider>(
    name: &EnsName,
    provider: Option<&W>,
) -> Result<EthAddress, ResolveError> {
    let display = name.to_string();
    let Some(provider) = provider else {
        return Err(ResolveError::NoProvider { name: display });
    };

    let normalized = name.normalized();
    debug!("resolving ENS name {}", normalized);

    let resolver = provider
        .get_resolver(&normalized)
        .await
        .map_err(|source| ResolveError::Provider {
            name: display.clone(),
            source,
        })?
        .ok_or_else(|| ResolveError::NotFound {
            name: display.clone(),
        })?;

    let raw = resolver
        .get_address()
        .await
        .map_err(|source| ResolveError::Provider {
            name: display.clone(),
            source,
        })?;

    match raw.as_deref().map(validate_address) {
        Some(Ok(address)) => Ok(address),
        Some(Err(err)) => {
            warn!("resolver for {} returned unusable address: {}", display, err);
            Err(ResolveError::UnresolvedOrZero { name: display })
        }
        None => Err(ResolveError::UnresolvedOrZero { name: display }),
    }
}
