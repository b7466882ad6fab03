//! NFT Ownership Library
//!
//! This library checks whether an EVM wallet holds a balance of the BaseCamp
//! ERC1155 token on the Base network, using read-only JSON-RPC view calls.

pub mod address;
pub mod client;
pub mod config;
pub mod erc1155;
pub mod error;
pub mod rpc;
pub mod session;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

pub use address::validate_address;
pub use client::{ChainReader, ClientState};
pub use error::{CheckError, ErrorKind};
pub use rpc::{HttpTransport, RpcTransport, TransportError};

/// Identifier of a sub-token within an ERC1155 contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub U256);

impl TokenId {
    pub fn new(id: u64) -> Self {
        Self(U256::from(id))
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }
}

impl Default for TokenId {
    fn default() -> Self {
        Self::new(config::DEFAULT_TOKEN_ID)
    }
}

impl From<u64> for TokenId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TokenId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex_digits) => (hex_digits, 16),
            None => (s, 10),
        };

        // from_str_radix accepts "" as zero and skips '_'
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(anyhow::anyhow!("Invalid token id {:?}", s));
        }

        let parsed = U256::from_str_radix(digits, radix as u64);

        parsed
            .map(Self)
            .map_err(|e| anyhow::anyhow!("Invalid token id {:?}: {}", s, e))
    }
}

impl Serialize for TokenId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TokenId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Outcome of a single `balanceOf` query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipResult {
    pub has_token: bool,
    /// Balance as a decimal string so no precision is lost across boundaries
    pub count: String,
    pub token_id: TokenId,
    pub contract_address: String,
}

impl OwnershipResult {
    /// Build a result from the raw on-chain balance
    pub fn from_balance(balance: U256, token_id: TokenId, contract_address: &str) -> Self {
        Self {
            has_token: !balance.is_zero(),
            count: balance.to_string(),
            token_id,
            contract_address: contract_address.to_string(),
        }
    }
}

/// Snapshot of the connected network. Advisory only, never cached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub name: String,
    pub chain_id: u64,
    pub block_number: u64,
    pub rpc_endpoint: String,
}
