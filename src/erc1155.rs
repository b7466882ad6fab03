//! ERC1155 contract interactions.

use alloy_primitives::{address, Address, U256};
use alloy_sol_types::{sol, SolCall};
use serde_json::json;
use tracing::debug;

use crate::address::parse_address;
use crate::config::BASECAMP_CONTRACT_ADDRESS;
use crate::error::CheckError;
use crate::rpc::{RpcTransport, TransportError};

// Only the read surface needed for ownership checks
sol! {
    interface IERC1155 {
        function balanceOf(address account, uint256 id) external view returns (uint256);
        function balanceOfBatch(address[] accounts, uint256[] ids) external view returns (uint256[]);
    }
}

/// Read-only reference to a deployed ERC1155 contract
#[derive(Debug, Clone)]
pub struct Erc1155Contract {
    address: Address,
    address_hex: String,
}

impl Erc1155Contract {
    /// The BaseCamp collection on Base
    pub fn basecamp() -> Self {
        Self {
            address: address!("26ed98bf771f9fabc226e64cf34e9c4b6cce90d0"),
            address_hex: BASECAMP_CONTRACT_ADDRESS.to_string(),
        }
    }

    pub fn new(contract_address: &str) -> Result<Self, CheckError> {
        let address = parse_address(contract_address)?;

        Ok(Self {
            address,
            address_hex: contract_address.to_lowercase(),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Lowercase `0x` form, as reported in results
    pub fn address_hex(&self) -> &str {
        &self.address_hex
    }

    /// `balanceOf(account, id)` as a view call
    pub async fn balance_of<T: RpcTransport>(
        &self,
        transport: &T,
        account: Address,
        id: U256,
    ) -> Result<U256, CheckError> {
        let calldata = IERC1155::balanceOfCall { account, id }.abi_encode();
        let output = self.call(transport, &calldata).await?;

        IERC1155::balanceOfCall::abi_decode_returns(&output).map_err(|e| {
            CheckError::ContractCall {
                reason: format!("could not decode balanceOf result: {}", e),
            }
        })
    }

    /// `balanceOfBatch(accounts, ids)` as a single view call
    pub async fn balance_of_batch<T: RpcTransport>(
        &self,
        transport: &T,
        accounts: Vec<Address>,
        ids: Vec<U256>,
    ) -> Result<Vec<U256>, CheckError> {
        let calldata = IERC1155::balanceOfBatchCall { accounts, ids }.abi_encode();
        let output = self.call(transport, &calldata).await?;

        IERC1155::balanceOfBatchCall::abi_decode_returns(&output).map_err(|e| {
            CheckError::ContractCall {
                reason: format!("could not decode balanceOfBatch result: {}", e),
            }
        })
    }

    async fn call<T: RpcTransport>(&self, transport: &T, calldata: &[u8]) -> Result<Vec<u8>, CheckError> {
        let params = vec![
            json!({
                "to": self.address_hex,
                "data": format!("0x{}", hex::encode(calldata)),
            }),
            json!("latest"),
        ];

        debug!(contract = %self.address_hex, selector = %hex::encode(&calldata[..4]), "eth_call");

        let result = transport
            .request("eth_call", params)
            .await
            .map_err(CheckError::from_call)?;

        let output = decode_hex_data(&result).map_err(CheckError::from_call)?;

        // No code at the address gives an empty success
        if output.is_empty() {
            return Err(CheckError::ContractCall {
                reason: "empty return data".to_string(),
            });
        }

        Ok(output)
    }
}

fn decode_hex_data(data: &str) -> Result<Vec<u8>, TransportError> {
    let digits = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(digits).map_err(|e| TransportError::Decode(format!("bad hex data: {}", e)))
}
