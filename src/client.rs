//! Chain read client
//!
//! [`ChainReader`] owns one lazily established connection to an RPC endpoint
//! and a read-only binding to the ERC1155 contract under inspection. Every
//! read auto-initializes on first use. A failed initialization leaves the
//! client uninitialized so the next call starts over.

use std::sync::atomic::{AtomicUsize, Ordering};

use alloy_primitives::{Address, U256};
use futures::future::try_join_all;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::address::parse_address;
use crate::config::{self, RpcConfig};
use crate::erc1155::Erc1155Contract;
use crate::error::CheckError;
use crate::rpc::{parse_hex_quantity, HttpTransport, RpcTransport};
use crate::{NetworkInfo, OwnershipResult, TokenId};

/// Lifecycle of the underlying connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Uninitialized,
    Initializing,
    Ready,
}

/// Live connection: observed network identity plus the bound contract
#[derive(Debug)]
struct Connection {
    chain_id: u64,
    contract: Erc1155Contract,
}

/// Read-only client for ERC1155 ownership checks
pub struct ChainReader<T> {
    transport: T,
    contract: Erc1155Contract,
    connection: OnceCell<Connection>,
    /// Callers currently inside `connection()` without a stored connection
    initializing: AtomicUsize,
}

impl ChainReader<HttpTransport> {
    /// Client for the BaseCamp contract over HTTP
    pub fn from_config(config: &RpcConfig) -> Self {
        Self::new(HttpTransport::new(config.rpc_url.clone()))
    }
}

impl<T: RpcTransport> ChainReader<T> {
    /// Client bound to the BaseCamp contract
    pub fn new(transport: T) -> Self {
        Self::with_contract(transport, Erc1155Contract::basecamp())
    }

    pub fn with_contract(transport: T, contract: Erc1155Contract) -> Self {
        Self {
            transport,
            contract,
            connection: OnceCell::new(),
            initializing: AtomicUsize::new(0),
        }
    }

    /// Snapshot of the lifecycle
    ///
    /// Callers waiting on an attempt count as initializing until the
    /// connection is stored or the attempt fails.
    pub fn state(&self) -> ClientState {
        if self.connection.initialized() {
            ClientState::Ready
        } else if self.initializing.load(Ordering::Acquire) > 0 {
            ClientState::Initializing
        } else {
            ClientState::Uninitialized
        }
    }

    /// Chain id observed during initialization, if connected
    pub fn chain_id(&self) -> Option<u64> {
        self.connection.get().map(|conn| conn.chain_id)
    }

    pub fn rpc_endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    pub fn contract_address(&self) -> &str {
        self.contract.address_hex()
    }

    /// Connect and verify the network. No-op once ready.
    ///
    /// Concurrent callers share a single connection attempt.
    pub async fn initialize(&self) -> Result<(), CheckError> {
        self.connection().await.map(|_| ())
    }

    /// Query the balance of one token id for `address`
    ///
    /// # Arguments
    ///
    /// * `address` - Wallet address, validated as-is (no trimming)
    /// * `token_id` - Token id within the collection, `TokenId::default()` is 1
    ///
    /// # Returns
    ///
    /// Returns an `OwnershipResult` with the balance as a decimal string.
    /// An invalid address fails with `CheckError::Validation` before any
    /// network call.
    pub async fn check_balance(
        &self,
        address: &str,
        token_id: TokenId,
    ) -> Result<OwnershipResult, CheckError> {
        let owner = parse_address(address)?;
        let conn = self.connection().await?;

        debug!(%address, %token_id, "checking ownership");
        let result = self.query(conn, owner, token_id).await?;
        info!(
            %address,
            %token_id,
            count = %result.count,
            has_token = result.has_token,
            "ownership checked"
        );

        Ok(result)
    }

    /// Query several token ids concurrently, one `balanceOf` per id
    ///
    /// # Arguments
    ///
    /// * `address` - Wallet address, validated once for the whole batch
    /// * `token_ids` - Token ids to check
    ///
    /// # Returns
    ///
    /// Returns one `OwnershipResult` per id, in the order of `token_ids`.
    /// Any failing call fails the whole batch with the first error seen.
    pub async fn check_balances(
        &self,
        address: &str,
        token_ids: &[TokenId],
    ) -> Result<Vec<OwnershipResult>, CheckError> {
        let owner = parse_address(address)?;
        let conn = self.connection().await?;

        debug!(%address, count = token_ids.len(), "checking ownership batch");

        try_join_all(token_ids.iter().map(|&id| self.query(conn, owner, id))).await
    }

    /// Query several token ids with a single `balanceOfBatch` call
    pub async fn check_balances_single_call(
        &self,
        address: &str,
        token_ids: &[TokenId],
    ) -> Result<Vec<OwnershipResult>, CheckError> {
        let owner = parse_address(address)?;
        let conn = self.connection().await?;

        if token_ids.is_empty() {
            return Ok(Vec::new());
        }

        let accounts = vec![owner; token_ids.len()];
        let ids = token_ids.iter().map(TokenId::as_u256).collect();

        let balances = conn
            .contract
            .balance_of_batch(&self.transport, accounts, ids)
            .await
            .inspect_err(|e| warn!(%address, error = %e, "balanceOfBatch failed"))?;

        if balances.len() != token_ids.len() {
            return Err(CheckError::ContractCall {
                reason: format!(
                    "balanceOfBatch returned {} values for {} ids",
                    balances.len(),
                    token_ids.len()
                ),
            });
        }

        Ok(balances
            .into_iter()
            .zip(token_ids)
            .map(|(balance, &id)| {
                OwnershipResult::from_balance(balance, id, conn.contract.address_hex())
            })
            .collect())
    }

    /// Current network identity and block height
    ///
    /// The two reads are independent; the height may be a block off.
    pub async fn get_network_info(&self) -> Result<NetworkInfo, CheckError> {
        self.connection().await?;

        let (chain_id, block_number) = tokio::try_join!(
            self.read_quantity("eth_chainId"),
            self.read_quantity("eth_blockNumber"),
        )?;

        Ok(NetworkInfo {
            name: config::chain_name(chain_id).to_string(),
            chain_id,
            block_number,
            rpc_endpoint: self.transport.endpoint().to_string(),
        })
    }

    async fn connection(&self) -> Result<&Connection, CheckError> {
        if let Some(conn) = self.connection.get() {
            return Ok(conn);
        }

        // Held until the cell is set, so no Uninitialized gap before Ready
        let _guard = InitializingGuard::enter(&self.initializing);
        self.connection.get_or_try_init(|| self.connect()).await
    }

    async fn connect(&self) -> Result<Connection, CheckError> {
        info!(endpoint = %self.transport.endpoint(), "connecting to network");

        let chain_id = self
            .transport
            .request("eth_chainId", Vec::new())
            .await
            .and_then(|raw| parse_hex_quantity(&raw))
            .map_err(|e| {
                warn!(endpoint = %self.transport.endpoint(), error = %e, "initialization failed");
                CheckError::connection(e)
            })?;

        if chain_id != config::BASE_CHAIN_ID {
            warn!(chain_id, expected = config::BASE_CHAIN_ID, "endpoint is not Base mainnet");
        }

        info!(
            chain_id,
            network = config::chain_name(chain_id),
            contract = %self.contract.address_hex(),
            "connected"
        );

        Ok(Connection {
            chain_id,
            contract: self.contract.clone(),
        })
    }

    async fn query(
        &self,
        conn: &Connection,
        owner: Address,
        token_id: TokenId,
    ) -> Result<OwnershipResult, CheckError> {
        let balance: U256 = conn
            .contract
            .balance_of(&self.transport, owner, token_id.as_u256())
            .await
            .inspect_err(|e| warn!(%token_id, kind = %e.kind(), error = %e, "balanceOf failed"))?;

        Ok(OwnershipResult::from_balance(
            balance,
            token_id,
            conn.contract.address_hex(),
        ))
    }

    async fn read_quantity(&self, method: &str) -> Result<u64, CheckError> {
        self.transport
            .request(method, Vec::new())
            .await
            .and_then(|raw| parse_hex_quantity(&raw))
            .map_err(CheckError::from_call)
    }
}

/// Counts a caller as initializing until dropped
struct InitializingGuard<'a>(&'a AtomicUsize);

impl<'a> InitializingGuard<'a> {
    fn enter(pending: &'a AtomicUsize) -> Self {
        pending.fetch_add(1, Ordering::AcqRel);
        Self(pending)
    }
}

impl Drop for InitializingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}
