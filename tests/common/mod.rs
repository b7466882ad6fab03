//! Scripted JSON-RPC endpoint for client tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::U256;
use nft_ownership::{RpcTransport, TransportError};

pub const WALLET: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

const BALANCE_OF: [u8; 4] = [0x00, 0xfd, 0xd5, 0x8e];
const BALANCE_OF_BATCH: [u8; 4] = [0x4e, 0x12, 0x73, 0xf4];

/// Kinds of failure the double can produce
#[derive(Debug, Clone)]
pub enum Failure {
    Network,
    Revert,
    Rpc(i64, String),
}

impl Failure {
    fn to_error(&self) -> TransportError {
        match self {
            Failure::Network => TransportError::Status(503),
            Failure::Revert => TransportError::Rpc {
                code: 3,
                message: "execution reverted".to_string(),
            },
            Failure::Rpc(code, message) => TransportError::Rpc {
                code: *code,
                message: message.clone(),
            },
        }
    }
}

#[derive(Default)]
struct Inner {
    chain_id: u64,
    block_number: u64,
    connect_delay: Duration,
    balances: HashMap<U256, U256>,
    delays: HashMap<U256, Duration>,
    token_failures: HashMap<U256, Failure>,
    raw_call_result: Option<String>,
    connect_failures: Mutex<usize>,
    call_failures: Mutex<VecDeque<Failure>>,
    calls: Mutex<Vec<String>>,
    completed: Mutex<Vec<U256>>,
}

#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Inner>,
}

impl MockTransport {
    pub fn base() -> Self {
        Self {
            inner: Arc::new(Inner {
                chain_id: 8453,
                block_number: 12_345_678,
                ..Inner::default()
            }),
        }
    }

    fn edit(mut self, f: impl FnOnce(&mut Inner)) -> Self {
        let inner = Arc::get_mut(&mut self.inner).expect("configure before sharing");
        f(inner);
        self
    }

    pub fn with_balance(self, token_id: u64, balance: u64) -> Self {
        self.edit(|inner| {
            inner.balances.insert(U256::from(token_id), U256::from(balance));
        })
    }

    pub fn with_raw_balance(self, token_id: u64, balance: U256) -> Self {
        self.edit(|inner| {
            inner.balances.insert(U256::from(token_id), balance);
        })
    }

    pub fn with_delay(self, token_id: u64, delay: Duration) -> Self {
        self.edit(|inner| {
            inner.delays.insert(U256::from(token_id), delay);
        })
    }

    pub fn with_connect_delay(self, delay: Duration) -> Self {
        self.edit(|inner| inner.connect_delay = delay)
    }

    pub fn with_chain_id(self, chain_id: u64) -> Self {
        self.edit(|inner| inner.chain_id = chain_id)
    }

    pub fn failing_token(self, token_id: u64, failure: Failure) -> Self {
        self.edit(|inner| {
            inner.token_failures.insert(U256::from(token_id), failure);
        })
    }

    /// Every eth_call returns this raw hex, e.g. "0x" for an address without code
    pub fn with_raw_call_result(self, raw: &str) -> Self {
        self.edit(|inner| inner.raw_call_result = Some(raw.to_string()))
    }

    pub fn failing_connects(self, count: usize) -> Self {
        self.edit(|inner| *inner.connect_failures.lock().unwrap() = count)
    }

    pub fn fail_next_call(&self, failure: Failure) {
        self.inner.call_failures.lock().unwrap().push_back(failure);
    }

    pub fn calls(&self, method: &str) -> usize {
        self.inner
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.as_str() == method)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.inner.calls.lock().unwrap().len()
    }

    /// Token ids in the order their balanceOf calls finished
    pub fn completion_order(&self) -> Vec<u64> {
        self.inner
            .completed
            .lock()
            .unwrap()
            .iter()
            .map(|id| id.to::<u64>())
            .collect()
    }

    fn balance(&self, id: U256) -> U256 {
        self.inner.balances.get(&id).copied().unwrap_or(U256::ZERO)
    }

    async fn eth_call(&self, params: &[serde_json::Value]) -> Result<String, TransportError> {
        let queued = self.inner.call_failures.lock().unwrap().pop_front();
        if let Some(failure) = queued {
            return Err(failure.to_error());
        }
        if let Some(raw) = &self.inner.raw_call_result {
            return Ok(raw.clone());
        }

        let data = params[0]["data"].as_str().unwrap_or_default();
        let calldata = hex::decode(data.trim_start_matches("0x"))
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        let (selector, args) = calldata.split_at(4);

        if selector == BALANCE_OF {
            let id = word(args, 1);
            if let Some(delay) = self.inner.delays.get(&id) {
                tokio::time::sleep(*delay).await;
            }
            self.inner.completed.lock().unwrap().push(id);

            if let Some(failure) = self.inner.token_failures.get(&id) {
                return Err(failure.to_error());
            }
            Ok(format!("0x{}", hex::encode(self.balance(id).to_be_bytes::<32>())))
        } else if selector == BALANCE_OF_BATCH {
            let ids_offset = word(args, 1).to::<usize>() / 32;
            let len = word(args, ids_offset).to::<usize>();
            let ids: Vec<U256> = (0..len).map(|i| word(args, ids_offset + 1 + i)).collect();

            let mut out = Vec::new();
            out.extend_from_slice(&U256::from(32u64).to_be_bytes::<32>());
            out.extend_from_slice(&U256::from(ids.len()).to_be_bytes::<32>());
            for id in ids {
                out.extend_from_slice(&self.balance(id).to_be_bytes::<32>());
            }
            Ok(format!("0x{}", hex::encode(out)))
        } else {
            Err(Failure::Revert.to_error())
        }
    }
}

/// The `index`-th 32-byte ABI word
fn word(args: &[u8], index: usize) -> U256 {
    U256::from_be_slice(&args[index * 32..(index + 1) * 32])
}

impl RpcTransport for MockTransport {
    fn endpoint(&self) -> &str {
        "mock://base"
    }

    async fn request(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<String, TransportError> {
        self.inner.calls.lock().unwrap().push(method.to_string());

        match method {
            "eth_chainId" => {
                if !self.inner.connect_delay.is_zero() {
                    tokio::time::sleep(self.inner.connect_delay).await;
                }
                {
                    let mut remaining = self.inner.connect_failures.lock().unwrap();
                    if *remaining > 0 {
                        *remaining -= 1;
                        return Err(Failure::Network.to_error());
                    }
                }
                Ok(format!("{:#x}", self.inner.chain_id))
            }
            "eth_blockNumber" => Ok(format!("{:#x}", self.inner.block_number)),
            "eth_call" => self.eth_call(&params).await,
            other => Err(TransportError::Rpc {
                code: -32601,
                message: format!("method {} not found", other),
            }),
        }
    }
}
