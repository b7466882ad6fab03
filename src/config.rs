//! Runtime configuration
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `BASE_RPC_URL` | Primary RPC endpoint override | - |
//! | `ALCHEMY_BASE_URL` | Alchemy Base endpoint | - |
//! | `INFURA_BASE_URL` | Infura Base endpoint | - |
//! | `RUST_LOG` | Log level filter | `warn` |
//! | `LOG_FORMAT` | `json` or `pretty` | `pretty` |
//!
//! The first RPC variable holding a non-blank value wins, otherwise the
//! public Base endpoint is used.

/// BaseCamp ERC1155 contract on Base mainnet
pub const BASECAMP_CONTRACT_ADDRESS: &str = "0x26ed98bf771f9fabc226e64cf34e9c4b6cce90d0";

/// Public Base RPC, used when nothing is configured
pub const PUBLIC_BASE_RPC_URL: &str = "https://mainnet.base.org";

pub const BASE_CHAIN_ID: u64 = 8453;

pub const DEFAULT_TOKEN_ID: u64 = 1;

/// RPC environment variables in priority order
pub const RPC_URL_ENV_VARS: [&str; 3] = ["BASE_RPC_URL", "ALCHEMY_BASE_URL", "INFURA_BASE_URL"];

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Where the client sends its JSON-RPC requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcConfig {
    pub rpc_url: String,
}

impl RpcConfig {
    /// Resolve the endpoint from the process environment
    pub fn from_env() -> Self {
        Self::with_override(None)
    }

    /// Resolve with an explicit override that outranks every env variable
    pub fn with_override(rpc_url: Option<String>) -> Self {
        let candidates = std::iter::once(rpc_url)
            .chain(RPC_URL_ENV_VARS.iter().map(|key| std::env::var(key).ok()));

        Self {
            rpc_url: resolve_rpc_url(candidates),
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            rpc_url: PUBLIC_BASE_RPC_URL.to_string(),
        }
    }
}

/// Pick the first non-blank candidate, falling back to the public endpoint
pub fn resolve_rpc_url<I>(candidates: I) -> String
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(|url| url.trim().to_string())
        .find(|url| !url.is_empty())
        .unwrap_or_else(|| PUBLIC_BASE_RPC_URL.to_string())
}

/// Network name for a chain id, as reported in `NetworkInfo`
pub fn chain_name(chain_id: u64) -> &'static str {
    match chain_id {
        1 => "mainnet",
        11155111 => "sepolia",
        BASE_CHAIN_ID => "base",
        84532 => "base-sepolia",
        _ => "unknown",
    }
}
