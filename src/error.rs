//! Error taxonomy surfaced to callers
//!
//! The `Display` text of each variant is the user-facing message.

use crate::rpc::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("invalid address format")]
    Validation,

    #[error("Unable to connect to the Base network. Please check your internet connection.")]
    Connection {
        #[source]
        source: TransportError,
    },

    #[error("Network error. Please check your internet connection and try again.")]
    Network {
        #[source]
        source: TransportError,
    },

    #[error("Unable to call the contract. The contract may not exist or may not support ERC1155.")]
    ContractCall { reason: String },

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Payload-free discriminant of [`CheckError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Connection,
    Network,
    ContractCall,
    Unknown,
}

impl CheckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckError::Validation => ErrorKind::Validation,
            CheckError::Connection { .. } => ErrorKind::Connection,
            CheckError::Network { .. } => ErrorKind::Network,
            CheckError::ContractCall { .. } => ErrorKind::ContractCall,
            CheckError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Classify a failure of a view call made after initialization
    pub fn from_call(err: TransportError) -> Self {
        if err.is_network() {
            CheckError::Network { source: err }
        } else if err.is_revert() {
            CheckError::ContractCall {
                reason: err.to_string(),
            }
        } else {
            CheckError::Unknown(err.to_string())
        }
    }

    pub fn connection(err: TransportError) -> Self {
        CheckError::Connection { source: err }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Connection => write!(f, "connection"),
            ErrorKind::Network => write!(f, "network"),
            ErrorKind::ContractCall => write!(f, "contract_call"),
            ErrorKind::Unknown => write!(f, "unknown"),
        }
    }
}
