//! Error types for vagrant-inventory-core

use thiserror::Error;

/// Errors that abort an inventory run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// Neither or both of list/host mode were requested
    #[error("usage error: {0}")]
    Usage(String),

    /// Running hosts disagree with the declared topology
    #[error("liveness check failed: {0}")]
    Liveness(String),

    /// Hostvars merge found shared keys without override permission
    #[error("duplicate hostvars keys for {host}: {}", .keys.join(", "))]
    DuplicateKey {
        /// Machine slot with the collision
        host: String,
        /// Colliding keys, sorted
        keys: Vec<String>,
    },

    /// A discovered address is outside the expected network
    #[error("network validation failed: {0}")]
    NetworkValidation(String),

    /// Querying vagrant failed or returned unparsable output
    #[error("vagrant query failed: {0}")]
    Gateway(String),

    /// Hostname is not a machine of the registry
    #[error("unknown host: {0}")]
    UnknownHost(String),

    /// A registry machine has no hostvars slot
    #[error("missing hostvars slot for {0}")]
    MissingHost(String),

    /// Inventory could not be rendered as JSON
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for InventoryError {
    fn from(err: serde_json::Error) -> Self {
        InventoryError::Serialization(err.to_string())
    }
}
