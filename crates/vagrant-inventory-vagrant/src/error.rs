//! Error types for vagrant-inventory-vagrant

use thiserror::Error;
use vagrant_inventory_core::InventoryError;
use vagrant_inventory_exec::ExecError;

/// Errors that can occur while querying vagrant
#[derive(Error, Debug, Clone)]
pub enum VagrantError {
    /// Running the vagrant binary failed
    #[error("execution error: {0}")]
    Exec(#[from] ExecError),

    /// `vagrant status --machine-readable` output is malformed
    #[error("malformed status line {line}: {content:?}")]
    StatusParse {
        /// 1-based line number
        line: usize,
        /// Offending line
        content: String,
    },

    /// `vagrant ssh-config` output has no usable HostName
    #[error("no HostName for {0} in ssh-config output")]
    MissingHostName(String),
}

impl From<VagrantError> for InventoryError {
    fn from(err: VagrantError) -> Self {
        InventoryError::Gateway(err.to_string())
    }
}
