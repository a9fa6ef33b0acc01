//! Run mode selection

use crate::error::InventoryError;
use crate::registry::{Hostname, Machine};

/// What the inventory script was asked to print
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// `--list`: the full inventory document
    ListAll,
    /// `--host <name>`: variables of one host
    SingleHost(Hostname),
}

impl RunMode {
    /// Pick the mode from the `--list` / `--host` flags
    ///
    /// A registry short name given to `--host` is expanded to its FQDN.
    ///
    /// # Errors
    /// [`InventoryError::Usage`] unless exactly one of the two is set.
    pub fn from_flags(list: bool, host: Option<String>) -> Result<Self, InventoryError> {
        match (list, host) {
            (true, None) => Ok(RunMode::ListAll),
            (false, Some(host)) => Ok(RunMode::SingleHost(
                Machine::lookup(&host)
                    .map(|m| m.fqdn().to_string())
                    .unwrap_or(host),
            )),
            _ => Err(InventoryError::Usage(
                "require either --list or --host <hostname>".to_string(),
            )),
        }
    }
}
