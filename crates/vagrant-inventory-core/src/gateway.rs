//! Source of live machine state

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::InventoryError;
use crate::registry::Hostname;

/// Provisioning details vagrant reports for one machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VagrantProvisioningInfo {
    /// Dotted-quad address of the machine
    pub ipv4_address: String,
}

impl VagrantProvisioningInfo {
    pub fn new(ipv4_address: impl Into<String>) -> Self {
        Self {
            ipv4_address: ipv4_address.into(),
        }
    }
}

/// Reports which machines run and where they can be reached
///
/// Implementations map their failures to [`InventoryError::Gateway`].
#[async_trait]
pub trait VagrantStateGateway: Send + Sync {
    /// Machines currently in the `running` state
    async fn running_hosts(&self) -> Result<BTreeSet<Hostname>, InventoryError>;

    /// Address assigned to `host`
    async fn host_address(&self, host: &str) -> Result<VagrantProvisioningInfo, InventoryError>;
}
