//! `VagrantStateGateway` backed by the vagrant binary

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};
use vagrant_inventory_core::{
    Hostname, InventoryError, VagrantProvisioningInfo, VagrantStateGateway,
};
use vagrant_inventory_exec::CommandExecutor;

use crate::error::VagrantError;
use crate::{ssh_config, status};

/// Queries vagrant through a [`CommandExecutor`]
pub struct VagrantCli {
    /// Executor used to run the vagrant binary
    executor: Arc<dyn CommandExecutor>,
    /// Path or name of the vagrant binary
    binary: String,
    /// Timeout per vagrant invocation
    timeout: Duration,
}

impl VagrantCli {
    /// Create a gateway running `vagrant` from `PATH`
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            executor,
            binary: "vagrant".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Use a different vagrant binary
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set per-command timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn vagrant(&self, args: &[&str]) -> Result<String, VagrantError> {
        let argv: Vec<&str> = std::iter::once(self.binary.as_str())
            .chain(args.iter().copied())
            .collect();
        let result = self.executor.run_with_timeout(&argv, self.timeout).await?;
        Ok(result.into_stdout()?)
    }

    /// Machines vagrant reports as running
    ///
    /// # Errors
    /// Fails when vagrant cannot be run or its output is malformed.
    #[instrument(skip(self), fields(executor = self.executor.executor_type()))]
    pub async fn status(&self) -> Result<BTreeSet<Hostname>, VagrantError> {
        let output = self.vagrant(&["status", "--machine-readable"]).await?;
        let hosts = status::parse_running_hosts(&output)?;
        debug!(count = hosts.len(), "parsed vagrant status");
        Ok(hosts)
    }

    /// Address from the generated ssh-config of `host`
    ///
    /// # Errors
    /// Fails when vagrant cannot be run or no `HostName` is present.
    #[instrument(skip(self), fields(executor = self.executor.executor_type()))]
    pub async fn ssh_config(&self, host: &str) -> Result<VagrantProvisioningInfo, VagrantError> {
        let output = self.vagrant(&["ssh-config", host]).await?;
        let address = ssh_config::lookup_hostname(&output, host)
            .ok_or_else(|| VagrantError::MissingHostName(host.to_string()))?;
        debug!(address = %address, "parsed ssh-config");
        Ok(VagrantProvisioningInfo::new(address))
    }
}

#[async_trait]
impl VagrantStateGateway for VagrantCli {
    async fn running_hosts(&self) -> Result<BTreeSet<Hostname>, InventoryError> {
        Ok(self.status().await?)
    }

    async fn host_address(&self, host: &str) -> Result<VagrantProvisioningInfo, InventoryError> {
        Ok(self.ssh_config(host).await?)
    }
}
