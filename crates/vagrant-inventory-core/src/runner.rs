//! Inventory run orchestration

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::error::InventoryError;
use crate::gateway::VagrantStateGateway;
use crate::mode::RunMode;
use crate::model::{InventoryOutputModel, VarMap};
use crate::network::NetworkConfigBuilder;
use crate::registry::Hostname;

/// Document produced by one run
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutput {
    /// Full inventory for `--list`
    Inventory(Box<InventoryOutputModel>),
    /// Variables of a single host for `--host`
    HostVars(VarMap),
}

impl RunOutput {
    /// Render as the JSON Ansible expects on stdout
    ///
    /// # Errors
    /// [`InventoryError::Serialization`] if rendering fails.
    pub fn to_json(&self) -> Result<String, InventoryError> {
        let json = match self {
            RunOutput::Inventory(model) => serde_json::to_string(model)?,
            RunOutput::HostVars(vars) => serde_json::to_string(vars)?,
        };
        Ok(json)
    }
}

/// Turns the base inventory plus live vagrant state into a document
///
/// The base inventory is only read; each run works on copies.
pub struct InventoryRunner {
    gateway: Arc<dyn VagrantStateGateway>,
    base: InventoryOutputModel,
    network: NetworkConfigBuilder,
    check_liveness: bool,
}

impl InventoryRunner {
    /// Create a runner with the liveness check disabled
    pub fn new(gateway: Arc<dyn VagrantStateGateway>, base: InventoryOutputModel) -> Self {
        Self {
            gateway,
            base,
            network: NetworkConfigBuilder::new(),
            check_liveness: false,
        }
    }

    /// Require running machines to match the declared topology
    #[must_use]
    pub fn with_liveness_check(mut self, enabled: bool) -> Self {
        self.check_liveness = enabled;
        self
    }

    #[must_use]
    pub fn base(&self) -> &InventoryOutputModel {
        &self.base
    }

    /// Execute one run
    ///
    /// # Errors
    /// Any gateway, liveness or validation failure; nothing is produced in
    /// that case.
    #[instrument(skip(self), fields(check_liveness = self.check_liveness))]
    pub async fn run(&self, mode: &RunMode) -> Result<RunOutput, InventoryError> {
        match mode {
            RunMode::ListAll => Ok(RunOutput::Inventory(Box::new(self.list().await?))),
            RunMode::SingleHost(host) => Ok(RunOutput::HostVars(self.single_host(host).await?)),
        }
    }

    async fn list(&self) -> Result<InventoryOutputModel, InventoryError> {
        let running = self.gateway.running_hosts().await?;
        debug!(running = ?running, "running hosts");

        if self.check_liveness {
            let declared = self.base.list_all_hosts();
            if declared != running {
                return Err(InventoryError::Liveness(describe_mismatch(
                    &declared, &running,
                )));
            }
        }

        let mut addresses = BTreeMap::new();
        for host in &running {
            let provisioning = self.gateway.host_address(host).await?;
            debug!(host = %host, address = %provisioning.ipv4_address, "discovered address");
            addresses.insert(host.clone(), provisioning);
        }

        let config = self.network.build(&addresses)?;
        info!(
            hosts = running.len(),
            name_server = %config.name_server,
            "built network config"
        );

        self.base.with_network_config(&config, running)
    }

    async fn single_host(&self, host: &str) -> Result<VarMap, InventoryError> {
        if self.check_liveness {
            let running = self.gateway.running_hosts().await?;
            if !running.contains(host) {
                return Err(InventoryError::Liveness(format!("{host} is not running")));
            }
        }
        Ok(self.base.host_vars(host))
    }
}

fn describe_mismatch(declared: &BTreeSet<Hostname>, running: &BTreeSet<Hostname>) -> String {
    let missing: Vec<&str> = declared.difference(running).map(String::as_str).collect();
    let unexpected: Vec<&str> = running.difference(declared).map(String::as_str).collect();

    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("not running: {}", missing.join(", ")));
    }
    if !unexpected.is_empty() {
        parts.push(format!("not declared: {}", unexpected.join(", ")));
    }
    format!("not all hosts are running ({})", parts.join("; "))
}
