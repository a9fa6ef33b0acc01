//! DNS zone derivation from discovered addresses

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::InventoryError;
use crate::gateway::VagrantProvisioningInfo;
use crate::registry::{self, Hostname, K8S_CP_ENDPOINT, Machine, NS1, VAGRANT_DOMAIN};

/// vagrant-libvirt default network, 192.168.121.0/24
pub const NETWORK_PREFIX: &str = "192.168.121";

/// Rendered under `all.vars.network_configs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkConfig {
    /// Address of the internal name server
    pub name_server: String,
    pub dns: DnsConfig,
}

/// Name server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsConfig {
    pub acl: AccessControlList,
    /// Zones keyed by domain
    pub domains: BTreeMap<String, DomainZone>,
}

/// Clients allowed to query the name server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessControlList {
    pub internal_network: Vec<String>,
}

/// Records of one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainZone {
    pub ipv4: Vec<Ipv4Records>,
    pub ipv6: Vec<Value>,
    /// `cname -> actual`
    pub cnames: BTreeMap<String, String>,
}

/// A-records sharing a /24 prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ipv4Records {
    pub network_component: String,
    /// Short name to last octet
    pub addresses: BTreeMap<String, u8>,
}

/// Builds a [`NetworkConfig`] from vagrant provisioning info
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    network_prefix: &'static str,
    domain: &'static str,
    name_server_host: Machine,
}

impl Default for NetworkConfigBuilder {
    fn default() -> Self {
        Self {
            network_prefix: NETWORK_PREFIX,
            domain: VAGRANT_DOMAIN,
            name_server_host: Machine::VmDns,
        }
    }
}

impl NetworkConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the zone configuration
    ///
    /// # Errors
    /// [`InventoryError::NetworkValidation`] if any address has a last octet
    /// outside 1..=254, does not sit in the network prefix, or the name
    /// server host has no address.
    #[instrument(skip(self, info), fields(hosts = info.len()))]
    pub fn build(
        &self,
        info: &BTreeMap<Hostname, VagrantProvisioningInfo>,
    ) -> Result<NetworkConfig, InventoryError> {
        let mut host_to_octet: BTreeMap<Hostname, u8> = BTreeMap::new();
        for (host, provisioning) in info {
            let octet = self.validated_octet(host, &provisioning.ipv4_address)?;
            debug!(host = %host, octet, "validated address");
            host_to_octet.insert(host.clone(), octet);
        }

        let ns_fqdn = self.name_server_host.fqdn();
        let ns_octet = *host_to_octet.get(ns_fqdn).ok_or_else(|| {
            InventoryError::NetworkValidation(format!("name server host {ns_fqdn} has no address"))
        })?;
        host_to_octet.insert(NS1.to_string(), ns_octet);

        let addresses = host_to_octet
            .iter()
            .map(|(host, octet)| (registry::strip_domain(host).to_string(), *octet))
            .collect();

        let cnames = BTreeMap::from([(
            registry::strip_domain(K8S_CP_ENDPOINT).to_string(),
            self.name_server_host.short_name().to_string(),
        )]);

        let zone = DomainZone {
            ipv4: vec![Ipv4Records {
                network_component: self.network_prefix.to_string(),
                addresses,
            }],
            ipv6: Vec::new(),
            cnames,
        };

        Ok(NetworkConfig {
            name_server: format!("{}.{ns_octet}", self.network_prefix),
            dns: DnsConfig {
                acl: AccessControlList {
                    internal_network: vec![
                        "localhost".to_string(),
                        format!("{}.0/24", self.network_prefix),
                    ],
                },
                domains: BTreeMap::from([(self.domain.to_string(), zone)]),
            },
        })
    }

    fn validated_octet(&self, host: &str, address: &str) -> Result<u8, InventoryError> {
        let octet = last_octet(address).ok_or_else(|| {
            InventoryError::NetworkValidation(format!(
                "{host}: address {address:?} has no numeric last octet"
            ))
        })?;

        let octet = u8::try_from(octet)
            .ok()
            .filter(|o| (1..=254).contains(o))
            .ok_or_else(|| {
                InventoryError::NetworkValidation(format!(
                    "{host}: last octet {octet} of {address} is not in range 1-254"
                ))
            })?;

        if format!("{}.{octet}", self.network_prefix) != address {
            return Err(InventoryError::NetworkValidation(format!(
                "{host}: address {address} is not {}.{octet}",
                self.network_prefix
            )));
        }

        Ok(octet)
    }
}

/// Number after the final `.` of an address
#[must_use]
pub fn last_octet(address: &str) -> Option<u32> {
    address.rsplit('.').next()?.parse().ok()
}
