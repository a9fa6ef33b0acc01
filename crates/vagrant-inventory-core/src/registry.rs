//! Static catalog of the lab's machines and DNS names
//!
//! Every name lives under [`VAGRANT_DOMAIN`]. Adding a machine means adding a
//! [`Machine`] variant; hostvars membership is checked against
//! [`Machine::ALL`].

use std::fmt;

/// Machine name, short (`vm01`) or fully qualified (`vm01.vagrant.home`)
pub type Hostname = String;

/// Domain every lab name lives under
pub const VAGRANT_DOMAIN: &str = "vagrant.home";

/// Name server record, served by [`Machine::VmDns`]
pub const NS1: &str = "ns1.vagrant.home";

/// Kubernetes control plane endpoint (the load balancer)
pub const K8S_CP_ENDPOINT: &str = "k8s-cp-endpoint.vagrant.home";

/// Virtual machines managed by the Vagrantfile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Machine {
    /// DNS server and control plane load balancer
    VmDns,
    /// Control plane master
    Vm01,
    Vm02,
    Vm03,
    Vm04,
}

impl Machine {
    /// Every machine, in registry order
    pub const ALL: [Machine; 5] = [
        Machine::VmDns,
        Machine::Vm01,
        Machine::Vm02,
        Machine::Vm03,
        Machine::Vm04,
    ];

    /// Fully qualified domain name
    #[must_use]
    pub fn fqdn(self) -> &'static str {
        match self {
            Machine::VmDns => "vm-dns.vagrant.home",
            Machine::Vm01 => "vm01.vagrant.home",
            Machine::Vm02 => "vm02.vagrant.home",
            Machine::Vm03 => "vm03.vagrant.home",
            Machine::Vm04 => "vm04.vagrant.home",
        }
    }

    /// Name with the domain suffix stripped
    #[must_use]
    pub fn short_name(self) -> &'static str {
        strip_domain(self.fqdn())
    }

    /// Find a machine by its fully qualified name
    #[must_use]
    pub fn from_fqdn(name: &str) -> Option<Machine> {
        Machine::ALL.into_iter().find(|m| m.fqdn() == name)
    }

    /// Find a machine by fully qualified or short name
    #[must_use]
    pub fn lookup(name: &str) -> Option<Machine> {
        Machine::ALL
            .into_iter()
            .find(|m| m.fqdn() == name || m.short_name() == name)
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fqdn())
    }
}

/// Strip `.vagrant.home` from a name, leaving other names untouched
#[must_use]
pub fn strip_domain(name: &str) -> &str {
    name.strip_suffix(VAGRANT_DOMAIN)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(name)
}
