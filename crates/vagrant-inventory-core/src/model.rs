//! Inventory value types
//!
//! The shapes mirror Ansible's dynamic inventory JSON: named groups with
//! `hosts`/`children`/`vars`, plus a `_meta.hostvars` block keyed by host.
//! Every operation that "changes" a model returns a new value; the receiver
//! is never touched, so the base template can be enriched repeatedly.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::InventoryError;
use crate::network::NetworkConfig;
use crate::registry::{Hostname, Machine};

/// Free-form variables of a host or group
pub type VarMap = serde_json::Map<String, Value>;

/// Key under `all.vars` holding the derived DNS configuration
pub const NETWORK_CONFIGS_VAR: &str = "network_configs";

// ============================================================================
// Groups
// ============================================================================

/// An Ansible inventory group
///
/// `hosts` only ever lists machines; nested groups go in `children`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupModel {
    /// Group-scoped variables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vars: Option<VarMap>,
    /// Machines belonging directly to this group
    pub hosts: Vec<Hostname>,
    /// Names of nested groups
    pub children: Vec<String>,
}

impl GroupModel {
    /// Group containing the given hosts
    pub fn with_hosts<I, H>(hosts: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<Hostname>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set nested groups
    #[must_use]
    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = GroupName>,
    {
        self.children = children
            .into_iter()
            .map(|name| name.as_str().to_string())
            .collect();
        self
    }

    /// Set group variables
    #[must_use]
    pub fn vars(mut self, vars: VarMap) -> Self {
        self.vars = Some(vars);
        self
    }
}

/// Groups of the inventory document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupName {
    DnsServer,
    K8sCpLoadBalancer,
    K8sCpMaster,
    K8sOtherNodes,
    K8sAll,
    All,
    /// Everything vagrant reports as running, whatever its role
    VagrantAll,
}

impl GroupName {
    /// Groups describing the declared topology
    pub const FIXED: [GroupName; 6] = [
        GroupName::DnsServer,
        GroupName::K8sCpLoadBalancer,
        GroupName::K8sCpMaster,
        GroupName::K8sOtherNodes,
        GroupName::K8sAll,
        GroupName::All,
    ];

    /// Every group, including `vagrant_all`
    pub const ALL: [GroupName; 7] = [
        GroupName::DnsServer,
        GroupName::K8sCpLoadBalancer,
        GroupName::K8sCpMaster,
        GroupName::K8sOtherNodes,
        GroupName::K8sAll,
        GroupName::All,
        GroupName::VagrantAll,
    ];

    /// Name as it appears in the inventory JSON
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GroupName::DnsServer => "dns_server",
            GroupName::K8sCpLoadBalancer => "k8s_cp_load_balancer",
            GroupName::K8sCpMaster => "k8s_cp_master",
            GroupName::K8sOtherNodes => "k8s_other_nodes",
            GroupName::K8sAll => "k8s_all",
            GroupName::All => "all",
            GroupName::VagrantAll => "vagrant_all",
        }
    }

    fn is_fixed(self) -> bool {
        self != GroupName::VagrantAll
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Host variables
// ============================================================================

/// Per-machine variables, exactly one slot per registry machine
///
/// Serializes as an object keyed by fully qualified hostname.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HostVars {
    slots: BTreeMap<Hostname, VarMap>,
}

impl Default for HostVars {
    fn default() -> Self {
        Self {
            slots: Machine::ALL
                .into_iter()
                .map(|m| (m.fqdn().to_string(), VarMap::new()))
                .collect(),
        }
    }
}

impl HostVars {
    /// Build hostvars with an explicit slot for every machine
    ///
    /// A host listed twice keeps its last mapping.
    ///
    /// # Errors
    /// [`InventoryError::UnknownHost`] for a name outside the registry,
    /// [`InventoryError::MissingHost`] when a machine has no slot.
    pub fn new<I, H>(slots: I) -> Result<Self, InventoryError>
    where
        I: IntoIterator<Item = (H, VarMap)>,
        H: Into<Hostname>,
    {
        let slots = collect_slots(slots)?;
        if let Some(missing) = Machine::ALL
            .into_iter()
            .find(|m| !slots.contains_key(m.fqdn()))
        {
            return Err(InventoryError::MissingHost(missing.fqdn().to_string()));
        }
        Ok(Self { slots })
    }

    /// Build hostvars from some machines, leaving the others empty
    ///
    /// # Errors
    /// [`InventoryError::UnknownHost`] for a name outside the registry.
    pub fn from_partial<I, H>(slots: I) -> Result<Self, InventoryError>
    where
        I: IntoIterator<Item = (H, VarMap)>,
        H: Into<Hostname>,
    {
        let mut merged = Self::default();
        merged.slots.extend(collect_slots(slots)?);
        Ok(merged)
    }

    /// Variables of one machine
    #[must_use]
    pub fn get(&self, host: &str) -> Option<&VarMap> {
        self.slots.get(host)
    }

    /// Slots in hostname order
    pub fn iter(&self) -> impl Iterator<Item = (&Hostname, &VarMap)> {
        self.slots.iter()
    }

    /// Union both sides slot by slot, `other` winning on shared keys
    ///
    /// # Errors
    /// With `allow_override == false`, any key present on both sides for the
    /// same machine yields [`InventoryError::DuplicateKey`] naming the first
    /// such machine and all of its shared keys.
    pub fn merge(
        &self,
        other: &HostVars,
        allow_override: bool,
    ) -> Result<HostVars, InventoryError> {
        if !allow_override {
            for (host, ours) in &self.slots {
                let Some(theirs) = other.slots.get(host) else {
                    continue;
                };
                let shared: Vec<String> = ours
                    .keys()
                    .filter(|key| theirs.contains_key(*key))
                    .cloned()
                    .collect();
                if !shared.is_empty() {
                    return Err(InventoryError::DuplicateKey {
                        host: host.clone(),
                        keys: shared,
                    });
                }
            }
        }

        let mut slots = self.slots.clone();
        for (host, theirs) in &other.slots {
            let ours = slots.entry(host.clone()).or_default();
            for (key, value) in theirs {
                ours.insert(key.clone(), value.clone());
            }
        }
        Ok(HostVars { slots })
    }
}

fn collect_slots<I, H>(slots: I) -> Result<BTreeMap<Hostname, VarMap>, InventoryError>
where
    I: IntoIterator<Item = (H, VarMap)>,
    H: Into<Hostname>,
{
    slots
        .into_iter()
        .map(|(host, vars)| {
            let host = host.into();
            match Machine::from_fqdn(&host) {
                Some(_) => Ok((host, vars)),
                None => Err(InventoryError::UnknownHost(host)),
            }
        })
        .collect()
}

/// The `_meta` block
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Meta {
    hostvars: HostVars,
}

impl Meta {
    pub fn new(hostvars: HostVars) -> Self {
        Self { hostvars }
    }

    #[must_use]
    pub fn hostvars(&self) -> &HostVars {
        &self.hostvars
    }
}

// ============================================================================
// Inventory document
// ============================================================================

/// Complete inventory document printed for `--list`
///
/// Every host named by a fixed group has a slot in `_meta.hostvars`; the
/// `with_*` constructors refuse values that would break this.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryOutputModel {
    dns_server: GroupModel,
    k8s_cp_load_balancer: GroupModel,
    k8s_cp_master: GroupModel,
    k8s_other_nodes: GroupModel,
    k8s_all: GroupModel,
    all: GroupModel,
    vagrant_all: GroupModel,
    #[serde(rename = "_meta")]
    meta_info: Meta,
}

impl InventoryOutputModel {
    /// Inventory with empty groups
    pub fn new(meta_info: Meta) -> Self {
        Self {
            dns_server: GroupModel::default(),
            k8s_cp_load_balancer: GroupModel::default(),
            k8s_cp_master: GroupModel::default(),
            k8s_other_nodes: GroupModel::default(),
            k8s_all: GroupModel::default(),
            all: GroupModel::default(),
            vagrant_all: GroupModel::default(),
            meta_info,
        }
    }

    #[must_use]
    pub fn group(&self, name: GroupName) -> &GroupModel {
        match name {
            GroupName::DnsServer => &self.dns_server,
            GroupName::K8sCpLoadBalancer => &self.k8s_cp_load_balancer,
            GroupName::K8sCpMaster => &self.k8s_cp_master,
            GroupName::K8sOtherNodes => &self.k8s_other_nodes,
            GroupName::K8sAll => &self.k8s_all,
            GroupName::All => &self.all,
            GroupName::VagrantAll => &self.vagrant_all,
        }
    }

    fn group_mut(&mut self, name: GroupName) -> &mut GroupModel {
        match name {
            GroupName::DnsServer => &mut self.dns_server,
            GroupName::K8sCpLoadBalancer => &mut self.k8s_cp_load_balancer,
            GroupName::K8sCpMaster => &mut self.k8s_cp_master,
            GroupName::K8sOtherNodes => &mut self.k8s_other_nodes,
            GroupName::K8sAll => &mut self.k8s_all,
            GroupName::All => &mut self.all,
            GroupName::VagrantAll => &mut self.vagrant_all,
        }
    }

    #[must_use]
    pub fn meta_info(&self) -> &Meta {
        &self.meta_info
    }

    /// Copy with one group replaced
    ///
    /// # Errors
    /// [`InventoryError::UnknownHost`] when a fixed group would name a host
    /// without a hostvars slot.
    pub fn with_group(&self, name: GroupName, group: GroupModel) -> Result<Self, InventoryError> {
        if name.is_fixed()
            && let Some(host) = group
                .hosts
                .iter()
                .find(|h| self.meta_info.hostvars.get(h).is_none())
        {
            return Err(InventoryError::UnknownHost(format!("{host} (group {name})")));
        }
        let mut next = self.clone();
        *next.group_mut(name) = group;
        Ok(next)
    }

    /// Union of the `hosts` of every group
    #[must_use]
    pub fn list_all_hosts(&self) -> BTreeSet<Hostname> {
        GroupName::ALL
            .into_iter()
            .flat_map(|name| self.group(name).hosts.iter().cloned())
            .collect()
    }

    /// Copy with `meta`'s hostvars merged over ours
    ///
    /// # Errors
    /// See [`HostVars::merge`].
    pub fn merge_meta_info(
        &self,
        meta: &Meta,
        allow_override: bool,
    ) -> Result<Self, InventoryError> {
        let hostvars = self
            .meta_info
            .hostvars
            .merge(&meta.hostvars, allow_override)?;
        let mut next = self.clone();
        next.meta_info = Meta::new(hostvars);
        Ok(next)
    }

    /// Copy carrying the DNS configuration in `all.vars.network_configs` and
    /// the live hosts in `vagrant_all`
    ///
    /// # Errors
    /// [`InventoryError::Serialization`] if `config` cannot be rendered.
    pub fn with_network_config<I, H>(
        &self,
        config: &NetworkConfig,
        live_hosts: I,
    ) -> Result<Self, InventoryError>
    where
        I: IntoIterator<Item = H>,
        H: Into<Hostname>,
    {
        let mut vars = self.all.vars.clone().unwrap_or_default();
        vars.insert(
            NETWORK_CONFIGS_VAR.to_string(),
            serde_json::to_value(config)?,
        );

        let mut next = self.clone();
        next.all.vars = Some(vars);
        next.vagrant_all.hosts = live_hosts.into_iter().map(Into::into).collect();
        Ok(next)
    }

    /// Variables of one host, empty when it has none
    #[must_use]
    pub fn host_vars(&self, host: &str) -> VarMap {
        self.meta_info
            .hostvars
            .get(host)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn vars(value: Value) -> VarMap {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn hostvars(host: Machine, value: Value) -> HostVars {
        HostVars::from_partial([(host.fqdn(), vars(value))]).unwrap()
    }

    #[test]
    fn test_hostvars_default_has_every_machine() {
        let hv = HostVars::default();
        for machine in Machine::ALL {
            assert_eq!(hv.get(machine.fqdn()), Some(&VarMap::new()));
        }
        assert_eq!(hv.iter().count(), Machine::ALL.len());
    }

    #[test]
    fn test_hostvars_new_rejects_unknown_host() {
        let err = HostVars::from_partial([("vm99.vagrant.home", VarMap::new())]).unwrap_err();
        assert_eq!(
            err,
            InventoryError::UnknownHost("vm99.vagrant.home".to_string())
        );
    }

    #[test]
    fn test_hostvars_new_rejects_short_name() {
        let err = HostVars::from_partial([("vm01", VarMap::new())]).unwrap_err();
        assert!(matches!(err, InventoryError::UnknownHost(_)));
    }

    #[test]
    fn test_hostvars_new_requires_every_slot() {
        let err = HostVars::new([(Machine::Vm01.fqdn(), VarMap::new())]).unwrap_err();
        assert_eq!(
            err,
            InventoryError::MissingHost(Machine::VmDns.fqdn().to_string())
        );

        let full = HostVars::new(Machine::ALL.map(|m| (m.fqdn(), VarMap::new()))).unwrap();
        assert_eq!(full, HostVars::default());
    }

    #[test]
    fn test_merge_disjoint() {
        let a = hostvars(Machine::Vm02, json!({"a": 1}));
        let b = hostvars(Machine::Vm02, json!({"b": 2}));

        let merged = a.merge(&b, false).unwrap();
        assert_eq!(
            merged.get(Machine::Vm02.fqdn()),
            Some(&vars(json!({"a": 1, "b": 2})))
        );
        assert_eq!(merged, a.merge(&b, true).unwrap());
    }

    #[test]
    fn test_merge_same_key_other_machine_is_not_a_collision() {
        let a = hostvars(Machine::Vm02, json!({"k8s_is_control_plane": true}));
        let b = hostvars(Machine::Vm03, json!({"k8s_is_control_plane": false}));

        assert!(a.merge(&b, false).is_ok());
    }

    #[test]
    fn test_merge_collision_rejected() {
        let a = hostvars(Machine::Vm03, json!({"x": 1, "y": 2, "z": 3}));
        let b = hostvars(Machine::Vm03, json!({"y": 20, "x": 10}));

        let err = a.merge(&b, false).unwrap_err();
        assert_eq!(
            err,
            InventoryError::DuplicateKey {
                host: Machine::Vm03.fqdn().to_string(),
                keys: vec!["x".to_string(), "y".to_string()],
            }
        );
    }

    #[test]
    fn test_merge_collision_override_other_wins() {
        let a = hostvars(Machine::Vm03, json!({"x": 1, "z": 3}));
        let b = hostvars(Machine::Vm03, json!({"x": 10}));

        let merged = a.merge(&b, true).unwrap();
        assert_eq!(
            merged.get(Machine::Vm03.fqdn()),
            Some(&vars(json!({"x": 10, "z": 3})))
        );
        // receiver untouched
        assert_eq!(a.get(Machine::Vm03.fqdn()), Some(&vars(json!({"x": 1, "z": 3}))));
    }

    #[test]
    fn test_list_all_hosts() {
        let model = InventoryOutputModel::new(Meta::default())
            .with_group(
                GroupName::K8sCpMaster,
                GroupModel::with_hosts([Machine::Vm01.fqdn()]),
            )
            .unwrap()
            .with_group(
                GroupName::K8sOtherNodes,
                GroupModel::with_hosts([Machine::Vm02.fqdn(), Machine::Vm01.fqdn()]),
            )
            .unwrap()
            .with_group(
                GroupName::K8sAll,
                GroupModel::default().children([GroupName::K8sCpMaster]),
            )
            .unwrap();

        let expected: BTreeSet<Hostname> = [Machine::Vm01.fqdn(), Machine::Vm02.fqdn()]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(model.list_all_hosts(), expected);
        assert_eq!(model.list_all_hosts(), model.list_all_hosts());
    }

    #[test]
    fn test_with_group_rejects_host_without_slot() {
        let model = InventoryOutputModel::new(Meta::default());
        let err = model
            .with_group(GroupName::DnsServer, GroupModel::with_hosts(["k8s_all"]))
            .unwrap_err();
        assert!(matches!(err, InventoryError::UnknownHost(_)));

        // vagrant_all reflects live state and is not checked
        assert!(
            model
                .with_group(GroupName::VagrantAll, GroupModel::with_hosts(["default"]))
                .is_ok()
        );
    }

    #[test]
    fn test_merge_meta_info_returns_new_model() {
        let base = InventoryOutputModel::new(Meta::new(hostvars(
            Machine::Vm04,
            json!({"k8s_is_control_plane": false}),
        )));
        let extra = Meta::new(hostvars(Machine::Vm04, json!({"role": "worker"})));

        let merged = base.merge_meta_info(&extra, false).unwrap();
        assert_eq!(
            merged.host_vars(Machine::Vm04.fqdn()),
            vars(json!({"k8s_is_control_plane": false, "role": "worker"}))
        );
        assert_eq!(
            base.host_vars(Machine::Vm04.fqdn()),
            vars(json!({"k8s_is_control_plane": false}))
        );

        let clash = Meta::new(hostvars(Machine::Vm04, json!({"k8s_is_control_plane": true})));
        assert!(matches!(
            base.merge_meta_info(&clash, false),
            Err(InventoryError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_host_vars_unknown_host_is_empty() {
        let model = InventoryOutputModel::new(Meta::default());
        assert_eq!(model.host_vars("nope.vagrant.home"), VarMap::new());
    }

    #[test]
    fn test_serialization_aliases() {
        let model = InventoryOutputModel::new(Meta::new(hostvars(
            Machine::Vm02,
            json!({"k8s_is_control_plane": true}),
        )))
        .with_group(
            GroupName::DnsServer,
            GroupModel::with_hosts([Machine::VmDns.fqdn()]),
        )
        .unwrap();

        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(
            value["dns_server"],
            json!({"hosts": ["vm-dns.vagrant.home"], "children": []})
        );
        assert_eq!(
            value["_meta"]["hostvars"]["vm02.vagrant.home"],
            json!({"k8s_is_control_plane": true})
        );
        assert!(value.get("meta_info").is_none());
        assert!(value["all"].get("vars").is_none());
    }
}
