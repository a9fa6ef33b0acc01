//! The lab's declared topology

use serde_json::{Value, json};

use crate::error::InventoryError;
use crate::model::{GroupModel, GroupName, HostVars, InventoryOutputModel, Meta, VarMap};
use crate::registry::{K8S_CP_ENDPOINT, Machine};

/// Static inventory every run starts from
///
/// `vm-dns` serves DNS and balances the control plane, `vm01` is the
/// control plane master and `vm02`..`vm04` join as other nodes.
///
/// # Errors
/// Only if the declared groups and hostvars disagree.
pub fn base_inventory() -> Result<InventoryOutputModel, InventoryError> {
    let hostvars = HostVars::new([
        (Machine::VmDns.fqdn(), VarMap::new()),
        (Machine::Vm01.fqdn(), VarMap::new()),
        (Machine::Vm02.fqdn(), control_plane(true)),
        (Machine::Vm03.fqdn(), control_plane(false)),
        (Machine::Vm04.fqdn(), control_plane(false)),
    ])?;

    let mut k8s_all_vars = VarMap::new();
    k8s_all_vars.insert(
        "k8s_cp_endpoint".to_string(),
        Value::String(K8S_CP_ENDPOINT.to_string()),
    );

    InventoryOutputModel::new(Meta::new(hostvars))
        .with_group(
            GroupName::DnsServer,
            GroupModel::with_hosts([Machine::VmDns.fqdn()]),
        )?
        .with_group(
            GroupName::K8sCpLoadBalancer,
            GroupModel::with_hosts([Machine::VmDns.fqdn()]),
        )?
        .with_group(
            GroupName::K8sCpMaster,
            GroupModel::with_hosts([Machine::Vm01.fqdn()]),
        )?
        .with_group(
            GroupName::K8sOtherNodes,
            GroupModel::with_hosts([
                Machine::Vm02.fqdn(),
                Machine::Vm03.fqdn(),
                Machine::Vm04.fqdn(),
            ]),
        )?
        .with_group(
            GroupName::K8sAll,
            GroupModel::default()
                .children([
                    GroupName::K8sCpLoadBalancer,
                    GroupName::K8sCpMaster,
                    GroupName::K8sOtherNodes,
                ])
                .vars(k8s_all_vars),
        )
}

fn control_plane(is_control_plane: bool) -> VarMap {
    let mut vars = VarMap::new();
    vars.insert(
        "k8s_is_control_plane".to_string(),
        json!(is_control_plane),
    );
    vars
}
