//! vagrant-inventory-core: Ansible inventory model for the Vagrant k8s lab
//!
//! Holds the static host registry, the inventory value types and their merge
//! operations, DNS zone derivation from discovered addresses, and the runner
//! that ties them to a [`VagrantStateGateway`].

pub mod defaults;
pub mod error;
pub mod gateway;
pub mod mode;
pub mod model;
pub mod network;
pub mod registry;
pub mod runner;

pub use defaults::base_inventory;
pub use error::InventoryError;
pub use gateway::{VagrantProvisioningInfo, VagrantStateGateway};
pub use mode::RunMode;
pub use model::{GroupModel, GroupName, HostVars, InventoryOutputModel, Meta, VarMap};
pub use network::{NetworkConfig, NetworkConfigBuilder};
pub use registry::{Hostname, Machine};
pub use runner::{InventoryRunner, RunOutput};
