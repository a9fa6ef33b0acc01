//! vagrant-inventory-vagrant: vagrant CLI integration
//!
//! Implements [`vagrant_inventory_core::VagrantStateGateway`] by running
//! `vagrant status --machine-readable` and `vagrant ssh-config <host>`.

pub mod cli;
pub mod error;
pub mod ssh_config;
pub mod status;

pub use cli::VagrantCli;
pub use error::VagrantError;
