//! vagrant-inventory-exec: Local command execution
//!
//! Provides the executor trait and a `tokio::process` backed implementation
//! used to drive the `vagrant` command line tool.

pub mod error;
pub mod local;
pub mod result;
pub mod traits;

pub use error::ExecError;
pub use local::LocalExecutor;
pub use result::CommandResult;
pub use traits::CommandExecutor;
