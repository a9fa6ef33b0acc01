//! Command executor trait

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ExecError;
use crate::result::CommandResult;

/// Runs a program with arguments and captures its output.
///
/// A non-zero exit status is not an error at this level; callers inspect
/// [`CommandResult::success`] or use [`CommandResult::into_stdout`].
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `argv[0]` with the remaining elements as arguments
    async fn run(&self, argv: &[&str]) -> Result<CommandResult, ExecError>;

    /// Same as [`CommandExecutor::run`], failing with [`ExecError::Timeout`]
    /// when the command outlives `timeout`
    async fn run_with_timeout(
        &self,
        argv: &[&str],
        timeout: Duration,
    ) -> Result<CommandResult, ExecError>;

    /// Short identifier used in logs
    fn executor_type(&self) -> &'static str;
}
