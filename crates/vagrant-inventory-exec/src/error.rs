//! Error types for vagrant-inventory-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while running a local command
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// Command was invoked with an empty argument vector
    #[error("empty command")]
    EmptyCommand,

    /// Command exited with a non-zero status
    #[error("command failed: {program} exited with {status} - {stderr}")]
    CommandFailed {
        /// Program that was run
        program: String,
        /// Exit status code
        status: i32,
        /// Stderr output
        stderr: String,
    },

    /// Command timed out
    #[error("command timed out after {timeout:?}")]
    Timeout {
        /// Timeout duration that was exceeded
        timeout: Duration,
    },

    /// Process spawn error
    #[error("failed to spawn process: {0}")]
    SpawnError(String),

    /// I/O error during execution
    #[error("I/O error: {0}")]
    IoError(String),
}
