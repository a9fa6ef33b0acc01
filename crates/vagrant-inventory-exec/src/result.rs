//! Result types for command execution

use std::time::Duration;

use crate::error::ExecError;

/// Result of a command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Program that was run
    pub program: String,
    /// Exit status code (0 for success)
    pub status: i32,
    /// stdout output
    pub stdout: String,
    /// stderr output
    pub stderr: String,
    /// Time taken to execute
    pub duration: Duration,
}

impl CommandResult {
    /// Check if command succeeded (exit code 0)
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Take stdout of a successful command
    ///
    /// # Errors
    /// Returns [`ExecError::CommandFailed`] when the exit status is non-zero.
    pub fn into_stdout(self) -> Result<String, ExecError> {
        if self.success() {
            Ok(self.stdout)
        } else {
            Err(ExecError::CommandFailed {
                program: self.program,
                status: self.status,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(status: i32) -> CommandResult {
        CommandResult {
            program: "vagrant".to_string(),
            status,
            stdout: "out".to_string(),
            stderr: "boom\n".to_string(),
            duration: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_into_stdout_success() {
        assert_eq!(result(0).into_stdout().unwrap(), "out");
    }

    #[test]
    fn test_into_stdout_failure() {
        let err = result(3).into_stdout().unwrap_err();
        match err {
            ExecError::CommandFailed {
                program,
                status,
                stderr,
            } => {
                assert_eq!(program, "vagrant");
                assert_eq!(status, 3);
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
