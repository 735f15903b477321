use thiserror::Error;

/// Failures of the external tool itself, as opposed to the operation it ran.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to launch {executable}: {source}")]
    Launch {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {exit_code}: {stderr}")]
    Exit {
        command: String,
        exit_code: i32,
        stderr: String,
    },
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("device address is empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn launch_error_keeps_io_source() {
        let err = ToolError::Launch {
            executable: "/usr/bin/bluetoothctl".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/usr/bin/bluetoothctl"));
    }

    #[test]
    fn exit_error_reports_status_and_stderr() {
        let err = ToolError::Exit {
            command: "bluetoothctl devices".to_string(),
            exit_code: 1,
            stderr: "No default controller available".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("status 1"));
        assert!(message.contains("No default controller"));
    }
}
