use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::io;
use std::time::Duration;

/// Broad category of a failure, independent of which operation hit it
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidRequest,
    ProcessLaunchFailure,
    ProcessExit,
    IoFailure,
    Timeout,
}

/// Failure while driving a single external program
#[derive(Debug, Display)]
pub enum ToolError {
    #[display(fmt = "Failed to launch {}: {}", program, source)]
    ProcessLaunchFailure { program: String, source: io::Error },

    #[display(fmt = "{} {}{}", program, "describe_exit(*code)", "describe_output(output)")]
    ProcessExit {
        program: String,
        code: Option<i32>,
        output: String,
    },

    #[display(fmt = "IO Error: {}", "_0")]
    IoFailure(io::Error),

    #[display(fmt = "Timed out after {:?}", after)]
    Timeout {
        after: Duration,

        /// Whatever the program wrote before it was killed
        output: String,
    },
}

impl ToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProcessLaunchFailure { .. } => ErrorKind::ProcessLaunchFailure,
            Self::ProcessExit { .. } => ErrorKind::ProcessExit,
            Self::IoFailure(_) => ErrorKind::IoFailure,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// Output captured before the program failed, empty if none was kept
    pub fn partial_output(&self) -> &str {
        match self {
            Self::Timeout { output, .. } => output,
            _ => "",
        }
    }
}

impl Error for ToolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ProcessLaunchFailure { source, .. } => Some(source),
            Self::IoFailure(x) => Some(x),
            _ => None,
        }
    }
}

impl From<io::Error> for ToolError {
    fn from(error: io::Error) -> Self {
        Self::IoFailure(error)
    }
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with code {}", code),
        None => String::from("was terminated by a signal"),
    }
}

fn describe_output(output: &str) -> String {
    let output = output.trim();
    if output.is_empty() {
        String::new()
    } else {
        format!(": {}", output)
    }
}

/// Failure of one agent operation, reported back to the caller as-is
#[derive(Debug, Display)]
pub enum AgentError {
    #[display(fmt = "Invalid request: {}", reason)]
    InvalidRequest { reason: String },

    #[display(fmt = "Exec failed: {}", "_0")]
    Exec(ToolError),

    #[display(fmt = "Capture failed: {}", "_0")]
    Capture(ToolError),

    #[display(fmt = "Automation failed: {}", "_0")]
    Automation(ToolError),
}

impl AgentError {
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Self::Exec(x) | Self::Capture(x) | Self::Automation(x) => x.kind(),
        }
    }

    pub fn partial_output(&self) -> &str {
        match self {
            Self::InvalidRequest { .. } => "",
            Self::Exec(x) | Self::Capture(x) | Self::Automation(x) => {
                x.partial_output()
            }
        }
    }
}

impl Error for AgentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRequest { .. } => None,
            Self::Exec(x) | Self::Capture(x) | Self::Automation(x) => Some(x),
        }
    }
}
