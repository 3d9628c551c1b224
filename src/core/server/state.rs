use super::proc::ToolCommand;
use crate::core::ToolError;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::{Semaphore, SemaphorePermit};

pub mod constants {
    /// Maximum external processes running at once across all connections
    pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;
}

/// External programs the agent shells out to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tools {
    /// Receives the command text as its final argument
    pub shell: ToolCommand,

    /// Receives `--quality <q> <file>`
    pub screenshot: ToolCommand,

    /// Receives `mousemove <x> <y> click 1` or
    /// `type --clearmodifiers <text>`
    pub input: ToolCommand,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            shell: ToolCommand::with_args("bash", vec!["-lc"]),
            screenshot: ToolCommand::new("scrot"),
            input: ToolCommand::new("xdotool"),
        }
    }
}

/// Everything a handler needs to serve a request; shared read-only across
/// connections apart from the process limiter
#[derive(Debug)]
pub struct ServerState {
    pub tools: Tools,

    /// Applied when a request does not ask for a timeout of its own
    pub default_timeout: Option<Duration>,

    /// Upper bound on any timeout, requested or default
    pub max_timeout: Option<Duration>,

    /// Where scratch directories for screenshots are created; falls back
    /// to the system temp dir
    pub scratch_dir: Option<PathBuf>,

    max_in_flight: usize,
    permits: Semaphore,
}

impl ServerState {
    pub fn new(
        tools: Tools,
        max_in_flight: usize,
        default_timeout: Option<Duration>,
        max_timeout: Option<Duration>,
        scratch_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            tools,
            default_timeout,
            max_timeout,
            scratch_dir,
            max_in_flight,
            permits: Semaphore::new(max_in_flight),
        }
    }

    /// Waits until another external process may be launched
    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>, ToolError> {
        self.permits.acquire().await.map_err(|_| {
            ToolError::IoFailure(io::Error::new(
                io::ErrorKind::Other,
                "process limiter closed",
            ))
        })
    }

    /// Number of external processes currently holding a permit
    pub fn in_flight(&self) -> usize {
        self.max_in_flight - self.permits.available_permits()
    }

    /// Resolves the timeout for a request given in whole seconds, where
    /// zero or less means "use the default"
    pub fn effective_timeout(&self, requested_secs: i64) -> Option<Duration> {
        let requested = if requested_secs > 0 {
            Some(Duration::from_secs(requested_secs as u64))
        } else {
            self.default_timeout
        };

        match (requested, self.max_timeout) {
            (Some(t), Some(max)) => Some(t.min(max)),
            (None, max) => max,
            (t, None) => t,
        }
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(
            Tools::default(),
            constants::DEFAULT_MAX_IN_FLIGHT,
            None,
            None,
            None,
        )
    }
}
