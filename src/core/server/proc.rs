use crate::core::ToolError;
use log::{debug, warn};
use nix::{
    errno::Errno,
    sys::signal::{killpg, Signal},
    unistd::Pid,
};
use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::str::FromStr;
use std::time::Duration;
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    process::{Child, Command},
};

const READ_BUF_SIZE: usize = 4096;

/// External program plus the arguments that always lead its invocation,
/// e.g. `bash -lc` or `xdotool`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
        }
    }

    pub fn with_args<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn to_command<I, S>(&self, extra_args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).args(extra_args);
        cmd
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

impl FromStr for ToolCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        match parts.next() {
            Some(program) => Ok(Self::with_args(program, parts)),
            None => Err(String::from("tool command cannot be empty")),
        }
    }
}

/// Outcome of an external process that ran to completion
#[derive(Debug)]
pub struct ProcOutput {
    pub status: ExitStatus,

    /// Stdout and stderr interleaved in the order chunks arrived
    pub output: Vec<u8>,
}

impl ProcOutput {
    /// Real exit code, or -1 if terminated by a signal
    pub fn exit_code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }

    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

/// Runs the tool to completion, capturing combined output
///
/// The child is placed in its own process group; if `timeout` elapses the
/// entire group is killed and the child reaped before reporting
/// `ToolError::Timeout` with the output gathered so far. Dropping the
/// returned future before it completes also kills the group. Abnormal exit
/// is returned as data.
pub async fn run_combined<I, S>(
    tool: &ToolCommand,
    extra_args: I,
    timeout: Option<Duration>,
) -> Result<ProcOutput, ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = tool.to_command(extra_args);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .process_group(0)
        .kill_on_drop(true);

    let mut child =
        cmd.spawn()
            .map_err(|source| ToolError::ProcessLaunchFailure {
                program: tool.program.clone(),
                source,
            })?;
    let pid = child.id();
    debug!("Spawned {} as pid {:?}", tool.program, pid);
    let mut group = ProcessGroup { pid };

    let mut output = Vec::new();
    let collect = collect_output(&mut child, &mut output);
    let outcome = match timeout {
        Some(after) => tokio::time::timeout(after, collect).await,
        None => Ok(collect.await),
    };

    match outcome {
        Ok(Ok(status)) => {
            group.disarm();
            Ok(ProcOutput { status, output })
        }
        Ok(Err(x)) => Err(x),
        Err(_) => {
            let after = timeout.unwrap_or_default();
            warn!(
                "{} (pid {:?}) exceeded {:?}, killing process group",
                tool.program, pid, after
            );
            group.kill();

            // Group leader may already be gone, but must still be reaped
            if let Err(x) = child.kill().await {
                debug!("Reaping killed child: {}", x);
            }

            Err(ToolError::Timeout {
                after,
                output: String::from_utf8_lossy(&output).into_owned(),
            })
        }
    }
}

/// Like `run_combined`, but any exit other than success is a failure
pub async fn run_checked<I, S>(
    tool: &ToolCommand,
    extra_args: I,
    timeout: Option<Duration>,
) -> Result<ProcOutput, ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = run_combined(tool, extra_args, timeout).await?;
    if output.status.success() {
        Ok(output)
    } else {
        Err(ToolError::ProcessExit {
            program: tool.program.clone(),
            code: output.status.code(),
            output: output.output_lossy(),
        })
    }
}

async fn collect_output(
    child: &mut Child,
    output: &mut Vec<u8>,
) -> Result<ExitStatus, ToolError> {
    read_combined(child.stdout.take(), child.stderr.take(), output).await?;
    Ok(child.wait().await?)
}

/// Drains both readers concurrently into `output` until both hit EOF
async fn read_combined<O, E>(
    mut stdout: Option<O>,
    mut stderr: Option<E>,
    output: &mut Vec<u8>,
) -> io::Result<()>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut out_buf = [0; READ_BUF_SIZE];
    let mut err_buf = [0; READ_BUF_SIZE];

    while stdout.is_some() || stderr.is_some() {
        tokio::select! {
            n = read_some(&mut stdout, &mut out_buf), if stdout.is_some() => {
                match n? {
                    0 => stdout = None,
                    n => output.extend_from_slice(&out_buf[..n]),
                }
            }
            n = read_some(&mut stderr, &mut err_buf), if stderr.is_some() => {
                match n? {
                    0 => stderr = None,
                    n => output.extend_from_slice(&err_buf[..n]),
                }
            }
        }
    }

    Ok(())
}

async fn read_some<R: AsyncRead + Unpin>(
    reader: &mut Option<R>,
    buf: &mut [u8],
) -> io::Result<usize> {
    match reader {
        Some(reader) => reader.read(buf).await,
        None => Ok(0),
    }
}

/// Process group led by a spawned child, sent `SIGKILL` when dropped
/// unless disarmed after the child has been reaped
struct ProcessGroup {
    pid: Option<u32>,
}

impl ProcessGroup {
    fn disarm(&mut self) {
        self.pid = None;
    }

    fn kill(&mut self) {
        if let Some(pid) = self.pid.take() {
            match killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                Ok(()) | Err(Errno::ESRCH) => (),
                Err(x) => {
                    warn!("Failed to kill process group {}: {}", pid, x)
                }
            }
        }
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        if let Some(pid) = self.pid {
            debug!("Abandoned, killing process group {}", pid);
        }
        self.kill();
    }
}
