use super::parsers;
use crate::cli::format::FormatOption;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

#[derive(clap::Subcommand, Debug)]
pub enum Subcommand {
    /// Runs a shell command on the agent, exiting with its exit code
    #[command(name = "exec")]
    Exec(ExecCommand),

    /// Captures the agent's screen
    #[command(name = "screenshot")]
    Screenshot(ScreenshotCommand),

    /// Clicks at a screen position
    #[command(name = "click")]
    Click(ClickCommand),

    /// Types text as keyboard input
    #[command(name = "keys")]
    Keys(KeysCommand),
}

/// Perform some operation as the client of a running agent
#[derive(Args, Debug)]
pub struct ClientCommand {
    #[command(subcommand)]
    pub command: Subcommand,

    /// Path of the agent's unix socket
    #[arg(long, default_value = crate::core::DEFAULT_SOCKET_PATH)]
    pub socket: PathBuf,

    /// Specifies the format of output from the client
    #[arg(
        short,
        long,
        value_parser = parsers::parse_format,
        default_value = "human"
    )]
    pub output_format: FormatOption,

    /// Time (in seconds) to wait for the agent to answer
    #[arg(long, value_parser = parsers::parse_duration_secs, default_value = "300")]
    pub timeout: Duration,

    /// If provided, will redirect stdout as a result of an operation to the
    /// file specified by the provided path
    #[arg(long)]
    pub redirect_stdout: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ExecCommand {
    /// Command line handed to the agent's shell
    pub command: String,

    /// Seconds before the agent kills the command; zero uses its default
    #[arg(long, default_value_t = 0)]
    pub exec_timeout: i64,
}

#[derive(Args, Debug)]
pub struct ScreenshotCommand {
    /// Image quality (0-100) requested from the capture tool
    #[arg(long, default_value_t = 75)]
    pub quality: i32,

    /// File to write the decoded image to, rather than stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ClickCommand {
    #[arg(allow_negative_numbers = true)]
    pub x: i32,

    #[arg(allow_negative_numbers = true)]
    pub y: i32,
}

#[derive(Args, Debug)]
pub struct KeysCommand {
    /// Text typed verbatim
    pub text: String,
}
