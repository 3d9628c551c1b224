use super::parsers;
use crate::core::{server::state::constants, ToolCommand};
use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Serve JSON-RPC on a unix socket, plus HTTP exec if an address is given
#[derive(Args, Debug)]
pub struct ServerCommand {
    /// Path of the unix socket to listen on; any existing file is replaced
    #[arg(long, default_value = crate::core::DEFAULT_SOCKET_PATH)]
    pub socket: PathBuf,

    /// Address (<host>:<port>) to serve `POST /agent/exec` on
    #[arg(long, value_parser = parsers::parse_socket_addr)]
    pub http: Option<SocketAddr>,

    /// Maximum external processes running at once
    #[arg(long, default_value_t = constants::DEFAULT_MAX_IN_FLIGHT)]
    pub max_in_flight: usize,

    /// Timeout (in seconds) for requests that do not ask for one
    #[arg(long, value_parser = parsers::parse_duration_secs)]
    pub default_timeout: Option<Duration>,

    /// Upper bound (in seconds) on any requested timeout
    #[arg(long, value_parser = parsers::parse_duration_secs)]
    pub max_timeout: Option<Duration>,

    /// Shell that receives exec commands as its final argument
    #[arg(long, value_parser = parsers::parse_tool_command, default_value = "bash -lc")]
    pub shell: ToolCommand,

    /// Screen capture program, invoked as `<tool> --quality <q> <file>`
    #[arg(long, value_parser = parsers::parse_tool_command, default_value = "scrot")]
    pub screenshot_tool: ToolCommand,

    /// Input automation program, invoked with xdotool-style arguments
    #[arg(long, value_parser = parsers::parse_tool_command, default_value = "xdotool")]
    pub input_tool: ToolCommand,

    /// Directory under which screenshot scratch space is created
    #[arg(long)]
    pub scratch_dir: Option<PathBuf>,
}
