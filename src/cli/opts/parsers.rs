use crate::cli::format::FormatOption;
use crate::core::ToolCommand;
use std::error::Error;
use std::net::SocketAddr;
use std::time::Duration;

type ParseResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

pub fn parse_duration_secs(s: &str) -> ParseResult<Duration> {
    let secs: f64 = s.parse()?;
    Ok(Duration::try_from_secs_f64(secs)?)
}

pub fn parse_socket_addr(s: &str) -> ParseResult<SocketAddr> {
    let addr = s.parse()?;
    Ok(addr)
}

pub fn parse_tool_command(s: &str) -> ParseResult<ToolCommand> {
    let tool = s.parse::<ToolCommand>()?;
    Ok(tool)
}

pub fn parse_format(s: &str) -> ParseResult<FormatOption> {
    let format = s.parse()?;
    Ok(format)
}
