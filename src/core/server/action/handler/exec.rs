use crate::core::{
    msg::{ExecArgs, ExecReply},
    server::{proc, state::ServerState},
    AgentError, ToolError,
};
use log::debug;
use std::sync::Arc;

/// Runs `args.cmd` through the shell; a shell that cannot be started is
/// reported as exit code -1 with the launch error as output
pub async fn exec(
    state: Arc<ServerState>,
    args: &ExecArgs,
) -> Result<ExecReply, AgentError> {
    debug!("handler::exec: {:?}", args);

    match run(state, args).await {
        Err(AgentError::Exec(x @ ToolError::ProcessLaunchFailure { .. })) => {
            Ok(ExecReply {
                exit_code: -1,
                output: x.to_string(),
            })
        }
        result => result,
    }
}

/// Like `exec`, but failing to start the shell is an error
pub async fn run(
    state: Arc<ServerState>,
    args: &ExecArgs,
) -> Result<ExecReply, AgentError> {
    if args.cmd.is_empty() {
        return Err(AgentError::invalid_request("cmd required"));
    }

    let timeout = state.effective_timeout(args.timeout);
    let _permit = state.acquire().await.map_err(AgentError::Exec)?;
    let output =
        proc::run_combined(&state.tools.shell, &[args.cmd.as_str()], timeout)
            .await
            .map_err(AgentError::Exec)?;

    Ok(ExecReply {
        exit_code: output.exit_code(),
        output: output.output_lossy(),
    })
}
