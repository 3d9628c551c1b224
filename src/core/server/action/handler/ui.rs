use crate::core::{
    msg::{EmptyReply, UiClickArgs, UiKeysArgs},
    server::{proc, state::ServerState},
    AgentError,
};
use log::debug;
use std::sync::Arc;

/// Moves the pointer to (x, y) and clicks the primary button
pub async fn click(
    state: Arc<ServerState>,
    args: &UiClickArgs,
) -> Result<EmptyReply, AgentError> {
    debug!("handler::click: {:?}", args);

    let x = args.x.to_string();
    let y = args.y.to_string();
    run_input_tool(&state, &["mousemove", x.as_str(), y.as_str(), "click", "1"])
        .await
}

/// Types `text` literally, with any held modifiers released first
pub async fn keys(
    state: Arc<ServerState>,
    args: &UiKeysArgs,
) -> Result<EmptyReply, AgentError> {
    debug!("handler::keys: {:?}", args);

    run_input_tool(&state, &["type", "--clearmodifiers", args.text.as_str()])
        .await
}

async fn run_input_tool(
    state: &ServerState,
    tool_args: &[&str],
) -> Result<EmptyReply, AgentError> {
    let _permit = state.acquire().await.map_err(AgentError::Automation)?;
    proc::run_checked(&state.tools.input, tool_args, state.effective_timeout(0))
        .await
        .map_err(AgentError::Automation)?;
    Ok(EmptyReply {})
}
