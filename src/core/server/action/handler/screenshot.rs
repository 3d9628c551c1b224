use crate::core::{
    msg::{ScreenshotArgs, ScreenshotReply},
    server::{proc, state::ServerState},
    AgentError, ToolError,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::debug;
use std::ffi::OsString;
use std::sync::Arc;

const SCREENSHOT_FILE_NAME: &str = "screenshot.png";

pub async fn screenshot(
    state: Arc<ServerState>,
    args: &ScreenshotArgs,
) -> Result<ScreenshotReply, AgentError> {
    debug!("handler::screenshot: {:?}", args);

    let _permit = state.acquire().await.map_err(AgentError::Capture)?;

    // The directory (and anything the tool wrote into it) is removed when
    // `scratch` drops, on every path out of this function
    let scratch = tempfile::Builder::new()
        .prefix("screenshot-")
        .tempdir_in(state.scratch_dir())
        .map_err(|x| AgentError::Capture(ToolError::IoFailure(x)))?;
    let path = scratch.path().join(SCREENSHOT_FILE_NAME);

    let tool_args = vec![
        OsString::from("--quality"),
        OsString::from(args.quality.to_string()),
        path.clone().into_os_string(),
    ];
    proc::run_checked(
        &state.tools.screenshot,
        tool_args,
        state.effective_timeout(0),
    )
    .await
    .map_err(AgentError::Capture)?;

    let image = tokio::fs::read(&path)
        .await
        .map_err(|x| AgentError::Capture(ToolError::IoFailure(x)))?;
    debug!("Captured {} bytes", image.len());

    Ok(ScreenshotReply {
        image: BASE64.encode(image),
    })
}
