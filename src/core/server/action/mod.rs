pub(super) mod handler;

use crate::core::{
    msg::{Reply, Request},
    server::state::ServerState,
    AgentError,
};
use log::trace;
use std::sync::Arc;

/// Runs the operation named by `request` to completion
pub async fn execute(
    state: Arc<ServerState>,
    request: &Request,
) -> Result<Reply, AgentError> {
    trace!("Executing {:?}", request);

    let result = match request {
        Request::Exec(args) => {
            handler::exec::exec(state, args).await.map(Reply::from)
        }
        Request::Screenshot(args) => {
            handler::screenshot::screenshot(state, args)
                .await
                .map(Reply::from)
        }
        Request::UiClick(args) => {
            handler::ui::click(state, args).await.map(Reply::from)
        }
        Request::UiKeys(args) => {
            handler::ui::keys(state, args).await.map(Reply::from)
        }
    };

    trace!("Result: {:?}", result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        msg::{ExecArgs, ExecReply, UiKeysArgs},
        ToolCommand, Tools,
    };

    fn new_state() -> Arc<ServerState> {
        Arc::new(ServerState::new(
            Tools {
                shell: ToolCommand::with_args("sh", vec!["-c"]),
                screenshot: ToolCommand::new("false"),
                input: ToolCommand::new("true"),
            },
            2,
            None,
            None,
            None,
        ))
    }

    #[tokio::test]
    async fn execute_should_route_exec_to_shell() {
        let reply = execute(
            new_state(),
            &Request::from(ExecArgs {
                cmd: String::from("echo routed"),
                timeout: 0,
            }),
        )
        .await
        .unwrap();

        assert_eq!(
            reply,
            Reply::Exec(ExecReply {
                exit_code: 0,
                output: String::from("routed\n"),
            })
        );
    }

    #[tokio::test]
    async fn execute_should_route_keys_to_input_tool() {
        let reply = execute(
            new_state(),
            &Request::from(UiKeysArgs {
                text: String::from("abc"),
            }),
        )
        .await
        .unwrap();

        assert_eq!(reply, Reply::Empty(Default::default()));
    }

    #[tokio::test]
    async fn execute_should_report_capture_failure() {
        let err = execute(new_state(), &Request::Screenshot(Default::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Capture(_)), "{:?}", err);
    }
}
