use super::{action::handler, state::ServerState};
use crate::core::{msg::ExecArgs, AgentError, SchemaInfo};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use log::{debug, error, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Body of `POST /agent/exec`
#[derive(
    JsonSchema, Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq,
)]
#[serde(default)]
pub struct HttpExecBody {
    pub cmd: String,
    pub timeout: i64,
}

impl SchemaInfo for HttpExecBody {}

/// Answer to `POST /agent/exec`; a command that could not be run at all is
/// reported with exit 1 and the failure as its output
#[derive(
    JsonSchema, Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq,
)]
pub struct HttpExecReply {
    pub exit: i32,
    pub output: String,
}

impl SchemaInfo for HttpExecReply {}

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/agent/exec", post(exec))
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: Arc<ServerState>) {
    if let Err(x) = axum::serve(listener, router(state)).await {
        error!("HTTP server stopped: {}", x);
    }
}

async fn exec(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<HttpExecBody>,
) -> Response {
    let args = ExecArgs {
        cmd: body.cmd,
        timeout: body.timeout,
    };

    debug!("http::exec: {:?}", args);

    match handler::exec::run(state, &args).await {
        Ok(reply) => Json(HttpExecReply {
            exit: reply.exit_code,
            output: reply.output,
        })
        .into_response(),
        Err(AgentError::InvalidRequest { reason }) => {
            (StatusCode::BAD_REQUEST, reason).into_response()
        }
        Err(x) => {
            info!("HTTP exec failed: {}", x);
            Json(HttpExecReply {
                exit: 1,
                output: append_error(x.partial_output(), &x),
            })
            .into_response()
        }
    }
}

fn append_error(output: &str, err: &AgentError) -> String {
    let mut text = String::from(output);
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(&err.to_string());
    text
}
