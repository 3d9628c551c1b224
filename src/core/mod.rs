pub mod client;
mod error;
pub mod msg;
pub mod server;

pub use client::{
    error::AskError, Client, ClientBuilder, ClientBuilderError, ConnectedClient,
};
pub use error::{AgentError, ErrorKind, ToolError};
pub use msg::{Reply, Request, RpcRequest, RpcResponse};
pub use server::{
    proc::{ProcOutput, ToolCommand},
    state::{ServerState, Tools},
    HttpExecBody, HttpExecReply, ListeningServer, Server, ServerBuilder,
    ServerBuilderError,
};

/// Default location of the agent's unix-domain socket
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/agent.sock";

pub trait SchemaInfo: schemars::JsonSchema {
    /// Outputs schema as a pretty JSON string
    fn schema() -> String {
        let schema = schemars::schema_for!(Self);
        serde_json::to_string_pretty(&schema)
            .unwrap_or_else(|x| format!("{{\"error\": \"{}\"}}", x))
    }
}
