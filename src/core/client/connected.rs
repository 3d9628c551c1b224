use super::error::AskError;
use crate::core::msg::{
    ExecArgs, ExecReply, Request, RpcRequest, RpcResponse, ScreenshotArgs,
    ScreenshotReply, UiClickArgs, UiKeysArgs,
};
use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    net::{
        unix::{OwnedReadHalf, OwnedWriteHalf},
        UnixStream,
    },
};

/// Represents a client after connecting to an agent
pub struct ConnectedClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
    next_id: u64,

    /// Represents maximum to wait on responses before timing out
    pub timeout: Duration,
}

impl ConnectedClient {
    /// Default timeout applied to a new client for any ask made
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    pub(super) fn new(stream: UnixStream, timeout: Duration) -> Self {
        let (reader, writer) = stream.into_split();
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
            next_id: 0,
            timeout,
        }
    }

    /// Generic ask of the agent, yielding the raw result on success
    pub async fn ask(&mut self, request: Request) -> Result<Value, AskError> {
        let id = self.next_id;
        self.next_id += 1;

        let rpc = RpcRequest::new(&request, id)
            .map_err(|_| AskError::EncodingFailed)?;
        trace!("Sending {:?}", rpc);
        let mut data =
            serde_json::to_vec(&rpc).map_err(|_| AskError::EncodingFailed)?;
        data.push(b'\n');

        // Timeout covers the response only
        self.writer.write_all(&data).await?;
        let response = tokio::time::timeout(self.timeout, self.receive(id))
            .await
            .map_err(|_| AskError::Timeout)??;
        trace!("Received {:?}", response);

        match response {
            RpcResponse {
                error: Some(msg), ..
            } => Err(AskError::Failure { msg }),
            RpcResponse { result, .. } => Ok(result.unwrap_or(Value::Null)),
        }
    }

    async fn receive(&mut self, id: u64) -> Result<RpcResponse, AskError> {
        loop {
            let line = self
                .lines
                .next_line()
                .await?
                .ok_or(AskError::ConnectionClosed)?;
            let response: RpcResponse = serde_json::from_str(&line)
                .map_err(|x| AskError::InvalidResponse {
                    reason: x.to_string(),
                })?;

            // Answers to requests that previously timed out may still arrive
            if response.id == Value::from(id) {
                return Ok(response);
            }
            debug!("Discarding response for request {}", response.id);
        }
    }

    /// Runs `cmd` on the agent; `timeout_secs` of zero uses the agent's
    /// default
    pub async fn ask_exec(
        &mut self,
        cmd: impl Into<String>,
        timeout_secs: i64,
    ) -> Result<ExecReply, AskError> {
        let request = Request::from(ExecArgs {
            cmd: cmd.into(),
            timeout: timeout_secs,
        });
        decode(self.ask(request).await?)
    }

    pub async fn ask_screenshot(
        &mut self,
        quality: i32,
    ) -> Result<ScreenshotReply, AskError> {
        let request = Request::from(ScreenshotArgs { quality });
        decode(self.ask(request).await?)
    }

    pub async fn ask_click(&mut self, x: i32, y: i32) -> Result<(), AskError> {
        self.ask(Request::from(UiClickArgs { x, y })).await.map(|_| ())
    }

    pub async fn ask_keys(
        &mut self,
        text: impl Into<String>,
    ) -> Result<(), AskError> {
        let request = Request::from(UiKeysArgs { text: text.into() });
        self.ask(request).await.map(|_| ())
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, AskError> {
    serde_json::from_value(value).map_err(|x| AskError::InvalidResponse {
        reason: x.to_string(),
    })
}
