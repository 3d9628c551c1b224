use super::{action, state::ServerState};
use crate::core::msg::{Request, RpcRequest, RpcResponse};
use log::{debug, error, info, trace, warn};
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{unix::OwnedReadHalf, UnixListener, UnixStream},
    task::JoinSet,
};

/// Delay before accepting again after the listener reports an error
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Socket file on disk that the server owns for as long as it listens
#[derive(Debug)]
pub struct SocketFile {
    path: PathBuf,
}

impl SocketFile {
    /// Removes anything left at `path` by a previous run and binds a new
    /// listener there
    pub fn bind(path: impl Into<PathBuf>) -> io::Result<(Self, UnixListener)> {
        let path = path.into();
        match std::fs::remove_file(&path) {
            Ok(()) => debug!("Removed stale socket {}", path.display()),
            Err(x) if x.kind() == io::ErrorKind::NotFound => (),
            Err(x) => return Err(x),
        }

        let listener = UnixListener::bind(&path)?;
        Ok((Self { path }, listener))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the socket file; safe to call more than once
    pub fn remove(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed socket {}", self.path.display()),
            Err(x) if x.kind() == io::ErrorKind::NotFound => (),
            Err(x) => {
                warn!("Failed to remove socket {}: {}", self.path.display(), x)
            }
        }
    }
}

impl Drop for SocketFile {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Accepts connections forever, serving each on its own task
///
/// Connection tasks live in a `JoinSet` owned by this loop, so aborting the
/// loop also aborts every open connection along with its child processes.
pub async fn accept_loop(listener: UnixListener, state: Arc<ServerState>) {
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            result = listener.accept() => match result {
                Ok((stream, _)) => {
                    debug!("Accepted connection");
                    connections.spawn(serve_connection(
                        stream,
                        Arc::clone(&state),
                    ));
                }
                Err(x) => {
                    error!("Failed to accept connection: {}", x);
                    tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                }
            },
            Some(result) = connections.join_next(), if !connections.is_empty() => {
                if let Err(x) = result {
                    if x.is_panic() {
                        error!("Connection task panicked: {}", x);
                    }
                }
            }
        }
    }
}

/// Answers newline-delimited requests on one connection, in order, until
/// the peer hangs up
///
/// A request still running when the peer hangs up is abandoned, which kills
/// its process group and releases its permit.
pub async fn serve_connection(stream: UnixStream, state: Arc<ServerState>) {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => (),
            Err(x) => {
                warn!("Failed to read from connection: {}", x);
                break;
            }
        }

        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let response = tokio::select! {
            response = handle_line(Arc::clone(&state), &line) => response,
            _ = hangup(&mut reader) => {
                info!("Peer hung up mid-request, abandoning it");
                break;
            }
        };
        let mut data = match serde_json::to_vec(&response) {
            Ok(data) => data,
            Err(x) => {
                error!("Failed to encode response: {}", x);
                break;
            }
        };
        data.push(b'\n');

        if let Err(x) = writer.write_all(&data).await {
            warn!("Failed to write response: {}", x);
            break;
        }
    }

    debug!("Connection closed");
}

/// Completes once the peer closes its end; stays pending if the peer has
/// already queued more requests
async fn hangup(reader: &mut BufReader<OwnedReadHalf>) {
    let closed = match reader.fill_buf().await {
        Ok(buf) => buf.is_empty(),
        Err(_) => true,
    };

    if !closed {
        std::future::pending::<()>().await;
    }
}

/// Decodes, runs, and answers a single request line
async fn handle_line(state: Arc<ServerState>, line: &[u8]) -> RpcResponse {
    let rpc = serde_json::from_slice::<RpcRequest>(line);
    let RpcRequest { method, params, id } = match rpc {
        Ok(rpc) => rpc,
        Err(x) => {
            warn!("Undecodable request: {}", x);
            return RpcResponse::failure(
                Value::Null,
                format!("Invalid request: {}", x),
            );
        }
    };
    trace!("Request {}: {} {}", id, method, params);

    let request = match Request::from_rpc(&method, params) {
        Ok(request) => request,
        Err(x) => {
            warn!("Rejected {}: {}", method, x);
            return RpcResponse::failure(id, x.to_string());
        }
    };

    match action::execute(state, &request).await {
        Ok(reply) => RpcResponse::success(id, &reply),
        Err(x) => {
            info!("{} failed: {}", method, x);
            RpcResponse::failure(id, x.to_string())
        }
    }
}
