use super::{state::ServerState, unix::SocketFile};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};

/// Represents a server after listening has begun
pub struct ListeningServer {
    /// Socket file the RPC transport is bound to, removed on drop
    pub(super) socket: SocketFile,

    /// Bound address of the HTTP transport, if enabled
    pub(super) http_addr: Option<SocketAddr>,

    /// Represents the state of the active server
    pub(super) state: Arc<ServerState>,

    /// Represents the handle for accepting RPC connections
    pub(super) unix_handle: JoinHandle<()>,

    /// Represents the handle for serving HTTP requests
    pub(super) http_handle: Option<JoinHandle<()>>,
}

impl ListeningServer {
    pub fn socket_path(&self) -> &Path {
        self.socket.path()
    }

    pub fn http_addr(&self) -> Option<SocketAddr> {
        self.http_addr
    }

    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    /// Stops accepting on every transport, aborts open connections (killing
    /// any processes they started), and removes the socket file
    pub fn shutdown(&self) {
        self.unix_handle.abort();
        if let Some(handle) = self.http_handle.as_ref() {
            handle.abort();
        }
        self.socket.remove();
    }

    /// Waits for the server to complete; a shutdown counts as completion
    ///
    /// Must only be awaited once.
    pub async fn wait(&mut self) -> Result<(), JoinError> {
        let unix = finished(&mut self.unix_handle);
        match self.http_handle.as_mut() {
            Some(http) => tokio::try_join!(unix, finished(http)).map(|_| ()),
            None => unix.await,
        }
    }
}

async fn finished(handle: &mut JoinHandle<()>) -> Result<(), JoinError> {
    match handle.await {
        Err(x) if x.is_cancelled() => Ok(()),
        x => x,
    }
}
